use serde::Deserialize;

/// Configuration from traytodo.toml
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub archive: ArchiveConfig,
    #[serde(default)]
    pub about: AboutConfig,
    #[serde(default)]
    pub watch: WatchConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Task file name, relative to the data directory
    #[serde(default = "default_store_file")]
    pub file: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            file: default_store_file(),
        }
    }
}

/// How archived tasks are split into time buckets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BucketScheme {
    /// Today / Yesterday / This week (ISO) / This month / Older
    #[default]
    Calendar,
    /// Today / Yesterday / Last week (<= 7 days) / Last month (<= 30 days) / Older
    DayCount,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArchiveConfig {
    #[serde(default)]
    pub scheme: BucketScheme,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AboutConfig {
    #[serde(default = "default_about_file")]
    pub file: String,
    /// Wrap width in terminal cells
    #[serde(default = "default_about_width")]
    pub width: usize,
}

impl Default for AboutConfig {
    fn default() -> Self {
        AboutConfig {
            file: default_about_file(),
            width: default_about_width(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct WatchConfig {
    /// Seconds between date-rollover checks
    #[serde(default = "default_poll_secs")]
    pub poll_secs: u64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        WatchConfig {
            poll_secs: default_poll_secs(),
        }
    }
}

fn default_store_file() -> String {
    "tasks.json".to_string()
}

fn default_about_file() -> String {
    "about.txt".to_string()
}

fn default_about_width() -> usize {
    40
}

fn default_poll_secs() -> u64 {
    60
}
