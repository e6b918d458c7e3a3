use std::path::{Path, PathBuf};

/// Environment variable that overrides the data directory
pub const HOME_ENV: &str = "TRAYTODO_HOME";

/// Name of the optional config file inside the data directory
pub const CONFIG_FILE: &str = "traytodo.toml";

/// Resolve the data directory: explicit override, then `TRAYTODO_HOME`,
/// then the directory holding the running executable.
pub fn data_dir(override_dir: Option<&Path>) -> std::io::Result<PathBuf> {
    if let Some(dir) = override_dir {
        return Ok(dir.to_path_buf());
    }
    if let Some(dir) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    executable_dir()
}

/// Directory containing the running executable
fn executable_dir() -> std::io::Result<PathBuf> {
    let exe = std::env::current_exe()?;
    Ok(exe
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(".")))
}
