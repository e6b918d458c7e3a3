use chrono::NaiveDate;
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

/// Date format used for the `date` field on disk.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A single to-do record as stored in the task file.
///
/// Fields are read leniently: a value of the wrong JSON type falls back to
/// the field default instead of failing the whole document, so one odd
/// record never hides the rest of the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Opaque unique identifier (UUID v4). Records written without one get
    /// an id assigned on load.
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,
    /// User-visible text
    #[serde(default, deserialize_with = "lenient_string")]
    pub text: String,
    /// Completion flag
    #[serde(default, deserialize_with = "lenient_bool")]
    pub checked: bool,
    /// Emphasis flag
    #[serde(default, deserialize_with = "lenient_bool")]
    pub important: bool,
    /// True once the task has left the active list
    #[serde(default, deserialize_with = "lenient_bool")]
    pub archive: bool,
    /// `YYYY-MM-DD`, kept verbatim so unparseable values survive a save
    #[serde(
        default,
        deserialize_with = "lenient_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub date: Option<String>,
}

impl Task {
    /// Create a fresh active task dated `today` with a newly generated id
    pub fn new(text: String, today: NaiveDate) -> Self {
        Task {
            id: generate_id(),
            text,
            checked: false,
            important: false,
            archive: false,
            date: Some(format_date(today)),
        }
    }

    /// The record date, if present and well-formed
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        self.date.as_deref().and_then(parse_date)
    }

    /// Whether the record's date is exactly `day`
    pub fn is_dated(&self, day: NaiveDate) -> bool {
        self.parsed_date() == Some(day)
    }

    /// First eight characters of the id, for display
    pub fn short_id(&self) -> &str {
        match self.id.char_indices().nth(8) {
            Some((i, _)) => &self.id[..i],
            None => &self.id,
        }
    }
}

// ---------------------------------------------------------------------------
// Lenient field decoding
// ---------------------------------------------------------------------------

/// Any JSON value a record field might hold
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Number(serde_json::Number),
    Bool(bool),
    Other(IgnoredAny),
}

/// Strings are kept, numbers and booleans are stringified, anything else
/// (null, arrays, objects) reads as empty.
fn lenient_string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(match Scalar::deserialize(d)? {
        Scalar::Text(s) => s,
        Scalar::Number(n) => n.to_string(),
        Scalar::Bool(b) => b.to_string(),
        Scalar::Other(_) => String::new(),
    })
}

/// Only a JSON `true` reads as true.
fn lenient_bool<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
    Ok(matches!(Scalar::deserialize(d)?, Scalar::Bool(true)))
}

/// Only strings carry a date; anything else reads as no date.
fn lenient_date<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(match Scalar::deserialize(d)? {
        Scalar::Text(s) => Some(s),
        _ => None,
    })
}

/// Generate a new opaque task id
pub fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Format a date the way it is stored on disk
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parse a stored date; surrounding whitespace is tolerated
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).ok()
}

/// Normalize user-entered text: newlines become spaces, ends are trimmed.
/// Returns `None` when nothing is left.
pub fn clean_text(raw: &str) -> Option<String> {
    let text = raw.replace(['\r', '\n'], " ");
    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    #[test]
    fn new_task_defaults() {
        let task = Task::new("buy milk".into(), day("2024-01-03"));
        assert!(!task.checked);
        assert!(!task.important);
        assert!(!task.archive);
        assert_eq!(task.date.as_deref(), Some("2024-01-03"));
        assert_eq!(task.id.len(), 36);
    }

    #[test]
    fn ids_are_unique() {
        let a = Task::new("a".into(), day("2024-01-03"));
        let b = Task::new("b".into(), day("2024-01-03"));
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let task: Task = serde_json::from_str(r#"{"text":"x"}"#).unwrap();
        assert_eq!(task.id, "");
        assert!(!task.checked);
        assert!(task.date.is_none());
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let task: Task =
            serde_json::from_str(r#"{"id":"1","text":"x","color":"red","priority":3}"#).unwrap();
        assert_eq!(task.id, "1");
        let out = serde_json::to_string(&task).unwrap();
        assert!(!out.contains("color"));
    }

    #[test]
    fn numeric_id_is_stringified() {
        let task: Task =
            serde_json::from_str(r#"{"id":1,"text":"buy milk","checked":true,"archive":false}"#)
                .unwrap();
        assert_eq!(task.id, "1");
        assert!(task.checked);
    }

    #[test]
    fn null_and_mistyped_fields_take_defaults() {
        let task: Task = serde_json::from_str(
            r#"{"id":null,"text":null,"checked":"yes","important":null,"archive":1,"date":20240103}"#,
        )
        .unwrap();
        assert_eq!(task.id, "");
        assert_eq!(task.text, "");
        assert!(!task.checked);
        assert!(!task.important);
        assert!(!task.archive);
        assert!(task.date.is_none());
    }

    #[test]
    fn unparseable_date_is_kept_verbatim() {
        let task: Task = serde_json::from_str(r#"{"id":"1","text":"x","date":"someday"}"#).unwrap();
        assert!(task.parsed_date().is_none());
        assert_eq!(task.date.as_deref(), Some("someday"));
    }

    #[test]
    fn clean_text_rules() {
        assert_eq!(clean_text("   "), None);
        assert_eq!(clean_text(""), None);
        assert_eq!(clean_text("  buy\nmilk "), Some("buy milk".to_string()));
        assert_eq!(clean_text("\n\n"), None);
    }

    #[test]
    fn short_id_truncates() {
        let mut task = Task::new("x".into(), day("2024-01-03"));
        task.id = "0123456789abcdef".into();
        assert_eq!(task.short_id(), "01234567");
        task.id = "abc".into();
        assert_eq!(task.short_id(), "abc");
    }
}
