//! Message catalog
//!
//! Resolves the message ids used by scripts to display text and a nominal
//! speaking time.

use std::collections::HashMap;
use std::path::Path;

use super::propfile::{entries, read_propfile, PropertyError};

/// Suffix of keys that carry an explicit duration
const TIME_SUFFIX: &str = ".time";

/// Shortest speaking time of a line, in milliseconds
pub const MIN_MESSAGE_TIME: u64 = 1000;

/// Speaking time per character when no duration is given
pub const MS_PER_CHAR: u64 = 50;

/// Lookup of message text and duration
pub trait MessageCatalog: Send + Sync {
    /// Display text of message `id`
    fn text_for(&self, id: &str) -> String;
    /// Nominal speaking time of message `id`, in milliseconds
    fn duration_for(&self, id: &str) -> u64;
}

/// Catalog backed by a property file
///
/// ```text
/// DIA_Smith_Hello_15_00 = Hello, smith.
/// DIA_Smith_Hello_15_00.time = 2000
/// ```
#[derive(Debug, Clone, Default)]
pub struct PropCatalog {
    texts: HashMap<String, String>,
    times: HashMap<String, u64>,
}

impl PropCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a catalog from disk
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, PropertyError> {
        let content = read_propfile(path)?;
        Ok(Self::parse(&content))
    }

    /// Parse catalog content
    pub fn parse(content: &str) -> Self {
        let mut catalog = Self::new();
        for (key, value) in entries(content) {
            if let Some(id) = key.strip_suffix(TIME_SUFFIX) {
                match value.parse() {
                    Ok(ms) => {
                        catalog.times.insert(id.to_string(), ms);
                    }
                    Err(_) => tracing::warn!(key, value, "invalid message time"),
                }
            } else {
                catalog.texts.insert(key.to_string(), value.to_string());
            }
        }
        catalog
    }

    /// Add or replace a message
    pub fn insert(&mut self, id: &str, text: &str, time: Option<u64>) {
        self.texts.insert(id.to_string(), text.to_string());
        match time {
            Some(ms) => {
                self.times.insert(id.to_string(), ms);
            }
            None => {
                self.times.remove(id);
            }
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.texts.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }
}

impl MessageCatalog for PropCatalog {
    fn text_for(&self, id: &str) -> String {
        match self.texts.get(id) {
            Some(text) => text.clone(),
            None => {
                tracing::warn!(id, "message not in catalog");
                id.to_string()
            }
        }
    }

    fn duration_for(&self, id: &str) -> u64 {
        if let Some(&ms) = self.times.get(id) {
            return ms;
        }
        let chars = self.texts.get(id).map_or(0, |t| t.chars().count()) as u64;
        (chars * MS_PER_CHAR).max(MIN_MESSAGE_TIME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io::Write;

    const SAMPLE: &str = "\
# Smith
DIA_Smith_Hello_15_00 = Hello, smith.
DIA_Smith_Hello_15_00.time = 2000
DIA_Smith_Hello_11_01 = What do you want? I'm busy with a very important sword.
";

    #[test]
    fn test_parse_texts_and_times() {
        let catalog = PropCatalog::parse(SAMPLE);
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.text_for("DIA_Smith_Hello_15_00"), "Hello, smith.");
        assert_eq!(catalog.duration_for("DIA_Smith_Hello_15_00"), 2000);
    }

    #[test]
    fn test_duration_from_text_length() {
        let catalog = PropCatalog::parse(SAMPLE);
        let text = catalog.text_for("DIA_Smith_Hello_11_01");
        assert_eq!(
            catalog.duration_for("DIA_Smith_Hello_11_01"),
            text.chars().count() as u64 * MS_PER_CHAR
        );
    }

    #[rstest]
    #[case(2, MIN_MESSAGE_TIME)]
    #[case(0, MIN_MESSAGE_TIME)]
    #[case(40, 40 * MS_PER_CHAR)]
    fn test_duration_floor(#[case] chars: usize, #[case] expected: u64) {
        let mut catalog = PropCatalog::new();
        catalog.insert("MSG", &"x".repeat(chars), None);
        assert_eq!(catalog.duration_for("MSG"), expected);
    }

    #[test]
    fn test_missing_message_falls_back_to_id() {
        let catalog = PropCatalog::new();
        assert_eq!(catalog.text_for("DIA_UNKNOWN"), "DIA_UNKNOWN");
        assert_eq!(catalog.duration_for("DIA_UNKNOWN"), MIN_MESSAGE_TIME);
    }

    #[test]
    fn test_invalid_time_ignored() {
        let catalog = PropCatalog::parse("MSG = Hello\nMSG.time = soon\n");
        assert_eq!(catalog.duration_for("MSG"), MIN_MESSAGE_TIME);
    }

    #[test]
    fn test_insert_replaces_time() {
        let mut catalog = PropCatalog::new();
        catalog.insert("MSG", "Hello", Some(2500));
        assert_eq!(catalog.duration_for("MSG"), 2500);
        catalog.insert("MSG", "Hello", None);
        assert_eq!(catalog.duration_for("MSG"), MIN_MESSAGE_TIME);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", SAMPLE).unwrap();

        let catalog = PropCatalog::load(file.path()).unwrap();
        assert!(catalog.contains("DIA_Smith_Hello_15_00"));
    }

    #[test]
    fn test_load_missing_file() {
        let err = PropCatalog::load("/nonexistent/messages.txt").unwrap_err();
        assert_eq!(err, PropertyError::FileNotFound);
    }
}
