// Property files: `key = value` lines with `#` comments

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::Path;

use thiserror::Error;

/// Iterate over the `key = value` entries of a property file
///
/// Keys keep their case. Text after `#` is a comment. Lines without `=`
/// are skipped with a warning.
pub fn entries(data: &str) -> impl Iterator<Item = (&str, &str)> + '_ {
    data.lines().enumerate().filter_map(|(n, line)| {
        let line = match line.split_once('#') {
            Some((body, _)) => body,
            None => line,
        }
        .trim();
        if line.is_empty() {
            return None;
        }
        match line.split_once('=') {
            Some((key, value)) => Some((key.trim_end(), value.trim_start())),
            None => {
                tracing::warn!(line = n + 1, key = line, "key without value");
                None
            }
        }
    })
}

/// Read a whole property file into memory
pub fn read_propfile<P: AsRef<Path>>(path: P) -> Result<String, PropertyError> {
    Ok(fs::read_to_string(path)?)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PropertyError {
    #[error("Property file not found")]
    FileNotFound,
    #[error("Invalid property file format")]
    InvalidFormat,
    #[error("I/O error reading property file")]
    IoError,
}

impl From<io::Error> for PropertyError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => PropertyError::FileNotFound,
            io::ErrorKind::InvalidData => PropertyError::InvalidFormat,
            _ => PropertyError::IoError,
        }
    }
}

/// Property file with case-insensitive keys
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PropertyFile {
    properties: HashMap<String, String>,
}

impl PropertyFile {
    /// Load a property file from disk
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, PropertyError> {
        let content = read_propfile(path)?;
        Ok(Self::parse(&content))
    }

    /// Parse property file content
    pub fn parse(content: &str) -> Self {
        let properties = entries(content)
            .filter(|(key, _)| !key.is_empty())
            .map(|(key, value)| (key.to_uppercase(), value.to_string()))
            .collect();
        PropertyFile { properties }
    }

    /// Get a property value by key
    pub fn get(&self, key: &str) -> Option<&String> {
        self.properties.get(&key.to_uppercase())
    }

    /// Get a property value with a default
    pub fn get_or(&self, key: &str, default: &str) -> String {
        self.get(key)
            .cloned()
            .unwrap_or_else(|| default.to_string())
    }

    /// Get an unsigned integer property
    pub fn get_u64(&self, key: &str) -> Option<u64> {
        self.get(key)?.parse().ok()
    }

    /// Get a boolean property; accepts `true`/`false` and `1`/`0`
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        match self.get(key)?.to_lowercase().as_str() {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        }
    }

    /// Set a property value
    pub fn set(&mut self, key: &str, value: &str) {
        self.properties
            .insert(key.to_uppercase(), value.to_string());
    }

    /// Check if a property exists
    pub fn contains(&self, key: &str) -> bool {
        self.properties.contains_key(&key.to_uppercase())
    }

    /// Get the number of properties
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Check if the property file is empty
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}
