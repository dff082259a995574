//! Configuration file support

use std::path::Path;

pub use serde::{Serialize, Deserialize};

/// Configuration trait
///
/// The file format is picked from the extension: `.toml` or `.ron`.
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;

        match ConfigFormat::from_path(path)? {
            ConfigFormat::Toml => toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
            ConfigFormat::Ron => ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
        }
    }

    /// Load a file whose keys override the fields of `self`
    ///
    /// Tables are merged key by key, so a file may name a single nested
    /// field. Any other value in the file replaces the one in `self`.
    fn overlay_file(self, path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;

        match ConfigFormat::from_path(path)? {
            ConfigFormat::Toml => {
                let base = toml::to_string(&self).map_err(|e| ConfigError::Serialize(e.to_string()))?;
                let base: toml::Table = toml::from_str(&base).map_err(|e| ConfigError::Parse(e.to_string()))?;
                let overlay: toml::Table = toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))?;
                let mut merged = toml::Value::Table(base);
                merge_toml(&mut merged, toml::Value::Table(overlay));
                merged.try_into::<Self>().map_err(|e| ConfigError::Parse(e.to_string()))
            }
            ConfigFormat::Ron => {
                let base = ron::to_string(&self).map_err(|e| ConfigError::Serialize(e.to_string()))?;
                let base: ron::Value = ron::from_str(&base).map_err(|e| ConfigError::Parse(e.to_string()))?;
                let overlay: ron::Value = ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))?;
                merge_ron(base, overlay)
                    .into_rust::<Self>()
                    .map_err(|e| ConfigError::Parse(e.to_string()))
            }
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = match ConfigFormat::from_path(path)? {
            ConfigFormat::Toml => {
                toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
            }
            ConfigFormat::Ron => ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?,
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

fn merge_toml(base: &mut toml::Value, overlay: toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base), toml::Value::Table(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(existing) => merge_toml(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

fn merge_ron(base: ron::Value, overlay: ron::Value) -> ron::Value {
    match (base, overlay) {
        (ron::Value::Map(mut base), ron::Value::Map(overlay)) => {
            for (key, value) in overlay {
                let merged = match base.remove(&key) {
                    Some(existing) => merge_ron(existing, value),
                    None => value,
                };
                base.insert(key, merged);
            }
            ron::Value::Map(base)
        }
        (_, overlay) => overlay,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigFormat {
    Toml,
    Ron,
}

impl ConfigFormat {
    fn from_path(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Ok(Self::Toml),
            Some("ron") => Ok(Self::Ron),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(ConfigFormat::from_path(Path::new("a/b.toml")).unwrap(), ConfigFormat::Toml);
        assert_eq!(ConfigFormat::from_path(Path::new("lesson.ron")).unwrap(), ConfigFormat::Ron);
        assert!(matches!(
            ConfigFormat::from_path(Path::new("lesson.json")),
            Err(ConfigError::UnsupportedFormat(_))
        ));
        assert!(ConfigFormat::from_path(Path::new("no_extension")).is_err());
    }

    #[test]
    fn test_nested_tables_merge_key_by_key() {
        let table = |text: &str| toml::Value::Table(toml::from_str::<toml::Table>(text).unwrap());
        let mut base = table("a = 1\n[t]\nx = 1\ny = 2\n");
        merge_toml(&mut base, table("[t]\ny = 5\nz = 6\n"));
        assert_eq!(base, table("a = 1\n[t]\nx = 1\ny = 5\nz = 6\n"));

        let base: ron::Value = ron::from_str("(a: 1, t: (x: 1, y: 2))").unwrap();
        let overlay: ron::Value = ron::from_str("(t: (y: 5))").unwrap();
        let expected: ron::Value = ron::from_str("(a: 1, t: (x: 1, y: 5))").unwrap();
        assert_eq!(merge_ron(base, overlay), expected);
    }
}
