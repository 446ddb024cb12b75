//! Configuration system

pub use serde::{Deserialize, Serialize};

/// Configuration trait
///
/// Types implementing this trait can round-trip through TOML files on
/// disk. Formats are selected by file extension so a future format only
/// needs a new arm here, not a new trait.
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::Io)?;

        if path.ends_with(".toml") {
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
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
    use crate::render::{CullMode, RasterizerConfig};

    #[test]
    fn test_rasterizer_config_round_trips_through_toml() {
        let path = std::env::temp_dir().join(format!("raster_config_{}.toml", std::process::id()));
        let path = path.to_string_lossy().into_owned();

        let config = RasterizerConfig::new()
            .with_cull_mode(CullMode::Back)
            .with_worker_threads(4);
        config.save_to_file(&path).unwrap();

        let loaded = RasterizerConfig::load_from_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(loaded.cull_mode, CullMode::Back);
        assert_eq!(loaded.worker_threads, 4);
    }

    #[test]
    fn test_unknown_extension_is_rejected() {
        let config = RasterizerConfig::new();
        assert!(matches!(
            config.save_to_file("settings.yaml"),
            Err(ConfigError::UnsupportedFormat(_))
        ));
    }
}
