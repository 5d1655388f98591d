use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::aggregator::DEFAULT_RECENT_LIMIT;

/// Configuration for the auth log report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Log source configuration
    pub input: InputConfig,
    /// Report configuration
    pub report: ReportConfig,
    /// Export configuration
    pub export: ExportConfig,
}

/// Log source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// Directory scanned for log files
    pub log_dir: PathBuf,
    /// File name prefix matching the log and its rotations
    pub file_prefix: String,
}

/// Report configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Output format: "text" or "json"
    pub format: String,
    /// Number of history entries shown per user
    pub recent_limit: usize,
}

/// Export configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Path the full-history export is written to
    pub file_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            input: InputConfig {
                log_dir: PathBuf::from("/var/log"),
                file_prefix: "auth.log".to_string(),
            },
            report: ReportConfig {
                format: "text".to_string(),
                recent_limit: DEFAULT_RECENT_LIMIT,
            },
            export: ExportConfig {
                file_path: PathBuf::from("log.txt"),
            },
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &PathBuf) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to a file
    pub fn to_file(&self, path: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_production_layout() {
        let config = Config::default();
        assert_eq!(config.input.log_dir, PathBuf::from("/var/log"));
        assert_eq!(config.input.file_prefix, "auth.log");
        assert_eq!(config.report.recent_limit, 10);
        assert_eq!(config.export.file_path, PathBuf::from("log.txt"));
    }

    #[test]
    fn test_toml_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let config = Config::default();
        config.to_file(&path).unwrap();
        let loaded = Config::from_file(&path).unwrap();

        assert_eq!(loaded.input.file_prefix, config.input.file_prefix);
        assert_eq!(loaded.report.format, config.report.format);
        assert_eq!(loaded.report.recent_limit, config.report.recent_limit);
        assert_eq!(loaded.export.file_path, config.export.file_path);
    }
}
