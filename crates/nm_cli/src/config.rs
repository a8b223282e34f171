use std::fs;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use nm_engine::{NoteType, PipelineOptions};

pub const DEFAULT_CONFIG_FILE: &str = "nm_config.toml";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NmConfig {
    /// Note type used when `--hint` is not given.
    pub default_hint: String,
    pub output: OutputFormat,
    /// Append one JSON line per routed input here.
    pub history_path: Option<PathBuf>,
    /// `EnvFilter` directives, e.g. `classify=debug,route=debug`.
    pub log_filter: Option<String>,
    pub strip_edge_equals: bool,
}

impl Default for NmConfig {
    fn default() -> Self {
        Self {
            default_hint: "auto".to_string(),
            output: OutputFormat::Text,
            history_path: None,
            log_filter: None,
            strip_edge_equals: true,
        }
    }
}

impl NmConfig {
    /// Load from `path`, or `nm_config.toml` in the working directory.
    ///
    /// A missing default file means defaults. Unreadable or invalid files
    /// are reported on stderr and also fall back to defaults; logging is
    /// not configured yet at this point.
    pub fn load(path: Option<&Path>) -> Self {
        let explicit = path.is_some();
        let path = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
        if !path.exists() {
            if explicit {
                eprintln!(
                    "Config file {} not found. Using defaults.",
                    path.display()
                );
            }
            return Self::default();
        }
        match fs::read_to_string(path) {
            Ok(content) => match Self::from_toml(&content) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("Error parsing config file: {e}. Using defaults.");
                    Self::default()
                }
            },
            Err(e) => {
                eprintln!("Error reading config file: {e}. Using defaults.");
                Self::default()
            }
        }
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn note_type(&self) -> NoteType {
        NoteType::parse(&self.default_hint)
    }

    pub fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            strip_edge_equals: self.strip_edge_equals,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = NmConfig::from_toml("output = \"json\"\n").unwrap();
        assert_eq!(config.output, OutputFormat::Json);
        assert_eq!(config.default_hint, "auto");
        assert!(config.strip_edge_equals);
    }

    #[test]
    fn test_full_file() {
        let config = NmConfig::from_toml(
            r#"
default_hint = "calculus"
output = "text"
history_path = "history.jsonl"
log_filter = "route=debug"
strip_edge_equals = false
"#,
        )
        .unwrap();
        assert_eq!(config.note_type(), NoteType::Calculus);
        assert_eq!(config.history_path, Some(PathBuf::from("history.jsonl")));
        assert_eq!(config.log_filter.as_deref(), Some("route=debug"));
        assert!(!config.pipeline_options().strip_edge_equals);
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        assert!(NmConfig::from_toml("output = 3").is_err());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = std::env::temp_dir().join("nm_cli_config_test_missing");
        let config = NmConfig::load(Some(dir.join("nope.toml").as_path()));
        assert_eq!(config, NmConfig::default());
    }
}
