//! Pipeline configuration
//!
//! Locates the corpus files, reference dictionaries, similarity matrices
//! and result directories for a batch run. Loadable from JSON, YAML or
//! TOML; every path setting has a working default relative to the
//! current directory.

use crate::corpus::Collection;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde::Serialize;
use std::path::Path;
use std::path::PathBuf;
use tracing::debug;

/// Configuration validation error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error when reading a config file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// JSON parsing error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    /// YAML parsing error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),
    /// Missing required field
    #[error("Missing required field: {0}")]
    MissingField(String),
}

/// Configuration format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// JSON format
    Json,
    /// YAML format
    Yaml,
    /// TOML format
    Toml,
}

impl ConfigFormat {
    /// Detect format from file extension
    pub fn from_extension(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            "toml" => Some(Self::Toml),
            _ => None,
        }
    }
}

/// Configuration validation trait
pub trait ConfigValidation {
    /// Validate configuration
    fn validate(&self) -> Result<(), ConfigError>;
}

fn load_file<T>(path: &Path) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let format = ConfigFormat::from_extension(path).ok_or_else(|| {
        ConfigError::Validation(format!("unknown config file format: {}", path.display()))
    })?;
    let content = std::fs::read_to_string(path)?;
    debug!(path = %path.display(), ?format, "loading config");
    let config = match format {
        ConfigFormat::Json => serde_json::from_str(&content)?,
        ConfigFormat::Yaml => serde_yaml::from_str(&content)?,
        ConfigFormat::Toml => toml::from_str(&content)?,
    };
    Ok(config)
}

/// Settings for one batch run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Directory holding corpus CSV files, one per collection
    pub data_dir: PathBuf,
    /// Directory holding dictionary and lexicon CSV files
    pub dictionaries_dir: PathBuf,
    /// Directory holding precomputed similarity matrices
    pub matrices_dir: PathBuf,
    /// Directory where annotation tables and graphs are written
    pub results_dir: PathBuf,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            dictionaries_dir: PathBuf::from("dictionaries"),
            matrices_dir: PathBuf::from("matrices"),
            results_dir: PathBuf::from("results"),
        }
    }
}

impl PipelineConfig {
    /// Load from a JSON, YAML or TOML file, then validate
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let config: Self = load_file(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Corpus CSV for a collection, e.g. `data/sb.csv`
    pub fn corpus_path(&self, collection: Collection) -> PathBuf {
        self.data_dir.join(format!("{}.csv", collection.short_name()))
    }

    /// Precomputed similarity matrix, e.g. `matrices/sb-ar.csv`
    pub fn matrix_path(&self, collection: Collection, lang: &str) -> PathBuf {
        self.matrices_dir
            .join(format!("{}-{}.csv", collection.short_name(), lang))
    }

    /// Mention table for a collection and category,
    /// e.g. `results/sb/locations.csv`
    pub fn mention_table_path(&self, collection: Collection, category: &str) -> PathBuf {
        self.results_dir
            .join(collection.short_name())
            .join(format!("{category}.csv"))
    }

    /// Similarity table for a collection, e.g. `results/sb/similarity.csv`
    pub fn similarity_table_path(&self, collection: Collection) -> PathBuf {
        self.results_dir
            .join(collection.short_name())
            .join("similarity.csv")
    }

    /// Emitted graph file, e.g. `results/sb.ttl`
    pub fn graph_path(&self, collection: Collection) -> PathBuf {
        self.results_dir
            .join(format!("{}.ttl", collection.short_name()))
    }
}

impl ConfigValidation for PipelineConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        for (name, path) in [
            ("data_dir", &self.data_dir),
            ("dictionaries_dir", &self.dictionaries_dir),
            ("matrices_dir", &self.matrices_dir),
            ("results_dir", &self.results_dir),
        ] {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::MissingField(name.to_string()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_paths() {
        let config = PipelineConfig::default();
        assert_eq!(
            config.corpus_path(Collection::Bukhari),
            PathBuf::from("data/sb.csv")
        );
        assert_eq!(
            config.matrix_path(Collection::Tirmidhi, "ar"),
            PathBuf::from("matrices/tir-ar.csv")
        );
        assert_eq!(
            config.mention_table_path(Collection::Muslim, "locations"),
            PathBuf::from("results/ms/locations.csv")
        );
        assert_eq!(
            config.graph_path(Collection::Nasai),
            PathBuf::from("results/nis.ttl")
        );
    }

    #[test]
    fn test_load_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pipeline.toml");
        std::fs::write(&path, "data_dir = \"corpora\"\n").unwrap();
        let config = PipelineConfig::load(&path).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("corpora"));
        // Unset fields keep their defaults.
        assert_eq!(config.results_dir, PathBuf::from("results"));
    }

    #[test]
    fn test_load_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pipeline.yaml");
        std::fs::write(&path, "results_dir: out\n").unwrap();
        let config = PipelineConfig::load(&path).unwrap();
        assert_eq!(config.results_dir, PathBuf::from("out"));
    }

    #[test]
    fn test_unknown_extension_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pipeline.ini");
        std::fs::write(&path, "x=1\n").unwrap();
        assert!(matches!(
            PipelineConfig::load(&path),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_empty_path_rejected() {
        let config = PipelineConfig {
            data_dir: PathBuf::new(),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingField(_))
        ));
    }
}
