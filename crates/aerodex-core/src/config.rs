//! Classifier configuration.

use crate::Result;
use aerodex_dsm::DsmSettings;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Name of the sub-directory that marks a nested dataset root.
pub const DEFAULT_DATASET_MARKER: &str = ".aerodex";

fn default_dataset_marker() -> String {
    DEFAULT_DATASET_MARKER.to_string()
}

/// Configuration for an [`crate::EntryClassifier`].
///
/// Deserializable from YAML; every field has a default, so an empty
/// document is a valid configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Propagate the first per-file failure instead of logging it.
    pub strict: bool,
    /// Sub-directory name that marks a nested dataset.
    #[serde(rename = "dataset_marker")]
    pub dataset_marker_override: Option<String>,
    /// Elevation cache settings.
    pub dsm: DsmSettings,
}

impl ClassifierConfig {
    /// The effective dataset marker name.
    pub fn dataset_marker(&self) -> &str {
        self.dataset_marker_override
            .as_deref()
            .unwrap_or(DEFAULT_DATASET_MARKER)
    }

    /// Parse a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load a YAML configuration file.
    pub fn from_yaml_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = ClassifierConfig::from_yaml_str("{}").unwrap();
        assert!(!config.strict);
        assert_eq!(config.dataset_marker(), DEFAULT_DATASET_MARKER);
        assert_eq!(config.dsm.fetch_radius_m, aerodex_dsm::DEFAULT_FETCH_RADIUS_M);
    }

    #[test]
    fn test_partial_document() {
        let config = ClassifierConfig::from_yaml_str(
            "strict: true\ndataset_marker: .mydata\ndsm:\n  timeout_secs: 3\n",
        )
        .unwrap();
        assert!(config.strict);
        assert_eq!(config.dataset_marker(), ".mydata");
        assert_eq!(config.dsm.timeout_secs, 3);
        // Untouched dsm fields keep their defaults
        assert!(config.dsm.url_template.contains("{west}"));
    }
}
