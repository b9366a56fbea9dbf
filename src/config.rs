//! Dashboard configuration.
//!
//! [`DashboardConfig::default`] reproduces the stock dashboard. A JSON file may override any
//! subset of fields:
//!
//! ```json
//! { "top_n": 5, "clinical_age_bands": { "edges": [0, 40, 120], "labels": ["<40", "40+"] } }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};
use crate::processing::Bands;

/// Tunables for the dashboard views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    /// Number of entries kept in "top N" rankings (hospitals, rooms).
    pub top_n: usize,
    /// Number of rows in the demographic sample table.
    pub sample_rows: usize,
    /// Age bands for the demographic age distribution.
    pub demographic_age_bands: Bands,
    /// Age bands for the clinical age-category x condition crosstab.
    pub clinical_age_bands: Bands,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            top_n: 10,
            sample_rows: 10,
            demographic_age_bands: Bands::new(
                vec![0, 18, 30, 45, 60, 100],
                vec!["0-18", "19-30", "31-45", "46-60", "60+"],
            )
            .expect("default demographic bands are valid"),
            clinical_age_bands: Bands::new(vec![0, 30, 50, 70, 100], vec!["<30", "30-50", "50-70", "70+"])
                .expect("default clinical bands are valid"),
        }
    }
}

impl DashboardConfig {
    /// Parse a configuration from JSON; missing fields take their defaults.
    pub fn from_json_str(input: &str) -> ConfigResult<Self> {
        let cfg: Self = serde_json::from_str(input)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read and parse a JSON configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let cfg = Self::from_json_str(&text)?;
        log::debug!("loaded dashboard config from {}: {cfg:?}", path.display());
        Ok(cfg)
    }

    fn validate(&self) -> ConfigResult<()> {
        if self.top_n == 0 {
            return Err(ConfigError::Invalid("top_n must be at least 1".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::DashboardConfig;
    use crate::error::ConfigError;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = DashboardConfig::from_json_str(r#"{"top_n": 3}"#).unwrap();
        assert_eq!(cfg.top_n, 3);
        assert_eq!(cfg.sample_rows, 10);
        assert_eq!(cfg.clinical_age_bands, DashboardConfig::default().clinical_age_bands);
    }

    #[test]
    fn bands_are_validated_when_parsed() {
        let err = DashboardConfig::from_json_str(
            r#"{"clinical_age_bands": {"edges": [0, 50, 20], "labels": ["a", "b"]}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
        assert!(err.to_string().contains("strictly increasing"));
    }

    #[test]
    fn rejects_zero_top_n_and_unknown_fields() {
        assert!(matches!(
            DashboardConfig::from_json_str(r#"{"top_n": 0}"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(DashboardConfig::from_json_str(r#"{"colour": "blue"}"#).is_err());
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = DashboardConfig::from_json_file("definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
