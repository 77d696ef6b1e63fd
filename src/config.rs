use crate::settings::FieldSettings;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Startup parameter file, passed with `--params`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldConfig {
    /// Version field for future compatibility
    #[serde(default = "default_version")]
    pub version: u32,
    /// Field parameters; missing keys keep their defaults
    #[serde(default)]
    pub settings: FieldSettings,
    /// Optional RNG seed for a reproducible layout
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_version() -> u32 {
    1
}

impl FieldConfig {
    /// Import config from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self, String> {
        let content =
            fs::read_to_string(path).map_err(|e| format!("Failed to read params file: {}", e))?;
        let config: FieldConfig = serde_json::from_str(&content)
            .map_err(|e| format!("Failed to parse params file: {}", e))?;
        Ok(FieldConfig {
            settings: config.settings.clamped(),
            ..config
        })
    }
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            settings: FieldSettings::default(),
            seed: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_full_file() {
        let temp_file = NamedTempFile::new().unwrap();
        std::fs::write(
            temp_file.path(),
            r##"{
                "version": 1,
                "settings": {
                    "background": "#001f3f",
                    "particle_radius": 4,
                    "emitter_radius": 12,
                    "density": 20,
                    "initial_emitters": 5
                },
                "seed": 99
            }"##,
        )
        .unwrap();

        let config = FieldConfig::load_from_file(temp_file.path()).unwrap();
        assert_eq!(config.settings.background, Rgb::new(0x00, 0x1f, 0x3f));
        assert_eq!(config.settings.particle_radius, 4);
        assert_eq!(config.settings.emitter_radius, 12);
        assert_eq!(config.settings.spacing(), 14.0);
        assert_eq!(config.settings.initial_emitters, 5);
        assert_eq!(config.seed, Some(99));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let temp_file = NamedTempFile::new().unwrap();
        std::fs::write(temp_file.path(), r#"{ "settings": { "density": 25 } }"#).unwrap();

        let config = FieldConfig::load_from_file(temp_file.path()).unwrap();
        let defaults = FieldSettings::default();
        assert_eq!(config.version, 1);
        assert_eq!(config.settings.density, 25);
        assert_eq!(config.settings.particle_radius, defaults.particle_radius);
        assert_eq!(config.settings.background, defaults.background);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn test_out_of_range_values_are_clamped() {
        let temp_file = NamedTempFile::new().unwrap();
        std::fs::write(
            temp_file.path(),
            r#"{ "settings": { "particle_radius": 99, "density": 0, "initial_emitters": 1000000 } }"#,
        )
        .unwrap();

        let config = FieldConfig::load_from_file(temp_file.path()).unwrap();
        assert_eq!(config.settings.particle_radius, 10);
        assert_eq!(config.settings.density, 5);
        assert_eq!(config.settings.initial_emitters, 64);
    }

    #[test]
    fn test_bad_color_is_rejected() {
        let temp_file = NamedTempFile::new().unwrap();
        std::fs::write(temp_file.path(), r#"{ "settings": { "background": "plaid" } }"#).unwrap();

        let result = FieldConfig::load_from_file(temp_file.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_config_file() {
        let temp_file = NamedTempFile::new().unwrap();
        std::fs::write(temp_file.path(), "not valid json").unwrap();

        let result = FieldConfig::load_from_file(temp_file.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_config_file() {
        let result = FieldConfig::load_from_file(Path::new("/nonexistent/path/params.json"));
        assert!(result.is_err());
    }
}
