use std::io::{Read, Write};

use clustermap_core::clustering::Method;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
#[serde(from = "ConfigPrecursor")]
pub struct Config {
    pub figure_width_in: f64,
    pub figure_height_in: f64,
    pub dpi: u32,
    pub label_size_pt: f64,
    pub max_chars: usize,
    pub linkage_method: Method,
    pub multithreading_flag: bool,
    pub export_compression_level: u8,
}

impl Config {
    pub const FILENAME: &'static str = "config.json";

    pub fn load(filepath: &std::path::Path) -> Self {
        match Self::from_file(filepath) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!("failed to load configuration from file, '{err}'");
                let config = ConfigPrecursor::default();
                let Ok(downcast_error) = err.downcast::<std::io::Error>() else {
                    return config.into();
                };
                if downcast_error.kind() == std::io::ErrorKind::NotFound {
                    match config.to_file(filepath) {
                        Ok(()) => {
                            tracing::warn!("created default configuration file, at '{}'", filepath.display())
                        }
                        Err(error) => tracing::warn!(
                            "failed to create default configuration file, at '{}', caused by '{}'",
                            filepath.display(),
                            error
                        ),
                    }
                }
                config.into()
            }
        }
    }

    fn from_file(filepath: &std::path::Path) -> anyhow::Result<Self> {
        let mut buffer: Vec<u8> = Vec::new();
        std::fs::OpenOptions::new()
            .create(false)
            .read(true)
            .open(filepath)?
            .read_to_end(&mut buffer)?;
        Ok(ijson::from_value(&serde_json::from_slice(&buffer)?)?)
    }
}

impl Default for Config {
    fn default() -> Self {
        ConfigPrecursor::default().into()
    }
}

impl From<ConfigPrecursor> for Config {
    fn from(value: ConfigPrecursor) -> Self {
        let linkage_method = value.linkage_method.parse::<Method>().unwrap_or_else(|e| {
            tracing::warn!("{e}, falling back to '{}'", Method::default());
            Method::default()
        });
        let dpi = if value.dpi == 0 {
            tracing::warn!("a dpi of 0 is invalid, falling back to {}", ConfigPrecursor::DEFAULT_DPI);
            ConfigPrecursor::DEFAULT_DPI
        } else {
            value.dpi
        };
        let figure_width_in =
            positive_or_default("figure_width_in", value.figure_width_in, ConfigPrecursor::DEFAULT_FIGURE_SIZE_IN);
        let figure_height_in =
            positive_or_default("figure_height_in", value.figure_height_in, ConfigPrecursor::DEFAULT_FIGURE_SIZE_IN);
        let label_size_pt =
            positive_or_default("label_size_pt", value.label_size_pt, ConfigPrecursor::DEFAULT_LABEL_SIZE_PT);
        Self {
            figure_width_in,
            figure_height_in,
            dpi,
            label_size_pt,
            max_chars: value.max_chars,
            linkage_method,
            multithreading_flag: value.multithreading_flag,
            export_compression_level: value.export_compression_level,
        }
    }
}

fn positive_or_default(
    name: &str,
    value: f64,
    default: f64,
) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        tracing::warn!("`{name}` must be a positive number, got {value}, falling back to {default}");
        default
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename = "config")]
pub struct ConfigPrecursor {
    pub figure_width_in: f64,
    pub figure_height_in: f64,
    pub dpi: u32,
    pub label_size_pt: f64,
    pub max_chars: usize,
    pub linkage_method: String,
    pub multithreading_flag: bool,
    pub export_compression_level: u8,
}

impl ConfigPrecursor {
    const DEFAULT_DPI: u32 = 100;
    const DEFAULT_FIGURE_SIZE_IN: f64 = 12.0;
    const DEFAULT_LABEL_SIZE_PT: f64 = 10.0;
}

impl Default for ConfigPrecursor {
    fn default() -> Self {
        Self {
            figure_width_in: Self::DEFAULT_FIGURE_SIZE_IN,
            figure_height_in: Self::DEFAULT_FIGURE_SIZE_IN,
            dpi: Self::DEFAULT_DPI,
            label_size_pt: Self::DEFAULT_LABEL_SIZE_PT,
            max_chars: 60,
            linkage_method: Method::default().to_string(),
            multithreading_flag: true,
            export_compression_level: 5,
        }
    }
}

impl ConfigPrecursor {
    fn to_file(
        &self,
        filepath: &std::path::Path,
    ) -> anyhow::Result<()> {
        let mut file = std::fs::OpenOptions::new().write(true).create_new(true).open(filepath)?;

        file.write_all(&serde_json::to_vec_pretty(&ijson::to_value(self)?)?)?;
        file.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn partial_config_test() {
        let config: Config = serde_json::from_str(r#"{ "dpi": 300, "linkage_method": "average" }"#).unwrap();

        assert_eq!(config.dpi, 300);
        assert_eq!(config.linkage_method, Method::Average);
        assert_eq!(config.max_chars, 60);
        assert_eq!(config.figure_width_in, 12.0);
    }

    #[test]
    fn invalid_config_values_test() {
        let config: Config = serde_json::from_str(r#"{ "dpi": 0, "linkage_method": "centroid" }"#).unwrap();

        assert_eq!(config.dpi, 100);
        assert_eq!(config.linkage_method, Method::Ward);
    }

    #[test]
    fn invalid_figure_size_test() {
        let config: Config =
            serde_json::from_str(r#"{ "figure_width_in": -3.0, "figure_height_in": 0.0, "label_size_pt": 0.0 }"#)
                .unwrap();

        assert_eq!(config.figure_width_in, 12.0);
        assert_eq!(config.figure_height_in, 12.0);
        assert_eq!(config.label_size_pt, 10.0);

        let config = Config::from(ConfigPrecursor { figure_width_in: f64::NAN, ..Default::default() });
        assert_eq!(config.figure_width_in, 12.0);

        let config: Config = serde_json::from_str(r#"{ "figure_width_in": 6.4, "figure_height_in": 4.8 }"#).unwrap();
        assert_eq!((config.figure_width_in, config.figure_height_in), (6.4, 4.8));
    }

    #[test]
    fn missing_config_file_falls_back_to_defaults_test() {
        let dir = std::env::temp_dir().join(format!("clustermap-config-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let filepath = dir.join(Config::FILENAME);
        let _ = std::fs::remove_file(&filepath);

        let config = Config::load(&filepath);

        assert_eq!(config.dpi, 100);
        assert!(filepath.exists());
        assert_eq!(Config::load(&filepath).label_size_pt, 10.0);
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
