//! CLI command implementations.

pub mod batch;
pub mod categories;
pub mod config;
pub mod list;
pub mod remove;
pub mod scan;

use std::future::Future;
use std::path::PathBuf;

use recit_core::error::ExtractionError;
use recit_core::models::RecitConfig;
use recit_core::ocr::TextExtractor;

/// Resolved configuration and paths shared by the commands.
pub struct Context {
    pub config: RecitConfig,
    pub data_file: PathBuf,
}

impl Context {
    /// Merge the config file (explicit path or the default location) with
    /// command-line overrides.
    pub fn resolve(
        config_path: Option<&str>,
        data_file: Option<PathBuf>,
    ) -> anyhow::Result<Self> {
        let config = match config_path {
            Some(path) => RecitConfig::from_file(std::path::Path::new(path))?,
            None => {
                let default = config::default_config_path();
                if default.exists() {
                    RecitConfig::from_file(&default)?
                } else {
                    RecitConfig::default()
                }
            }
        };

        let data_file = data_file.unwrap_or_else(|| {
            if config.store.data_file.is_absolute() {
                config.store.data_file.clone()
            } else {
                default_data_dir().join(&config.store.data_file)
            }
        });

        Ok(Self { config, data_file })
    }

    /// Model directory: explicit override, absolute config path, or the
    /// config path resolved under the default data directory.
    pub fn model_dir(&self, override_dir: Option<PathBuf>) -> PathBuf {
        if let Some(dir) = override_dir {
            return dir;
        }
        if self.config.ocr.model_dir.is_absolute() {
            self.config.ocr.model_dir.clone()
        } else {
            default_data_dir().join(&self.config.ocr.model_dir)
        }
    }
}

/// Default data directory for the store and models.
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("recit")
}

/// Extractor stand-in for commands that never reach the extraction stage
/// (removal, listing). Fails if somehow invoked.
pub struct NoExtractor;

impl TextExtractor for NoExtractor {
    fn extract(
        &self,
        _images: Vec<image::DynamicImage>,
    ) -> impl Future<Output = Result<String, ExtractionError>> + Send {
        async {
            Err(ExtractionError::Recognition(
                "no extractor configured".to_string(),
            ))
        }
    }
}
