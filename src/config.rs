//! Runtime settings for the inference server

use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    pub model_path: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            model_path: PathBuf::from("model.pkl"),
        }
    }
}

impl Settings {
    /// Reads `LISTING_HOST`, `LISTING_PORT` and `LISTING_MODEL_PATH`, falling
    /// back to the defaults for anything unset or unparseable.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: env::var("LISTING_HOST").unwrap_or(defaults.host),
            port: env::var("LISTING_PORT")
                .ok()
                .and_then(|p| p.parse::<u16>().ok())
                .unwrap_or(defaults.port),
            model_path: env::var("LISTING_MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.model_path),
        }
    }
}
