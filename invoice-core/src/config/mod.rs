use crate::error::AppError;
use config::{Config as Cfg, Environment, File};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::path::Path;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub log_format: LogFormat,
}

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: LogFormat::default(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, AppError> {
        load_layered(None)
    }
}

/// Builds any configuration type from the standard source stack: an optional
/// `configuration` file in the working directory, an optional explicit file,
/// then `APP__`-prefixed environment variables.
pub fn load_layered<T: DeserializeOwned>(explicit: Option<&Path>) -> Result<T, AppError> {
    dotenvy::dotenv().ok();

    let mut builder = Cfg::builder().add_source(File::with_name("configuration").required(false));

    if let Some(path) = explicit {
        if !path.exists() {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "configuration file {} does not exist",
                path.display()
            )));
        }
        builder = builder.add_source(File::from(path).required(true));
    }

    let config = builder
        .add_source(Environment::with_prefix("APP").separator("__"))
        .build()?;

    Ok(config.try_deserialize()?)
}
