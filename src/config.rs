use std::path::Path;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const ENV_PREFIX: &str = "FRAME_TRYON";
pub const DEFAULT_CONFIG_NAME: &str = "frame-tryon";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Frame width / height used when the asset does not provide one.
    pub aspect_ratio: f64,
    pub scale: f64,
    pub viewport_width: u32,
    pub viewport_height: u32,
    pub smoothing_window: usize,
    /// tracing filter directive, e.g. `info` or `frame_tryon=debug`
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            aspect_ratio: 2.0,
            scale: 1.0,
            viewport_width: 1280,
            viewport_height: 720,
            smoothing_window: 5,
            log_filter: "info".to_string(),
        }
    }
}

impl Settings {
    /// Defaults, then `path` (or `frame-tryon.{toml,json,yaml}` in the
    /// working directory if present), then `FRAME_TRYON_*` variables.
    pub fn load(path: Option<&Path>) -> Result<Settings> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_NAME).required(false),
        };

        Self::from_sources(file, Environment::with_prefix(ENV_PREFIX).try_parsing(true))
    }

    pub fn from_sources(
        file: File<config::FileSourceFile, config::FileFormat>,
        env: Environment,
    ) -> Result<Settings> {
        Self::build(Self::defaults()?.add_source(file).add_source(env))
    }

    pub(crate) fn defaults() -> Result<config::ConfigBuilder<config::builder::DefaultState>> {
        let d = Settings::default();
        Ok(Config::builder()
            .set_default("aspect_ratio", d.aspect_ratio)?
            .set_default("scale", d.scale)?
            .set_default("viewport_width", d.viewport_width as i64)?
            .set_default("viewport_height", d.viewport_height as i64)?
            .set_default("smoothing_window", d.smoothing_window as i64)?
            .set_default("log_filter", d.log_filter)?)
    }

    pub(crate) fn build(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Settings> {
        let settings = builder.build()?.try_deserialize::<Settings>()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        check_positive("aspect_ratio", self.aspect_ratio)?;
        check_positive("scale", self.scale)?;
        Ok(())
    }
}

// the positioning functions accept anything; user input is checked here
pub fn check_positive(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidSetting { name, value })
    }
}
