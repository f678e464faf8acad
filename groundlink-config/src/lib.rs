//! # Groundlink Configuration System
//!
//! Layered configuration for the gateway and the packet generator.
//!
//! ## Features
//! - **Layering**: defaults, YAML files and `GROUNDLINK_*` environment variables
//! - **Validation**: every section is checked with `validator` after merging

#![warn(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

mod error;
mod gateway;
mod generator;
mod pipeline;
mod telemetry;
mod validation;

pub use error::ConfigError;
pub use gateway::GatewayConfig;
pub use generator::GeneratorConfig;
pub use pipeline::PipelineConfig;
pub use telemetry::TelemetryConfig;

const BASE_FILE: &str = "config/groundlink.yaml";
const ENV_PREFIX: &str = "GROUNDLINK_";

/// Top-level configuration container.
#[derive(Debug, Serialize, Deserialize, Validate, Default, Clone)]
#[serde(default)]
pub struct GroundlinkConfig {
    /// UDP listener and read buffer sizing.
    #[validate(nested)]
    pub gateway: GatewayConfig,

    /// Hand-off queues and failure policy shared by the three pipelines.
    #[validate(nested)]
    pub pipeline: PipelineConfig,

    #[validate(nested)]
    pub telemetry: TelemetryConfig,

    /// Synthetic packet generator.
    #[validate(nested)]
    pub generator: GeneratorConfig,
}

impl GroundlinkConfig {
    /// Load configuration from default files and environment.
    ///
    /// Hierarchy:
    /// 1. Default values
    /// 2. `config/groundlink.yaml`, if present
    /// 3. `config/<GROUNDLINK_ENV>.yaml`, if present (`GROUNDLINK_ENV` defaults to `production`)
    /// 4. `GROUNDLINK_*` environment variables, `__` separating nested keys
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(GroundlinkConfig::default()));

        if Path::new(BASE_FILE).exists() {
            figment = figment.merge(Yaml::file(BASE_FILE));
        }

        let env = std::env::var("GROUNDLINK_ENV").unwrap_or_else(|_| "production".into());
        let env_file = format!("config/{}.yaml", env);
        if Path::new(&env_file).exists() {
            figment = figment.merge(Yaml::file(env_file));
        }

        Self::finish(figment)
    }

    /// Load configuration from an explicit file on top of the defaults.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        Self::finish(
            Figment::from(Serialized::defaults(GroundlinkConfig::default()))
                .merge(Yaml::file(path)),
        )
    }

    fn finish(figment: Figment) -> Result<Self, ConfigError> {
        figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .map_err(ConfigError::from)
            .and_then(|config: Self| {
                config.validate()?;
                Ok(config)
            })
    }
}
