use serde::Deserialize;
use std::env;
use fleetline_catalog::PricingConfig;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub pricing: PricingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CatalogConfig {
    /// JSON file holding the vehicle records
    pub path: String,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            // Per-environment overrides, optional
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Local overrides, not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // Eg.. `FLEETLINE__SERVER__PORT=9000`
            .add_source(config::Environment::with_prefix("FLEETLINE").separator("__"))
            .build()?;

        Self::from_source(s)
    }

    /// Deserializes layered settings and checks the pricing tiers
    pub fn from_source(source: config::Config) -> Result<Self, config::ConfigError> {
        let cfg: Config = source.try_deserialize()?;
        cfg.pricing
            .validate()
            .map_err(|e| config::ConfigError::Message(e.to_string()))?;
        Ok(cfg)
    }
}
