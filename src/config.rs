use anyhow::Result;
use figment::{providers::{Env, Format, Serialized, Toml}, Figment};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

use crate::domain::{GeneratorOptions, DEFAULT_APPLIANCE_FRACTION};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub model: ModelConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub enable_cors: bool,
    pub cors_origin: String,
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            enable_cors: false,
            cors_origin: "http://localhost:5173".to_string(),
            request_timeout_secs: 10,
        }
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Initial yearly total in kWh
    pub yearly_consumption_kwh: f64,
    pub appliance_fraction: f64,
    pub random_seed: Option<u64>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            yearly_consumption_kwh: 3500.0,
            appliance_fraction: DEFAULT_APPLIANCE_FRACTION,
            random_seed: None,
        }
    }
}

impl ModelConfig {
    pub fn generator_options(&self) -> GeneratorOptions {
        GeneratorOptions {
            appliance_fraction: self.appliance_fraction,
            random_seed: self.random_seed,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::from_figment(
            Figment::from(Serialized::defaults(Config::default()))
                .merge(Toml::file("config/default.toml"))
                .merge(Env::prefixed("DASHBOARD__").split("__")),
        )
    }

    fn from_figment(figment: Figment) -> Result<Self> {
        Ok(figment.extract()?)
    }
}
