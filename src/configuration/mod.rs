use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

mod error;
mod parameters;

pub use error::Error;
pub use parameters::{
    FilterConfig, InitParameters, AUTH_TYPE_INIT_PARAM, FORCE_REAUTHENTICATION_INIT_PARAM,
    UNPROTECTED_METHODS_INIT_PARAM,
};

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Configuration {
    #[serde(default)]
    pub gate: FilterConfig,
    #[serde(default)]
    pub identity: HashMap<String, IdentityConfig>, // hashmap of identity_id <-> identity_config (username, password)
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct IdentityConfig {
    pub username: String,
    pub password: String,
}

impl Configuration {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let config_str = fs::read_to_string(path)?;
        Self::load_from_str(&config_str)
    }

    pub fn load_from_str(slice: &str) -> Result<Self, Error> {
        let config: Configuration = toml::from_str(slice)?;
        Ok(config)
    }
}
