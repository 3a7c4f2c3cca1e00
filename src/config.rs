use std::env;

pub const DEFAULT_API_URL: &str = "https://api.etherscan.io/api";

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub api_url: String,
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("missing ETHERSCAN_API_KEY env var")]
    MissingApiKey,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = env::var("ETHERSCAN_API_KEY").map_err(|_| ConfigError::MissingApiKey)?;
        let api_url =
            env::var("ETHERSCAN_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        Ok(Self { api_key, api_url })
    }
}
