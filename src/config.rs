use std::{env, fmt::Display, str::FromStr};

use log::{info, warn};

pub struct Config {
    pub host: String,
    pub port: u16,
    pub cors_max_age_secs: u64,
    pub recommendation_limit: usize,
}

impl Config {
    pub fn load() -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        Ok(Self {
            host: try_load("HOST", "0.0.0.0")?,
            port: try_load("PORT", "8000")?,
            cors_max_age_secs: try_load("CORS_MAX_AGE_SECS", "3600")?,
            recommendation_limit: try_load("RECOMMENDATION_LIMIT", "6")?,
        })
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            cors_max_age_secs: 3600,
            recommendation_limit: 6,
        }
    }
}

fn try_load<T: FromStr>(key: &str, default: &str) -> Result<T, Box<dyn std::error::Error + Send + Sync>>
where
    T::Err: Display,
{
    let raw = env::var(key).unwrap_or_else(|_| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    parse_value(key, &raw)
}

fn parse_value<T: FromStr>(key: &str, raw: &str) -> Result<T, Box<dyn std::error::Error + Send + Sync>>
where
    T::Err: Display,
{
    raw.trim().parse::<T>().map_err(|e| {
        warn!("Invalid {key} value: {e}");
        Box::<dyn std::error::Error + Send + Sync>::from(format!("Invalid {key} value {raw:?}: {e}"))
    })
}
