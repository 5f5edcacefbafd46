use std::{env, fmt::Display, str::FromStr};

use dotenvy::dotenv;
use thiserror::Error;
use tracing::{info, warn};

use crate::shopping_list::renderer::FontSource;

// Installed by fonts-dejavu-core on Debian and Ubuntu
pub const DEFAULT_FONT: &str = "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("invalid {key} value {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

pub struct Config {
    pub database_url: String,
    pub pool_size: u32,
    pub port: u16,
    pub font: FontSource,
    pub shopping_list_filename: String,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        if let Err(e) = dotenv() {
            info!("No .env file loaded: {e}");
        }

        Ok(Self {
            database_url: env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?,
            pool_size: try_load("DATABASE_POOL_SIZE", "4")?,
            port: try_load("PORT", "8000")?,
            font: try_load("SHOPPING_LIST_FONT", DEFAULT_FONT)?,
            shopping_list_filename: try_load("SHOPPING_LIST_FILENAME", "shopping_list.pdf")?,
        })
    }
}

fn try_load<T: FromStr>(key: &'static str, default: &str) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    let value = env::var(key).unwrap_or_else(|_| {
        info!("{key} not set, using default: {default}");
        default.to_owned()
    });

    match value.parse() {
        Ok(parsed) => Ok(parsed),
        Err(e) => {
            warn!("Invalid {key} value: {e}");
            Err(ConfigError::Invalid {
                key,
                value,
                reason: e.to_string(),
            })
        }
    }
}
