use std::{env, fmt::Display, net::SocketAddr, str::FromStr};

use tracing::{info, warn};

/// Runtime settings, read from the process environment. The binary loads
/// `.env` before calling [`Config::from_env`].
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub db_max_connections: u32,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            host: try_load("HOST", "127.0.0.1"),
            port: try_load("PORT", "5000"),
            database_url: try_load("DATABASE_URL", "sqlite://course_portal.db?mode=rwc"),
            db_max_connections: try_load("DB_MAX_CONNECTIONS", "5"),
        }
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }
}

fn try_load<T: FromStr>(key: &str, default: &str) -> T
where
    T::Err: Display,
{
    parse_or_default(key, env::var(key).ok(), default)
}

fn parse_or_default<T: FromStr>(key: &str, raw: Option<String>, default: &str) -> T
where
    T::Err: Display,
{
    let parse_default = || {
        default
            .parse()
            .unwrap_or_else(|e| panic!("default for {key} must parse: {e}"))
    };

    match raw {
        Some(raw) => raw.parse().unwrap_or_else(|e| {
            warn!("Invalid {key} value {raw:?}: {e}, using default: {default}");
            parse_default()
        }),
        None => {
            info!("{key} not set, using default: {default}");
            parse_default()
        }
    }
}
