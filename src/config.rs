use std::env;
use std::str::FromStr;
use std::time::Duration;

use actix_web::cookie::Key;

use crate::services::discounts::DEFAULT_PERCENT_MAX;
use crate::services::session::SessionSettings;

pub const DEFAULT_API_URL: &str = "http://localhost:8080/api/v1";

/// Runtime settings read from the environment (and `.env`).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub api_url: String,
    pub address: String,
    pub port: u16,
    /// Raw `SECRET_KEY`; a random key is generated when unset.
    pub secret: Option<String>,
    pub search_debounce: Duration,
    pub percent_max: f64,
    pub session_idle: Duration,
    pub api_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            address: "127.0.0.1".to_string(),
            port: 8080,
            secret: None,
            search_debounce: Duration::from_millis(500),
            percent_max: DEFAULT_PERCENT_MAX,
            session_idle: Duration::from_secs(30 * 60),
            api_timeout: Duration::from_secs(10),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from an arbitrary variable source. Unparsable values fall back
    /// to the defaults with a warning.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let lookup = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let percent_max = parse_or(&lookup, "PERCENT_DISCOUNT_MAX", defaults.percent_max);
        let percent_max = if (1.0..=100.0).contains(&percent_max) {
            percent_max
        } else {
            log::warn!("PERCENT_DISCOUNT_MAX must be within 1..=100, using {DEFAULT_PERCENT_MAX}");
            DEFAULT_PERCENT_MAX
        };

        Self {
            api_url: lookup("CATALOG_API_URL").unwrap_or(defaults.api_url),
            address: lookup("ADDRESS").unwrap_or(defaults.address),
            port: parse_or(&lookup, "PORT", defaults.port),
            secret: lookup("SECRET_KEY"),
            search_debounce: Duration::from_millis(parse_or(&lookup, "SEARCH_DEBOUNCE_MS", 500)),
            percent_max,
            session_idle: Duration::from_secs(60 * parse_or(&lookup, "SESSION_IDLE_MINUTES", 30)),
            api_timeout: Duration::from_secs(parse_or(&lookup, "API_TIMEOUT_SECS", 10)),
        }
    }

    /// Signing key for the session and flash cookies.
    pub fn secret_key(&self) -> Key {
        match self.secret.as_deref().map(|secret| Key::try_from(secret.as_bytes())) {
            Some(Ok(key)) => key,
            Some(Err(err)) => {
                log::warn!("SECRET_KEY is unusable ({err}), generating a random key");
                Key::generate()
            }
            None => Key::generate(),
        }
    }

    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            search_debounce: self.search_debounce,
            percent_max: self.percent_max,
            idle_ttl: self.session_idle,
        }
    }
}

fn parse_or<T, F>(lookup: &F, name: &str, default: T) -> T
where
    T: FromStr + Copy + std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            log::warn!("Invalid {name} value `{raw}`, using {default}");
            default
        }),
        None => default,
    }
}
