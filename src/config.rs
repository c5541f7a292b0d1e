// Configuration chargée depuis l'environnement (.env via dotenv)

use std::env;
use thiserror::Error;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 4000;
const DEFAULT_JWT_TTL_HOURS: i64 = 24;
const DEFAULT_RESET_TOKEN_TTL_MINUTES: i64 = 60;
const DEFAULT_JWT_SECRET: &str = "default-insecure-key-change-this";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set in .env file")]
    Missing(&'static str),

    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub jwt_ttl_hours: i64,
    pub reset_token_ttl_minutes: i64,
}

impl AppConfig {
    /// Lit la configuration depuis les variables d'environnement
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Même chose que from_env mais avec une source de variables injectable (tests)
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let host = lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = parse_or("PORT", lookup("PORT"), DEFAULT_PORT)?;
        let jwt_secret = lookup("JWT_SECRET")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| {
                tracing::warn!("JWT_SECRET not found in .env, using default (INSECURE)");
                DEFAULT_JWT_SECRET.to_string()
            });
        let jwt_ttl_hours = parse_or("JWT_TTL_HOURS", lookup("JWT_TTL_HOURS"), DEFAULT_JWT_TTL_HOURS)?;
        let reset_token_ttl_minutes = parse_or(
            "RESET_TOKEN_TTL_MINUTES",
            lookup("RESET_TOKEN_TTL_MINUTES"),
            DEFAULT_RESET_TOKEN_TTL_MINUTES,
        )?;

        if jwt_ttl_hours <= 0 {
            return Err(ConfigError::Invalid {
                name: "JWT_TTL_HOURS",
                value: jwt_ttl_hours.to_string(),
            });
        }
        if reset_token_ttl_minutes <= 0 {
            return Err(ConfigError::Invalid {
                name: "RESET_TOKEN_TTL_MINUTES",
                value: reset_token_ttl_minutes.to_string(),
            });
        }

        Ok(Self {
            database_url,
            host,
            port,
            jwt_secret,
            jwt_ttl_hours,
            reset_token_ttl_minutes,
        })
    }
}

fn parse_or<T: std::str::FromStr>(
    name: &'static str,
    raw: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::Invalid { name, value }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(lookup_from(&[("DATABASE_URL", "postgres://localhost/inv")])).unwrap();

        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 4000);
        assert_eq!(config.jwt_ttl_hours, 24);
        assert_eq!(config.reset_token_ttl_minutes, 60);
        assert_eq!(config.jwt_secret, DEFAULT_JWT_SECRET);
    }

    #[test]
    fn test_jwt_secret_is_read_once_into_config() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/inv"),
            ("JWT_SECRET", "s3cr3t-from-env"),
        ]))
        .unwrap();
        assert_eq!(config.jwt_secret, "s3cr3t-from-env");

        // une valeur vide retombe sur le défaut
        let config = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/inv"),
            ("JWT_SECRET", "  "),
        ]))
        .unwrap();
        assert_eq!(config.jwt_secret, DEFAULT_JWT_SECRET);
    }

    #[test]
    fn test_missing_database_url() {
        let result = AppConfig::from_lookup(lookup_from(&[("PORT", "8080")]));
        assert_eq!(result.unwrap_err(), ConfigError::Missing("DATABASE_URL"));
    }

    #[test]
    fn test_invalid_port() {
        let result = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/inv"),
            ("PORT", "not-a-port"),
        ]));
        assert!(matches!(result, Err(ConfigError::Invalid { name: "PORT", .. })));
    }

    #[test]
    fn test_non_positive_ttl_is_rejected() {
        let result = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/inv"),
            ("RESET_TOKEN_TTL_MINUTES", "0"),
        ]));
        assert!(matches!(result, Err(ConfigError::Invalid { name: "RESET_TOKEN_TTL_MINUTES", .. })));
    }
}
