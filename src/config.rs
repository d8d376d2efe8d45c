use crate::error::AppError;
use std::env;

/// Runtime settings read from the environment (after `dotenv`).
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub database_url: String,
    pub max_connections: u32,
    pub server_port: u16,
    pub server_host: String,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// `DATABASE_URL` wins when present; otherwise the URL is assembled from
    /// `DB_HOST`, `DB_PORT`, `DB_USER`, `DB_PASSWORD` and `DB_NAME`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = match lookup("DATABASE_URL") {
            Some(url) => url,
            None => {
                let name = lookup("DB_NAME").ok_or_else(|| {
                    AppError::Configuration("DATABASE_URL or DB_NAME must be set".into())
                })?;
                let host = lookup("DB_HOST").unwrap_or_else(|| "localhost".to_string());
                let port: u16 = parse_or("DB_PORT", &lookup, 5432)?;
                let user = lookup("DB_USER").unwrap_or_else(|| "postgres".to_string());
                let password = lookup("DB_PASSWORD").unwrap_or_default();
                if password.is_empty() {
                    format!("postgres://{}@{}:{}/{}", user, host, port, name)
                } else {
                    format!("postgres://{}:{}@{}:{}/{}", user, password, host, port, name)
                }
            }
        };

        Ok(Self {
            database_url,
            max_connections: parse_or("DB_MAX_CONNECTIONS", &lookup, 5)?,
            server_port: parse_or("SERVER_PORT", &lookup, 3000)?,
            server_host: lookup("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
        })
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }
}

fn parse_or<T, F>(key: &str, lookup: &F, default: T) -> Result<T, AppError>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::Configuration(format!("{} must be a number", key))),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_config_defaults_with_database_url() {
        let config = Config::from_lookup(lookup_from(&[("DATABASE_URL", "postgres://test")])).unwrap();

        assert_eq!(config.database_url, "postgres://test");
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.server_host, "127.0.0.1");
        assert_eq!(config.max_connections, 5);
        assert_eq!(config.server_url(), "http://127.0.0.1:3000");
    }

    #[test]
    fn test_config_custom_values() {
        let config = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://test"),
            ("SERVER_PORT", "8080"),
            ("SERVER_HOST", "0.0.0.0"),
            ("DB_MAX_CONNECTIONS", "20"),
        ]))
        .unwrap();

        assert_eq!(config.server_port, 8080);
        assert_eq!(config.server_host, "0.0.0.0");
        assert_eq!(config.max_connections, 20);
    }

    #[test]
    fn test_config_assembles_url_from_parts() {
        let config = Config::from_lookup(lookup_from(&[
            ("DB_HOST", "db"),
            ("DB_PORT", "6543"),
            ("DB_USER", "app"),
            ("DB_PASSWORD", "secret"),
            ("DB_NAME", "tasks"),
        ]))
        .unwrap();
        assert_eq!(config.database_url, "postgres://app:secret@db:6543/tasks");

        let config = Config::from_lookup(lookup_from(&[("DB_NAME", "tasks")])).unwrap();
        assert_eq!(config.database_url, "postgres://postgres@localhost:5432/tasks");
    }

    #[test]
    fn test_config_errors() {
        assert!(matches!(
            Config::from_lookup(lookup_from(&[])),
            Err(AppError::Configuration(_))
        ));
        assert!(matches!(
            Config::from_lookup(lookup_from(&[
                ("DATABASE_URL", "postgres://test"),
                ("SERVER_PORT", "eighty"),
            ])),
            Err(AppError::Configuration(_))
        ));
    }
}
