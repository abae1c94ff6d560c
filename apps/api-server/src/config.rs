//! Application configuration loaded from environment variables.

use std::env;
use std::str::FromStr;

/// Pool settings for the PostgreSQL database.
#[derive(Debug, Clone, PartialEq)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

/// Behaviour knobs shared by every handler.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiSettings {
    /// Rows per page on list endpoints.
    pub page_size: u64,
    /// Name of the group whose members are consumers.
    pub consumer_group: String,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            page_size: 10,
            consumer_group: "consumer".to_string(),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: Option<DatabaseSettings>,
    pub api: ApiSettings,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Load configuration from any key lookup.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let database = var("DATABASE_URL")
            .filter(|url| !url.is_empty())
            .map(|url| DatabaseSettings {
                url,
                max_connections: parsed(&var, "DB_MAX_CONNECTIONS").unwrap_or(100),
                min_connections: parsed(&var, "DB_MIN_CONNECTIONS").unwrap_or(10),
            });

        let defaults = ApiSettings::default();
        let api = ApiSettings {
            page_size: positive(parsed(&var, "PAGE_SIZE"), defaults.page_size),
            consumer_group: var("CONSUMER_GROUP")
                .filter(|name| !name.trim().is_empty())
                .unwrap_or(defaults.consumer_group),
        };

        Self {
            host: var("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: parsed(&var, "PORT").unwrap_or(8080),
            database,
            api,
        }
    }
}

fn parsed<T: FromStr>(var: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    var(key).and_then(|v| v.trim().parse().ok())
}

fn positive<T: PartialOrd + Default>(value: Option<T>, default: T) -> T {
    value.filter(|v| *v > T::default()).unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(pairs: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_vars(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert!(config.database.is_none());
        assert_eq!(config.api, ApiSettings::default());
    }

    #[test]
    fn test_database_settings() {
        let config = config(&[
            ("DATABASE_URL", "postgres://localhost/warikan"),
            ("DB_MAX_CONNECTIONS", "20"),
        ]);
        let database = config.database.unwrap();
        assert_eq!(database.url, "postgres://localhost/warikan");
        assert_eq!(database.max_connections, 20);
        assert_eq!(database.min_connections, 10);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = config(&[("PORT", "eighty"), ("PAGE_SIZE", "0"), ("CONSUMER_GROUP", " ")]);
        assert_eq!(config.port, 8080);
        assert_eq!(config.api.page_size, 10);
        assert_eq!(config.api.consumer_group, "consumer");
    }
}
