use anyhow::{Context, Result};

#[derive(Debug, Clone)]
pub struct Config {
    // Server
    pub port: u16,

    // Database (unset: in-memory store)
    pub database_url: Option<String>,
    pub database_max_connections: u32,

    // Write API authentication (unset: writes are forbidden)
    pub api_key: Option<String>,

    // Site
    pub site_base_url: String,
    pub asset_url: String,

    // Environment
    pub app_env: String,
    pub debug: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            // Server
            port: match std::env::var("PORT") {
                Ok(port) => port.trim().parse().context("PORT must be a valid port number")?,
                Err(_) => 8080,
            },

            // Database
            database_url: non_empty_var("DATABASE_URL"),
            database_max_connections: std::env::var("DATABASE_MAX_CONNECTIONS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5),

            // Write API
            api_key: non_empty_var("API_KEY"),

            // Site
            site_base_url: non_empty_var("SITE_BASE_URL")
                .unwrap_or_else(|| "http://localhost:8080".to_string())
                .trim_end_matches('/')
                .to_string(),
            asset_url: non_empty_var("ASSET_URL").unwrap_or_else(|| "/assets/app.js".to_string()),

            // Environment
            app_env: non_empty_var("APP_ENV").unwrap_or_else(|| "production".to_string()),
            debug: std::env::var("APP_DEBUG")
                .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true"))
                .unwrap_or(false),
        })
    }

    pub fn is_production(&self) -> bool {
        self.app_env == "production"
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const KEYS: &[&str] = &[
        "PORT",
        "DATABASE_URL",
        "DATABASE_MAX_CONNECTIONS",
        "API_KEY",
        "SITE_BASE_URL",
        "ASSET_URL",
        "APP_ENV",
        "APP_DEBUG",
    ];

    fn clear_env() {
        for key in KEYS {
            std::env::remove_var(key);
        }
    }

    #[test]
    #[serial]
    fn test_defaults() {
        clear_env();
        let config = Config::from_env().expect("defaults should load");

        assert_eq!(config.port, 8080);
        assert!(config.database_url.is_none());
        assert_eq!(config.database_max_connections, 5);
        assert!(config.api_key.is_none());
        assert_eq!(config.site_base_url, "http://localhost:8080");
        assert_eq!(config.asset_url, "/assets/app.js");
        assert!(config.is_production());
        assert!(!config.debug);
    }

    #[test]
    #[serial]
    fn test_overrides() {
        clear_env();
        std::env::set_var("PORT", "9000");
        std::env::set_var("DATABASE_URL", "postgres://summit@localhost/summit");
        std::env::set_var("API_KEY", "secret");
        std::env::set_var("SITE_BASE_URL", "https://summit.example/");
        std::env::set_var("APP_ENV", "local");
        std::env::set_var("APP_DEBUG", "true");

        let config = Config::from_env().expect("config should load");
        assert_eq!(config.port, 9000);
        assert_eq!(config.database_url.as_deref(), Some("postgres://summit@localhost/summit"));
        assert_eq!(config.api_key.as_deref(), Some("secret"));
        assert_eq!(config.site_base_url, "https://summit.example");
        assert!(!config.is_production());
        assert!(config.debug);

        clear_env();
    }

    #[test]
    #[serial]
    fn test_invalid_port_is_an_error() {
        clear_env();
        std::env::set_var("PORT", "eighty");
        let result = Config::from_env();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("PORT"));
        clear_env();
    }

    #[test]
    #[serial]
    fn test_blank_api_key_is_unset() {
        clear_env();
        std::env::set_var("API_KEY", "   ");
        assert!(Config::from_env().unwrap().api_key.is_none());
        clear_env();
    }
}
