use crate::models::place::CatalogSchema;
use std::time::Duration;
use thiserror::Error;

const HOST: &str = "0.0.0.0";
const PORT: u16 = 8080;
const CATALOG_DATABASE: &str = "ProjectData";
const CATALOG_COLLECTION: &str = "place";
const PLAN_DATABASE: &str = "TripCanvas";
const GEMINI_MODEL: &str = "gemini-2.5-flash";
const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const GENERATION_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("invalid value for {name}: '{value}'")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub database: String,
    pub collection: String,
    pub schema: CatalogSchema,
}

#[derive(Debug, Clone)]
pub struct GenerationConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub mongo_uri: String,
    pub plan_database: String,
    pub catalog: CatalogConfig,
    pub generation: GenerationConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from any key lookup, so tests can feed a map
    /// instead of the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let or_default = |name: &str, default: &str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let port = match lookup("PORT").filter(|v| !v.trim().is_empty()) {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
                name: "PORT",
                value: raw,
            })?,
            None => PORT,
        };

        let mongo_uri = lookup("MONGODB_URI").ok_or(ConfigError::Missing("MONGODB_URI"))?;
        let api_key = lookup("GOOGLE_API").ok_or(ConfigError::Missing("GOOGLE_API"))?;

        let schema = match lookup("CATALOG_SCHEMA") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
                name: "CATALOG_SCHEMA",
                value: raw,
            })?,
            None => CatalogSchema::default(),
        };

        let timeout_secs = match lookup("GENERATION_TIMEOUT_SECS") {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    return Err(ConfigError::Invalid {
                        name: "GENERATION_TIMEOUT_SECS",
                        value: raw,
                    })
                }
            },
            None => GENERATION_TIMEOUT_SECS,
        };

        Ok(Self {
            host: or_default("HOST", HOST),
            port,
            mongo_uri,
            plan_database: or_default("PLAN_DATABASE", PLAN_DATABASE),
            catalog: CatalogConfig {
                database: or_default("CATALOG_DATABASE", CATALOG_DATABASE),
                collection: or_default("CATALOG_COLLECTION", CATALOG_COLLECTION),
                schema,
            },
            generation: GenerationConfig {
                api_key,
                model: or_default("GEMINI_MODEL", GEMINI_MODEL),
                base_url: or_default("GEMINI_BASE_URL", GEMINI_BASE_URL),
                timeout: Duration::from_secs(timeout_secs),
            },
        })
    }
}
