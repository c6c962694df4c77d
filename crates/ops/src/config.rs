use std::time::Duration;

use catalog_remote::image_host::ImageHostConfig;

/// Configuration errors. Reported with exit status 2.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{var} has invalid value '{value}': {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Settings for the image host, all optional until `image-host` runs.
#[derive(Debug, Clone)]
pub struct ImageHostSettings {
    pub api_url: String,
    pub cloud_name: Option<String>,
    pub api_key: Option<String>,
    pub api_secret: Option<String>,
}

/// Operator configuration loaded from environment variables.
///
/// Values that only some subcommands need are kept optional here and
/// checked by the accessor the subcommand calls.
#[derive(Debug, Clone)]
pub struct OpsConfig {
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub storefront_api_url: String,
    pub image_host: ImageHostSettings,
    pub http_timeout: Duration,
}

impl OpsConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                           |
    /// |-------------------------|-----------------------------------|
    /// | `DATABASE_URL`          | required by database commands     |
    /// | `DB_MAX_CONNECTIONS`    | `1`                               |
    /// | `STOREFRONT_API_URL`    | `http://localhost:3000`           |
    /// | `IMAGE_HOST_API_URL`    | `https://api.cloudinary.com/v1_1` |
    /// | `IMAGE_HOST_CLOUD_NAME` | required by `image-host`          |
    /// | `IMAGE_HOST_API_KEY`    | required by `image-host`          |
    /// | `IMAGE_HOST_API_SECRET` | required by `image-host`          |
    /// | `HTTP_TIMEOUT_SECS`     | `30`                              |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup. Blank values
    /// count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let db_max_connections: u32 = parse_or("DB_MAX_CONNECTIONS", get("DB_MAX_CONNECTIONS"), 1)?;
        if db_max_connections == 0 {
            return Err(ConfigError::Invalid {
                var: "DB_MAX_CONNECTIONS",
                value: "0".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        let http_timeout_secs: u64 = parse_or("HTTP_TIMEOUT_SECS", get("HTTP_TIMEOUT_SECS"), 30)?;

        let storefront_api_url = get("STOREFRONT_API_URL")
            .unwrap_or_else(|| "http://localhost:3000".into());
        check_http_url("STOREFRONT_API_URL", &storefront_api_url)?;

        let image_host_api_url = get("IMAGE_HOST_API_URL")
            .unwrap_or_else(|| "https://api.cloudinary.com/v1_1".into());
        check_http_url("IMAGE_HOST_API_URL", &image_host_api_url)?;

        Ok(Self {
            database_url: get("DATABASE_URL"),
            db_max_connections,
            storefront_api_url,
            image_host: ImageHostSettings {
                api_url: image_host_api_url,
                cloud_name: get("IMAGE_HOST_CLOUD_NAME"),
                api_key: get("IMAGE_HOST_API_KEY"),
                api_secret: get("IMAGE_HOST_API_SECRET"),
            },
            http_timeout: Duration::from_secs(http_timeout_secs),
        })
    }

    /// The database URL, required by every database subcommand.
    pub fn database_url(&self) -> Result<&str, ConfigError> {
        self.database_url
            .as_deref()
            .ok_or(ConfigError::Missing("DATABASE_URL"))
    }

    /// Complete image host settings, required by `image-host`.
    pub fn image_host_config(&self) -> Result<ImageHostConfig, ConfigError> {
        let settings = &self.image_host;
        Ok(ImageHostConfig {
            api_url: settings.api_url.clone(),
            cloud_name: settings
                .cloud_name
                .clone()
                .ok_or(ConfigError::Missing("IMAGE_HOST_CLOUD_NAME"))?,
            api_key: settings
                .api_key
                .clone()
                .ok_or(ConfigError::Missing("IMAGE_HOST_API_KEY"))?,
            api_secret: settings
                .api_secret
                .clone()
                .ok_or(ConfigError::Missing("IMAGE_HOST_API_SECRET"))?,
        })
    }
}

fn parse_or<T>(var: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(value) => value.parse().map_err(|e: T::Err| ConfigError::Invalid {
            var,
            reason: e.to_string(),
            value,
        }),
    }
}

fn check_http_url(var: &'static str, value: &str) -> Result<(), ConfigError> {
    let invalid = |reason: String| ConfigError::Invalid {
        var,
        value: value.to_string(),
        reason,
    };
    let url = reqwest::Url::parse(value).map_err(|e| invalid(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(invalid(format!(
            "unsupported scheme '{other}', expected http or https"
        ))),
    }
}
