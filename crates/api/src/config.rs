use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use axum::http::HeaderValue;
use promptbrary_completion::client::{OPENAI_BASE_URL, OPENROUTER_BASE_URL};

const OPENAI_DEFAULT_MODEL: &str = "gpt-3.5-turbo-1106";
const OPENROUTER_DEFAULT_MODEL: &str = "openai/gpt-3.5-turbo";

/// Startup configuration failures. The binary exits with status 1 on any.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("OPENAI_API_KEY or OPENROUTER_API_KEY must be set")]
    MissingApiKey,

    #[error("{name} must be {expected}, got '{value}'")]
    Invalid {
        name: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Read one variable through `lookup`, treating blank values as unset.
fn var(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<String> {
    lookup(name)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    expected: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match var(lookup, name) {
        None => Ok(default),
        Some(value) => value.parse().map_err(|_| ConfigError::Invalid {
            name,
            expected,
            value,
        }),
    }
}

// ---------------------------------------------------------------------------
// Server
// ---------------------------------------------------------------------------

/// HTTP server settings.
///
/// | Env Var                | Default    |
/// |------------------------|------------|
/// | `HOST`                 | `0.0.0.0`  |
/// | `PORT`                 | `3000`     |
/// | `CORS_ORIGINS`         | any origin |
/// | `REQUEST_TIMEOUT_SECS` | `30`       |
/// | `FRONTEND_DIR`         | `frontend` |
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    /// Allowed origins. Empty allows any origin.
    pub cors_origins: Vec<String>,
    pub request_timeout_secs: u64,
    /// Directory holding the single-page app; `index.html` is the fallback.
    pub frontend_dir: PathBuf,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = parse_var(&lookup, "HOST", "an IP address", IpAddr::from([0, 0, 0, 0]))?;
        let port = parse_var(&lookup, "PORT", "a valid port number", 3000u16)?;
        let request_timeout_secs =
            parse_var(&lookup, "REQUEST_TIMEOUT_SECS", "a number of seconds", 30u64)?;

        let cors_origins: Vec<String> = var(&lookup, "CORS_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        if let Some(bad) = cors_origins
            .iter()
            .find(|o| o.parse::<HeaderValue>().is_err())
        {
            return Err(ConfigError::Invalid {
                name: "CORS_ORIGINS",
                expected: "a comma-separated list of origins",
                value: bad.clone(),
            });
        }

        let frontend_dir = var(&lookup, "FRONTEND_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("frontend"));

        Ok(Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            frontend_dir,
        })
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// ---------------------------------------------------------------------------
// Provider
// ---------------------------------------------------------------------------

/// Which environment variable supplied the server-held key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySource {
    OpenAi,
    OpenRouter,
}

impl fmt::Display for KeySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            KeySource::OpenAi => "OPENAI_API_KEY",
            KeySource::OpenRouter => "OPENROUTER_API_KEY",
        })
    }
}

/// Completion provider used by the proxy endpoints.
#[derive(Clone)]
pub struct ProviderConfig {
    pub api_key: String,
    pub source: KeySource,
    pub base_url: String,
    pub model: String,
}

impl ProviderConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// `OPENAI_API_KEY` wins over `OPENROUTER_API_KEY`; the base URL and
    /// default model follow whichever key was picked.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let (api_key, source) = if let Some(key) = var(&lookup, "OPENAI_API_KEY") {
            (key, KeySource::OpenAi)
        } else if let Some(key) = var(&lookup, "OPENROUTER_API_KEY") {
            (key, KeySource::OpenRouter)
        } else {
            return Err(ConfigError::MissingApiKey);
        };

        let (base_url, default_model) = match source {
            KeySource::OpenAi => (
                var(&lookup, "OPENAI_BASE_URL").unwrap_or_else(|| OPENAI_BASE_URL.to_string()),
                OPENAI_DEFAULT_MODEL,
            ),
            KeySource::OpenRouter => (OPENROUTER_BASE_URL.to_string(), OPENROUTER_DEFAULT_MODEL),
        };
        let model = var(&lookup, "MODEL_NAME").unwrap_or_else(|| default_model.to_string());

        Ok(Self {
            api_key,
            source,
            base_url,
            model,
        })
    }
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &"***")
            .field("source", &self.source)
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish()
    }
}
