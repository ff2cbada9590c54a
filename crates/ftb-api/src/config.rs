//! Server configuration.

use std::net::SocketAddr;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use ftb_catalog::UrlBuilder;
use ftb_core::{Error, Result};

/// Default HTTP listen address.
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:10400";

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// HTTP listen address.
    pub bind_addr: SocketAddr,
    /// Public base URL of this API, used for links in responses.
    pub dataset_api_url: String,
    /// Public base URL of the website, used for version pages.
    pub website_url: String,
    /// Seconds in-flight requests get to drain on shutdown.
    pub graceful_shutdown_timeout_secs: u64,
    /// Per-request timeout in seconds. Unbounded when absent.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
    /// Maximum number of in-flight requests. Unbounded when absent.
    #[serde(default)]
    pub concurrency_limit: Option<usize>,
    /// Exposes unpublished resources to callers.
    ///
    /// When false every request sees published resources only and any
    /// `state` query parameter is ignored.
    #[serde(default)]
    pub enable_private_endpoints: bool,
    /// JSON seed file loaded into the in-memory store at startup.
    #[serde(default)]
    pub seed_path: Option<PathBuf>,
    /// Enables pretty logs.
    #[serde(default)]
    pub debug: bool,
    /// CORS settings.
    #[serde(default)]
    pub cors: CorsConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 10400)),
            dataset_api_url: "http://localhost:10400".to_string(),
            website_url: "http://localhost:20000".to_string(),
            graceful_shutdown_timeout_secs: 5,
            request_timeout_secs: None,
            concurrency_limit: None,
            enable_private_endpoints: false,
            seed_path: None,
            debug: false,
            cors: CorsConfig::default(),
        }
    }
}

/// CORS configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Allowed origins. Empty disables CORS; `["*"]` allows any origin.
    #[serde(default)]
    pub allowed_origins: Vec<String>,
    /// Preflight cache lifetime in seconds.
    #[serde(default = "default_cors_max_age_seconds")]
    pub max_age_seconds: u64,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: Vec::new(),
            max_age_seconds: default_cors_max_age_seconds(),
        }
    }
}

fn default_cors_max_age_seconds() -> u64 {
    3600
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// Supported env vars:
    /// - `FTB_BIND_ADDR`
    /// - `FTB_DATASET_API_URL`
    /// - `FTB_WEBSITE_URL`
    /// - `FTB_GRACEFUL_SHUTDOWN_TIMEOUT_SECS`
    /// - `FTB_REQUEST_TIMEOUT_SECS`
    /// - `FTB_CONCURRENCY_LIMIT`
    /// - `FTB_ENABLE_PRIVATE_ENDPOINTS`
    /// - `FTB_SEED_PATH`
    /// - `FTB_DEBUG`
    /// - `FTB_CORS_ALLOWED_ORIGINS` (comma-separated, or `*`)
    /// - `FTB_CORS_MAX_AGE_SECONDS`
    ///
    /// # Errors
    ///
    /// Returns an error if any environment variable is present but cannot be parsed.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Loads configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` naming the first variable that is
    /// present but cannot be parsed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(lookup);
        let mut config = Self::default();

        if let Some(addr) = env.socket_addr("FTB_BIND_ADDR")? {
            config.bind_addr = addr;
        }
        if let Some(url) = env.string("FTB_DATASET_API_URL") {
            config.dataset_api_url = url;
        }
        if let Some(url) = env.string("FTB_WEBSITE_URL") {
            config.website_url = url;
        }
        if let Some(secs) = env.u64("FTB_GRACEFUL_SHUTDOWN_TIMEOUT_SECS")? {
            config.graceful_shutdown_timeout_secs = secs;
        }
        config.request_timeout_secs = env.u64("FTB_REQUEST_TIMEOUT_SECS")?;
        if config.request_timeout_secs == Some(0) {
            return Err(Error::InvalidInput(
                "FTB_REQUEST_TIMEOUT_SECS must be greater than zero".to_string(),
            ));
        }
        config.concurrency_limit = env.usize("FTB_CONCURRENCY_LIMIT")?;
        if config.concurrency_limit == Some(0) {
            return Err(Error::InvalidInput(
                "FTB_CONCURRENCY_LIMIT must be greater than zero".to_string(),
            ));
        }
        if let Some(enabled) = env.bool("FTB_ENABLE_PRIVATE_ENDPOINTS")? {
            config.enable_private_endpoints = enabled;
        }
        config.seed_path = env.string("FTB_SEED_PATH").map(PathBuf::from);
        if let Some(debug) = env.bool("FTB_DEBUG")? {
            config.debug = debug;
        }
        if let Some(origins) = env.string("FTB_CORS_ALLOWED_ORIGINS") {
            config.cors.allowed_origins = parse_cors_allowed_origins(&origins);
            if config.cors.allowed_origins.len() > 1
                && config.cors.allowed_origins.iter().any(|origin| origin == "*")
            {
                return Err(Error::InvalidInput(
                    "FTB_CORS_ALLOWED_ORIGINS: '*' must be the only allowed origin".to_string(),
                ));
            }
        }
        if let Some(max_age) = env.u64("FTB_CORS_MAX_AGE_SECONDS")? {
            config.cors.max_age_seconds = max_age;
        }

        Ok(config)
    }

    /// Builds the URL builder for links exposed in responses.
    #[must_use]
    pub fn url_builder(&self) -> UrlBuilder {
        UrlBuilder::new(&self.dataset_api_url, &self.website_url)
    }
}

struct Env<F>(F);

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn string(&self, name: &str) -> Option<String> {
        (self.0)(name).and_then(|v| {
            let trimmed = v.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        })
    }

    fn u64(&self, name: &str) -> Result<Option<u64>> {
        let Some(v) = self.string(name) else {
            return Ok(None);
        };
        v.parse::<u64>()
            .map(Some)
            .map_err(|e| Error::InvalidInput(format!("{name} must be a u64: {e}")))
    }

    fn usize(&self, name: &str) -> Result<Option<usize>> {
        let Some(v) = self.string(name) else {
            return Ok(None);
        };
        v.parse::<usize>()
            .map(Some)
            .map_err(|e| Error::InvalidInput(format!("{name} must be a usize: {e}")))
    }

    fn bool(&self, name: &str) -> Result<Option<bool>> {
        let Some(v) = self.string(name) else {
            return Ok(None);
        };
        parse_bool(name, &v).map(Some)
    }

    fn socket_addr(&self, name: &str) -> Result<Option<SocketAddr>> {
        let Some(v) = self.string(name) else {
            return Ok(None);
        };
        v.parse::<SocketAddr>()
            .map(Some)
            .map_err(|e| Error::InvalidInput(format!("{name} must be a socket address: {e}")))
    }
}

fn parse_bool(name: &str, value: &str) -> Result<bool> {
    let value = value.trim().to_ascii_lowercase();
    match value.as_str() {
        "true" | "1" | "yes" | "y" => Ok(true),
        "false" | "0" | "no" | "n" => Ok(false),
        _ => Err(Error::InvalidInput(format!(
            "{name} must be a boolean (true/false/1/0)"
        ))),
    }
}

fn parse_cors_allowed_origins(value: &str) -> Vec<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }
    if trimmed == "*" {
        return vec!["*".to_string()];
    }

    trimmed
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() -> Result<()> {
        let config = Config::from_lookup(lookup(&[]))?;
        assert_eq!(config.bind_addr.to_string(), DEFAULT_BIND_ADDR);
        assert_eq!(config.dataset_api_url, "http://localhost:10400");
        assert_eq!(config.website_url, "http://localhost:20000");
        assert_eq!(config.graceful_shutdown_timeout_secs, 5);
        assert!(!config.enable_private_endpoints);
        assert!(config.request_timeout_secs.is_none());
        assert!(config.seed_path.is_none());
        Ok(())
    }

    #[test]
    fn overrides_are_read() -> Result<()> {
        let config = Config::from_lookup(lookup(&[
            ("FTB_BIND_ADDR", "127.0.0.1:8080"),
            ("FTB_DATASET_API_URL", "https://api.example.com/v1"),
            ("FTB_ENABLE_PRIVATE_ENDPOINTS", "yes"),
            ("FTB_REQUEST_TIMEOUT_SECS", "30"),
            ("FTB_CONCURRENCY_LIMIT", "64"),
            ("FTB_SEED_PATH", " /tmp/seed.json "),
            ("FTB_CORS_ALLOWED_ORIGINS", "https://a.example, https://b.example"),
        ]))?;
        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.dataset_api_url, "https://api.example.com/v1");
        assert!(config.enable_private_endpoints);
        assert_eq!(config.request_timeout_secs, Some(30));
        assert_eq!(config.concurrency_limit, Some(64));
        assert_eq!(config.seed_path, Some(PathBuf::from("/tmp/seed.json")));
        assert_eq!(
            config.cors.allowed_origins,
            vec!["https://a.example", "https://b.example"]
        );
        Ok(())
    }

    #[test]
    fn unparseable_values_name_the_variable() {
        let err = Config::from_lookup(lookup(&[("FTB_GRACEFUL_SHUTDOWN_TIMEOUT_SECS", "soon")]))
            .unwrap_err();
        assert!(err.to_string().contains("FTB_GRACEFUL_SHUTDOWN_TIMEOUT_SECS"));

        let err = Config::from_lookup(lookup(&[("FTB_BIND_ADDR", "localhost")])).unwrap_err();
        assert!(err.to_string().contains("FTB_BIND_ADDR"));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let err = Config::from_lookup(lookup(&[("FTB_REQUEST_TIMEOUT_SECS", "0")])).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn blank_values_are_ignored() -> Result<()> {
        let config = Config::from_lookup(lookup(&[("FTB_WEBSITE_URL", "   ")]))?;
        assert_eq!(config.website_url, "http://localhost:20000");
        Ok(())
    }

    #[test]
    fn parse_bool_rejects_invalid_values() {
        assert!(parse_bool("FTB_DEBUG", "maybe").is_err());
        assert!(parse_bool("FTB_DEBUG", "TRUE").is_ok_and(|v| v));
        assert!(parse_bool("FTB_DEBUG", "0").is_ok_and(|v| !v));
    }

    #[test]
    fn cors_wildcard_mixed_with_origins_is_rejected() {
        for debug in ["false", "true"] {
            let err = Config::from_lookup(lookup(&[
                ("FTB_DEBUG", debug),
                ("FTB_CORS_ALLOWED_ORIGINS", "*,http://a.example"),
            ]))
            .unwrap_err();
            assert!(matches!(err, Error::InvalidInput(_)));
            assert!(err.to_string().contains("FTB_CORS_ALLOWED_ORIGINS"));
        }
    }

    #[test]
    fn cors_wildcard_is_kept_alone() {
        assert_eq!(parse_cors_allowed_origins(" * "), vec!["*"]);
        assert!(parse_cors_allowed_origins("").is_empty());
    }
}
