//! Admin configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `PRIFAM_BASE_URL` - Public URL for the dashboard (https enables secure cookies)
//!
//! ## Optional
//! - `PRIFAM_HOST` - Bind address (default: 127.0.0.1)
//! - `PRIFAM_PORT` - Listen port (default: 3001)
//! - `PRIFAM_LOG_JSON` - Emit JSON logs when set
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` / `SENTRY_TRACES_SAMPLE_RATE` - Sample rates (default: 1.0)
//!
//! ## Optional (simulated latency, milliseconds)
//! - `PRIFAM_LOGIN_DELAY_MS` - Login (default: 1000)
//! - `PRIFAM_SAVE_DELAY_MS` - Save configuration (default: 1000)
//! - `PRIFAM_CREATE_USER_DELAY_MS` - Create user (default: 1500)
//! - `PRIFAM_ANALYZE_DELAY_MS` - Sentiment analysis (default: 2000)
//! - `PRIFAM_UPLOAD_DELAY_MS` - Process upload (default: 1000)
//!
//! ## Optional (remote sentiment classifier)
//! - `CLASSIFIER_URL` - Endpoint of an external classification service
//! - `CLASSIFIER_API_KEY` - Bearer token for that service
//!
//! Without the classifier variables the built-in keyword placeholder is used.

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Admin application configuration.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the dashboard
    pub base_url: String,
    /// Emit JSON-formatted logs
    pub log_json: bool,
    /// Simulated latency applied to each mutating action
    pub latency: SimulatedLatency,
    /// External sentiment classifier (optional)
    pub classifier: Option<ClassifierConfig>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
}

/// Fixed delays used by the simulated asynchronous actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulatedLatency {
    pub login: Duration,
    pub save_configuration: Duration,
    pub create_user: Duration,
    pub analyze: Duration,
    pub process_upload: Duration,
}

impl Default for SimulatedLatency {
    fn default() -> Self {
        Self {
            login: Duration::from_millis(1000),
            save_configuration: Duration::from_millis(1000),
            create_user: Duration::from_millis(1500),
            analyze: Duration::from_millis(2000),
            process_upload: Duration::from_millis(1000),
        }
    }
}

impl SimulatedLatency {
    /// No delay at all. Used by tests and local scripting.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            login: Duration::ZERO,
            save_configuration: Duration::ZERO,
            create_user: Duration::ZERO,
            analyze: Duration::ZERO,
            process_upload: Duration::ZERO,
        }
    }

    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            login: get_duration_ms("PRIFAM_LOGIN_DELAY_MS", defaults.login)?,
            save_configuration: get_duration_ms("PRIFAM_SAVE_DELAY_MS", defaults.save_configuration)?,
            create_user: get_duration_ms("PRIFAM_CREATE_USER_DELAY_MS", defaults.create_user)?,
            analyze: get_duration_ms("PRIFAM_ANALYZE_DELAY_MS", defaults.analyze)?,
            process_upload: get_duration_ms("PRIFAM_UPLOAD_DELAY_MS", defaults.process_upload)?,
        })
    }
}

/// External sentiment classifier configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct ClassifierConfig {
    /// Classification endpoint (POST, JSON)
    pub url: url::Url,
    /// Bearer token
    pub api_key: SecretString,
}

impl std::fmt::Debug for ClassifierConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassifierConfig")
            .field("url", &self.url.as_str())
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl ClassifierConfig {
    fn from_env() -> Result<Option<Self>, ConfigError> {
        let url = get_optional_env("CLASSIFIER_URL");
        let api_key = get_optional_env("CLASSIFIER_API_KEY");

        match (url, api_key) {
            (Some(url), Some(key)) => {
                let url = url::Url::parse(&url).map_err(|e| {
                    ConfigError::InvalidEnvVar("CLASSIFIER_URL".to_string(), e.to_string())
                })?;
                validate_secret_strength(&key, "CLASSIFIER_API_KEY")?;
                Ok(Some(Self {
                    url,
                    api_key: SecretString::from(key),
                }))
            }
            (None, None) => Ok(None),
            _ => Err(ConfigError::InvalidEnvVar(
                "CLASSIFIER_*".to_string(),
                "Both CLASSIFIER_URL and CLASSIFIER_API_KEY must be set together".to_string(),
            )),
        }
    }
}

impl AdminConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid, or
    /// if the classifier key fails validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("PRIFAM_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("PRIFAM_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("PRIFAM_PORT", "3001")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("PRIFAM_PORT".to_string(), e.to_string()))?;
        let base_url = get_required_env("PRIFAM_BASE_URL")?;

        Ok(Self {
            host,
            port,
            base_url,
            log_json: get_optional_env("PRIFAM_LOG_JSON").is_some(),
            latency: SimulatedLatency::from_env()?,
            classifier: ClassifierConfig::from_env()?,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: get_optional_env("SENTRY_SAMPLE_RATE")
                .and_then(|s| s.parse().ok())
                .unwrap_or(1.0),
            sentry_traces_sample_rate: get_optional_env("SENTRY_TRACES_SAMPLE_RATE")
                .and_then(|s| s.parse().ok())
                .unwrap_or(1.0),
        })
    }

    /// Configuration for in-process use (tests, demos): plain http on
    /// localhost, no latency, keyword classifier, no Sentry.
    #[must_use]
    pub fn local() -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 3001,
            base_url: "http://localhost:3001".to_string(),
            log_json: false,
            latency: SimulatedLatency::none(),
            classifier: None,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 1.0,
        }
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether cookies should carry the `Secure` attribute.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable. Empty values count as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse a millisecond duration, falling back to `default` when unset.
fn get_duration_ms(key: &str, default: Duration) -> Result<Duration, ConfigError> {
    get_optional_env(key).map_or(Ok(default), |raw| {
        raw.trim()
            .parse::<u64>()
            .map(Duration::from_millis)
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    })
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.chars().count() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)]
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    if let Some(pattern) = PLACEHOLDER_PATTERNS.iter().find(|p| lower.contains(*p)) {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!("appears to be a placeholder (contains '{pattern}')"),
        ));
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated key."
            ),
        ));
    }

    Ok(())
}
