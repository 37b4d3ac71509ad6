use crate::error::{OrchestratorError, Result};
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_ACQUIRE_URL: &str = "http://localhost:3003";
pub const DEFAULT_PREDICT_URL: &str = "http://localhost:3002";

/// Per-probe timeout for the upstream `/ready` calls.
pub const DEFAULT_READY_TIMEOUT: Duration = Duration::from_secs(5);
/// Per-call timeout for each pipeline step (`/data`, `/predict`).
pub const DEFAULT_STEP_TIMEOUT: Duration = Duration::from_secs(20);

pub const ENV_PORT: &str = "PORT";
pub const ENV_ACQUIRE_URL: &str = "ACQUIRE_URL";
pub const ENV_PREDICT_URL: &str = "PREDICT_URL";
pub const ENV_READY_TIMEOUT_MS: &str = "ORCHESTRATOR_READY_TIMEOUT_MS";
pub const ENV_STEP_TIMEOUT_MS: &str = "ORCHESTRATOR_STEP_TIMEOUT_MS";

// ---------------------------------------------------------------------------
// OrchestratorConfig
// ---------------------------------------------------------------------------

/// Process-wide settings, built once at startup and shared read-only with
/// every route handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrchestratorConfig {
    pub port: u16,
    /// Base URL of the acquire service, without a trailing slash.
    pub acquire_url: String,
    /// Base URL of the predict service, without a trailing slash.
    pub predict_url: String,
    pub ready_timeout: Duration,
    pub step_timeout: Duration,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            acquire_url: DEFAULT_ACQUIRE_URL.to_string(),
            predict_url: DEFAULT_PREDICT_URL.to_string(),
            ready_timeout: DEFAULT_READY_TIMEOUT,
            step_timeout: DEFAULT_STEP_TIMEOUT,
        }
    }
}

impl OrchestratorConfig {
    /// Build a validated config from explicit values.
    pub fn new(
        port: u16,
        acquire_url: impl Into<String>,
        predict_url: impl Into<String>,
    ) -> Result<Self> {
        let config = Self {
            port,
            acquire_url: normalize_base_url(ENV_ACQUIRE_URL, acquire_url.into())?,
            predict_url: normalize_base_url(ENV_PREDICT_URL, predict_url.into())?,
            ..Self::default()
        };
        Ok(config)
    }

    /// Read `PORT`, `ACQUIRE_URL`, `PREDICT_URL` and the optional timeout
    /// overrides from the process environment, falling back to defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) but with an injectable lookup so
    /// callers (and tests) don't have to mutate the real environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match non_empty(lookup(ENV_PORT)) {
            Some(raw) => parse_port(&raw)?,
            None => DEFAULT_PORT,
        };
        let acquire_url =
            non_empty(lookup(ENV_ACQUIRE_URL)).unwrap_or_else(|| DEFAULT_ACQUIRE_URL.to_string());
        let predict_url =
            non_empty(lookup(ENV_PREDICT_URL)).unwrap_or_else(|| DEFAULT_PREDICT_URL.to_string());

        let mut config = Self::new(port, acquire_url, predict_url)?;
        if let Some(raw) = non_empty(lookup(ENV_READY_TIMEOUT_MS)) {
            config.ready_timeout = parse_timeout_ms(ENV_READY_TIMEOUT_MS, &raw)?;
        }
        if let Some(raw) = non_empty(lookup(ENV_STEP_TIMEOUT_MS)) {
            config.step_timeout = parse_timeout_ms(ENV_STEP_TIMEOUT_MS, &raw)?;
        }
        Ok(config)
    }

    pub fn with_ready_timeout(mut self, timeout: Duration) -> Self {
        self.ready_timeout = timeout;
        self
    }

    pub fn with_step_timeout(mut self, timeout: Duration) -> Self {
        self.step_timeout = timeout;
        self
    }

    pub fn acquire_ready_url(&self) -> String {
        format!("{}/ready", self.acquire_url)
    }

    pub fn acquire_data_url(&self) -> String {
        format!("{}/data", self.acquire_url)
    }

    pub fn predict_ready_url(&self) -> String {
        format!("{}/ready", self.predict_url)
    }

    pub fn predict_endpoint_url(&self) -> String {
        format!("{}/predict", self.predict_url)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub fn parse_port(raw: &str) -> Result<u16> {
    raw.trim()
        .parse::<u16>()
        .map_err(|_| OrchestratorError::InvalidPort(raw.to_string()))
}

fn parse_timeout_ms(name: &'static str, raw: &str) -> Result<Duration> {
    match raw.trim().parse::<u64>() {
        Ok(ms) if ms > 0 => Ok(Duration::from_millis(ms)),
        _ => Err(OrchestratorError::InvalidTimeout { name }),
    }
}

/// Validate the scheme and strip trailing slashes so `{base}/ready` never
/// produces a double slash.
fn normalize_base_url(name: &'static str, raw: String) -> Result<String> {
    let trimmed = raw.trim();
    let has_scheme = trimmed.starts_with("http://") || trimmed.starts_with("https://");
    let stripped = trimmed.trim_end_matches('/');
    let has_host = stripped
        .split_once("://")
        .is_some_and(|(_, rest)| !rest.is_empty());
    if !has_scheme || !has_host {
        return Err(OrchestratorError::InvalidUrl {
            name,
            value: raw.clone(),
        });
    }
    Ok(stripped.to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
