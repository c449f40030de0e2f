pub mod constants;

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::provider::retry::RetryPolicy;
use crate::rate_limit::RateLimitConfig;

/// Which upstream TTS backend the proxy talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Deapi,
    Gemini,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Deapi => "deapi",
            ProviderKind::Gemini => "gemini",
        }
    }

    fn default_base_url(&self) -> &'static str {
        match self {
            ProviderKind::Deapi => "https://api.deapi.ai",
            ProviderKind::Gemini => "https://generativelanguage.googleapis.com",
        }
    }

    fn default_model(&self) -> &'static str {
        match self {
            ProviderKind::Deapi => "Kokoro",
            ProviderKind::Gemini => "gemini-2.5-flash-preview-tts",
        }
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "deapi" => Ok(ProviderKind::Deapi),
            "gemini" | "google" => Ok(ProviderKind::Gemini),
            other => Err(format!("unknown TTS provider '{}'", other)),
        }
    }
}

/// Upstream provider settings
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub kind: ProviderKind,
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    /// Voice name sent to providers whose voices are not mapped per persona
    pub upstream_voice: String,
    pub retry: RetryPolicy,
    pub poll_attempts: u32,
    pub poll_interval: Duration,
    pub request_timeout: Duration,
}

impl ProviderConfig {
    /// Configuration with defaults for the given provider and key
    pub fn new(kind: ProviderKind, api_key: Option<String>) -> Self {
        Self {
            kind,
            api_key,
            base_url: kind.default_base_url().to_string(),
            model: kind.default_model().to_string(),
            upstream_voice: "af_alloy".to_string(),
            retry: RetryPolicy::default(),
            poll_attempts: 30,
            poll_interval: Duration::from_millis(2000),
            request_timeout: Duration::from_secs(60),
        }
    }

    /// Load provider configuration from environment variables
    pub fn from_env() -> Self {
        let kind = match env::var("TTS_PROVIDER") {
            Ok(value) => value.parse().unwrap_or_else(|e: String| {
                tracing::warn!("{}, falling back to deapi", e);
                ProviderKind::Deapi
            }),
            Err(_) => ProviderKind::Deapi,
        };

        // VITE_GEMINI_API_KEY is the name existing deployments already set
        let api_key = env::var("TTS_API_KEY")
            .or_else(|_| env::var("VITE_GEMINI_API_KEY"))
            .ok()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());

        let mut config = Self::new(kind, api_key);

        if let Ok(url) = env::var("TTS_API_BASE_URL") {
            config.base_url = url.trim_end_matches('/').to_string();
        }
        if let Ok(model) = env::var("TTS_MODEL") {
            config.model = model;
        }
        if let Ok(voice) = env::var("TTS_UPSTREAM_VOICE") {
            config.upstream_voice = voice;
        }

        config.retry = RetryPolicy {
            max_retries: parse_env("TTS_MAX_RETRIES", config.retry.max_retries),
            base_delay: Duration::from_millis(parse_env(
                "TTS_RETRY_BASE_DELAY_MS",
                config.retry.base_delay.as_millis() as u64,
            )),
        };
        config.poll_attempts = parse_env("TTS_POLL_ATTEMPTS", config.poll_attempts);
        config.poll_interval = Duration::from_millis(parse_env(
            "TTS_POLL_INTERVAL_MS",
            config.poll_interval.as_millis() as u64,
        ));
        config.request_timeout = Duration::from_secs(parse_env(
            "TTS_UPSTREAM_TIMEOUT_SECONDS",
            config.request_timeout.as_secs(),
        ));

        config
    }
}

/// HTTP server settings
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub request_timeout: Duration,
    pub rate_limit: Option<RateLimitConfig>,
    pub admin_key_file: Option<String>,
    pub upi_payee: String,
    pub upi_payee_name: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(120),
            rate_limit: Some(RateLimitConfig::default()),
            admin_key_file: None,
            upi_payee: "voxnova@upi".to_string(),
            upi_payee_name: "VoxNova".to_string(),
        }
    }
}

impl ServerConfig {
    /// Load server configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            request_timeout: load_request_timeout(),
            rate_limit: load_rate_limit_config(),
            admin_key_file: env::var("ADMIN_API_KEY_FILE").ok(),
            upi_payee: env::var("UPI_PAYEE").unwrap_or(defaults.upi_payee),
            upi_payee_name: env::var("UPI_PAYEE_NAME").unwrap_or(defaults.upi_payee_name),
        }
    }
}

/// Parse an environment variable, falling back to `default` when unset or invalid
fn parse_env<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}

/// Load request timeout configuration from environment variable
fn load_request_timeout() -> Duration {
    Duration::from_secs(parse_env("REQUEST_TIMEOUT_SECONDS", 120u64))
}

/// Load rate limit configuration; `None` when disabled
fn load_rate_limit_config() -> Option<RateLimitConfig> {
    let mode = env::var("RATE_LIMIT_MODE")
        .unwrap_or_else(|_| "enabled".to_string())
        .to_lowercase();

    if mode == "disabled" {
        return None;
    }

    let defaults = RateLimitConfig::default();
    let per_second: u32 = parse_env("RATE_LIMIT_PER_SECOND", defaults.per_second);
    let burst_size: u32 = parse_env("RATE_LIMIT_BURST_SIZE", defaults.burst_size);

    Some(RateLimitConfig {
        per_second: per_second.max(1),
        burst_size: burst_size.max(1),
    })
}
