use std::env;

/// Default threshold above which a request is reported as slow
pub const DEFAULT_SLOW_REQUEST_THRESHOLD_MS: u64 = 5000;

/// Configuration for the logging system
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Custom log directory path (overrides auto-detection)
    pub custom_log_dir: Option<String>,

    /// Filter for console output
    pub console_log_level: String,

    /// Filter for the application log file (default: "debug")
    pub file_log_level: String,

    /// Write access.log and application.log (default: true)
    pub files_enabled: bool,

    /// Log slow requests over threshold (default: true)
    pub log_slow_requests: bool,

    /// Slow request threshold in milliseconds (default: 5000)
    pub slow_request_threshold_ms: u64,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            custom_log_dir: None,
            console_log_level: "info".to_string(),
            file_log_level: "debug".to_string(),
            files_enabled: true,
            log_slow_requests: true,
            slow_request_threshold_ms: DEFAULT_SLOW_REQUEST_THRESHOLD_MS,
        }
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "true" | "1" | "yes" | "on")
}

/// Slow request threshold from `LOG_SLOW_REQUEST_THRESHOLD_MS`
pub fn slow_request_threshold_ms() -> u64 {
    env::var("LOG_SLOW_REQUEST_THRESHOLD_MS")
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(DEFAULT_SLOW_REQUEST_THRESHOLD_MS)
}

impl LogConfig {
    /// Load logging configuration from environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(dir) = env::var("VOXNOVA_LOG_DIR") {
            config.custom_log_dir = Some(dir);
        }

        config.console_log_level = env::var("RUST_LOG")
            .unwrap_or_else(|_| "voxnova_server=info,tower_http=warn,hyper=warn".to_string());

        if let Ok(level) = env::var("VOXNOVA_FILE_LOG_LEVEL") {
            config.file_log_level = level;
        }

        if let Ok(val) = env::var("LOG_FILES_ENABLED") {
            config.files_enabled = parse_flag(&val);
        }

        if let Ok(val) = env::var("LOG_SLOW_REQUESTS") {
            config.log_slow_requests = parse_flag(&val);
        }

        config.slow_request_threshold_ms = slow_request_threshold_ms();

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LogConfig::default();
        assert_eq!(config.console_log_level, "info");
        assert_eq!(config.file_log_level, "debug");
        assert!(config.files_enabled);
        assert!(config.log_slow_requests);
        assert_eq!(config.slow_request_threshold_ms, 5000);
        assert!(config.custom_log_dir.is_none());
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("true"));
        assert!(parse_flag(" TRUE "));
        assert!(parse_flag("1"));
        assert!(!parse_flag("false"));
        assert!(!parse_flag("nope"));
    }

    #[test]
    fn test_from_env_custom_values() {
        env::set_var("VOXNOVA_FILE_LOG_LEVEL", "trace");
        env::set_var("LOG_FILES_ENABLED", "false");

        let config = LogConfig::from_env();
        assert_eq!(config.file_log_level, "trace");
        assert!(!config.files_enabled);

        env::remove_var("VOXNOVA_FILE_LOG_LEVEL");
        env::remove_var("LOG_FILES_ENABLED");
    }
}
