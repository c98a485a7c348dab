//! Process-wide configuration and per-call options

use std::sync::OnceLock;

/// Constants shared by every conversion.
///
/// Built once and handed to the converter by reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Error domain reported on every syntax error (parser)
    pub error_domain: i32,
    /// Error code reported on every syntax error (internal error)
    pub error_code: i32,
    /// Error level reported on every syntax error (error)
    pub error_level: i32,
    /// Error limit used when the caller does not give one
    pub default_max_errors: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            error_domain: 1,
            error_code: 1,
            error_level: 2,
            default_max_errors: None,
        }
    }
}

static GLOBAL: OnceLock<Config> = OnceLock::new();

impl Config {
    /// The process-wide configuration, initialised on first use
    pub fn global() -> &'static Config {
        GLOBAL.get_or_init(Config::default)
    }
}

/// Options for one conversion
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Source identifier copied onto each syntax error
    pub url: Option<String>,
    /// Maximum number of parse errors to keep; `None` is unlimited
    pub max_errors: Option<usize>,
}

impl ParseOptions {
    pub fn new(url: Option<&str>, max_errors: Option<usize>) -> Self {
        ParseOptions {
            url: url.map(str::to_string),
            max_errors,
        }
    }

    /// Interpret a host-side limit, where a negative number means unlimited
    pub fn with_host_limit(url: Option<&str>, max_errors: i64) -> Self {
        let max_errors = usize::try_from(max_errors).ok();
        Self::new(url, max_errors)
    }

    /// Effective limit, falling back to the configured default
    pub fn error_limit(&self, config: &Config) -> Option<usize> {
        self.max_errors.or(config.default_max_errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_defaults() {
        let config = Config::global();
        assert_eq!(config.error_domain, 1);
        assert_eq!(config.error_code, 1);
        assert_eq!(config.error_level, 2);
        assert!(std::ptr::eq(config, Config::global()));
    }

    #[test]
    fn test_host_limit() {
        assert_eq!(ParseOptions::with_host_limit(None, -1).max_errors, None);
        assert_eq!(ParseOptions::with_host_limit(None, 5).max_errors, Some(5));
    }

    #[test]
    fn test_error_limit_fallback() {
        let config = Config {
            default_max_errors: Some(10),
            ..Config::default()
        };
        assert_eq!(ParseOptions::default().error_limit(&config), Some(10));
        assert_eq!(ParseOptions::new(None, Some(2)).error_limit(&config), Some(2));
    }
}
