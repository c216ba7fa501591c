use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use config::{Config as ConfigLoader, File};
use crate::error::{Result, SubmitError};

pub const DEFAULT_ENDPOINT: &str = "https://ismp.crpt.ru/api/v3/lk/documents/create";

/// Length of one rate window, expressed the way callers usually think about
/// quotas ("N requests per second").
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    Millisecond,
    #[default]
    Second,
    Minute,
    Hour,
    Day,
}

impl TimeUnit {
    pub fn as_duration(self) -> Duration {
        match self {
            TimeUnit::Millisecond => Duration::from_millis(1),
            TimeUnit::Second => Duration::from_secs(1),
            TimeUnit::Minute => Duration::from_secs(60),
            TimeUnit::Hour => Duration::from_secs(60 * 60),
            TimeUnit::Day => Duration::from_secs(24 * 60 * 60),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ClientConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Submissions admitted per window. Must be positive.
    #[serde(default = "default_request_limit")]
    pub request_limit: u32,

    #[serde(default)]
    pub time_unit: TimeUnit,

    /// Overrides `time_unit` when set.
    #[serde(default)]
    pub window_ms: Option<u64>,

    #[serde(default)]
    pub http: HttpConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    #[serde(default = "default_pool_idle_timeout_ms")]
    pub pool_idle_timeout_ms: u64,
    #[serde(default = "default_pool_max_idle_per_host")]
    pub pool_max_idle_per_host: usize,
    #[serde(default = "default_true")]
    pub https_only: bool,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_request_limit() -> u32 {
    10
}

fn default_connect_timeout_ms() -> u64 {
    2_000
}

fn default_request_timeout_ms() -> u64 {
    10_000
}

fn default_pool_idle_timeout_ms() -> u64 {
    90_000
}

fn default_pool_max_idle_per_host() -> usize {
    10
}

fn default_true() -> bool {
    true
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            request_limit: default_request_limit(),
            time_unit: TimeUnit::default(),
            window_ms: None,
            http: HttpConfig::default(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout_ms: default_connect_timeout_ms(),
            request_timeout_ms: default_request_timeout_ms(),
            pool_idle_timeout_ms: default_pool_idle_timeout_ms(),
            pool_max_idle_per_host: default_pool_max_idle_per_host(),
            https_only: default_true(),
        }
    }
}

impl ClientConfig {
    pub fn new(time_unit: TimeUnit, request_limit: u32) -> Self {
        Self {
            time_unit,
            request_limit,
            ..Self::default()
        }
    }

    /// Load settings from a TOML/YAML/JSON file. Keys missing from the file
    /// fall back to the built-in defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let loader = ConfigLoader::builder()
            .add_source(File::from(path.as_ref()))
            .build()?;

        let config: Self = loader.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn window(&self) -> Duration {
        match self.window_ms {
            Some(ms) => Duration::from_millis(ms),
            None => self.time_unit.as_duration(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.request_limit == 0 {
            return Err(SubmitError::InvalidConfiguration(
                "request_limit must be greater than 0".into(),
            ));
        }
        if self.window().is_zero() {
            return Err(SubmitError::InvalidConfiguration(
                "window must be longer than zero".into(),
            ));
        }
        url::Url::parse(&self.endpoint).map_err(|e| {
            SubmitError::InvalidConfiguration(format!("Invalid endpoint {}: {}", self.endpoint, e))
        })?;
        Ok(())
    }
}

impl HttpConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn pool_idle_timeout(&self) -> Duration {
        Duration::from_millis(self.pool_idle_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let config = ClientConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.window(), Duration::from_secs(1));
        assert!(config.http.https_only);
    }

    #[test]
    fn test_zero_limit_rejected() {
        let config = ClientConfig::new(TimeUnit::Second, 0);
        assert!(matches!(
            config.validate(),
            Err(SubmitError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_window_override() {
        let mut config = ClientConfig::new(TimeUnit::Minute, 5);
        assert_eq!(config.window(), Duration::from_secs(60));

        config.window_ms = Some(250);
        assert_eq!(config.window(), Duration::from_millis(250));

        config.window_ms = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bad_endpoint_rejected() {
        let mut config = ClientConfig::default();
        config.endpoint = "not a url".into();
        assert!(matches!(
            config.validate(),
            Err(SubmitError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("crpt-submit-{}.toml", std::process::id()));
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "request_limit = 3").unwrap();
        writeln!(file, "time_unit = \"minute\"").unwrap();
        writeln!(file, "[http]").unwrap();
        writeln!(file, "request_timeout_ms = 500").unwrap();
        drop(file);

        let config = ClientConfig::load(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.request_limit, 3);
        assert_eq!(config.time_unit, TimeUnit::Minute);
        assert_eq!(config.http.request_timeout(), Duration::from_millis(500));
        assert_eq!(config.http.connect_timeout(), Duration::from_secs(2));
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
    }

    #[test]
    fn test_load_rejects_zero_limit() {
        let path = std::env::temp_dir().join(format!("crpt-submit-zero-{}.toml", std::process::id()));
        std::fs::write(&path, "request_limit = 0\n").unwrap();

        let result = ClientConfig::load(&path);
        std::fs::remove_file(&path).ok();

        assert!(matches!(result, Err(SubmitError::InvalidConfiguration(_))));
    }
}
