use anyhow::{bail, Context, Result};
use reqwest::header::HeaderValue;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:5001";
pub const DEFAULT_USER_AGENT: &str = concat!("cybert-client/", env!("CARGO_PKG_VERSION"));
pub const DEFAULT_HEALTH_INTERVAL: Duration = Duration::from_secs(30);
/// Floor for the health probe period.
pub const MIN_HEALTH_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub user_agent: String,
    pub health_interval: Duration,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let base_url = normalize_base_url(base_url.into())?;
        Ok(Self {
            base_url,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            health_interval: DEFAULT_HEALTH_INTERVAL,
        })
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Result<Self> {
        let user_agent = user_agent.into();
        HeaderValue::from_str(&user_agent)
            .with_context(|| format!("user agent is not a valid header value: {:?}", user_agent))?;
        self.user_agent = user_agent;
        Ok(self)
    }

    pub fn with_health_interval(mut self, interval: Duration) -> Self {
        self.health_interval = interval.max(MIN_HEALTH_INTERVAL);
        self
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            health_interval: DEFAULT_HEALTH_INTERVAL,
        }
    }
}

fn normalize_base_url(raw: String) -> Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        bail!("API URL must start with http:// or https://: {}", raw);
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_dropped() {
        let config = ClientConfig::new("http://127.0.0.1:5001/").unwrap();
        assert_eq!(config.endpoint("/api/health"), "http://127.0.0.1:5001/api/health");
    }

    #[test]
    fn rejects_schemeless_urls() {
        assert!(ClientConfig::new("localhost:5001").is_err());
    }

    #[test]
    fn user_agent_must_be_a_header_value() {
        let config = ClientConfig::default().with_user_agent("soc-dashboard/2.1").unwrap();
        assert_eq!(config.user_agent, "soc-dashboard/2.1");
        assert!(ClientConfig::default().with_user_agent("bad\nagent").is_err());
    }

    #[test]
    fn health_interval_has_a_floor() {
        let config = ClientConfig::default().with_health_interval(Duration::ZERO);
        assert_eq!(config.health_interval, MIN_HEALTH_INTERVAL);
    }
}
