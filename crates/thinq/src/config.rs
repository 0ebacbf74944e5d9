use std::env;

use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "https://api-aic.lgthinq.com";
const DEFAULT_COUNTRY: &str = "US";
const DEFAULT_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Clone)]
pub struct ThinqConfig {
    pub access_token: String,
    pub client_id: String,
    pub country: String,
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing LG_THINQ_ACCESS_TOKEN or LG_THINQ_CLIENT_ID in the environment")]
    MissingCredentials,
}

impl ThinqConfig {
    pub fn new(access_token: impl Into<String>, client_id: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            client_id: client_id.into(),
            country: DEFAULT_COUNTRY.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Credentials are read fresh so a saved `.env` takes effect without a
    /// restart; the token and client id are opaque and never parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        let access_token = trimmed_var("LG_THINQ_ACCESS_TOKEN");
        let client_id = trimmed_var("LG_THINQ_CLIENT_ID");
        if access_token.is_empty() || client_id.is_empty() {
            return Err(ConfigError::MissingCredentials);
        }

        let mut cfg = ThinqConfig::new(access_token, client_id);
        let country = trimmed_var("LG_THINQ_COUNTRY");
        if !country.is_empty() {
            cfg.country = country;
        }
        let base_url = trimmed_var("LG_THINQ_BASE_URL");
        if !base_url.is_empty() {
            cfg.base_url = base_url;
        }
        if let Ok(v) = env::var("LG_THINQ_TIMEOUT_SECS") {
            if let Ok(secs) = v.parse::<u64>() {
                cfg.timeout_secs = secs;
            }
        }
        Ok(cfg)
    }
}

fn trimmed_var(key: &str) -> String {
    env::var(key).unwrap_or_default().trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    // Single test so the process environment is not mutated concurrently.
    #[test]
    fn from_env_requires_credentials_and_applies_defaults() {
        env::remove_var("LG_THINQ_ACCESS_TOKEN");
        env::remove_var("LG_THINQ_CLIENT_ID");
        env::remove_var("LG_THINQ_COUNTRY");
        env::remove_var("LG_THINQ_BASE_URL");
        assert!(matches!(
            ThinqConfig::from_env(),
            Err(ConfigError::MissingCredentials)
        ));

        env::set_var("LG_THINQ_ACCESS_TOKEN", " token ");
        env::set_var("LG_THINQ_CLIENT_ID", "client-1");
        let cfg = ThinqConfig::from_env().unwrap();
        assert_eq!(cfg.access_token, "token");
        assert_eq!(cfg.client_id, "client-1");
        assert_eq!(cfg.country, "US");
        assert_eq!(cfg.base_url, DEFAULT_BASE_URL);

        env::set_var("LG_THINQ_COUNTRY", "KR");
        env::set_var("LG_THINQ_BASE_URL", "http://localhost:1234");
        let cfg = ThinqConfig::from_env().unwrap();
        assert_eq!(cfg.country, "KR");
        assert_eq!(cfg.base_url, "http://localhost:1234");

        env::remove_var("LG_THINQ_ACCESS_TOKEN");
        env::remove_var("LG_THINQ_CLIENT_ID");
        env::remove_var("LG_THINQ_COUNTRY");
        env::remove_var("LG_THINQ_BASE_URL");
    }
}
