use crate::error::{NikePlusError, Result};
use std::env;

/// Host serving the login endpoint
pub const DEFAULT_AUTH_URL: &str = "https://secure-nikeplus.nike.com";

/// Host serving activity data
pub const DEFAULT_BASE_URL: &str = "http://nikeplus.nike.com";

const EMAIL_VAR: &str = "NIKEPLUS_EMAIL";
const PASSWORD_VAR: &str = "NIKEPLUS_PASSWORD";
const DEBUG_VAR: &str = "NIKEPLUS_DEBUG";
const AUTH_URL_VAR: &str = "NIKEPLUS_AUTH_URL";
const BASE_URL_VAR: &str = "NIKEPLUS_BASE_URL";

/// Everything needed to build a client and log in
#[derive(Clone)]
pub struct ClientConfig {
    pub email: String,
    pub password: String,
    /// Log response bodies that fail to decode
    pub debug: bool,
    pub auth_base_url: String,
    pub base_url: String,
}

impl ClientConfig {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            debug: false,
            auth_base_url: DEFAULT_AUTH_URL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Point the client at other hosts (used by tests against a mock server)
    pub fn with_base_urls(mut self, auth_base_url: &str, base_url: &str) -> Self {
        self.auth_base_url = trim_slash(auth_base_url);
        self.base_url = trim_slash(base_url);
        self
    }

    /// Load configuration from `NIKEPLUS_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let email = lookup(EMAIL_VAR)
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| NikePlusError::config(format!("Missing {}", EMAIL_VAR)))?;
        let password = lookup(PASSWORD_VAR)
            .ok_or_else(|| NikePlusError::config(format!("Missing {}", PASSWORD_VAR)))?;
        let debug = lookup(DEBUG_VAR).map(|v| parse_flag(&v)).unwrap_or(false);

        let config = Self::new(email.trim(), password).with_debug(debug);
        let auth = lookup(AUTH_URL_VAR).unwrap_or_else(|| DEFAULT_AUTH_URL.to_string());
        let base = lookup(BASE_URL_VAR).unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Ok(config.with_base_urls(&auth, &base))
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("debug", &self.debug)
            .field("auth_base_url", &self.auth_base_url)
            .field("base_url", &self.base_url)
            .finish()
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

fn trim_slash(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ClientConfig::new("test@nikeplus.com", "mypassword");
        assert_eq!(config.auth_base_url, DEFAULT_AUTH_URL);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert!(!config.debug);
    }

    #[test]
    fn test_from_lookup() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("NIKEPLUS_EMAIL", "test@nikeplus.com"),
            ("NIKEPLUS_PASSWORD", "mypassword"),
            ("NIKEPLUS_DEBUG", "true"),
            ("NIKEPLUS_BASE_URL", "http://localhost:9000/"),
        ]))
        .unwrap();

        assert_eq!(config.email, "test@nikeplus.com");
        assert!(config.debug);
        assert_eq!(config.base_url, "http://localhost:9000");
        assert_eq!(config.auth_base_url, DEFAULT_AUTH_URL);
    }

    #[test]
    fn test_missing_credentials() {
        let err = ClientConfig::from_lookup(lookup(&[("NIKEPLUS_PASSWORD", "pw")])).unwrap_err();
        assert!(err.to_string().contains("NIKEPLUS_EMAIL"));

        let err = ClientConfig::from_lookup(lookup(&[("NIKEPLUS_EMAIL", "a@b.c")])).unwrap_err();
        assert!(err.to_string().contains("NIKEPLUS_PASSWORD"));
    }

    #[test]
    fn test_debug_output_hides_password() {
        let config = ClientConfig::new("test@nikeplus.com", "mypassword");
        let printed = format!("{:?}", config);
        assert!(!printed.contains("mypassword"));
        assert!(printed.contains("<redacted>"));
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("1"));
        assert!(parse_flag("YES"));
        assert!(!parse_flag("0"));
        assert!(!parse_flag(""));
    }
}
