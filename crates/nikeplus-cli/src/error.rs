use thiserror::Error;

/// Main error type for nikeplus-cli
#[derive(Error, Debug)]
pub enum NikePlusError {
    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Not logged in. Call login() before requesting activities.")]
    NotAuthenticated,

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, NikePlusError>;

impl NikePlusError {
    /// Create an authentication error from a message
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Authentication(msg.into())
    }

    /// Create a configuration error from a message
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an invalid response error from a message
    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::InvalidResponse(msg.into())
    }

    /// Create an invalid parameter error from a message
    pub fn invalid_param(msg: impl Into<String>) -> Self {
        Self::InvalidParameter(msg.into())
    }

    /// True for failures of the transport itself (network or non-2xx status)
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Http(_) | Self::Api { .. })
    }
}

/// Render an error for terminal output, with a hint where one helps
pub fn format_user_error(err: &NikePlusError) -> String {
    match err {
        NikePlusError::Authentication(msg) => {
            format!("{}\nCheck the email and password for your Nike+ account.", msg)
        }
        NikePlusError::Config(msg) => format!(
            "{}\nSet NIKEPLUS_EMAIL and NIKEPLUS_PASSWORD or pass --email.",
            msg
        ),
        NikePlusError::Http(e) if e.is_timeout() => {
            "Request timed out. The Nike+ service may be unavailable.".to_string()
        }
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = NikePlusError::Authentication("bad creds".to_string());
        assert_eq!(err.to_string(), "Authentication error: bad creds");
    }

    #[test]
    fn test_not_authenticated_error() {
        let err = NikePlusError::NotAuthenticated;
        assert!(err.to_string().contains("login()"));
    }

    #[test]
    fn test_api_error_display() {
        let err = NikePlusError::Api {
            status: 503,
            message: "Service Unavailable".to_string(),
        };
        assert_eq!(err.to_string(), "API error 503: Service Unavailable");
        assert!(err.is_transport());
    }

    #[test]
    fn test_error_constructors() {
        let auth_err = NikePlusError::auth("test auth");
        assert!(matches!(auth_err, NikePlusError::Authentication(_)));
        assert!(!auth_err.is_transport());

        let config_err = NikePlusError::config("test config");
        assert!(matches!(config_err, NikePlusError::Config(_)));

        let response_err = NikePlusError::invalid_response("bad response");
        assert!(matches!(response_err, NikePlusError::InvalidResponse(_)));

        let param_err = NikePlusError::invalid_param("bad param");
        assert!(matches!(param_err, NikePlusError::InvalidParameter(_)));
    }

    #[test]
    fn test_format_user_error_adds_hint() {
        let msg = format_user_error(&NikePlusError::config("Missing NIKEPLUS_EMAIL"));
        assert!(msg.starts_with("Missing NIKEPLUS_EMAIL"));
        assert!(msg.contains("--email"));
    }
}
