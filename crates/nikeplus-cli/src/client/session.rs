//! Login envelope handling
//!
//! The login endpoint answers with
//! `{serviceResponse: {header: {success, errorCodes: [{message}]}, body: {User: {screenName, ...}}}}`.

use crate::error::{NikePlusError, Result};
use crate::models::Record;

/// Message used when a failed login carries no error codes
const UNKNOWN_LOGIN_FAILURE: &str = "Login failed";

/// An authenticated user session
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    user: Record,
    screen_name: String,
}

impl Session {
    /// Build a session from a decoded login response.
    ///
    /// Fails with the first error message the service reported when
    /// `serviceResponse.header.success` is anything other than `"true"`.
    pub fn from_login_response(response: &Record) -> Result<Self> {
        let header = response.path("serviceResponse.header");

        if header.get("success").as_str() != Some("true") {
            let message = header
                .get("errorCodes")
                .index(0)
                .get("message")
                .as_str()
                .unwrap_or(UNKNOWN_LOGIN_FAILURE);
            return Err(NikePlusError::auth(message));
        }

        let user = response
            .path("serviceResponse.body.User")
            .to_record()
            .unwrap_or_default();
        let screen_name = user
            .get("screenName")
            .as_str()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| NikePlusError::invalid_response("Login succeeded but no screen name was returned"))?
            .to_string();

        Ok(Self { user, screen_name })
    }

    /// The `User` object from the login response
    pub fn user(&self) -> &Record {
        &self.user
    }

    pub fn screen_name(&self) -> &str {
        &self.screen_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(value: serde_json::Value) -> Record {
        Record::from_value(value)
    }

    #[test]
    fn test_successful_login() {
        let session = Session::from_login_response(&response(json!({
            "serviceResponse": {
                "header": {"success": "true"},
                "body": {"User": {"screenName": "runner42", "id": "1234"}}
            }
        })))
        .unwrap();

        assert_eq!(session.screen_name(), "runner42");
        assert_eq!(session.user().get("id").as_str(), Some("1234"));
    }

    #[test]
    fn test_failed_login_uses_first_message() {
        let err = Session::from_login_response(&response(json!({
            "serviceResponse": {
                "header": {
                    "success": "false",
                    "errorCodes": [{"message": "bad creds"}, {"message": "second"}]
                }
            }
        })))
        .unwrap_err();

        assert!(matches!(err, NikePlusError::Authentication(ref m) if m == "bad creds"));
    }

    #[test]
    fn test_empty_response_is_auth_failure() {
        let err = Session::from_login_response(&Record::default()).unwrap_err();
        assert!(matches!(err, NikePlusError::Authentication(ref m) if m == UNKNOWN_LOGIN_FAILURE));
    }

    #[test]
    fn test_boolean_success_flag_is_not_accepted() {
        let err = Session::from_login_response(&response(json!({
            "serviceResponse": {"header": {"success": true}}
        })))
        .unwrap_err();
        assert!(matches!(err, NikePlusError::Authentication(_)));
    }

    #[test]
    fn test_success_without_screen_name() {
        let err = Session::from_login_response(&response(json!({
            "serviceResponse": {"header": {"success": "true"}, "body": {"User": {}}}
        })))
        .unwrap_err();
        assert!(matches!(err, NikePlusError::InvalidResponse(_)));
    }
}
