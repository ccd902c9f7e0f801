//! API DTOs (Data Transfer Objects)

use serde::{Deserialize, Serialize};

use crate::domain::value_object::auth_state::AuthState;

// ============================================================================
// Login
// ============================================================================

/// Login request
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[serde(alias = "username")]
    pub user_name: String,
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("user_name", &self.user_name)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Login response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub authenticated: bool,
    pub user_name: String,
    pub display_name: String,
}

// ============================================================================
// Session Status
// ============================================================================

/// Session status response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStatusResponse {
    pub authenticated: bool,
    pub state: AuthState,
    pub user_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_request_field_names() {
        let camel: LoginRequest =
            serde_json::from_str(r#"{"userName":"alice","password":"pw"}"#).unwrap();
        let plain: LoginRequest =
            serde_json::from_str(r#"{"username":"alice","password":"pw"}"#).unwrap();
        assert_eq!(camel.user_name, plain.user_name);

        assert!(serde_json::from_str::<LoginRequest>(r#"{"userName":"alice"}"#).is_err());
    }

    #[test]
    fn test_login_request_debug_redacts_password() {
        let req = LoginRequest {
            user_name: "alice".into(),
            password: "hunter22hunter".into(),
        };
        assert!(!format!("{:?}", req).contains("hunter22"));
    }

    #[test]
    fn test_status_serialization() {
        let json = serde_json::to_value(SessionStatusResponse {
            authenticated: false,
            state: AuthState::NoSession,
            user_name: None,
        })
        .unwrap();
        assert_eq!(json["state"], "no_session");
        assert_eq!(json["userName"], serde_json::Value::Null);
    }
}
