use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 64))]
    pub login: String,

    #[validate(length(min = 1, max = 128))]
    pub password: String,

    /// Six-digit authenticator code, required once MFA is enabled
    #[validate(length(equal = 6))]
    pub totp_code: Option<String>,
}

/// Body of `/auth/mfa/confirm` and `/auth/mfa/disable`
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct MfaCodeRequest {
    #[validate(length(equal = 6))]
    pub code: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, max = 128))]
    pub current_password: String,

    #[validate(length(min = 8, max = 128))]
    pub new_password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_request_rejects_short_totp() {
        let request = LoginRequest {
            login: "i.petrova".to_string(),
            password: "secret".to_string(),
            totp_code: Some("123".to_string()),
        };
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("totp_code"));
    }

    #[test]
    fn test_login_request_without_totp_is_valid() {
        let request: LoginRequest =
            serde_json::from_str(r#"{"login": "admin", "password": "x"}"#).unwrap();
        assert!(request.validate().is_ok());
        assert!(request.totp_code.is_none());
    }
}
