//! Outbound auth form DTOs.
//!
//! Each form is validated client-side before submission (spec: malformed
//! input never reaches the remote boundary).

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Login form.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    /// Account email.
    #[validate(email)]
    pub email: String,
    /// Account password.
    #[validate(length(min = 1))]
    pub password: String,
}

/// Registration form.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Desired login name.
    #[validate(length(min = 1))]
    pub username: String,
    /// Account email.
    #[validate(email)]
    pub email: String,
    /// Account password.
    #[validate(length(min = 8))]
    pub password: String,
}

/// Refresh-token exchange request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    /// The refresh token to exchange.
    pub refresh_token: String,
}

/// OTP generation request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OtpRequest {
    /// Email the code is sent to.
    #[validate(email)]
    pub email: String,
}

/// OTP verification request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct OtpVerifyRequest {
    /// Email the code was sent to.
    #[validate(email)]
    pub email: String,
    /// The one-time code.
    #[validate(length(min = 4))]
    pub otp_code: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_requires_valid_email() {
        let form = LoginRequest {
            email: "not-an-email".to_string(),
            password: "secret".to_string(),
        };
        assert!(form.validate().is_err());
    }

    #[test]
    fn test_register_requires_password_length() {
        let form = RegisterRequest {
            username: "buyer".to_string(),
            email: "buyer@example.com".to_string(),
            password: "short".to_string(),
        };
        assert!(form.validate().is_err());
    }
}
