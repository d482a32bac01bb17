//! Authentication endpoints: login and the three-step registration flow.

use serde::{Deserialize, Serialize};

use crate::api::{ApiClient, ApiResult};
use crate::session::UserRecord;

#[derive(Debug, Serialize)]
struct RegisterRequest<'a> {
    name: &'a str,
    email: &'a str,
    phone: &'a str,
}

#[derive(Debug, Serialize)]
struct OtpVerifyRequest<'a> {
    email: &'a str,
    otp: &'a str,
}

#[derive(Debug, Serialize)]
struct SetPasswordRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

/// Response to an OTP send or resend.
#[derive(Debug, Clone, Deserialize)]
pub struct OtpDelivery {
    pub message: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub success: bool,
}

/// Response to a successful OTP verification.
#[derive(Debug, Clone, Deserialize)]
pub struct OtpVerified {
    pub message: String,
    pub email: String,
    #[serde(default)]
    pub verified: bool,
}

/// Token grant returned by login and by the final registration step.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthGrant {
    pub access_token: String,
    pub token_type: String,
    #[serde(default)]
    pub message: Option<String>,
    pub user: UserRecord,
}

impl ApiClient {
    /// Starts registration by requesting an OTP for the given identity.
    ///
    /// # Errors
    /// Returns an error if the operation fails.
    pub async fn register(&self, name: &str, email: &str, phone: &str) -> ApiResult<OtpDelivery> {
        let body = RegisterRequest { name, email, phone };
        self.post_json("/auth/register", &body, "Failed to send OTP")
            .await
    }

    /// Legacy alias of [`Self::register`] kept for older clients; the
    /// server treats both routes identically.
    ///
    /// # Errors
    /// Returns an error if the operation fails.
    pub async fn request_otp(&self, name: &str, email: &str, phone: &str) -> ApiResult<OtpDelivery> {
        let body = RegisterRequest { name, email, phone };
        self.post_json("/auth/request-otp", &body, "Failed to send OTP")
            .await
    }

    /// Verifies the emailed OTP for a pending registration.
    ///
    /// # Errors
    /// Returns an error if the operation fails.
    pub async fn verify_otp(&self, email: &str, otp: &str) -> ApiResult<OtpVerified> {
        let body = OtpVerifyRequest { email, otp };
        self.post_json("/auth/verify-otp", &body, "Invalid OTP").await
    }

    /// Sets the password for a verified registration and returns a grant.
    ///
    /// # Errors
    /// Returns an error if the operation fails.
    pub async fn set_password(&self, email: &str, password: &str) -> ApiResult<AuthGrant> {
        let body = SetPasswordRequest { email, password };
        self.post_json("/auth/set-password", &body, "Failed to create account")
            .await
    }

    /// Requests a fresh OTP for an unfinished registration.
    ///
    /// The resend endpoint shares the register schema, so the full identity
    /// rides along even though only the email is consulted.
    ///
    /// # Errors
    /// Returns an error if the operation fails.
    pub async fn resend_otp(&self, name: &str, email: &str, phone: &str) -> ApiResult<OtpDelivery> {
        let body = RegisterRequest { name, email, phone };
        self.post_json("/auth/resend-otp", &body, "Failed to resend OTP")
            .await
    }

    /// Exchanges credentials for a token grant.
    ///
    /// # Errors
    /// Returns an error if the operation fails.
    pub async fn login(&self, email: &str, password: &str) -> ApiResult<AuthGrant> {
        let body = LoginRequest { email, password };
        self.post_json("/auth/login", &body, "Login failed").await
    }

    /// Lists all registered users.
    ///
    /// # Errors
    /// Returns an error if the operation fails.
    pub async fn list_users(&self) -> ApiResult<Vec<UserRecord>> {
        self.get_json("/auth/users", "Failed to load users").await
    }
}
