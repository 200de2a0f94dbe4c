//! Request and response bodies for the auth endpoints. Feature payloads
//! serialize straight from their domain types; only auth has wire-only
//! shapes.

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct RegisterRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub password_confirm: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct GoogleLoginRequest<'a> {
    pub token: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct RefreshRequest<'a> {
    pub refresh: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct LogoutRequest<'a> {
    pub refresh: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct VerifyEmailRequest<'a> {
    pub token: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct PasswordResetRequest<'a> {
    pub email: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct PasswordResetConfirmRequest<'a> {
    pub token: &'a str,
    pub password: &'a str,
    pub password_confirm: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct PasswordChangeRequest<'a> {
    pub current_password: &'a str,
    pub new_password: &'a str,
    pub new_password_confirm: &'a str,
}

/// Body of a refresh response. The server rotates the refresh token, but the
/// new one is optional here so a non-rotating deployment still works.
#[derive(Debug, Deserialize)]
pub(crate) struct RotatedTokens {
    pub access: String,
    pub refresh: Option<String>,
}
