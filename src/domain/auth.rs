use crate::error::ValidationErrors;
use serde::{Deserialize, Serialize};

/// Access and refresh tokens as issued by the login, Google sign-in and
/// refresh endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// Characters the password policy counts as "special".
const SPECIAL: &str = "!@#$%^&*(),.?\":{}|<>";

fn is_valid_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !value.contains(char::is_whitespace)
}

fn check_password_policy(errors: &mut ValidationErrors, field: &'static str, password: &str) {
    if password.chars().count() < 8 {
        errors.push(field, "Password must be at least 8 characters");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        errors.push(field, "Password must contain at least 1 number");
    }
    if !password.chars().any(|c| SPECIAL.contains(c)) {
        errors.push(field, "Password must contain at least 1 special character");
    }
}

pub fn validate_email(email: &str) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    if !is_valid_email(email) {
        errors.push("email", "Invalid email address");
    }
    errors.into_result()
}

pub fn validate_login(email: &str, password: &str) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    if !is_valid_email(email) {
        errors.push("email", "Invalid email address");
    }
    if password.is_empty() {
        errors.push("password", "Password is required");
    }
    errors.into_result()
}

pub fn validate_registration(
    email: &str,
    password: &str,
    password_confirm: &str,
) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    if !is_valid_email(email) {
        errors.push("email", "Invalid email address");
    }
    check_password_policy(&mut errors, "password", password);
    if password != password_confirm {
        errors.push("password_confirm", "Passwords do not match");
    }
    errors.into_result()
}

pub fn validate_password_change(
    current_password: &str,
    new_password: &str,
    new_password_confirm: &str,
) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    if current_password.is_empty() {
        errors.push("current_password", "Current password is required");
    }
    check_password_policy(&mut errors, "new_password", new_password);
    if new_password != new_password_confirm {
        errors.push("new_password_confirm", "Passwords do not match");
    }
    errors.into_result()
}

/// Policy check for a freshly chosen password, used by the reset-confirm flow
/// where no current password exists.
pub fn validate_new_password(
    new_password: &str,
    new_password_confirm: &str,
) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    check_password_policy(&mut errors, "new_password", new_password);
    if new_password != new_password_confirm {
        errors.push("new_password_confirm", "Passwords do not match");
    }
    errors.into_result()
}
