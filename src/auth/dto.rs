use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ApiError, FieldError};

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl RegisterRequest {
    /// Collects every violated field, not just the first.
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut errors = Vec::new();
        if self.name.trim().is_empty() {
            errors.push(FieldError {
                field: "name",
                message: "Name is required",
            });
        }
        if !is_valid_email(&self.email) {
            errors.push(FieldError {
                field: "email",
                message: "Valid email is required",
            });
        }
        if self.password.len() < 6 {
            errors.push(FieldError {
                field: "password",
                message: "Password must be at least 6 characters",
            });
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ApiError::Validation(errors))
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut errors = Vec::new();
        if !is_valid_email(&self.email) {
            errors.push(FieldError {
                field: "email",
                message: "Valid email is required",
            });
        }
        if self.password.is_empty() {
            errors.push(FieldError {
                field: "password",
                message: "Password is required",
            });
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ApiError::Validation(errors))
        }
    }
}

/// Public part of the account returned to the client. The password hash
/// never appears here.
#[derive(Debug, Serialize)]
pub struct PublicAccount {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

/// Response returned after register or login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub account: PublicAccount,
    pub token: String,
}
