use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{ALL_FIELDS_REQUIRED, required};
use crate::error::AppError;

#[derive(Debug, Clone, FromRow)]
pub struct Student {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password_hash: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SignupRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub password: Option<String>,
}

/// A sign-up that passed validation. The password is still plaintext here.
#[derive(Debug, Clone)]
pub struct NewStudent {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
}

impl SignupRequest {
    pub fn validate(self) -> Result<NewStudent, AppError> {
        // Passwords are taken verbatim; surrounding spaces are significant.
        let password = self.password.filter(|p| !p.is_empty());
        match (
            required(self.name),
            required(self.email),
            required(self.phone),
            password,
        ) {
            (Some(name), Some(email), Some(phone), Some(password)) => Ok(NewStudent {
                name,
                email,
                phone,
                password,
            }),
            _ => Err(AppError::validation(ALL_FIELDS_REQUIRED)),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl LoginRequest {
    pub fn validate(self) -> Result<(String, String), AppError> {
        match (required(self.email), self.password.filter(|p| !p.is_empty())) {
            (Some(email), Some(password)) => Ok((email, password)),
            _ => Err(AppError::validation(ALL_FIELDS_REQUIRED)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub message: String,
    pub student_id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
