use axum::{Json, extract::State};
use tracing::{info, warn};

use super::ApiJson;
use crate::auth::{hash_password, verify_password};
use crate::db::repository;
use crate::error::{AppError, is_unique_violation};
use crate::models::{LoginRequest, LoginResponse, MessageResponse, SignupRequest};
use crate::state::AppState;

const EMAIL_TAKEN: &str = "Email already registered";
const BAD_CREDENTIALS: &str = "Invalid email or password";

pub(super) async fn register(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<SignupRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let student = req.validate()?;

    if repository::find_student_by_email(&state.db, &student.email)
        .await?
        .is_some()
    {
        warn!("sign-up rejected, email in use: {}", student.email);
        return Err(AppError::conflict(EMAIL_TAKEN));
    }

    let password_hash = hash_password(student.password.clone()).await?;
    let created = repository::insert_student(&state.db, &student, password_hash)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::conflict(EMAIL_TAKEN)
            } else {
                AppError::from(e)
            }
        })?;

    info!(student_id = %created.id, "student registered");
    Ok(Json(MessageResponse::new("Registration successful")))
}

pub(super) async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let (email, password) = req.validate()?;

    let bad_credentials = || {
        warn!("login failed for {}", email);
        AppError::validation(BAD_CREDENTIALS)
    };

    let student = repository::find_student_by_email(&state.db, &email)
        .await?
        .ok_or_else(bad_credentials)?;
    if !verify_password(password, student.password_hash.clone()).await? {
        return Err(bad_credentials());
    }

    info!(student_id = %student.id, "student logged in");
    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        student_id: student.id,
        name: student.name,
    }))
}
