use axum::{
    Json,
    extract::{Path, State},
};
use tracing::{info, warn};

use super::ApiJson;
use crate::db::repository;
use crate::error::AppError;
use crate::models::{
    DashboardSummary, EnrollmentOutcome, EnterMarksRequest, MessageResponse,
    RegisterCourseRequest, RegisteredCourse,
};
use crate::state::AppState;

const ALREADY_REGISTERED: &str = "Already registered";
const NO_SEATS: &str = "No seats available";

pub(super) async fn register_course(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RegisterCourseRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let (student_id, course_id) = req.validate()?;

    if repository::registration_exists(&state.db, &student_id, &course_id).await? {
        warn!(%student_id, %course_id, "duplicate registration");
        return Err(AppError::conflict(ALREADY_REGISTERED));
    }
    if !repository::student_exists(&state.db, &student_id).await? {
        return Err(AppError::not_found("Student not found"));
    }

    match repository::enroll(&state.db, &student_id, &course_id).await? {
        EnrollmentOutcome::Registered => {
            info!(%student_id, %course_id, "course registered");
            Ok(Json(MessageResponse::new("Course registered successfully")))
        }
        EnrollmentOutcome::AlreadyRegistered => {
            warn!(%student_id, %course_id, "duplicate registration");
            Err(AppError::conflict(ALREADY_REGISTERED))
        }
        EnrollmentOutcome::NoSeats => {
            warn!(%student_id, %course_id, "no seats available");
            Err(AppError::not_found(NO_SEATS))
        }
    }
}

pub(super) async fn my_courses(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
) -> Result<Json<Vec<RegisteredCourse>>, AppError> {
    let registered = repository::fetch_registered_courses(&state.db, &student_id).await?;
    Ok(Json(registered))
}

pub(super) async fn dashboard(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
) -> Result<Json<DashboardSummary>, AppError> {
    let (registered, credits) = repository::dashboard_totals(&state.db, &student_id).await?;
    Ok(Json(DashboardSummary::new(registered, credits)))
}

pub(super) async fn enter_marks(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<EnterMarksRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let entry = req.validate()?;

    let updated =
        repository::set_marks(&state.db, &entry.student_id, &entry.course_id, entry.marks).await?;
    if !updated {
        warn!(student_id = %entry.student_id, course_id = %entry.course_id, "marks for unregistered course");
        return Err(AppError::not_found("Course not registered"));
    }

    info!(student_id = %entry.student_id, course_id = %entry.course_id, marks = entry.marks, "marks saved");
    Ok(Json(MessageResponse::new("Marks saved successfully")))
}
