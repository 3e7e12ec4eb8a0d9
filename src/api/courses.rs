use axum::{Json, extract::State};
use tracing::{info, warn};

use super::ApiJson;
use crate::db::repository;
use crate::error::{AppError, is_unique_violation};
use crate::models::{Course, CourseCreated, NewCourseRequest};
use crate::state::AppState;

pub(super) async fn add_course(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<NewCourseRequest>,
) -> Result<Json<CourseCreated>, AppError> {
    let new_course = req.validate()?;
    let code = new_course.code.clone();

    let course = repository::insert_course(&state.db, new_course)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                warn!("course code already exists: {}", code);
                AppError::conflict("Course code already exists")
            } else {
                AppError::from(e)
            }
        })?;

    info!(course_id = %course.id, code = %course.code, seats = course.seats, "course added");
    Ok(Json(CourseCreated {
        message: "Course added successfully".to_string(),
        course,
    }))
}

pub(super) async fn list_courses(State(state): State<AppState>) -> Result<Json<Vec<Course>>, AppError> {
    let courses = repository::fetch_courses(&state.db).await?;
    Ok(Json(courses))
}
