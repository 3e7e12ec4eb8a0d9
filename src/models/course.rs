use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{ALL_FIELDS_REQUIRED, required};
use crate::error::AppError;

pub const MIN_CREDITS: i64 = 1;
pub const MAX_CREDITS: i64 = 6;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: String,
    pub code: String,
    pub title: String,
    pub instructor: String,
    pub schedule: String,
    pub credits: i64,
    pub seats: i64,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewCourseRequest {
    pub code: Option<String>,
    pub title: Option<String>,
    pub instructor: Option<String>,
    pub schedule: Option<String>,
    pub credits: Option<i64>,
    pub seats: Option<i64>,
}

/// A course payload with every field present and in range.
#[derive(Debug, Clone)]
pub struct NewCourse {
    pub code: String,
    pub title: String,
    pub instructor: String,
    pub schedule: String,
    pub credits: i64,
    pub seats: i64,
}

impl NewCourseRequest {
    pub fn validate(self) -> Result<NewCourse, AppError> {
        let (Some(code), Some(title), Some(instructor), Some(schedule), Some(credits), Some(seats)) = (
            required(self.code),
            required(self.title),
            required(self.instructor),
            required(self.schedule),
            self.credits,
            self.seats,
        ) else {
            return Err(AppError::validation(ALL_FIELDS_REQUIRED));
        };

        if !(MIN_CREDITS..=MAX_CREDITS).contains(&credits) {
            return Err(AppError::validation(format!(
                "Credits must be between {} and {}",
                MIN_CREDITS, MAX_CREDITS
            )));
        }
        if seats < 0 {
            return Err(AppError::validation("Seats cannot be negative"));
        }

        Ok(NewCourse {
            code: code.to_uppercase(),
            title,
            instructor,
            schedule,
            credits,
            seats,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseCreated {
    pub message: String,
    pub course: Course,
}
