use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{ALL_FIELDS_REQUIRED, Course, required};
use crate::error::AppError;

pub const MIN_MARKS: f64 = 0.0;
pub const MAX_MARKS: f64 = 100.0;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterCourseRequest {
    pub student_id: Option<String>,
    pub course_id: Option<String>,
}

impl RegisterCourseRequest {
    pub fn validate(self) -> Result<(String, String), AppError> {
        match (required(self.student_id), required(self.course_id)) {
            (Some(student_id), Some(course_id)) => Ok((student_id, course_id)),
            _ => Err(AppError::validation(ALL_FIELDS_REQUIRED)),
        }
    }
}

/// Result of an enrollment attempt that reached the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrollmentOutcome {
    Registered,
    AlreadyRegistered,
    NoSeats,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnterMarksRequest {
    pub student_id: Option<String>,
    pub course_id: Option<String>,
    pub marks: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct MarksEntry {
    pub student_id: String,
    pub course_id: String,
    pub marks: f64,
}

impl EnterMarksRequest {
    pub fn validate(self) -> Result<MarksEntry, AppError> {
        let Some(marks) = self.marks else {
            return Err(AppError::validation(ALL_FIELDS_REQUIRED));
        };
        if !(MIN_MARKS..=MAX_MARKS).contains(&marks) {
            return Err(AppError::validation("Marks must be between 0 and 100"));
        }

        match (required(self.student_id), required(self.course_id)) {
            (Some(student_id), Some(course_id)) => Ok(MarksEntry {
                student_id,
                course_id,
                marks,
            }),
            _ => Err(AppError::validation(ALL_FIELDS_REQUIRED)),
        }
    }
}

/// Flat join of a registration with its course, as read from SQLite.
#[derive(Debug, Clone, FromRow)]
pub struct RegisteredCourseRow {
    pub id: String,
    pub student_id: String,
    pub marks: Option<f64>,
    pub created_at: String,
    pub updated_at: String,
    pub course_id: String,
    pub course_code: String,
    pub course_title: String,
    pub course_instructor: String,
    pub course_schedule: String,
    pub course_credits: i64,
    pub course_seats: i64,
    pub course_created_at: String,
    pub course_updated_at: String,
}

/// A registration with the referenced course embedded in place of its id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredCourse {
    pub id: String,
    pub student_id: String,
    #[serde(rename = "courseId")]
    pub course: Course,
    pub marks: Option<f64>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<RegisteredCourseRow> for RegisteredCourse {
    fn from(row: RegisteredCourseRow) -> Self {
        Self {
            id: row.id,
            student_id: row.student_id,
            course: Course {
                id: row.course_id,
                code: row.course_code,
                title: row.course_title,
                instructor: row.course_instructor,
                schedule: row.course_schedule,
                credits: row.course_credits,
                seats: row.course_seats,
                created_at: row.course_created_at,
                updated_at: row.course_updated_at,
            },
            marks: row.marks,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub registered_courses: i64,
    pub total_credits: i64,
    pub progress: String,
}

impl DashboardSummary {
    pub fn new(registered_courses: i64, total_credits: i64) -> Self {
        // Placeholder indicator: any registration counts as half way.
        let progress = if registered_courses > 0 { "50%" } else { "0%" };
        Self {
            registered_courses,
            total_credits,
            progress: progress.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marks(value: Option<f64>) -> EnterMarksRequest {
        EnterMarksRequest {
            student_id: Some("s1".to_string()),
            course_id: Some("c1".to_string()),
            marks: value,
        }
    }

    #[test]
    fn test_marks_range() {
        assert!(marks(Some(0.0)).validate().is_ok());
        assert!(marks(Some(100.0)).validate().is_ok());
        assert!(marks(Some(72.5)).validate().is_ok());

        let err = marks(Some(150.0)).validate().unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg == "Marks must be between 0 and 100"));
        assert!(marks(Some(-1.0)).validate().is_err());
    }

    #[test]
    fn test_marks_missing() {
        let err = marks(None).validate().unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg == ALL_FIELDS_REQUIRED));
    }

    #[test]
    fn test_dashboard_progress_placeholder() {
        assert_eq!(DashboardSummary::new(0, 0).progress, "0%");
        assert_eq!(DashboardSummary::new(2, 7).progress, "50%");
    }
}
