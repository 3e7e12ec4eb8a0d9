pub mod course;
pub mod registration;
pub mod student;

pub use course::{Course, CourseCreated, NewCourse, NewCourseRequest};
pub use registration::{
    DashboardSummary, EnrollmentOutcome, EnterMarksRequest, MarksEntry, RegisterCourseRequest,
    RegisteredCourse,
};
pub use student::{LoginRequest, LoginResponse, MessageResponse, NewStudent, SignupRequest, Student};

/// Trims the field and treats an empty result as absent.
pub(crate) fn required(field: Option<String>) -> Option<String> {
    field
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

pub(crate) const ALL_FIELDS_REQUIRED: &str = "All fields required";
