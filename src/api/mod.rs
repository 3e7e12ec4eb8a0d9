mod accounts;
mod courses;
mod registrations;

use axum::extract::FromRequest;
use axum::routing::post;
use axum::{Router, extract::State, http::StatusCode, routing::get};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::error::AppError;
use crate::state::AppState;

/// JSON body extractor whose rejections surface as `{ "message": ... }`.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/register", post(accounts::register))
        .route("/login", post(accounts::login))
        .route("/dashboard/{student_id}", get(registrations::dashboard))
        .route("/add-course", post(courses::add_course))
        .route("/courses", get(courses::list_courses))
        .route("/register-course", post(registrations::register_course))
        .route("/my-courses/{student_id}", get(registrations::my_courses))
        .route("/enter-marks", post(registrations::enter_marks));

    Router::new()
        .route("/health", get(health))
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    sqlx::query("select 1").execute(&state.db).await?;
    Ok(StatusCode::OK)
}
