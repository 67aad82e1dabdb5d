use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;

use crate::state::AppState;
use facesort_service::{
    AddGalleryImageRequest, AddGalleryImageResponse, EnrollStudentRequest, EnrollStudentResponse,
    Error as ServiceError, FindMatchesRequest, FindMatchesResponse,
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/v1/sorting/find", post(find_matches))
        .route("/v1/students/enroll", post(enroll_student))
        .route("/v1/gallery/images", post(add_gallery_image))
        .with_state(state)
}

async fn health() -> StatusCode {
    StatusCode::OK
}

async fn find_matches(
    State(state): State<AppState>,
    Json(payload): Json<FindMatchesRequest>,
) -> Result<Json<FindMatchesResponse>, ApiError> {
    let response = state.service.find_matches(payload).await?;
    Ok(Json(response))
}

async fn enroll_student(
    State(state): State<AppState>,
    Json(payload): Json<EnrollStudentRequest>,
) -> Result<Json<EnrollStudentResponse>, ApiError> {
    let response = state.service.enroll_student(payload).await?;
    Ok(Json(response))
}

async fn add_gallery_image(
    State(state): State<AppState>,
    Json(payload): Json<AddGalleryImageRequest>,
) -> Result<Json<AddGalleryImageResponse>, ApiError> {
    let response = state.service.add_gallery_image(payload).await?;
    Ok(Json(response))
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error_code: String,
    message: String,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    error_code: String,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, error_code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            error_code: error_code.into(),
            message: message.into(),
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::NotFound { message } => {
                ApiError::new(StatusCode::NOT_FOUND, "not_found", message)
            }
            ServiceError::InvalidState { message } => {
                ApiError::new(StatusCode::BAD_REQUEST, "invalid_state", message)
            }
            ServiceError::InvalidRequest { message } => {
                ApiError::new(StatusCode::UNPROCESSABLE_ENTITY, "invalid_request", message)
            }
            ServiceError::Provider { message } => {
                ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "provider_error", message)
            }
            ServiceError::Storage { message } => {
                ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "storage_error", message)
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error_code: self.error_code,
            message: self.message,
        };
        (self.status, Json(body)).into_response()
    }
}
