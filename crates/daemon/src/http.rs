use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Json, Router,
};
use feedback_core::{
    api::{CheckResponse, ErrorsResponse, UnavailableResponse},
    FeedbackService, FeedbackSubmission, FieldErrors, RawFeedback, StoreError, SubmitError,
};
use serde_json::Value;
use tokio::task::JoinError;
use tower_http::trace::TraceLayer;

use crate::pages;

#[derive(Clone)]
pub struct AppState {
    svc: Arc<FeedbackService>,
}

impl AppState {
    pub fn new(svc: Arc<FeedbackService>) -> Self {
        Self { svc }
    }

    /// Runs `f` on the blocking pool. Store calls do file I/O and take a
    /// std mutex, so they stay off the async workers.
    async fn blocking<T, F>(&self, f: F) -> Result<T, JoinError>
    where
        F: FnOnce(&FeedbackService) -> T + Send + 'static,
        T: Send + 'static,
    {
        let svc = Arc::clone(&self.svc);
        tokio::task::spawn_blocking(move || f(&svc)).await
    }
}

pub fn router(svc: Arc<FeedbackService>) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/feedback", get(feedback_form).post(submit_form))
        .route("/healthz", get(healthz))
        .route("/v1/feedback", get(list_feedback).post(submit_feedback))
        .route("/v1/feedback/validate", post(check_feedback))
        .layer(TraceLayer::new_for_http())
        .with_state(AppState::new(svc))
}

async fn healthz() -> &'static str {
    "ok"
}

/// Home page: link to the form and every stored submission.
pub async fn home(State(st): State<AppState>) -> Response {
    match st.blocking(|svc| svc.list_all()).await {
        Ok(Ok(list)) => page(StatusCode::OK, pages::home(&list)),
        Ok(Err(e)) => unavailable_page(e),
        Err(e) => internal_error(e),
    }
}

pub async fn feedback_form() -> Response {
    page(
        StatusCode::OK,
        pages::feedback_form(&RawFeedback::default(), &FieldErrors::new()),
    )
}

/// Form post. Success redirects home; a rejection re-renders the form.
pub async fn submit_form(State(st): State<AppState>, Form(raw): Form<RawFeedback>) -> Response {
    let posted = raw.clone();
    match st.blocking(move |svc| svc.submit(&posted)).await {
        Ok(Ok(_)) => Redirect::to("/").into_response(),
        Ok(Err(SubmitError::Rejected(errors))) => page(
            StatusCode::UNPROCESSABLE_ENTITY,
            pages::feedback_form(&raw, &errors),
        ),
        Ok(Err(SubmitError::Store(e))) => unavailable_page(e),
        Err(e) => internal_error(e),
    }
}

pub async fn list_feedback(
    State(st): State<AppState>,
) -> Result<Json<Vec<FeedbackSubmission>>, ApiError> {
    Ok(Json(st.blocking(|svc| svc.list_all()).await??))
}

/// JSON submit. Field values of the wrong JSON type are reported per field
/// alongside rule failures.
pub async fn submit_feedback(
    State(st): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<FeedbackSubmission>), ApiError> {
    let Json(body) = payload?;
    let record = st.blocking(move |svc| svc.submit_json(&body)).await??;
    Ok((StatusCode::CREATED, Json(record)))
}

/// Immediate feedback for a half-filled form. Never persists.
pub async fn check_feedback(
    State(st): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<CheckResponse>, ApiError> {
    let Json(body) = payload?;
    let errors = st.svc.check_json(&body);
    Ok(Json(CheckResponse {
        ok: errors.is_empty(),
        errors,
    }))
}

fn page(status: StatusCode, rendered: askama::Result<String>) -> Response {
    match rendered {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "failed to render page");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

fn unavailable_page(e: StoreError) -> Response {
    tracing::error!(error = %e, "submission store unavailable");
    page(StatusCode::SERVICE_UNAVAILABLE, pages::unavailable())
}

fn internal_error(e: JoinError) -> Response {
    tracing::error!(error = %e, "store task failed");
    StatusCode::INTERNAL_SERVER_ERROR.into_response()
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("validation failed: {0}")]
    Rejected(FieldErrors),
    #[error("store unavailable: {0}")]
    Unavailable(#[from] StoreError),
    #[error("bad request body: {0}")]
    BadBody(#[from] JsonRejection),
    #[error("store task failed: {0}")]
    Internal(#[from] JoinError),
}

impl From<SubmitError> for ApiError {
    fn from(value: SubmitError) -> Self {
        match value {
            SubmitError::Rejected(errors) => Self::Rejected(errors),
            SubmitError::Store(e) => Self::Unavailable(e),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Rejected(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ErrorsResponse { errors }),
            )
                .into_response(),
            ApiError::Unavailable(e) => {
                tracing::error!(error = %e, "request failed");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    Json(UnavailableResponse {
                        error: e.to_string(),
                    }),
                )
                    .into_response()
            }
            // Malformed JSON is 400, a missing JSON content type 415.
            ApiError::BadBody(rejection) => (
                rejection.status(),
                Json(UnavailableResponse {
                    error: rejection.body_text(),
                }),
            )
                .into_response(),
            ApiError::Internal(e) => {
                tracing::error!(error = %e, "request failed");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}
