// ============================
// crates/backend-lib/src/handlers/activities.rs
// ============================
//! HTTP handlers for the activity directory.
use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use mergington_common::{MessageResponse, SignupQuery};
use metrics::counter;
use tracing::{info, instrument};

use crate::directory::{Confirmation, DirectoryError, DirectorySnapshot};
use crate::error::AppError;
use crate::metrics::{
    ACTIVITIES_LISTED, SIGNUP_ACCEPTED, SIGNUP_REJECTED, UNREGISTER_ACCEPTED,
    UNREGISTER_REJECTED,
};
use crate::validation::validate_email;
use crate::AppState;

/// Where `GET /` sends browsers
pub const INDEX_PATH: &str = "/static/index.html";

/// `GET /`: 302 to the front-end
pub async fn root() -> impl IntoResponse {
    (StatusCode::FOUND, [(header::LOCATION, INDEX_PATH)])
}

/// `GET /activities`
pub async fn list_activities(State(state): State<Arc<AppState>>) -> Json<DirectorySnapshot> {
    counter!(ACTIVITIES_LISTED).increment(1);
    Json(state.directory.list())
}

/// `POST /activities/{activity_name}/signup?email=...`
#[instrument(skip(state, query))]
pub async fn signup(
    State(state): State<Arc<AppState>>,
    Path(activity_name): Path<String>,
    query: Result<Query<SignupQuery>, QueryRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let email = match checked_email(&state, &activity_name, query) {
        Ok(email) => email,
        Err(e) => {
            counter!(SIGNUP_REJECTED, "reason" => rejection_reason(&e)).increment(1);
            return Err(e);
        },
    };

    let result = state.directory.signup(&activity_name, &email);
    respond(result, SIGNUP_ACCEPTED, SIGNUP_REJECTED)
}

/// `DELETE /activities/{activity_name}/signup?email=...`
#[instrument(skip(state, query))]
pub async fn unregister(
    State(state): State<Arc<AppState>>,
    Path(activity_name): Path<String>,
    query: Result<Query<SignupQuery>, QueryRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let email = match checked_email(&state, &activity_name, query) {
        Ok(email) => email,
        Err(e) => {
            counter!(UNREGISTER_REJECTED, "reason" => rejection_reason(&e)).increment(1);
            return Err(e);
        },
    };

    let result = state.directory.unregister(&activity_name, &email);
    respond(result, UNREGISTER_ACCEPTED, UNREGISTER_REJECTED)
}

/// Resolve the activity, then pull the email out of the query string.
///
/// An unknown activity is reported as not found whatever the email is.
fn checked_email(
    state: &AppState,
    activity_name: &str,
    query: Result<Query<SignupQuery>, QueryRejection>,
) -> Result<String, AppError> {
    if !state.directory.contains(activity_name) {
        return Err(DirectoryError::NotFound(activity_name.to_string()).into());
    }

    let Query(SignupQuery { email }) =
        query.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;

    validate_email(&email)?;
    Ok(email)
}

fn rejection_reason(err: &AppError) -> &'static str {
    match err {
        AppError::Directory(e) => e.kind(),
        _ => "invalid_request",
    }
}

fn respond(
    result: Result<Confirmation, DirectoryError>,
    accepted: &'static str,
    rejected: &'static str,
) -> Result<Json<MessageResponse>, AppError> {
    match result {
        Ok(confirmation) => {
            counter!(accepted).increment(1);
            info!(%confirmation, "roster updated");
            Ok(Json(MessageResponse {
                message: confirmation.to_string(),
            }))
        },
        Err(e) => {
            counter!(rejected, "reason" => e.kind()).increment(1);
            Err(e.into())
        },
    }
}
