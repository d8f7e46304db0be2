pub mod stats;
pub mod user;

use crate::modules::models::response::MessageResponse;
use axum::{extract::Extension, http::StatusCode, Json};
use smartcp_libs::{Dashboard, DashboardError};
use std::sync::Arc;

pub type ErrorResponse = (StatusCode, Json<MessageResponse>);

pub fn error_response(e: DashboardError) -> ErrorResponse {
    let status = match &e {
        DashboardError::UserNotFound(_) => StatusCode::NOT_FOUND,
        DashboardError::MissingHandle(_) | DashboardError::ValidationError(_) => {
            StatusCode::BAD_REQUEST
        }
        DashboardError::UpstreamUnavailable(_) => StatusCode::BAD_GATEWAY,
        DashboardError::StoreError(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    if status.is_server_error() {
        tracing::error!("request failed cause: {:?}", e);
    } else {
        tracing::warn!("request rejected: {}", e);
    }

    (status, Json(MessageResponse::new(e)))
}

pub async fn welcome() -> &'static str {
    "Welcome to SmartCp API!"
}

pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

pub async fn readiness(Extension(dashboard): Extension<Arc<Dashboard>>) -> StatusCode {
    match dashboard.ping().await {
        Ok(_) => StatusCode::OK,
        Err(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use smartcp_libs::codeforces::client::CodeforcesError;

    #[test]
    fn test_error_status_mapping() {
        let cases = vec![
            (
                DashboardError::UserNotFound(String::from("alice")),
                StatusCode::NOT_FOUND,
            ),
            (
                DashboardError::MissingHandle(String::from("alice")),
                StatusCode::BAD_REQUEST,
            ),
            (
                DashboardError::ValidationError(String::from("bad")),
                StatusCode::BAD_REQUEST,
            ),
            (
                DashboardError::UpstreamUnavailable(CodeforcesError::FailedError(String::from(
                    "handle: User with handle nobody not found",
                ))),
                StatusCode::BAD_GATEWAY,
            ),
            (
                DashboardError::StoreError(sqlx::Error::PoolTimedOut),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected) in cases {
            let (status, _) = error_response(error);
            assert_eq!(status, expected);
        }
    }

    #[test]
    fn test_error_message_hides_upstream_details() {
        let (_, Json(body)) = error_response(DashboardError::UpstreamUnavailable(
            CodeforcesError::UnexpectedError(String::from("connection reset")),
        ));

        assert_eq!(body.message, "failed to fetch data from Codeforces");
    }
}
