use crate::modules::{
    handlers::{error_response, ErrorResponse},
    models::{
        request::{LastCheckedParameter, SubmissionsParameter, ValidatedQuery},
        response::{MessageResponse, WatermarkResponse},
    },
};
use axum::{
    extract::{rejection::JsonRejection, Extension, Path},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rand::{rngs::StdRng, SeedableRng};
use smartcp_libs::{
    codeforces::model::Submission, store::User, suggest::Suggestions, Dashboard,
};
use std::sync::Arc;

pub async fn profile(
    Path(user_name): Path<String>,
    Extension(dashboard): Extension<Arc<Dashboard>>,
) -> Result<(StatusCode, Json<User>), ErrorResponse> {
    let user = dashboard.profile(&user_name).await.map_err(error_response)?;

    Ok((StatusCode::OK, Json(user)))
}

pub async fn submissions(
    Path(user_name): Path<String>,
    ValidatedQuery(params): ValidatedQuery<SubmissionsParameter>,
    Extension(dashboard): Extension<Arc<Dashboard>>,
) -> Result<(StatusCode, Json<Vec<Submission>>), ErrorResponse> {
    let submissions = dashboard
        .recent_submissions(&user_name, params.count())
        .await
        .map_err(error_response)?;

    Ok((StatusCode::OK, Json(submissions)))
}

pub async fn new_failed_submissions(
    Path(user_name): Path<String>,
    Extension(dashboard): Extension<Arc<Dashboard>>,
) -> Result<(StatusCode, Json<Vec<Submission>>), ErrorResponse> {
    let failures = dashboard
        .new_failed_submissions(&user_name)
        .await
        .map_err(error_response)?;

    Ok((StatusCode::OK, Json(failures)))
}

pub async fn update_last_checked(
    Path(user_name): Path<String>,
    Extension(dashboard): Extension<Arc<Dashboard>>,
    body: Result<Json<LastCheckedParameter>, JsonRejection>,
) -> Result<(StatusCode, Json<WatermarkResponse>), ErrorResponse> {
    let Json(params) = body.map_err(|rejection| {
        tracing::error!("Parsing error: {}", rejection);
        (
            StatusCode::BAD_REQUEST,
            Json(MessageResponse::new(format!(
                "invalid request body: [{}]",
                rejection
            ))),
        )
    })?;

    let submission_id = dashboard
        .set_watermark(&user_name, params.last_checked_submission_id)
        .await
        .map_err(error_response)?;

    Ok((StatusCode::OK, Json(WatermarkResponse::new(submission_id))))
}

pub async fn suggestions(
    Path(user_name): Path<String>,
    Extension(dashboard): Extension<Arc<Dashboard>>,
) -> Response {
    let mut rng = StdRng::from_entropy();

    match dashboard.suggestions(&user_name, &mut rng).await {
        Ok(Suggestions::Suggested(list)) => (StatusCode::OK, Json(list)).into_response(),
        Ok(Suggestions::NoFailures) => (
            StatusCode::OK,
            Json(MessageResponse::new(
                "No failed submissions found to generate suggestions.",
            )),
        )
            .into_response(),
        Err(e) => error_response(e).into_response(),
    }
}
