use crate::modules::handlers::{error_response, ErrorResponse};
use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    Json,
};
use smartcp_libs::{dashboard::StatsReport, Dashboard};
use std::sync::Arc;

pub async fn stats(
    Path(user_name): Path<String>,
    Extension(dashboard): Extension<Arc<Dashboard>>,
) -> Result<(StatusCode, Json<StatsReport>), ErrorResponse> {
    let report = dashboard.stats(&user_name).await.map_err(error_response)?;

    Ok((StatusCode::OK, Json(report)))
}
