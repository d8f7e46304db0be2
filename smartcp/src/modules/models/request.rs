use crate::modules::models::response::MessageResponse;
use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::StatusCode;
use axum::Json;
use http::request::Parts;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use smartcp_libs::dashboard::RECENT_SUBMISSION_COUNT;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate, PartialEq, Eq, Default)]
pub struct SubmissionsParameter {
    #[validate(range(min = 1, max = 100))]
    pub count: Option<u32>,
}

impl SubmissionsParameter {
    pub fn count(&self) -> u32 {
        self.count.unwrap_or(RECENT_SUBMISSION_COUNT)
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct LastCheckedParameter {
    #[serde(rename = "lastCheckedSubmissionID", default)]
    pub last_checked_submission_id: Option<i64>,
}

pub struct ValidatedQuery<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<MessageResponse>);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let query = parts.uri.query().unwrap_or_default();
        let value: T = serde_urlencoded::from_str(query).map_err(|rejection| {
            tracing::error!("Parsing error: {}", rejection);
            (
                StatusCode::BAD_REQUEST,
                Json(MessageResponse::new(format!(
                    "invalid format query string: [{}]",
                    rejection
                ))),
            )
        })?;

        value.validate().map_err(|rejection| {
            tracing::error!("Validation error: {}", rejection);
            (
                StatusCode::BAD_REQUEST,
                Json(MessageResponse::new(
                    format!("Validation error: [{}]", rejection).replace('\n', ", "),
                )),
            )
        })?;

        Ok(ValidatedQuery(value))
    }
}
