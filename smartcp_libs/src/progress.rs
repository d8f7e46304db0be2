use crate::{
    codeforces::model::Submission,
    error::{DashboardError, Result},
};

/// Failed submissions newer than the watermark, in the order given.
///
/// Reading never moves the watermark.
pub fn new_failures(submissions: &[Submission], watermark: i64) -> Vec<Submission> {
    submissions
        .iter()
        .filter(|submission| submission.id > watermark)
        .filter(|submission| !submission.is_accepted())
        .cloned()
        .collect()
}

/// Checks a requested watermark before it is persisted.
pub fn validate_watermark(value: Option<i64>) -> Result<i64> {
    match value {
        Some(id) if id > 0 => Ok(id),
        Some(id) => Err(DashboardError::ValidationError(format!(
            "last checked submission ID must be positive, got {}",
            id
        ))),
        None => Err(DashboardError::ValidationError(String::from(
            "last checked submission ID is required",
        ))),
    }
}
