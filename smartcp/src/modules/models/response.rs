use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl ToString) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct WatermarkResponse {
    pub message: String,
    pub user: WatermarkUser,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct WatermarkUser {
    #[serde(rename = "lastCheckedSubmissionID")]
    pub last_checked_submission_id: i64,
}

impl WatermarkResponse {
    pub fn new(last_checked_submission_id: i64) -> Self {
        Self {
            message: String::from("Last checked submission ID updated successfully"),
            user: WatermarkUser {
                last_checked_submission_id,
            },
        }
    }
}
