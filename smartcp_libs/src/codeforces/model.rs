use chrono::{serde::ts_seconds, DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub enum ResponseStatus {
    #[serde(rename = "OK")]
    Ok,
    #[serde(rename = "FAILED")]
    Failed,
}

/// Envelope wrapping every Codeforces API response.
#[derive(Serialize, Deserialize, Debug)]
pub struct CodeforcesResponse<T> {
    pub status: ResponseStatus,
    pub comment: Option<String>,
    pub result: Option<T>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProblemKey {
    pub contest_id: Option<i64>,
    pub index: String,
}

impl fmt::Display for ProblemKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.contest_id {
            Some(contest_id) => write!(f, "{}{}", contest_id, self.index),
            None => write!(f, "{}", self.index),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Problem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contest_id: Option<i64>,
    pub index: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<i32>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Problem {
    pub fn key(&self) -> ProblemKey {
        ProblemKey {
            contest_id: self.contest_id,
            index: self.index.clone(),
        }
    }
}

/// Judge outcome of a submission.
///
/// Names that are not known here are kept verbatim in `Other` so that they show up
/// unchanged in the verdict histogram.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(from = "String", into = "String")]
pub enum Verdict {
    Ok,
    Failed,
    Partial,
    CompilationError,
    RuntimeError,
    WrongAnswer,
    PresentationError,
    TimeLimitExceeded,
    MemoryLimitExceeded,
    IdlenessLimitExceeded,
    SecurityViolated,
    Crashed,
    InputPreparationCrashed,
    Challenged,
    Skipped,
    Testing,
    Rejected,
    Other(String),
}

impl Verdict {
    pub fn as_str(&self) -> &str {
        match self {
            Verdict::Ok => "OK",
            Verdict::Failed => "FAILED",
            Verdict::Partial => "PARTIAL",
            Verdict::CompilationError => "COMPILATION_ERROR",
            Verdict::RuntimeError => "RUNTIME_ERROR",
            Verdict::WrongAnswer => "WRONG_ANSWER",
            Verdict::PresentationError => "PRESENTATION_ERROR",
            Verdict::TimeLimitExceeded => "TIME_LIMIT_EXCEEDED",
            Verdict::MemoryLimitExceeded => "MEMORY_LIMIT_EXCEEDED",
            Verdict::IdlenessLimitExceeded => "IDLENESS_LIMIT_EXCEEDED",
            Verdict::SecurityViolated => "SECURITY_VIOLATED",
            Verdict::Crashed => "CRASHED",
            Verdict::InputPreparationCrashed => "INPUT_PREPARATION_CRASHED",
            Verdict::Challenged => "CHALLENGED",
            Verdict::Skipped => "SKIPPED",
            Verdict::Testing => "TESTING",
            Verdict::Rejected => "REJECTED",
            Verdict::Other(name) => name,
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, Verdict::Ok)
    }
}

// Submissions still waiting in the judge queue come without a verdict.
impl Default for Verdict {
    fn default() -> Self {
        Verdict::Testing
    }
}

impl From<String> for Verdict {
    fn from(value: String) -> Self {
        match value.as_str() {
            "OK" => Verdict::Ok,
            "FAILED" => Verdict::Failed,
            "PARTIAL" => Verdict::Partial,
            "COMPILATION_ERROR" => Verdict::CompilationError,
            "RUNTIME_ERROR" => Verdict::RuntimeError,
            "WRONG_ANSWER" => Verdict::WrongAnswer,
            "PRESENTATION_ERROR" => Verdict::PresentationError,
            "TIME_LIMIT_EXCEEDED" => Verdict::TimeLimitExceeded,
            "MEMORY_LIMIT_EXCEEDED" => Verdict::MemoryLimitExceeded,
            "IDLENESS_LIMIT_EXCEEDED" => Verdict::IdlenessLimitExceeded,
            "SECURITY_VIOLATED" => Verdict::SecurityViolated,
            "CRASHED" => Verdict::Crashed,
            "INPUT_PREPARATION_CRASHED" => Verdict::InputPreparationCrashed,
            "CHALLENGED" => Verdict::Challenged,
            "SKIPPED" => Verdict::Skipped,
            "TESTING" => Verdict::Testing,
            "REJECTED" => Verdict::Rejected,
            _ => Verdict::Other(value),
        }
    }
}

impl From<Verdict> for String {
    fn from(value: Verdict) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contest_id: Option<i64>,
    #[serde(rename = "creationTimeSeconds", with = "ts_seconds")]
    pub creation_time: DateTime<Utc>,
    pub problem: Problem,
    #[serde(default)]
    pub programming_language: String,
    #[serde(default)]
    pub verdict: Verdict,
}

impl Submission {
    pub fn is_accepted(&self) -> bool {
        self.verdict.is_accepted()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RatingChange {
    pub contest_id: i64,
    pub contest_name: String,
    pub handle: String,
    pub rank: i64,
    #[serde(rename = "ratingUpdateTimeSeconds", with = "ts_seconds")]
    pub rating_update_time: DateTime<Utc>,
    pub old_rating: i32,
    pub new_rating: i32,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProblemStatistics {
    pub contest_id: Option<i64>,
    pub index: String,
    pub solved_count: i64,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ProblemSet {
    pub problems: Vec<Problem>,
    #[serde(default)]
    pub problem_statistics: Vec<ProblemStatistics>,
}
