use crate::{
    codeforces::{client::CodeforcesApi, model::Submission},
    error::{DashboardError, Result},
    progress,
    stats::Statistics,
    store::{User, UserStore},
    suggest::{self, Suggestions},
};
use chrono::{FixedOffset, NaiveDate, Offset, Utc};
use rand::Rng;
use serde::Serialize;
use std::sync::Arc;
use tokio::time::Instant;

/// Submissions looked at when searching for new failures.
pub const RECENT_SUBMISSION_COUNT: u32 = 20;
/// Submissions looked at when seeding suggestions.
pub const SUGGESTION_SUBMISSION_COUNT: u32 = 100;

#[derive(Debug, Serialize)]
pub struct StatsReport {
    pub handle: String,
    #[serde(flatten)]
    pub statistics: Statistics,
}

pub async fn compute_stats(
    api: &dyn CodeforcesApi,
    handle: &str,
    today: NaiveDate,
    offset: &FixedOffset,
) -> Result<StatsReport> {
    let start_process = Instant::now();

    let (submissions, rating_changes) =
        tokio::try_join!(api.user_status(handle, None, None), api.user_rating(handle)).map_err(
            |e| {
                tracing::error!("failed to fetch history of {}: {:?}", handle, e);
                e
            },
        )?;

    let statistics = Statistics::compute(&submissions, &rating_changes, today, offset);

    tracing::info!(
        "stats of {} computed from {} submissions and {} rating changes in {}ms",
        handle,
        submissions.len(),
        rating_changes.len(),
        start_process.elapsed().as_millis()
    );

    Ok(StatsReport {
        handle: handle.to_string(),
        statistics,
    })
}

pub async fn compute_suggestions<R>(
    api: &dyn CodeforcesApi,
    handle: &str,
    rng: &mut R,
) -> Result<Suggestions>
where
    R: Rng + Send + ?Sized,
{
    let start_process = Instant::now();

    let submissions = api
        .user_status(handle, Some(1), Some(SUGGESTION_SUBMISSION_COUNT))
        .await
        .map_err(|e| {
            tracing::error!("failed to fetch submissions of {}: {:?}", handle, e);
            e
        })?;

    // Without a failure there is nothing to seed from, so skip the catalog download.
    if submissions.iter().all(Submission::is_accepted) {
        tracing::info!("no failed submissions of {} found", handle);
        return Ok(Suggestions::NoFailures);
    }

    let problem_set = api.problemset_problems().await.map_err(|e| {
        tracing::error!("failed to fetch problem set: {:?}", e);
        e
    })?;

    let suggestions = suggest::suggest(&submissions, &problem_set.problems, rng);

    if let Suggestions::Suggested(list) = &suggestions {
        tracing::info!(
            "{} suggestions for {} generated in {}ms",
            list.len(),
            handle,
            start_process.elapsed().as_millis()
        );
    }

    Ok(suggestions)
}

pub async fn recent_submissions(
    api: &dyn CodeforcesApi,
    handle: &str,
    count: u32,
) -> Result<Vec<Submission>> {
    let submissions = api
        .user_status(handle, Some(1), Some(count))
        .await
        .map_err(|e| {
            tracing::error!("failed to fetch submissions of {}: {:?}", handle, e);
            e
        })?;

    Ok(submissions)
}

pub async fn new_failures(
    api: &dyn CodeforcesApi,
    handle: &str,
    watermark: i64,
) -> Result<Vec<Submission>> {
    let submissions = recent_submissions(api, handle, RECENT_SUBMISSION_COUNT).await?;

    Ok(progress::new_failures(&submissions, watermark))
}

fn handle_of(user: &User) -> Result<String> {
    match &user.handle {
        Some(handle) if !handle.trim().is_empty() => Ok(handle.clone()),
        _ => {
            tracing::warn!("user {} has no Codeforces handle", user.user_name);
            Err(DashboardError::MissingHandle(user.user_name.clone()))
        }
    }
}

/// Entry point of the HTTP layer: resolves user records and runs the reports on their handles.
pub struct Dashboard {
    api: Arc<dyn CodeforcesApi>,
    store: Arc<dyn UserStore>,
    offset: FixedOffset,
}

impl Dashboard {
    pub fn new(api: Arc<dyn CodeforcesApi>, store: Arc<dyn UserStore>) -> Self {
        Self {
            api,
            store,
            offset: Utc.fix(),
        }
    }

    /// Sets the UTC offset that delimits calendar days in statistics.
    pub fn with_offset(mut self, offset: FixedOffset) -> Self {
        self.offset = offset;
        self
    }

    pub async fn ping(&self) -> Result<()> {
        self.store.ping().await?;
        Ok(())
    }

    pub async fn profile(&self, user_name: &str) -> Result<User> {
        self.store
            .find_user(user_name)
            .await?
            .ok_or_else(|| DashboardError::UserNotFound(user_name.to_string()))
    }

    async fn handle(&self, user_name: &str) -> Result<String> {
        let user = self.profile(user_name).await?;
        handle_of(&user)
    }

    pub async fn stats(&self, user_name: &str) -> Result<StatsReport> {
        let handle = self.handle(user_name).await?;
        let today = Utc::now().with_timezone(&self.offset).date_naive();

        compute_stats(self.api.as_ref(), &handle, today, &self.offset).await
    }

    pub async fn suggestions<R>(&self, user_name: &str, rng: &mut R) -> Result<Suggestions>
    where
        R: Rng + Send + ?Sized,
    {
        let handle = self.handle(user_name).await?;

        compute_suggestions(self.api.as_ref(), &handle, rng).await
    }

    pub async fn recent_submissions(&self, user_name: &str, count: u32) -> Result<Vec<Submission>> {
        let handle = self.handle(user_name).await?;

        recent_submissions(self.api.as_ref(), &handle, count).await
    }

    pub async fn new_failed_submissions(&self, user_name: &str) -> Result<Vec<Submission>> {
        let user = self.profile(user_name).await?;
        let handle = handle_of(&user)?;

        new_failures(
            self.api.as_ref(),
            &handle,
            user.last_checked_submission_id,
        )
        .await
    }

    pub async fn set_watermark(&self, user_name: &str, value: Option<i64>) -> Result<i64> {
        let submission_id = progress::validate_watermark(value)?;

        if !self
            .store
            .update_last_checked(user_name, submission_id)
            .await?
        {
            return Err(DashboardError::UserNotFound(user_name.to_string()));
        }
        tracing::info!(
            "last checked submission of {} moved to {}",
            user_name,
            submission_id
        );

        Ok(submission_id)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        codeforces::{
            client::CodeforcesError,
            model::{Problem, ProblemSet, RatingChange, Verdict},
        },
        store::NewUser,
    };
    use async_trait::async_trait;
    use chrono::{DateTime, TimeZone};
    use rand::{rngs::StdRng, SeedableRng};
    use std::{collections::HashMap, sync::Mutex};

    fn problem(contest_id: i64, index: &str, rating: i32, tags: &[&str]) -> Problem {
        Problem {
            contest_id: Some(contest_id),
            index: index.to_string(),
            name: format!("Problem {}{}", contest_id, index),
            rating: Some(rating),
            tags: tags.iter().map(|tag| tag.to_string()).collect(),
        }
    }

    fn submission(id: i64, problem: Problem, verdict: Verdict) -> Submission {
        Submission {
            id,
            contest_id: problem.contest_id,
            creation_time: Utc.timestamp_opt(1_700_000_000 + id, 0).unwrap(),
            problem,
            programming_language: String::from("GNU C++17"),
            verdict,
        }
    }

    #[derive(Default)]
    struct FakeApi {
        submissions: Vec<Submission>,
        rating_changes: Vec<RatingChange>,
        problems: Vec<Problem>,
        unavailable: bool,
        calls: Mutex<Vec<String>>,
    }

    impl FakeApi {
        fn record(&self, call: &str) -> std::result::Result<(), CodeforcesError> {
            self.calls.lock().unwrap().push(call.to_string());
            if self.unavailable {
                Err(CodeforcesError::UnexpectedError(String::from(
                    "unexpected error [503 Service Unavailable] cause []",
                )))
            } else {
                Ok(())
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CodeforcesApi for FakeApi {
        async fn user_status(
            &self,
            _handle: &str,
            _from: Option<u32>,
            count: Option<u32>,
        ) -> std::result::Result<Vec<Submission>, CodeforcesError> {
            self.record("user.status")?;
            let count = count.map_or(self.submissions.len(), |count| count as usize);
            Ok(self.submissions.iter().take(count).cloned().collect())
        }

        async fn user_rating(
            &self,
            _handle: &str,
        ) -> std::result::Result<Vec<RatingChange>, CodeforcesError> {
            self.record("user.rating")?;
            Ok(self.rating_changes.clone())
        }

        async fn problemset_problems(&self) -> std::result::Result<ProblemSet, CodeforcesError> {
            self.record("problemset.problems")?;
            Ok(ProblemSet {
                problems: self.problems.clone(),
                problem_statistics: vec![],
            })
        }
    }

    #[derive(Default)]
    struct MemoryStore {
        users: Mutex<HashMap<String, User>>,
    }

    impl MemoryStore {
        fn with_user(user_name: &str, handle: Option<&str>) -> Self {
            let store = Self::default();
            let now: DateTime<Utc> = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
            store.users.lock().unwrap().insert(
                user_name.to_string(),
                User {
                    user_name: user_name.to_string(),
                    password_hash: None,
                    handle: handle.map(String::from),
                    notify_by_email: true,
                    last_checked_submission_id: 0,
                    created_at: now,
                    updated_at: now,
                },
            );
            store
        }
    }

    #[async_trait]
    impl UserStore for MemoryStore {
        async fn ping(&self) -> std::result::Result<(), sqlx::Error> {
            Ok(())
        }

        async fn find_user(&self, user_name: &str) -> std::result::Result<Option<User>, sqlx::Error> {
            Ok(self.users.lock().unwrap().get(user_name).cloned())
        }

        async fn save_user(&self, user: &NewUser) -> std::result::Result<(), sqlx::Error> {
            let mut users = self.users.lock().unwrap();
            if let Some(existing) = users.get_mut(&user.user_name) {
                existing.handle = Some(user.handle.clone());
                existing.notify_by_email = user.notify_by_email;
            }
            Ok(())
        }

        async fn update_last_checked(
            &self,
            user_name: &str,
            submission_id: i64,
        ) -> std::result::Result<bool, sqlx::Error> {
            let mut users = self.users.lock().unwrap();
            match users.get_mut(user_name) {
                Some(user) => {
                    user.last_checked_submission_id = submission_id;
                    Ok(true)
                }
                None => Ok(false),
            }
        }
    }

    fn dashboard(api: Arc<FakeApi>, store: MemoryStore) -> Dashboard {
        Dashboard::new(api, Arc::new(store))
    }

    #[tokio::test]
    async fn missing_handle_short_circuits_before_fetching() {
        let api = Arc::new(FakeApi::default());
        let dashboard = dashboard(api.clone(), MemoryStore::with_user("alice", None));

        let stats = dashboard.stats("alice").await;
        let suggestions = dashboard
            .suggestions("alice", &mut StdRng::seed_from_u64(1))
            .await;

        assert!(matches!(stats, Err(DashboardError::MissingHandle(_))));
        assert!(matches!(suggestions, Err(DashboardError::MissingHandle(_))));
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn empty_handle_is_missing() {
        let api = Arc::new(FakeApi::default());
        let dashboard = dashboard(api.clone(), MemoryStore::with_user("alice", Some("  ")));

        let result = dashboard.new_failed_submissions("alice").await;

        assert!(matches!(result, Err(DashboardError::MissingHandle(_))));
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn unknown_user_is_not_found() {
        let api = Arc::new(FakeApi::default());
        let dashboard = dashboard(api, MemoryStore::default());

        assert!(matches!(
            dashboard.profile("nobody").await,
            Err(DashboardError::UserNotFound(_))
        ));
        assert!(matches!(
            dashboard.set_watermark("nobody", Some(10)).await,
            Err(DashboardError::UserNotFound(_))
        ));
    }

    #[tokio::test]
    async fn upstream_failure_fails_whole_stats() {
        let api = Arc::new(FakeApi {
            unavailable: true,
            ..Default::default()
        });
        let dashboard = dashboard(api, MemoryStore::with_user("alice", Some("tourist")));

        let result = dashboard.stats("alice").await;

        assert!(matches!(result, Err(DashboardError::UpstreamUnavailable(_))));
    }

    #[tokio::test]
    async fn stats_report_carries_handle() {
        let api = Arc::new(FakeApi {
            submissions: vec![
                submission(2, problem(1000, "A", 800, &["math"]), Verdict::Ok),
                submission(1, problem(1000, "A", 800, &["math"]), Verdict::WrongAnswer),
            ],
            ..Default::default()
        });
        let dashboard = dashboard(api.clone(), MemoryStore::with_user("alice", Some("tourist")));

        let report = dashboard.stats("alice").await.unwrap();

        assert_eq!(report.handle, "tourist");
        assert_eq!(report.statistics.total_solved, 1);
        assert_eq!(report.statistics.accuracy, 50);
        let mut calls = api.calls();
        calls.sort();
        assert_eq!(calls, vec!["user.rating", "user.status"]);
    }

    #[tokio::test]
    async fn no_failures_skips_catalog_download() {
        let api = Arc::new(FakeApi {
            submissions: vec![submission(1, problem(1000, "A", 800, &["math"]), Verdict::Ok)],
            problems: vec![problem(1001, "A", 800, &["math"])],
            ..Default::default()
        });
        let dashboard = dashboard(api.clone(), MemoryStore::with_user("alice", Some("tourist")));

        let result = dashboard
            .suggestions("alice", &mut StdRng::seed_from_u64(1))
            .await
            .unwrap();

        assert_eq!(result, Suggestions::NoFailures);
        assert_eq!(api.calls(), vec!["user.status"]);
    }

    #[tokio::test]
    async fn suggestions_from_catalog() {
        let api = Arc::new(FakeApi {
            submissions: vec![
                submission(3, problem(1000, "A", 1200, &["dp"]), Verdict::WrongAnswer),
                submission(2, problem(1000, "B", 1100, &["dp"]), Verdict::Ok),
            ],
            problems: vec![
                problem(1000, "C", 1300, &["dp"]),
                problem(1000, "B", 1100, &["dp"]),
            ],
            ..Default::default()
        });
        let dashboard = dashboard(api, MemoryStore::with_user("alice", Some("tourist")));

        let result = dashboard
            .suggestions("alice", &mut StdRng::seed_from_u64(1))
            .await
            .unwrap();

        match result {
            Suggestions::Suggested(list) => {
                assert_eq!(list.len(), 1);
                assert_eq!(list[0].index, "C");
            }
            Suggestions::NoFailures => panic!("expected suggestions"),
        }
    }

    #[tokio::test]
    async fn watermark_round_trip() {
        let api = Arc::new(FakeApi {
            submissions: (38..=46)
                .rev()
                .map(|id| submission(id, problem(1000, "A", 800, &[]), Verdict::WrongAnswer))
                .collect(),
            ..Default::default()
        });
        let dashboard = dashboard(api, MemoryStore::with_user("alice", Some("tourist")));

        assert_eq!(dashboard.set_watermark("alice", Some(42)).await.unwrap(), 42);
        let failures = dashboard.new_failed_submissions("alice").await.unwrap();

        let ids: Vec<i64> = failures.iter().map(|submission| submission.id).collect();
        assert_eq!(ids, vec![46, 45, 44, 43]);
        assert_eq!(
            dashboard.profile("alice").await.unwrap().last_checked_submission_id,
            42
        );
    }

    #[tokio::test]
    async fn invalid_watermark_keeps_previous_value() {
        let api = Arc::new(FakeApi::default());
        let dashboard = dashboard(api, MemoryStore::with_user("alice", Some("tourist")));
        dashboard.set_watermark("alice", Some(7)).await.unwrap();

        let result = dashboard.set_watermark("alice", None).await;

        assert!(matches!(result, Err(DashboardError::ValidationError(_))));
        assert_eq!(
            dashboard.profile("alice").await.unwrap().last_checked_submission_id,
            7
        );
    }
}
