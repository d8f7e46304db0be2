use crate::codeforces::model::*;
use async_trait::async_trait;
use reqwest::{self, Client, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tokio::time::Duration;

type Result<T> = std::result::Result<T, CodeforcesError>;

#[derive(Debug, Error)]
pub enum CodeforcesError {
    #[error("failed to request to Codeforces API")]
    RequestError(#[from] reqwest::Error),
    #[error("failed to deserialize JSON data")]
    DeserializeError(#[from] serde_json::Error),
    #[error("invalid Codeforces API url given")]
    InvalidUrlError(#[from] url::ParseError),
    #[error("Codeforces API returned FAILED: {0}")]
    FailedError(String),
    #[error("{0}")]
    UnexpectedError(String),
}

/// Read-only access to the Codeforces API methods this service relies on.
#[async_trait]
pub trait CodeforcesApi: Send + Sync {
    /// Submissions of `handle`, most recent first.
    ///
    /// `from` is 1-based. Omitting `count` returns the whole history.
    async fn user_status(
        &self,
        handle: &str,
        from: Option<u32>,
        count: Option<u32>,
    ) -> Result<Vec<Submission>>;
    async fn user_rating(&self, handle: &str) -> Result<Vec<RatingChange>>;
    async fn problemset_problems(&self) -> Result<ProblemSet>;
}

pub struct CodeforcesClient {
    status_url: Url,
    rating_url: Url,
    problemset_url: Url,
    client: Client,
}

impl CodeforcesClient {
    pub fn new(api_url: &str) -> Result<Self> {
        let mut base_url = Url::parse(api_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        let status_url = base_url.join("user.status")?;
        let rating_url = base_url.join("user.rating")?;
        let problemset_url = base_url.join("problemset.problems")?;

        let client = Client::builder()
            .gzip(true)
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(CodeforcesClient {
            status_url,
            rating_url,
            problemset_url,
            client,
        })
    }

    async fn get<T>(&self, url: &Url, params: &[(&str, String)]) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let res = self.client.get(url.clone()).query(params).send().await?;
        match res.error_for_status_ref() {
            Ok(_) => {
                let body: CodeforcesResponse<T> = res.json().await?;
                match (body.status, body.result) {
                    (ResponseStatus::Ok, Some(result)) => Ok(result),
                    (ResponseStatus::Ok, None) => Err(CodeforcesError::UnexpectedError(
                        format!("response from {} has no result", url),
                    )),
                    (ResponseStatus::Failed, _) => Err(CodeforcesError::FailedError(
                        body.comment.unwrap_or_default(),
                    )),
                }
            }
            Err(e) => {
                // Codeforces still answers with the JSON envelope on 4xx.
                let comment = res
                    .json::<CodeforcesResponse<Value>>()
                    .await
                    .ok()
                    .and_then(|body| body.comment)
                    .unwrap_or_default();
                Err(CodeforcesError::UnexpectedError(format!(
                    "unexpected error [{}] cause [{}]",
                    e, comment
                )))
            }
        }
    }
}

#[async_trait]
impl CodeforcesApi for CodeforcesClient {
    async fn user_status(
        &self,
        handle: &str,
        from: Option<u32>,
        count: Option<u32>,
    ) -> Result<Vec<Submission>> {
        let mut params = vec![("handle", handle.to_string())];
        if let Some(from) = from {
            params.push(("from", from.to_string()));
        }
        if let Some(count) = count {
            params.push(("count", count.to_string()));
        }

        self.get(&self.status_url, &params).await
    }

    async fn user_rating(&self, handle: &str) -> Result<Vec<RatingChange>> {
        self.get(&self.rating_url, &[("handle", handle.to_string())])
            .await
    }

    async fn problemset_problems(&self) -> Result<ProblemSet> {
        self.get(&self.problemset_url, &[]).await
    }
}
