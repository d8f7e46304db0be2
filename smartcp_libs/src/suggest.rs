use crate::codeforces::{
    model::{Problem, ProblemKey, Submission},
    problem_url,
};
use itertools::Itertools;
use rand::{seq::SliceRandom, Rng};
use serde::{Serialize, Serializer};
use std::collections::HashSet;

/// Number of most recent failures used as seeds.
pub const MAX_FAILURES: usize = 5;
/// Upper bound of problems drawn for a single failure.
pub const SUGGESTIONS_PER_FAILURE: usize = 7;
/// Half width of the rating window around a failed problem.
pub const RATING_WINDOW: i32 = 200;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RatingLabel {
    Rated(i32),
    Unrated,
}

impl Serialize for RatingLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            RatingLabel::Rated(rating) => serializer.serialize_i32(*rating),
            RatingLabel::Unrated => serializer.serialize_str("Unrated"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub contest_id: i64,
    pub index: String,
    pub name: String,
    pub rating: RatingLabel,
    pub tags: Vec<String>,
    pub link: String,
}

impl Suggestion {
    pub fn key(&self) -> ProblemKey {
        ProblemKey {
            contest_id: Some(self.contest_id),
            index: self.index.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Suggestions {
    /// The analysed submissions contain no failure to start from.
    NoFailures,
    Suggested(Vec<Suggestion>),
}

/// Solved keys and capped recent failures gathered from one walk over the submissions.
#[derive(Debug, Default)]
pub struct Seeds<'a> {
    pub solved: HashSet<ProblemKey>,
    pub failures: Vec<&'a Submission>,
}

/// Walks the submissions in the given order, filling both accumulators at once.
///
/// The walk stops right after the [`MAX_FAILURES`]-th failure, so accepted submissions
/// older than that failure are not part of the solved set.
pub fn collect_seeds(submissions: &[Submission]) -> Seeds<'_> {
    let mut seeds = Seeds::default();

    for submission in submissions.iter() {
        if submission.is_accepted() {
            seeds.solved.insert(submission.problem.key());
        } else {
            seeds.failures.push(submission);
            if seeds.failures.len() >= MAX_FAILURES {
                break;
            }
        }
    }

    seeds
}

/// Catalog problems eligible as suggestions for a failure on a problem rated `rating`
/// with tags `tags`.
pub fn candidate_window<'a>(
    catalog: &'a [Problem],
    rating: i32,
    tags: &HashSet<&str>,
    solved: &HashSet<ProblemKey>,
    used: &HashSet<ProblemKey>,
) -> Vec<&'a Problem> {
    let range = (rating - RATING_WINDOW)..=(rating + RATING_WINDOW);

    catalog
        .iter()
        .filter(|problem| problem.contest_id.is_some())
        .filter(|problem| {
            problem
                .rating
                .map_or(false, |rating| range.contains(&rating))
        })
        .filter(|problem| problem.tags.iter().any(|tag| tags.contains(tag.as_str())))
        .filter(|problem| {
            let key = problem.key();
            !solved.contains(&key) && !used.contains(&key)
        })
        .unique_by(|problem| problem.key())
        .collect()
}

fn to_suggestion(problem: &Problem, contest_id: i64) -> Suggestion {
    Suggestion {
        contest_id,
        index: problem.index.clone(),
        name: problem.name.clone(),
        rating: problem
            .rating
            .map_or(RatingLabel::Unrated, RatingLabel::Rated),
        tags: problem.tags.clone(),
        link: problem_url(contest_id, &problem.index),
    }
}

/// Recommends practice problems seeded by the most recent failures.
///
/// `submissions` must be ordered most recent first. Sampling draws from `rng`, so the
/// result is reproducible with a seeded generator.
pub fn suggest<R>(submissions: &[Submission], catalog: &[Problem], rng: &mut R) -> Suggestions
where
    R: Rng + ?Sized,
{
    let seeds = collect_seeds(submissions);
    if seeds.failures.is_empty() {
        return Suggestions::NoFailures;
    }

    let mut used: HashSet<ProblemKey> = HashSet::new();
    let mut suggestions: Vec<Suggestion> = Vec::new();

    for failure in seeds.failures.iter() {
        let rating = match failure.problem.rating {
            Some(rating) => rating,
            None => {
                tracing::debug!(
                    "skip unrated failure {} on {}",
                    failure.id,
                    failure.problem.key()
                );
                continue;
            }
        };
        let tags: HashSet<&str> = failure.problem.tags.iter().map(String::as_str).collect();

        let window = candidate_window(catalog, rating, &tags, &seeds.solved, &used);
        tracing::debug!(
            "failure {} on {} has {} candidates",
            failure.id,
            failure.problem.key(),
            window.len()
        );

        for problem in window.choose_multiple(rng, SUGGESTIONS_PER_FAILURE) {
            if let Some(contest_id) = problem.contest_id {
                used.insert(problem.key());
                suggestions.push(to_suggestion(problem, contest_id));
            }
        }
    }

    Suggestions::Suggested(suggestions)
}
