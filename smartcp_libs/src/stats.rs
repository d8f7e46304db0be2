use crate::codeforces::model::{RatingChange, Submission};
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use itertools::Itertools;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Topics whose accuracy is below this percentage are reported as weak.
pub const WEAK_TOPIC_THRESHOLD: u32 = 60;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagStat {
    pub tag: String,
    pub solved: usize,
    pub total: usize,
}

impl TagStat {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            solved: 0,
            total: 0,
        }
    }

    pub fn accuracy(&self) -> u32 {
        percentage(self.solved, self.total)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopicAccuracy {
    pub topic: String,
    pub accuracy: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyProgress {
    pub date: NaiveDate,
    pub solved: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingPoint {
    pub contest_name: String,
    pub rating: i32,
    pub change: i32,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub total_solved: usize,
    pub best_rating: i32,
    pub accuracy: u32,
    pub streak: u32,
    pub verdicts: BTreeMap<String, usize>,
    pub rating_solved: BTreeMap<i32, usize>,
    pub progress: Vec<DailyProgress>,
    pub weak_topics: Vec<TopicAccuracy>,
    pub strong_topics: Vec<TopicAccuracy>,
    pub rating_graph: Vec<RatingPoint>,
}

impl Statistics {
    /// Derives every dashboard metric from the raw history of one handle.
    ///
    /// Calendar days (streak, daily progress, rating graph) are taken in `offset`, and
    /// `today` must be expressed in the same offset.
    pub fn compute(
        submissions: &[Submission],
        rating_changes: &[RatingChange],
        today: NaiveDate,
        offset: &FixedOffset,
    ) -> Self {
        let (weak_topics, strong_topics) = topic_accuracy(&tag_stats(submissions));

        Self {
            total_solved: total_solved(submissions),
            best_rating: best_rating(rating_changes),
            accuracy: accuracy(submissions),
            streak: current_streak(submissions, today, offset),
            verdicts: verdict_histogram(submissions),
            rating_solved: rating_histogram(submissions),
            progress: daily_progress(submissions, offset),
            weak_topics,
            strong_topics,
            rating_graph: rating_graph(rating_changes, offset),
        }
    }
}

fn percentage(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    (part as f64 / whole as f64 * 100.0).round() as u32
}

fn local_date(time: &DateTime<Utc>, offset: &FixedOffset) -> NaiveDate {
    time.with_timezone(offset).date_naive()
}

fn accepted(submissions: &[Submission]) -> impl Iterator<Item = &Submission> {
    submissions.iter().filter(|submission| submission.is_accepted())
}

/// Number of distinct problems with at least one accepted submission.
pub fn total_solved(submissions: &[Submission]) -> usize {
    accepted(submissions)
        .map(|submission| submission.problem.key())
        .unique()
        .count()
}

pub fn verdict_histogram(submissions: &[Submission]) -> BTreeMap<String, usize> {
    submissions
        .iter()
        .map(|submission| submission.verdict.to_string())
        .counts()
        .into_iter()
        .collect()
}

/// Accepted submissions per problem rating. Unrated problems are left out.
pub fn rating_histogram(submissions: &[Submission]) -> BTreeMap<i32, usize> {
    accepted(submissions)
        .filter_map(|submission| submission.problem.rating)
        .counts()
        .into_iter()
        .collect()
}

pub fn accuracy(submissions: &[Submission]) -> u32 {
    percentage(accepted(submissions).count(), submissions.len())
}

pub fn best_rating(rating_changes: &[RatingChange]) -> i32 {
    rating_changes
        .iter()
        .map(|change| change.new_rating)
        .max()
        .unwrap_or(0)
}

/// Consecutive days ending at `today` with at least one accepted submission.
pub fn current_streak(submissions: &[Submission], today: NaiveDate, offset: &FixedOffset) -> u32 {
    let solved_dates: HashSet<NaiveDate> = accepted(submissions)
        .map(|submission| local_date(&submission.creation_time, offset))
        .collect();

    let mut streak = 0;
    let mut day = today;
    while solved_dates.contains(&day) {
        streak += 1;
        day = match day.pred_opt() {
            Some(previous) => previous,
            None => break,
        };
    }

    streak
}

/// Folds every tag occurrence into per-tag counters, in order of first appearance.
///
/// `total` grows once per submission carrying the tag and `solved` once per accepted
/// submission carrying it, so repeated accepts of one problem count repeatedly.
pub fn tag_stats(submissions: &[Submission]) -> Vec<TagStat> {
    let mut stats: Vec<TagStat> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for submission in submissions.iter() {
        for tag in submission.problem.tags.iter() {
            let position = *positions.entry(tag.as_str()).or_insert_with(|| {
                stats.push(TagStat::new(tag));
                stats.len() - 1
            });

            let stat = &mut stats[position];
            stat.total += 1;
            if submission.is_accepted() {
                stat.solved += 1;
            }
        }
    }

    stats
}

/// Splits tags into (weak, strong) by [`WEAK_TOPIC_THRESHOLD`].
pub fn topic_accuracy(stats: &[TagStat]) -> (Vec<TopicAccuracy>, Vec<TopicAccuracy>) {
    stats
        .iter()
        .map(|stat| TopicAccuracy {
            topic: stat.tag.clone(),
            accuracy: stat.accuracy(),
        })
        .partition(|topic| topic.accuracy < WEAK_TOPIC_THRESHOLD)
}

pub fn daily_progress(submissions: &[Submission], offset: &FixedOffset) -> Vec<DailyProgress> {
    let counts: BTreeMap<NaiveDate, usize> = accepted(submissions)
        .map(|submission| local_date(&submission.creation_time, offset))
        .counts()
        .into_iter()
        .collect();

    counts
        .into_iter()
        .map(|(date, solved)| DailyProgress { date, solved })
        .collect()
}

pub fn rating_graph(rating_changes: &[RatingChange], offset: &FixedOffset) -> Vec<RatingPoint> {
    let mut previous: Option<i32> = None;

    rating_changes
        .iter()
        .sorted_by_key(|change| change.rating_update_time)
        .map(|change| {
            let delta = previous.map_or(0, |rating| change.new_rating - rating);
            previous = Some(change.new_rating);

            RatingPoint {
                contest_name: change.contest_name.clone(),
                rating: change.new_rating,
                change: delta,
                date: local_date(&change.rating_update_time, offset),
            }
        })
        .collect()
}
