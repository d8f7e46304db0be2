pub mod inspect;
pub mod migrate;
pub mod server;
pub mod user;

use anyhow::{Context, Result};
use chrono::FixedOffset;
use clap::ValueEnum;
use smartcp_libs::codeforces::client::CodeforcesClient;
use sqlx::{postgres::Postgres, Pool};
use std::{env, fmt};

#[derive(Debug, ValueEnum, Clone)]
pub enum InspectTarget {
    Stats,
    Suggestions,
    Failures,
}

impl fmt::Display for InspectTarget {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            InspectTarget::Stats => write!(f, "stats"),
            InspectTarget::Suggestions => write!(f, "suggestions"),
            InspectTarget::Failures => write!(f, "failures"),
        }
    }
}

pub async fn connect_database() -> Result<Pool<Postgres>> {
    let database_url: String = env::var("DATABASE_URL").with_context(|| {
        let message = "DATABASE_URL must be configured.";
        tracing::error!(message);
        message
    })?;

    let pool: Pool<Postgres> = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .with_context(|| {
            let message = "Failed to create database connection pool.";
            tracing::error!(message);
            message
        })?;

    Ok(pool)
}

pub fn create_codeforces_client() -> Result<CodeforcesClient> {
    let api_url = env::var("CODEFORCES_API_URL").unwrap_or_else(|_| {
        tracing::warn!("CODEFORCES_API_URL environment variable is not set. Default value `https://codeforces.com/api` will be used.");
        String::from("https://codeforces.com/api")
    });

    CodeforcesClient::new(&api_url).with_context(|| {
        let message = format!("couldn't create Codeforces API client for {}", api_url);
        tracing::error!(message);
        message
    })
}

/// Offset delimiting calendar days in statistics, from `STATS_UTC_OFFSET_MINUTES`.
pub fn stats_offset() -> Result<FixedOffset> {
    let minutes: i32 = match env::var("STATS_UTC_OFFSET_MINUTES") {
        Ok(value) => value.trim().parse().with_context(|| {
            let message = format!("STATS_UTC_OFFSET_MINUTES must be an integer, got `{}`", value);
            tracing::error!(message);
            message
        })?,
        Err(_) => 0,
    };

    minutes
        .checked_mul(60)
        .and_then(FixedOffset::east_opt)
        .with_context(|| {
            let message = format!("UTC offset of {} minutes is out of range", minutes);
            tracing::error!(message);
            message
        })
}
