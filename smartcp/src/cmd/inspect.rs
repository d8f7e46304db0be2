use crate::cmd::{create_codeforces_client, stats_offset, InspectTarget};
use anyhow::{Context, Result};
use chrono::Utc;
use clap::Args;
use rand::{rngs::StdRng, SeedableRng};
use serde_json::json;
use smartcp_libs::{
    dashboard::{compute_stats, compute_suggestions, new_failures},
    progress::validate_watermark,
    suggest::Suggestions,
};

/// Runs one report against a Codeforces handle without touching the user store.
#[derive(Debug, Args)]
pub struct InspectArgs {
    target: InspectTarget,
    handle: String,
    #[arg(long)]
    watermark: Option<i64>,
}

pub async fn run(args: InspectArgs) -> Result<()> {
    let client = create_codeforces_client()?;
    tracing::info!("inspect {} of {}", args.target, args.handle);

    let output = match args.target {
        InspectTarget::Stats => {
            let offset = stats_offset()?;
            let today = Utc::now().with_timezone(&offset).date_naive();
            let report = compute_stats(&client, &args.handle, today, &offset).await?;
            serde_json::to_value(report)?
        }
        InspectTarget::Suggestions => {
            let mut rng = StdRng::from_entropy();
            match compute_suggestions(&client, &args.handle, &mut rng).await? {
                Suggestions::Suggested(list) => serde_json::to_value(list)?,
                Suggestions::NoFailures => {
                    json!({"message": "No failed submissions found to generate suggestions."})
                }
            }
        }
        InspectTarget::Failures => {
            let watermark = match args.watermark {
                Some(value) => validate_watermark(Some(value))?,
                None => 0,
            };
            serde_json::to_value(new_failures(&client, &args.handle, watermark).await?)?
        }
    };

    let output = serde_json::to_string_pretty(&output).with_context(|| {
        let message = "couldn't format the report";
        tracing::error!(message);
        message
    })?;
    println!("{}", output);

    Ok(())
}
