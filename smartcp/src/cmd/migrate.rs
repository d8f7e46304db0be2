use crate::cmd::connect_database;
use anyhow::{Context, Result};
use clap::Args;
use smartcp_libs::store::MIGRATOR;

#[derive(Debug, Args)]
pub struct MigrateArgs {}

pub async fn run(_args: MigrateArgs) -> Result<()> {
    let pool = connect_database().await?;

    MIGRATOR.run(&pool).await.with_context(|| {
        let message = "Failed to apply database migrations.";
        tracing::error!(message);
        message
    })?;
    tracing::info!("Database migrations applied.");

    Ok(())
}
