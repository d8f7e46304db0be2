use crate::cmd::connect_database;
use anyhow::{bail, Result};
use clap::Args;
use smartcp_libs::{
    codeforces::is_valid_handle,
    store::{NewUser, PgUserStore, UserStore, MIGRATOR},
};

#[derive(Debug, Args)]
pub struct UserArgs {
    user_name: String,
    #[arg(long)]
    handle: String,
    #[arg(long)]
    no_email_notification: bool,
}

pub async fn run(args: UserArgs) -> Result<()> {
    let handle = args.handle.trim();
    if !is_valid_handle(handle) {
        let message = format!("`{}` is not a valid Codeforces handle", handle);
        tracing::error!(message);
        bail!(message);
    }

    let pool = connect_database().await?;
    MIGRATOR.run(&pool).await?;

    let store = PgUserStore::new(pool);
    store
        .save_user(&NewUser {
            user_name: args.user_name,
            handle: handle.to_string(),
            notify_by_email: !args.no_email_notification,
        })
        .await?;

    Ok(())
}
