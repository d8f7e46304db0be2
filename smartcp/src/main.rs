mod cmd;
mod modules;

use crate::cmd::{
    inspect::{self, InspectArgs},
    migrate::{self, MigrateArgs},
    server::{self, ServerArgs},
    user::{self, UserArgs},
};
use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use std::{env, str::FromStr};
use tokio::runtime::Builder;
use tracing_subscriber::{
    filter::{EnvFilter, LevelFilter},
    fmt::{self, time::OffsetTime},
};

#[derive(Debug, Parser)]
#[command(name = "smartcp")]
#[command(about = "SmartCP practice dashboard for Codeforces")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Inspect(InspectArgs),
    Migrate(MigrateArgs),
    Server(ServerArgs),
    User(UserArgs),
}

fn main() {
    dotenv().ok();

    let log_level = env::var("RUST_LOG").unwrap_or(String::from("info"));
    let filter = EnvFilter::builder()
        .with_default_directive(
            LevelFilter::from_str(&log_level)
                .expect("couldn't parse specified log level")
                .into(),
        )
        .from_env_lossy();
    let format = fmt::format()
        .with_level(true)
        .with_target(true)
        .with_ansi(false)
        .with_thread_ids(true)
        .with_timer(OffsetTime::local_rfc_3339().expect("couldn't determine local offset"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .event_format(format)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("failed to set tracing subscriber");

    let runtime = Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("failed to build tokio runtime");

    match Cli::parse().command {
        Commands::Inspect(args) => runtime.block_on(inspect::run(args)),
        Commands::Migrate(args) => runtime.block_on(migrate::run(args)),
        Commands::Server(args) => runtime.block_on(server::run(args)),
        Commands::User(args) => runtime.block_on(user::run(args)),
    }
    .expect("command failed");
}
