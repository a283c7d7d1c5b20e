//! blogwright-cli: accounts, posts and images on an Appwrite-compatible backend.
//! Each invocation is one short-lived session; commands that need an identity
//! sign in with the configured credentials first.
#![deny(clippy::all, clippy::pedantic)]

mod args;
mod client;
mod handlers;
mod io;
mod print;


use blogwright::infra::telemetry;
use clap::Parser;

use args::{Cli, Commands};
use client::{CliError, build_ctx_from_cli};
use handlers::{account, files, posts};

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    let ctx = build_ctx_from_cli(&cli)?;
    telemetry::init(&ctx.settings.logging)?;

    match cli.command {
        Commands::Account(cmd) => account::handle(&ctx, cmd.action).await?,
        Commands::Posts(cmd) => posts::handle(&ctx, cmd.action).await?,
        Commands::Files(cmd) => files::handle(&ctx, cmd.action).await?,
    }

    Ok(())
}
