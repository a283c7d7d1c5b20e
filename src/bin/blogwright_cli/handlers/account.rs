#![deny(clippy::all, clippy::pedantic)]

use crate::args::AccountCmd;
use crate::client::{CliError, Ctx};
use crate::print::print_json;

pub async fn handle(ctx: &Ctx, cmd: AccountCmd) -> Result<(), CliError> {
    match cmd {
        AccountCmd::Create { name } => create(ctx, &name).await,
        AccountCmd::Login => login(ctx).await,
        AccountCmd::Me => me(ctx).await,
        AccountCmd::Logout => logout(ctx).await,
    }
}

async fn create(ctx: &Ctx, name: &str) -> Result<(), CliError> {
    let credentials = ctx.credentials()?;
    let session = ctx
        .auth
        .create_account(&credentials.email, &credentials.password, name)
        .await?;
    print_json(&session)
}

async fn login(ctx: &Ctx) -> Result<(), CliError> {
    let session = ctx.sign_in().await?;
    print_json(&session)
}

async fn me(ctx: &Ctx) -> Result<(), CliError> {
    ctx.sign_in().await?;
    let account = ctx.auth.get_current_user().await?;
    print_json(&account)
}

async fn logout(ctx: &Ctx) -> Result<(), CliError> {
    ctx.sign_in().await?;
    ctx.auth.logout().await?;
    print_json(&serde_json::json!({ "signed_out": true }))
}
