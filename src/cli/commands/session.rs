//! Sign-in commands.

use crate::api::Transport;
use crate::cli::AppContext;
use crate::config::Identity;
use crate::errors::Result;
use clap::Args;
use tracing::info;

/// Identity handed over by the external sign-in flow
#[derive(Debug, Clone, Args)]
pub struct LoginArgs {
    /// College email address
    #[arg(long)]
    pub email: String,
    /// Display name; defaults to the part of the email before `@`
    #[arg(long)]
    pub name: Option<String>,
    /// Profile picture URL
    #[arg(long)]
    pub picture: Option<String>,
}

/// Signs in and persists the session.
pub async fn login<T: Transport>(ctx: &mut AppContext<T>, args: LoginArgs) -> Result<String> {
    let identity = Identity {
        email: args.email,
        name: args.name,
        picture: args.picture,
    };
    let session = ctx.session.sign_in(identity, &ctx.config.auth)?.clone();
    ctx.store.save(&ctx.session).await?;
    info!("Session saved to {:?}", ctx.store.path());
    Ok(format!("Welcome, {} <{}>", session.name, session.email))
}

/// Clears the session.
pub async fn logout<T: Transport>(ctx: &mut AppContext<T>) -> Result<String> {
    let ended = ctx.session.sign_out();
    ctx.store.save(&ctx.session).await?;
    Ok(ended.map_or_else(
        || "No active session.".to_string(),
        |session| format!("Signed out {}.", session.email),
    ))
}

/// Describes the signed-in admin.
pub fn whoami<T: Transport>(ctx: &AppContext<T>) -> Result<String> {
    let session = ctx.session.require()?;
    Ok(format!(
        "{} <{}> ({}), signed in {}",
        session.name,
        session.email,
        session.role,
        session.login_time.format("%Y-%m-%d %H:%M UTC"),
    ))
}
