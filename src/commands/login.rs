use anyhow::{Context, Result};
use colored::Colorize;
use gun_iq::config::Config;
use gun_iq::session::Session;

/// Execute the login command
///
/// A failed sign-in is returned as an error so the process exits non-zero.
pub async fn execute(cfg: &Config) -> Result<()> {
    let session = Session::from_config(cfg)?;

    if cfg.auth.is_none() {
        println!(
            "{}",
            "Sign-in is not configured. Add an [auth] section with a client_id.".yellow()
        );
    } else {
        println!("{}", "Signing in... complete the flow in your browser.".bold());
    }

    let user = session.sign_in().await.context("Sign-in failed")?;

    println!("{}", format!("Welcome, {}!", user.display_name).green());
    if let Some(email) = &user.email {
        println!("  {}", email.bright_black());
    }

    Ok(())
}
