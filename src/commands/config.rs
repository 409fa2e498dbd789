use anyhow::Result;
use colored::Colorize;
use gun_iq::catalog::Catalog;
use gun_iq::config::Config;
use gun_iq::logging::mask_secret;
use tracing::info;

/// Execute the config show command
///
/// Displays the effective configuration with secrets masked
pub fn show(cfg: &Config) -> Result<()> {
    info!("Displaying configuration");

    let sanitized = sanitize_secrets(cfg);

    println!("{}", "Current Configuration:".green().bold());
    println!();

    let toml_string = toml::to_string_pretty(&sanitized)?;
    println!("{}", toml_string);

    Ok(())
}

/// Execute the config validate command
///
/// The configuration was validated while loading; this also checks the catalog
pub fn validate(cfg: &Config) -> Result<()> {
    println!("{}", "Validating configuration...".yellow());

    let catalog = match &cfg.catalog.path {
        Some(path) => Catalog::from_path(path)?,
        None => Catalog::builtin()?,
    };

    println!("{}", "✓ Configuration is valid".green());
    println!();
    println!("{}", "Summary:".bold());
    println!(
        "  Catalog: {} ({} firearms)",
        cfg.catalog
            .path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "built-in".to_string()),
        catalog.len()
    );
    println!(
        "  Price fetching: {:?} (max in flight: {}, timeout: {})",
        cfg.pricing.strategy,
        cfg.pricing.max_in_flight,
        if cfg.pricing.timeout_seconds > 0 {
            format!("{}s", cfg.pricing.timeout_seconds)
        } else {
            "none".to_string()
        }
    );
    println!(
        "  Sign-in: {}",
        if cfg.auth.is_some() { "configured" } else { "disabled" }
    );
    println!(
        "  Click sound: {}",
        if cfg.interface.click_sound { "on" } else { "off" }
    );

    info!("Configuration validation successful");
    Ok(())
}

/// Mask the OAuth client secret for safe display
fn sanitize_secrets(cfg: &Config) -> Config {
    let mut sanitized = cfg.clone();

    if let Some(auth) = sanitized.auth.as_mut() {
        auth.client_secret = auth.client_secret.as_deref().map(mask_secret);
    }

    sanitized
}
