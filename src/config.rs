use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub pricing: PricingConfig,
    #[serde(default)]
    pub interface: InterfaceConfig,
    /// Sign-in is disabled when this section is absent
    #[serde(default)]
    pub auth: Option<AuthConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Default filter when RUST_LOG is unset (default: "info")
    #[serde(default = "default_log_level")]
    pub level: String,

    /// "pretty" or "json" (default: "pretty")
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CatalogConfig {
    /// Catalog file (.json or .toml). The bundled catalog is used when unset.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// How attachment prices are requested
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchStrategy {
    /// One request at a time, in attachment order
    #[default]
    Sequential,
    /// Up to `max_in_flight` requests at once
    Concurrent,
}

impl FetchStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            FetchStrategy::Sequential => "sequential",
            FetchStrategy::Concurrent => "concurrent",
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PricingConfig {
    #[serde(default)]
    pub strategy: FetchStrategy,

    /// Concurrency limit for the concurrent strategy (default: 4)
    #[serde(default = "default_max_in_flight")]
    pub max_in_flight: usize,

    /// Per-request timeout, 0 disables it (default: 30)
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            strategy: FetchStrategy::default(),
            max_in_flight: default_max_in_flight(),
            timeout_seconds: default_timeout_seconds(),
            user_agent: default_user_agent(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InterfaceConfig {
    /// Ring the terminal bell on selection and toggles (default: true)
    #[serde(default = "default_click_sound")]
    pub click_sound: bool,
}

impl Default for InterfaceConfig {
    fn default() -> Self {
        Self {
            click_sound: default_click_sound(),
        }
    }
}

/// OAuth identity provider settings (Google by default)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    pub client_id: String,

    /// Required by Google for desktop clients
    #[serde(default)]
    pub client_secret: Option<String>,

    #[serde(default = "default_auth_url")]
    pub auth_url: String,

    #[serde(default = "default_token_url")]
    pub token_url: String,

    #[serde(default = "default_userinfo_url")]
    pub userinfo_url: String,

    #[serde(default = "default_scopes")]
    pub scopes: Vec<String>,

    /// Local port for the OAuth redirect (default: 54545)
    #[serde(default = "default_callback_port")]
    pub callback_port: u16,

    /// How long to wait for the browser round trip (default: 120)
    #[serde(default = "default_login_timeout_seconds")]
    pub login_timeout_seconds: u64,

    /// Open the authorization URL automatically (default: true)
    #[serde(default = "default_open_browser")]
    pub open_browser: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_max_in_flight() -> usize {
    4
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("gun-iq/{}", env!("CARGO_PKG_VERSION"))
}

fn default_click_sound() -> bool {
    true
}

fn default_auth_url() -> String {
    "https://accounts.google.com/o/oauth2/v2/auth".to_string()
}

fn default_token_url() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

fn default_userinfo_url() -> String {
    "https://openidconnect.googleapis.com/v1/userinfo".to_string()
}

fn default_scopes() -> Vec<String> {
    vec![
        "openid".to_string(),
        "email".to_string(),
        "profile".to_string(),
    ]
}

fn default_callback_port() -> u16 {
    54545
}

fn default_login_timeout_seconds() -> u64 {
    120
}

fn default_open_browser() -> bool {
    true
}

/// Load configuration from an optional TOML file layered under `GUNIQ__*` env vars
pub fn load_config(path: &Path) -> anyhow::Result<Config> {
    let config = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(config::Environment::with_prefix("GUNIQ").prefix_separator("__").separator("__"))
        .build()?;

    let cfg: Config = config.try_deserialize()?;
    validate_config(&cfg)?;

    Ok(cfg)
}

pub fn validate_config(cfg: &Config) -> anyhow::Result<()> {
    match cfg.logging.format.as_str() {
        "pretty" | "json" => {}
        other => anyhow::bail!("Invalid log format '{}': expected 'pretty' or 'json'", other),
    }

    if cfg.logging.level.trim().is_empty() {
        anyhow::bail!("Log level cannot be empty");
    }

    if cfg.pricing.max_in_flight < 1 {
        anyhow::bail!("pricing.max_in_flight must be >= 1");
    }

    if let Some(auth) = &cfg.auth {
        validate_auth(auth)?;
    }

    Ok(())
}

fn validate_auth(auth: &AuthConfig) -> anyhow::Result<()> {
    if auth.client_id.trim().is_empty() {
        anyhow::bail!("auth.client_id cannot be empty");
    }

    for (field, value) in [
        ("auth_url", &auth.auth_url),
        ("token_url", &auth.token_url),
        ("userinfo_url", &auth.userinfo_url),
    ] {
        if let Err(e) = url::Url::parse(value) {
            anyhow::bail!("auth.{} is not a valid URL: {}", field, e);
        }
    }

    if auth.callback_port == 0 {
        anyhow::bail!("auth.callback_port must be non-zero");
    }

    if auth.scopes.is_empty() {
        anyhow::bail!("auth.scopes cannot be empty");
    }

    Ok(())
}
