use reqwest::StatusCode;
use thiserror::Error;

/// Application error types
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Catalog could not be loaded or failed validation
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Firearm name not present in the catalog
    #[error("Firearm not found: {0}")]
    UnknownFirearm(String),

    /// Another selection replaced this one before its prices finished loading
    #[error("Selection of {0} was replaced before its prices loaded")]
    SelectionSuperseded(String),

    /// Invalid selection transition
    #[error(transparent)]
    Selection(#[from] SelectionError),

    /// Sign-in failed
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// HTTP client could not be built
    #[error("HTTP client error: {0}")]
    HttpClient(#[source] reqwest::Error),

    /// Metrics recorder could not be installed
    #[error("Metrics error: {0}")]
    Metrics(String),
}

/// Errors raised while loading or validating a catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse catalog: {0}")]
    Parse(String),

    #[error("Unsupported catalog format: {0} (expected .json or .toml)")]
    UnsupportedFormat(String),

    #[error("Catalog is empty")]
    Empty,

    #[error("Firearm name cannot be empty")]
    EmptyFirearmName,

    #[error("Firearm '{0}' is duplicated")]
    DuplicateFirearm(String),

    #[error("Attachment '{attachment}' is duplicated on firearm '{firearm}'")]
    DuplicateAttachment { firearm: String, attachment: String },

    #[error("Attachment '{attachment}' on firearm '{firearm}' has an invalid price URL: {reason}")]
    InvalidPriceUrl {
        firearm: String,
        attachment: String,
        reason: String,
    },
}

/// Errors from selection state transitions
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("No firearm is selected")]
    NoFirearmSelected,

    #[error("Attachment '{attachment}' is not available for {firearm}")]
    UnknownAttachment { firearm: String, attachment: String },
}

/// Sign-in failures. The user stays signed out after any of these.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Sign-in is not configured")]
    NotConfigured,

    #[error("Invalid authorization URL: {0}")]
    InvalidUrl(String),

    #[error("Failed to start callback server: {0}")]
    CallbackServer(String),

    #[error("Sign-in was cancelled or denied: {0}")]
    Denied(String),

    #[error("Timed out waiting for sign-in after {0} seconds")]
    Timeout(u64),

    #[error("State parameter mismatch")]
    StateMismatch,

    #[error("Authorization response is missing the code")]
    MissingCode,

    #[error("Token exchange failed: {0}")]
    TokenExchange(String),

    #[error("Failed to fetch user profile: {0}")]
    Profile(String),
}

/// Per-attachment price fetch failure. Recorded as "unavailable".
#[derive(Debug, Error)]
pub enum PriceFetchError {
    #[error("Attachment '{0}' has no price URL")]
    MissingLocator(String),

    #[error("Request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Price source returned HTTP {0}")]
    Status(StatusCode),

    #[error("Malformed price response: {0}")]
    Malformed(String),

    #[error("Invalid price value: {0}")]
    InvalidPrice(f64),
}

impl PriceFetchError {
    /// Short label for metrics
    pub fn kind(&self) -> &'static str {
        match self {
            PriceFetchError::MissingLocator(_) => "missing_locator",
            PriceFetchError::Transport(e) if e.is_timeout() => "timeout",
            PriceFetchError::Transport(_) => "transport",
            PriceFetchError::Status(_) => "status",
            PriceFetchError::Malformed(_) => "malformed",
            PriceFetchError::InvalidPrice(_) => "invalid_price",
        }
    }
}
