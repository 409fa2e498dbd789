pub mod callback_server;
pub mod google;
pub mod pkce;
pub mod provider;

pub use google::GoogleIdentityProvider;
pub use provider::{IdentityProvider, UnconfiguredIdentityProvider, UserIdentity};
