use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use rand::RngCore;
use sha2::{Digest, Sha256};

/// One-time values for an authorization-code request with PKCE
#[derive(Debug, Clone)]
pub struct PkceChallenge {
    /// Secret sent only with the token exchange
    pub verifier: String,
    /// S256 hash of the verifier, sent with the authorization request
    pub challenge: String,
    /// Echoed back on the redirect; must match
    pub state: String,
}

impl PkceChallenge {
    pub fn generate() -> Self {
        let verifier = random_token(32);
        let challenge = challenge_for(&verifier);
        Self {
            verifier,
            challenge,
            state: random_token(16),
        }
    }
}

/// base64url(SHA-256(verifier)) without padding
pub fn challenge_for(verifier: &str) -> String {
    URL_SAFE_NO_PAD.encode(Sha256::digest(verifier.as_bytes()))
}

fn random_token(len: usize) -> String {
    let mut bytes = vec![0u8; len];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}
