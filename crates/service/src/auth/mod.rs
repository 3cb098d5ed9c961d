//! Session tokens and password digests.
//!
//! Tokens are opaque UUIDs bound to a user id in a TTL cache. Lookups do
//! not refresh the TTL. A missing token, an expired token, and a token for
//! an identity that no longer exists are all surfaced to clients as one
//! uniform Unauthorized condition.

use std::time::Duration;

use moka::future::Cache;
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Default session lifetime (24 hours).
pub const SESSION_TTL: Duration = Duration::from_secs(24 * 60 * 60);

const MAX_SESSIONS: u64 = 100_000;

fn session_key(token: &str) -> String {
    format!("auth_{token}")
}

/// Cache-backed store mapping session token -> user id.
#[derive(Clone)]
pub struct SessionStore {
    cache: Cache<String, Uuid>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore").finish_non_exhaustive()
    }
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(MAX_SESSIONS)
            .time_to_live(ttl)
            .build();
        Self { cache }
    }

    /// Mint a fresh token for a user.
    pub async fn create(&self, user_id: Uuid) -> String {
        let token = Uuid::new_v4().to_string();
        self.cache.insert(session_key(&token), user_id).await;
        token
    }

    /// Resolve a token to the user id it was minted for.
    pub async fn authenticate(&self, token: &str) -> Option<Uuid> {
        self.cache.get(&session_key(token)).await
    }

    /// Invalidate a token. Returns false when it did not resolve.
    pub async fn destroy(&self, token: &str) -> bool {
        let key = session_key(token);
        let existed = self.cache.get(&key).await.is_some();
        self.cache.invalidate(&key).await;
        existed
    }

    /// Liveness probe for the status endpoint.
    pub fn is_alive(&self) -> bool {
        // In-process cache, alive as long as we are.
        true
    }
}

/// One-way password digest (hex-encoded SHA-256).
pub fn digest_password(password: &str) -> String {
    let digest = Sha256::digest(password.as_bytes());
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

/// Constant-shape comparison of a password against a stored digest.
pub fn verify_password(password: &str, stored_digest: &str) -> bool {
    digest_password(password) == stored_digest
}
