//! In-memory login sessions.
//!
//! The single-user app keeps sessions server-side: an opaque random token
//! goes into the cookie, and only its SHA-256 hash is held here together
//! with an expiry. Restarting the server logs the user out.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use rand::RngCore;
use sha2::{Digest, Sha256};
use tokio::sync::RwLock;
use tracing::debug;
use zeitsaldo_shared::types::SessionId;

/// A single active session.
#[derive(Debug, Clone)]
struct Session {
    id: SessionId,
    expires_at: DateTime<Utc>,
}

/// Issues and validates opaque session tokens.
#[derive(Debug)]
pub struct SessionService {
    ttl: Duration,
    active: RwLock<HashMap<String, Session>>,
}

impl SessionService {
    /// Creates a service issuing sessions with the given lifetime.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            active: RwLock::new(HashMap::new()),
        }
    }

    /// Hashes a token for storage.
    fn hash_token(token: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Issues a new session and returns the opaque token.
    pub async fn issue(&self) -> String {
        let mut bytes = [0_u8; 32];
        rand::rng().fill_bytes(&mut bytes);
        let token = base64_url::encode(&bytes);

        let session = Session {
            id: SessionId::new(),
            expires_at: Utc::now() + self.ttl,
        };
        debug!(session_id = %session.id, "session issued");
        self.active
            .write()
            .await
            .insert(Self::hash_token(&token), session);

        token
    }

    /// Returns true if the token names an unexpired session.
    ///
    /// Expired sessions are pruned on sight.
    pub async fn validate(&self, token: &str) -> bool {
        let hash = Self::hash_token(token);
        let mut active = self.active.write().await;

        match active.get(&hash) {
            Some(session) if session.expires_at > Utc::now() => true,
            Some(_) => {
                active.remove(&hash);
                false
            }
            None => false,
        }
    }

    /// Revokes a session.
    pub async fn revoke(&self, token: &str) {
        if let Some(session) = self.active.write().await.remove(&Self::hash_token(token)) {
            debug!(session_id = %session.id, "session revoked");
        }
    }
}
