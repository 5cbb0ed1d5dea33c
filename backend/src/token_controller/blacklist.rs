//! Tracks bearer tokens revoked before their natural expiry.
//!
//! The main components are:
//! - `TokenBlacklist`: a clonable, thread-safe map from token to the instant the
//!   token would have expired anyway. It is injected into the Actix application
//!   state in `main.rs`, and read by the editor routes and written by the logout
//!   endpoint (`services::auth::logout`).
//! - `start_blacklist_sweeper`: a long-running task that periodically drops the
//!   entries whose expiry has passed, so the map does not grow without bound.

use chrono::{DateTime, Utc};
use log::info;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// Revoked tokens and their expiry instants.
///
/// A token stays revoked until the sweeper removes it, even if its expiry has
/// already passed in the meantime.
#[derive(Clone, Default)]
pub struct TokenBlacklist {
    tokens: Arc<RwLock<HashMap<String, DateTime<Utc>>>>,
}

impl TokenBlacklist {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn revoke(&self, token: impl Into<String>, expires_at: DateTime<Utc>) {
        let mut tokens = self.tokens.write().await;
        tokens.insert(token.into(), expires_at);
    }

    pub async fn is_revoked(&self, token: &str) -> bool {
        self.tokens.read().await.contains_key(token)
    }

    /// Removes every entry that expired before `now`; returns how many were dropped.
    pub async fn sweep(&self, now: DateTime<Utc>) -> usize {
        let mut tokens = self.tokens.write().await;
        let before = tokens.len();
        tokens.retain(|_, expires_at| *expires_at >= now);
        before - tokens.len()
    }

    pub async fn len(&self) -> usize {
        self.tokens.read().await.len()
    }
}

/// Sweeps `blacklist` every `period`, for as long as the runtime lives.
///
/// Spawned once from `main.rs`.
pub async fn start_blacklist_sweeper(blacklist: TokenBlacklist, period: Duration) {
    let mut ticker = tokio::time::interval(period);
    loop {
        ticker.tick().await;
        let removed = blacklist.sweep(Utc::now()).await;
        if removed > 0 {
            info!("Removed {} expired tokens from the blacklist", removed);
        }
    }
}
