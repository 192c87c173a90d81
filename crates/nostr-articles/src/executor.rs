//! Capabilities the article layer borrows from its environment.

use std::sync::RwLock;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::events::{DraftEvent, NostrEvent};
use crate::filter::ArticleFilter;
use crate::Error;

/// Runs filters against the network.
///
/// Implementations must stop and return promptly once `signal` is cancelled.
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    async fn query(
        &self,
        filters: Vec<ArticleFilter>,
        signal: CancellationToken,
    ) -> Result<Vec<NostrEvent>, Error>;
}

/// Signs a draft and broadcasts it.
#[async_trait]
pub trait PublishExecutor: Send + Sync {
    async fn publish(&self, draft: DraftEvent) -> Result<PublishResult, Error>;
}

/// Source of the currently logged-in user, read on every call.
pub trait IdentityProvider: Send + Sync {
    fn current_user(&self) -> Option<CurrentUser>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub pubkey: String,
}

impl CurrentUser {
    pub fn new(pubkey: impl Into<String>) -> Self {
        Self {
            pubkey: pubkey.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishResult {
    pub event_id: String,
    pub success: usize,
    pub failed: usize,
}

/// Identity that can change over the life of the process.
#[derive(Debug, Default)]
pub struct SessionIdentity {
    user: RwLock<Option<CurrentUser>>,
}

impl SessionIdentity {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn logged_in(pubkey: impl Into<String>) -> Self {
        Self {
            user: RwLock::new(Some(CurrentUser::new(pubkey))),
        }
    }

    pub fn login(&self, pubkey: impl Into<String>) {
        let mut user = self.user.write().unwrap_or_else(|e| e.into_inner());
        *user = Some(CurrentUser::new(pubkey));
    }

    pub fn logout(&self) {
        let mut user = self.user.write().unwrap_or_else(|e| e.into_inner());
        *user = None;
    }
}

impl IdentityProvider for SessionIdentity {
    fn current_user(&self) -> Option<CurrentUser> {
        self.user.read().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_identity_tracks_login_state() {
        let identity = SessionIdentity::new();
        assert_eq!(identity.current_user(), None);

        identity.login("aa");
        assert_eq!(identity.current_user(), Some(CurrentUser::new("aa")));

        identity.logout();
        assert_eq!(identity.current_user(), None);
    }
}
