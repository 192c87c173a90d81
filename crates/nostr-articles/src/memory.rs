//! In-process relay used by tests and offline runs.

use std::collections::HashSet;
use std::sync::RwLock;

use async_trait::async_trait;
use nostr_sdk::prelude::*;
use tokio_util::sync::CancellationToken;

use crate::events::{DraftEvent, NostrEvent};
use crate::executor::{PublishExecutor, PublishResult, QueryExecutor};
use crate::filter::ArticleFilter;
use crate::Error;

/// Stores events in memory and answers filters the way a relay does:
/// newest `created_at` first, `limit` applied per filter, results of several
/// filters merged without duplicates.
#[derive(Debug, Default)]
pub struct MemoryRelay {
    events: RwLock<Vec<NostrEvent>>,
    signer: Option<Keys>,
}

impl MemoryRelay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Relay that signs published drafts with `keys`.
    pub fn with_signer(keys: Keys) -> Self {
        Self {
            events: RwLock::default(),
            signer: Some(keys),
        }
    }

    pub fn insert(&self, event: NostrEvent) {
        let mut events = self.events.write().unwrap_or_else(|e| e.into_inner());
        if !events.iter().any(|existing| existing.event_id == event.event_id) {
            events.push(event);
        }
    }

    fn select(&self, filter: &ArticleFilter) -> Vec<NostrEvent> {
        let events = self.events.read().unwrap_or_else(|e| e.into_inner());
        let mut matched: Vec<NostrEvent> = events
            .iter()
            .filter(|event| filter.matches(event))
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        if let Some(limit) = filter.limit {
            matched.truncate(limit);
        }
        matched
    }
}

#[async_trait]
impl QueryExecutor for MemoryRelay {
    async fn query(
        &self,
        filters: Vec<ArticleFilter>,
        signal: CancellationToken,
    ) -> Result<Vec<NostrEvent>, Error> {
        if signal.is_cancelled() {
            return Err(Error::Cancelled);
        }

        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for filter in &filters {
            for event in self.select(filter) {
                if seen.insert(event.event_id.clone()) {
                    out.push(event);
                }
            }
        }
        Ok(out)
    }
}

#[async_trait]
impl PublishExecutor for MemoryRelay {
    async fn publish(&self, draft: DraftEvent) -> Result<PublishResult, Error> {
        let keys = self
            .signer
            .as_ref()
            .ok_or_else(|| Error::Transport("memory relay has no signer".to_string()))?;
        let event = draft
            .to_builder()?
            .sign_with_keys(keys)
            .map_err(|err| Error::Transport(err.to_string()))?;
        let event = NostrEvent::from_event(&event);
        let event_id = event.event_id.clone();
        self.insert(event);

        Ok(PublishResult {
            event_id,
            success: 1,
            failed: 0,
        })
    }
}
