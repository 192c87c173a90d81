use async_trait::async_trait;
use nostr_sdk::prelude::*;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::config::RelayConfig;
use crate::events::{DraftEvent, NostrEvent};
use crate::executor::{CurrentUser, IdentityProvider, PublishExecutor, PublishResult, QueryExecutor};
use crate::filter::ArticleFilter;
use crate::Error;

/// Relay pool client implementing every capability the article layer needs.
#[derive(Clone)]
pub struct RelayExecutor {
    client: Client,
    keys: Option<Keys>,
    config: RelayConfig,
}

impl RelayExecutor {
    pub async fn new(config: RelayConfig) -> Result<Self, Error> {
        let keys = config.keys()?;
        let client = match &keys {
            Some(keys) => Client::builder().signer(keys.clone()).build(),
            None => Client::default(),
        };

        for relay in &config.relays {
            client.add_relay(relay).await?;
        }

        client.connect().await;
        Ok(Self {
            client,
            keys,
            config,
        })
    }

    pub async fn disconnect(&self) {
        self.client.disconnect().await;
    }
}

#[async_trait]
impl QueryExecutor for RelayExecutor {
    async fn query(
        &self,
        filters: Vec<ArticleFilter>,
        signal: CancellationToken,
    ) -> Result<Vec<NostrEvent>, Error> {
        let mut out = Vec::new();
        for filter in filters {
            let filter = filter.to_sdk_filter()?;
            let events = tokio::select! {
                biased;
                _ = signal.cancelled() => return Err(Error::Cancelled),
                result = self.client.fetch_events(filter, self.config.query_timeout) => result?,
            };
            out.extend(events.iter().map(NostrEvent::from_event));
        }
        debug!(count = out.len(), "Fetched nostr events");
        Ok(out)
    }
}

#[async_trait]
impl PublishExecutor for RelayExecutor {
    async fn publish(&self, draft: DraftEvent) -> Result<PublishResult, Error> {
        let builder = draft.to_builder()?;
        let output = tokio::time::timeout(
            self.config.publish_timeout,
            self.client.send_event_builder(builder),
        )
        .await
        .map_err(|_| Error::Timeout)??;

        let success = output.success.len();
        let failed = output.failed.len();
        if self.config.min_acks > 0 && success < self.config.min_acks {
            return Err(Error::Quorum {
                required: self.config.min_acks,
                actual: success,
            });
        }

        let event_id = output.id().to_hex();
        info!(event_id = %event_id, kind = draft.kind, success, failed, "Published nostr event");

        Ok(PublishResult {
            event_id,
            success,
            failed,
        })
    }
}

impl IdentityProvider for RelayExecutor {
    fn current_user(&self) -> Option<CurrentUser> {
        self.keys
            .as_ref()
            .map(|keys| CurrentUser::new(keys.public_key().to_hex()))
    }
}
