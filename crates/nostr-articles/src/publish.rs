use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::events::{
    d_tag, image_alt_tag, image_tag, published_at_tag, summary_tag, t_tag, title_tag,
    unix_timestamp, DraftEvent, NostrTag, KIND_LONG_FORM,
};
use crate::executor::{CurrentUser, IdentityProvider, PublishExecutor, PublishResult};
use crate::publishers::AuthorizedPublishers;
use crate::Error;

/// Caller-supplied article to publish.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishArticleInput {
    pub slug: String,
    pub title: String,
    pub summary: String,
    pub content: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub image_alt: Option<String>,
    #[serde(default)]
    pub categories: Vec<String>,
}

/// Write side: checks the caller may publish and hands a draft to the signer.
#[derive(Clone)]
pub struct ArticlePublisher {
    executor: Arc<dyn PublishExecutor>,
    identity: Arc<dyn IdentityProvider>,
    publishers: AuthorizedPublishers,
    kind: u16,
}

impl ArticlePublisher {
    pub fn new(
        executor: Arc<dyn PublishExecutor>,
        identity: Arc<dyn IdentityProvider>,
        publishers: AuthorizedPublishers,
    ) -> Self {
        Self {
            executor,
            identity,
            publishers,
            kind: KIND_LONG_FORM,
        }
    }

    pub fn with_kind(mut self, kind: u16) -> Self {
        self.kind = kind;
        self
    }

    /// Whether the current user may publish. Evaluated on every call.
    pub fn is_authorized(&self) -> bool {
        self.authorized_user().is_ok()
    }

    pub async fn publish(&self, input: PublishArticleInput) -> Result<PublishResult, Error> {
        let user = self
            .authorized_user()
            .inspect_err(|err| warn!(error = %err, "Rejected article publish"))?;
        let draft = DraftEvent {
            kind: self.kind,
            tags: build_article_tags(&input, unix_timestamp()),
            content: input.content,
        };

        let result = self.executor.publish(draft).await?;
        info!(
            event_id = %result.event_id,
            slug = %input.slug,
            author = %user.pubkey,
            success = result.success,
            failed = result.failed,
            "Published article"
        );
        Ok(result)
    }

    fn authorized_user(&self) -> Result<CurrentUser, Error> {
        let user = self.identity.current_user().ok_or(Error::NotAuthenticated)?;
        if !self.publishers.contains(&user.pubkey) {
            return Err(Error::NotAuthorized {
                pubkey: user.pubkey,
            });
        }
        Ok(user)
    }
}

/// Article tags in wire order. `published_at` is always `now`.
pub fn build_article_tags(input: &PublishArticleInput, now: u64) -> Vec<NostrTag> {
    let mut tags = vec![
        d_tag(&input.slug),
        title_tag(&input.title),
        summary_tag(&input.summary),
        published_at_tag(now),
    ];

    if let Some(image) = input.image.as_deref().filter(|s| !s.is_empty()) {
        tags.push(image_tag(image));
    }

    if let Some(alt) = input.image_alt.as_deref().filter(|s| !s.is_empty()) {
        tags.push(image_alt_tag(alt));
    }

    tags.extend(input.categories.iter().map(|category| t_tag(category)));
    tags
}
