//! Long-form article layer over Nostr relays.
//!
//! Turns signed long-form events into typed [`Article`] values, builds the
//! relay filters used to find them, restricts results to an allow-list of
//! publishers and assembles well-formed events for publication.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      NOSTR-ARTICLES                              │
//! │                                                                  │
//! │  ┌─────────────────────┐       ┌─────────────────────┐          │
//! │  │  ArticleProjection  │       │  ArticlePublisher   │          │
//! │  │  (read path)        │       │  (write path)       │          │
//! │  │                     │       │                     │          │
//! │  │ - list_articles     │       │ - is_authorized     │          │
//! │  │ - get_article       │       │ - publish           │          │
//! │  └──────────┬──────────┘       └──────────┬──────────┘          │
//! │             │  AuthorizedPublishers (shared, read-only)          │
//! │             ▼                             ▼                      │
//! │       QueryExecutor            PublishExecutor + Identity        │
//! │             └──────────┬──────────────────┘                      │
//! │                        ▼                                         │
//! │          RelayExecutor (nostr-sdk) / MemoryRelay                 │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Event shape
//!
//! | Tag | Meaning | Required |
//! |-----|---------|----------|
//! | `d` | slug | yes |
//! | `title` | title | yes |
//! | `summary` | summary, else first 200 chars of content | no |
//! | `published_at` | unix seconds, else `created_at` | no |
//! | `image`, `image_alt` | cover image | no |
//! | `t` | category, repeatable | no |
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use nostr_articles::{ArticleConfig, ArticleProjection, CancellationToken, RelayExecutor};
//!
//! let config = ArticleConfig::from_env()?;
//! let relay = Arc::new(RelayExecutor::new(config.relay.clone()).await?);
//! let projection = ArticleProjection::new(relay, config.publishers.clone());
//!
//! let articles = projection
//!     .list_articles(Some("nostr"), &CancellationToken::new())
//!     .await?;
//! ```

mod article;
mod config;
mod error;
mod events;
mod executor;
mod filter;
mod memory;
mod projection;
mod publish;
mod publishers;
mod relay;
mod signal;

pub use article::{
    parse_article_event, summary_from_content, Article, ArticleData, READING_WORDS_PER_MINUTE,
    SUMMARY_FALLBACK_CHARS,
};
pub use config::{parse_list, ArticleConfig, RelayConfig};
pub use error::Error;
pub use events::{
    d_tag, image_alt_tag, image_tag, published_at_tag, summary_tag, t_tag, tag_value, title_tag,
    unix_timestamp, DraftEvent, NostrEvent, NostrTag, KIND_LONG_FORM, TAG_IDENTIFIER, TAG_IMAGE,
    TAG_IMAGE_ALT, TAG_PUBLISHED_AT, TAG_SUMMARY, TAG_TITLE, TAG_TOPIC,
};
pub use executor::{
    CurrentUser, IdentityProvider, PublishExecutor, PublishResult, QueryExecutor, SessionIdentity,
};
pub use filter::ArticleFilter;
pub use memory::MemoryRelay;
pub use projection::{ArticleProjection, LIST_LIMIT};
pub use publish::{build_article_tags, ArticlePublisher, PublishArticleInput};
pub use publishers::{AuthorizedPublishers, DEFAULT_PUBLISHERS};
pub use relay::RelayExecutor;
pub use signal::{run_with_deadline, QUERY_TIMEOUT};
pub use tokio_util::sync::CancellationToken;

/// Crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
