use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::article::{parse_article_event, Article};
use crate::events::{NostrEvent, KIND_LONG_FORM, TAG_IDENTIFIER, TAG_TOPIC};
use crate::executor::QueryExecutor;
use crate::filter::ArticleFilter;
use crate::publishers::AuthorizedPublishers;
use crate::signal::{run_with_deadline, QUERY_TIMEOUT};
use crate::Error;

/// Maximum number of articles requested by a listing.
pub const LIST_LIMIT: usize = 50;

/// Read side: builds filters, runs them and projects the results.
#[derive(Clone)]
pub struct ArticleProjection {
    executor: Arc<dyn QueryExecutor>,
    publishers: AuthorizedPublishers,
    kind: u16,
    timeout: Duration,
}

impl ArticleProjection {
    pub fn new(executor: Arc<dyn QueryExecutor>, publishers: AuthorizedPublishers) -> Self {
        Self {
            executor,
            publishers,
            kind: KIND_LONG_FORM,
            timeout: QUERY_TIMEOUT,
        }
    }

    pub fn with_kind(mut self, kind: u16) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn publishers(&self) -> &AuthorizedPublishers {
        &self.publishers
    }

    fn base_filter(&self) -> ArticleFilter {
        ArticleFilter::new()
            .kinds([self.kind])
            .authors(self.publishers.iter())
    }

    pub fn list_filter(&self, category: Option<&str>) -> ArticleFilter {
        let filter = self.base_filter().limit(LIST_LIMIT);
        match category.filter(|category| !category.is_empty()) {
            Some(category) => filter.tag(TAG_TOPIC, [category]),
            None => filter,
        }
    }

    pub fn article_filter(&self, slug: &str) -> ArticleFilter {
        self.base_filter().tag(TAG_IDENTIFIER, [slug]).limit(1)
    }

    /// Articles from authorized publishers, newest `published_at` first.
    ///
    /// Events that do not project are skipped. Equal timestamps keep the
    /// executor's order.
    pub async fn list_articles(
        &self,
        category: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<Vec<Article>, Error> {
        let filter = self.list_filter(category);
        let events = self.fetch(filter, cancel).await?;
        let received = events.len();

        let mut articles: Vec<Article> = events
            .iter()
            .filter_map(|event| self.project(event))
            .collect();
        articles.sort_by(|a, b| b.published_at().cmp(&a.published_at()));

        debug!(
            category = category.unwrap_or(""),
            received,
            count = articles.len(),
            "Listed articles"
        );
        Ok(articles)
    }

    /// The article stored under `slug`, or `None` when absent or malformed.
    ///
    /// Only the first event returned by the executor is considered.
    pub async fn get_article(
        &self,
        slug: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<Article>, Error> {
        let filter = self.article_filter(slug);
        let events = self.fetch(filter, cancel).await?;
        let article = events.first().and_then(|event| self.project(event));
        if article.is_none() {
            debug!(slug, "Article not found");
        }
        Ok(article)
    }

    async fn fetch(
        &self,
        filter: ArticleFilter,
        cancel: &CancellationToken,
    ) -> Result<Vec<NostrEvent>, Error> {
        let executor = self.executor.clone();
        run_with_deadline(cancel, self.timeout, move |signal| async move {
            executor.query(vec![filter], signal).await
        })
        .await
        .inspect_err(|err| warn!(error = %err, "Article query failed"))
    }

    fn project(&self, event: &NostrEvent) -> Option<Article> {
        if event.kind != self.kind || !self.publishers.contains(&event.pubkey) {
            debug!(event_id = %event.event_id, pubkey = %event.pubkey, "Skipping foreign event");
            return None;
        }
        let article = parse_article_event(event);
        if article.is_none() {
            debug!(event_id = %event.event_id, "Skipping malformed article event");
        }
        article
    }
}
