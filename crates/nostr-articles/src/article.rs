//! Typed article model projected from long-form events.

use serde::{Deserialize, Serialize};

use crate::events::{
    NostrEvent, TAG_IDENTIFIER, TAG_IMAGE, TAG_IMAGE_ALT, TAG_PUBLISHED_AT, TAG_SUMMARY,
    TAG_TITLE, TAG_TOPIC,
};

/// Characters of content used when an event carries no summary.
pub const SUMMARY_FALLBACK_CHARS: usize = 200;

/// Words per minute assumed by [`Article::read_time_minutes`].
pub const READING_WORDS_PER_MINUTE: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleData {
    pub slug: String,
    pub title: String,
    pub summary: String,
    pub image: Option<String>,
    pub image_alt: Option<String>,
    /// Encounter order, duplicates kept.
    pub categories: Vec<String>,
    pub published_at: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: String,
    pub pubkey: String,
    pub created_at: u64,
    pub content: String,
    pub data: ArticleData,
}

impl Article {
    pub fn slug(&self) -> &str {
        &self.data.slug
    }

    pub fn published_at(&self) -> u64 {
        self.data.published_at
    }

    pub fn read_time_minutes(&self) -> usize {
        let words = self.content.split_whitespace().count();
        words.div_ceil(READING_WORDS_PER_MINUTE).max(1)
    }
}

/// Project a raw event into an [`Article`].
///
/// Returns `None` when the event lacks a non-empty `d` or `title` tag. Never
/// panics on malformed input; the result depends only on `event`.
pub fn parse_article_event(event: &NostrEvent) -> Option<Article> {
    let slug = non_empty(event.tag_value(TAG_IDENTIFIER))?;
    let title = non_empty(event.tag_value(TAG_TITLE))?;

    let summary = non_empty(event.tag_value(TAG_SUMMARY))
        .map(str::to_string)
        .unwrap_or_else(|| summary_from_content(&event.content));
    let published_at = event
        .tag_value(TAG_PUBLISHED_AT)
        .and_then(parse_timestamp)
        .unwrap_or(event.created_at);

    Some(Article {
        id: event.event_id.clone(),
        pubkey: event.pubkey.clone(),
        created_at: event.created_at,
        content: event.content.clone(),
        data: ArticleData {
            slug: slug.to_string(),
            title: title.to_string(),
            summary,
            image: non_empty(event.tag_value(TAG_IMAGE)).map(str::to_string),
            image_alt: non_empty(event.tag_value(TAG_IMAGE_ALT)).map(str::to_string),
            categories: event.tag_values(TAG_TOPIC).map(str::to_string).collect(),
            published_at,
        },
    })
}

/// First [`SUMMARY_FALLBACK_CHARS`] characters of `content`.
pub fn summary_from_content(content: &str) -> String {
    content.chars().take(SUMMARY_FALLBACK_CHARS).collect()
}

fn parse_timestamp(value: &str) -> Option<u64> {
    value.trim().parse::<u64>().ok().filter(|ts| *ts > 0)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
