use std::time::{SystemTime, UNIX_EPOCH};

use nostr_sdk::prelude::*;
use serde::{Deserialize, Serialize};

use crate::Error;

/// Long-form article kind used by the blog.
pub const KIND_LONG_FORM: u16 = 23;

pub const TAG_IDENTIFIER: &str = "d";
pub const TAG_TITLE: &str = "title";
pub const TAG_SUMMARY: &str = "summary";
pub const TAG_PUBLISHED_AT: &str = "published_at";
pub const TAG_IMAGE: &str = "image";
pub const TAG_IMAGE_ALT: &str = "image_alt";
pub const TAG_TOPIC: &str = "t";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "Vec<String>", from = "Vec<String>")]
pub struct NostrTag {
    pub name: String,
    pub values: Vec<String>,
}

impl NostrTag {
    pub fn new(name: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    pub fn single(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(name, vec![value.into()])
    }

    pub fn value(&self) -> Option<&str> {
        self.values.first().map(|s| s.as_str())
    }

    pub fn to_sdk_tag(&self) -> Result<Tag, Error> {
        Ok(Tag::parse(self.to_vec())?)
    }

    pub fn from_sdk_tag(tag: &Tag) -> Self {
        Self::from(tag.clone().to_vec())
    }

    pub fn to_vec(&self) -> Vec<String> {
        let mut parts = Vec::with_capacity(1 + self.values.len());
        parts.push(self.name.clone());
        parts.extend(self.values.iter().cloned());
        parts
    }
}

impl From<Vec<String>> for NostrTag {
    fn from(parts: Vec<String>) -> Self {
        let mut parts = parts.into_iter();
        let name = parts.next().unwrap_or_default();
        Self {
            name,
            values: parts.collect(),
        }
    }
}

impl From<NostrTag> for Vec<String> {
    fn from(tag: NostrTag) -> Self {
        tag.to_vec()
    }
}

/// A signed event as received from a relay. Never mutated after receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NostrEvent {
    #[serde(rename = "id")]
    pub event_id: String,
    pub kind: u16,
    pub pubkey: String,
    pub created_at: u64,
    pub content: String,
    pub tags: Vec<NostrTag>,
}

impl NostrEvent {
    pub fn from_event(event: &Event) -> Self {
        let tags = event.tags.iter().map(NostrTag::from_sdk_tag).collect();

        Self {
            event_id: event.id.to_hex(),
            kind: event.kind.as_u16(),
            pubkey: event.pubkey.to_hex(),
            created_at: event.created_at.as_secs(),
            content: event.content.clone(),
            tags,
        }
    }

    pub fn tag_value(&self, name: &str) -> Option<&str> {
        tag_value(&self.tags, name)
    }

    /// Every value of the tags named `name`, in event order.
    pub fn tag_values<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.tags
            .iter()
            .filter(move |tag| tag.name == name)
            .filter_map(NostrTag::value)
    }
}

/// Unsigned event handed to the signing executor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftEvent {
    pub kind: u16,
    pub content: String,
    pub tags: Vec<NostrTag>,
}

impl DraftEvent {
    pub fn to_builder(&self) -> Result<EventBuilder, Error> {
        let tags = self
            .tags
            .iter()
            .map(NostrTag::to_sdk_tag)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(EventBuilder::new(Kind::from(self.kind), self.content.clone()).tags(tags))
    }
}

pub fn d_tag(slug: &str) -> NostrTag {
    NostrTag::single(TAG_IDENTIFIER, slug)
}

pub fn title_tag(title: &str) -> NostrTag {
    NostrTag::single(TAG_TITLE, title)
}

pub fn summary_tag(summary: &str) -> NostrTag {
    NostrTag::single(TAG_SUMMARY, summary)
}

pub fn published_at_tag(timestamp: u64) -> NostrTag {
    NostrTag::single(TAG_PUBLISHED_AT, timestamp.to_string())
}

pub fn image_tag(url: &str) -> NostrTag {
    NostrTag::single(TAG_IMAGE, url)
}

pub fn image_alt_tag(text: &str) -> NostrTag {
    NostrTag::single(TAG_IMAGE_ALT, text)
}

pub fn t_tag(category: &str) -> NostrTag {
    NostrTag::single(TAG_TOPIC, category)
}

pub fn tag_value<'a>(tags: &'a [NostrTag], name: &str) -> Option<&'a str> {
    tags.iter()
        .find(|tag| tag.name == name)
        .and_then(NostrTag::value)
}

pub fn unix_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_helpers() {
        let tags = vec![d_tag("hello-world"), title_tag("Hi"), t_tag("a"), t_tag("b")];
        assert_eq!(tag_value(&tags, "d"), Some("hello-world"));
        assert_eq!(tag_value(&tags, "title"), Some("Hi"));
        assert_eq!(tag_value(&tags, "t"), Some("a"));
        assert_eq!(tag_value(&tags, "summary"), None);
    }

    #[test]
    fn test_tag_value_skips_valueless_first_match() {
        let tags = vec![NostrTag::new("d", vec![])];
        assert_eq!(tag_value(&tags, "d"), None);
    }

    #[test]
    fn test_tag_conversion() {
        let tag = NostrTag::single("published_at", "1700000000");
        let sdk_tag = tag.to_sdk_tag().unwrap();
        let roundtrip = NostrTag::from_sdk_tag(&sdk_tag);
        assert_eq!(tag, roundtrip);
    }

    #[test]
    fn test_event_json_uses_wire_shape() {
        let json = r#"{
            "id": "aa11",
            "pubkey": "bb22",
            "kind": 23,
            "created_at": 1700000000,
            "tags": [["d", "slug"], ["t", "news"], ["t"]],
            "content": "hello",
            "sig": "deadbeef"
        }"#;
        let event: NostrEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.event_id, "aa11");
        assert_eq!(event.tag_value("d"), Some("slug"));
        assert_eq!(event.tag_values("t").collect::<Vec<_>>(), vec!["news"]);

        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["tags"][0], serde_json::json!(["d", "slug"]));
    }

    #[test]
    fn test_draft_builds_sdk_event() {
        let draft = DraftEvent {
            kind: KIND_LONG_FORM,
            content: "body".to_string(),
            tags: vec![d_tag("slug"), title_tag("Title")],
        };
        let keys = Keys::generate();
        let event = draft.to_builder().unwrap().sign_with_keys(&keys).unwrap();
        let parsed = NostrEvent::from_event(&event);
        assert_eq!(parsed.kind, KIND_LONG_FORM);
        assert_eq!(parsed.content, "body");
        assert_eq!(parsed.tags, draft.tags);
        assert_eq!(parsed.pubkey, keys.public_key().to_hex());
    }
}
