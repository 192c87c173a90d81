use std::collections::BTreeMap;

use nostr_sdk::prelude::*;
use serde::{Deserialize, Serialize};

use crate::events::NostrEvent;
use crate::Error;

/// Relay query predicate in the protocol's JSON shape.
///
/// Tag constraints are keyed `#<tagname>`, e.g. `{"#t": ["rust"]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kinds: Option<Vec<u16>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authors: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
    #[serde(flatten)]
    pub tags: BTreeMap<String, Vec<String>>,
}

impl ArticleFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kinds(mut self, kinds: impl IntoIterator<Item = u16>) -> Self {
        self.kinds = Some(kinds.into_iter().collect());
        self
    }

    pub fn authors<I, S>(mut self, authors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.authors = Some(authors.into_iter().map(Into::into).collect());
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Require a tag named `name` carrying one of `values`.
    pub fn tag<I, S>(mut self, name: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.insert(
            format!("#{name}"),
            values.into_iter().map(Into::into).collect(),
        );
        self
    }

    pub fn tag_values(&self, name: &str) -> Option<&[String]> {
        self.tags.get(&format!("#{name}")).map(Vec::as_slice)
    }

    /// Client-side evaluation, ignoring `limit`.
    pub fn matches(&self, event: &NostrEvent) -> bool {
        if let Some(kinds) = &self.kinds {
            if !kinds.contains(&event.kind) {
                return false;
            }
        }
        if let Some(authors) = &self.authors {
            if !authors.iter().any(|author| author == &event.pubkey) {
                return false;
            }
        }
        self.tags.iter().all(|(key, values)| {
            let name = key.strip_prefix('#').unwrap_or(key);
            event
                .tag_values(name)
                .any(|value| values.iter().any(|wanted| wanted == value))
        })
    }

    pub fn to_sdk_filter(&self) -> Result<Filter, Error> {
        let mut filter = Filter::new();

        if let Some(kinds) = &self.kinds {
            filter = filter.kinds(kinds.iter().map(|kind| Kind::from(*kind)));
        }

        if let Some(authors) = &self.authors {
            let authors = authors
                .iter()
                .map(|value| PublicKey::parse(value).map_err(Error::from))
                .collect::<Result<Vec<_>, _>>()?;
            filter = filter.authors(authors);
        }

        if let Some(limit) = self.limit {
            filter = filter.limit(limit);
        }

        for (key, values) in &self.tags {
            let letter = single_letter(key)?;
            filter = filter.custom_tags(letter, values.iter().cloned());
        }

        Ok(filter)
    }
}

fn single_letter(key: &str) -> Result<SingleLetterTag, Error> {
    let mut chars = key.strip_prefix('#').unwrap_or(key).chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => SingleLetterTag::from_char(c)
            .map_err(|err| Error::InvalidFilter(format!("{key}: {err}"))),
        _ => Err(Error::InvalidFilter(format!(
            "{key}: relays only index single-letter tags"
        ))),
    }
}
