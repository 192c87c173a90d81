use std::sync::Arc;

use indexmap::IndexSet;
use nostr_sdk::prelude::*;

use crate::Error;

/// Keys whose articles the blog treats as canonical.
pub const DEFAULT_PUBLISHERS: [&str; 2] = [
    "9fce3aea32b35637838fb45b75be32595742e16bb3e4742cc82bb3d50f9087e6",
    "4f1ebb82e7c7b631e234b02b87f6fdf87cf2c46d8eed17f23ca3b89e3f86ff5f",
];

/// Immutable allow-list of publisher public keys (lowercase hex).
///
/// Cloning shares the underlying set, so both the read and write side can
/// hold the same instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizedPublishers {
    keys: Arc<IndexSet<String>>,
}

impl AuthorizedPublishers {
    /// Build from hex or bech32 (`npub`) keys. Duplicates collapse, first
    /// occurrence keeps its position.
    pub fn parse<I, S>(keys: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keys = keys
            .into_iter()
            .map(|key| Ok(PublicKey::parse(key.as_ref().trim())?.to_hex()))
            .collect::<Result<IndexSet<_>, Error>>()?;
        Ok(Self {
            keys: Arc::new(keys),
        })
    }

    /// Build from keys already in normalised form, without validation.
    pub fn from_hex<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keys: Arc::new(
                keys.into_iter()
                    .map(|key| key.into().to_ascii_lowercase())
                    .collect(),
            ),
        }
    }

    pub fn contains(&self, pubkey: &str) -> bool {
        self.keys.contains(pubkey) || self.keys.contains(pubkey.to_ascii_lowercase().as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.keys.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl Default for AuthorizedPublishers {
    fn default() -> Self {
        Self::from_hex(DEFAULT_PUBLISHERS)
    }
}
