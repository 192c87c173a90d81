use std::env;
use std::time::Duration;

use nostr_sdk::prelude::*;

use crate::events::KIND_LONG_FORM;
use crate::publishers::AuthorizedPublishers;
use crate::signal::QUERY_TIMEOUT;
use crate::Error;

const DEFAULT_PUBLISH_TIMEOUT_SECS: u64 = 10;
const DEFAULT_MIN_ACKS: usize = 1;

/// Connection settings for [`crate::RelayExecutor`].
#[derive(Clone)]
pub struct RelayConfig {
    pub relays: Vec<String>,
    /// Hex or `nsec`. `None` gives a read-only executor with no identity.
    pub secret_key: Option<String>,
    pub min_acks: usize,
    pub query_timeout: Duration,
    pub publish_timeout: Duration,
}

impl RelayConfig {
    pub fn keys(&self) -> Result<Option<Keys>, Error> {
        self.secret_key
            .as_deref()
            .map(|key| Keys::parse(key).map_err(Error::from))
            .transpose()
    }
}

/// Everything needed to build the article read and write sides.
#[derive(Clone)]
pub struct ArticleConfig {
    pub relay: RelayConfig,
    pub publishers: AuthorizedPublishers,
    pub kind: u16,
}

impl ArticleConfig {
    pub fn from_env() -> Result<Self, Error> {
        Self::from_env_with_relays(Vec::new())
    }

    /// Like [`ArticleConfig::from_env`], but a non-empty `relays` replaces
    /// `NOSTR_RELAYS`.
    pub fn from_env_with_relays(relays: Vec<String>) -> Result<Self, Error> {
        let relays = match env::var("NOSTR_RELAYS") {
            _ if !relays.is_empty() => relays,
            Ok(value) => parse_list(&value),
            Err(_) => Vec::new(),
        };
        if relays.is_empty() {
            return Err(Error::MissingEnv("NOSTR_RELAYS"));
        }

        let secret_key = env::var("NOSTR_SECRET_KEY")
            .ok()
            .filter(|value| !value.trim().is_empty());

        let publishers = match env::var("ARTICLE_PUBLISHERS") {
            Ok(value) if !value.trim().is_empty() => {
                AuthorizedPublishers::parse(parse_list(&value))?
            }
            _ => AuthorizedPublishers::default(),
        };

        let kind = env_number("ARTICLE_KIND")?.unwrap_or(KIND_LONG_FORM);
        let query_timeout = env_number("ARTICLE_QUERY_TIMEOUT_SECS")?
            .map(Duration::from_secs)
            .unwrap_or(QUERY_TIMEOUT);
        let publish_timeout = Duration::from_secs(
            env_number("ARTICLE_PUBLISH_TIMEOUT_SECS")?.unwrap_or(DEFAULT_PUBLISH_TIMEOUT_SECS),
        );
        let min_acks = env_number("ARTICLE_MIN_ACKS")?.unwrap_or(DEFAULT_MIN_ACKS);

        Ok(Self {
            relay: RelayConfig {
                relays,
                secret_key,
                min_acks,
                query_timeout,
                publish_timeout,
            },
            publishers,
            kind,
        })
    }
}

fn env_number<T: std::str::FromStr>(name: &'static str) -> Result<Option<T>, Error> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| Error::InvalidConfig(format!("{name}={value}"))),
        _ => Ok(None),
    }
}

/// Split a comma and/or whitespace separated list.
pub fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .flat_map(|chunk| chunk.split_whitespace())
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: [&str; 7] = [
        "NOSTR_RELAYS",
        "NOSTR_SECRET_KEY",
        "ARTICLE_PUBLISHERS",
        "ARTICLE_KIND",
        "ARTICLE_QUERY_TIMEOUT_SECS",
        "ARTICLE_PUBLISH_TIMEOUT_SECS",
        "ARTICLE_MIN_ACKS",
    ];

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn parse_list_accepts_commas_and_spaces() {
        assert_eq!(
            parse_list("wss://a, wss://b wss://c,,"),
            vec!["wss://a", "wss://b", "wss://c"]
        );
        assert!(parse_list(" , ").is_empty());
    }

    #[test]
    fn defaults_when_optional_absent() {
        let _g = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        clear_env();
        env::set_var("NOSTR_RELAYS", "wss://relay.example");

        let config = ArticleConfig::from_env().unwrap();
        assert_eq!(config.relay.relays, vec!["wss://relay.example"]);
        assert!(config.relay.secret_key.is_none());
        assert!(config.relay.keys().unwrap().is_none());
        assert_eq!(config.relay.query_timeout, Duration::from_secs(8));
        assert_eq!(config.relay.publish_timeout, Duration::from_secs(10));
        assert_eq!(config.relay.min_acks, 1);
        assert_eq!(config.kind, KIND_LONG_FORM);
        assert_eq!(config.publishers, AuthorizedPublishers::default());
        clear_env();
    }

    #[test]
    fn loads_overrides() {
        let _g = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        clear_env();
        let keys = Keys::generate();
        env::set_var("NOSTR_RELAYS", "wss://a,wss://b");
        env::set_var("NOSTR_SECRET_KEY", keys.secret_key().to_secret_hex());
        env::set_var("ARTICLE_PUBLISHERS", keys.public_key().to_bech32().unwrap());
        env::set_var("ARTICLE_KIND", "30023");
        env::set_var("ARTICLE_QUERY_TIMEOUT_SECS", "3");
        env::set_var("ARTICLE_MIN_ACKS", "0");

        let config = ArticleConfig::from_env().unwrap();
        assert_eq!(config.relay.relays.len(), 2);
        assert_eq!(
            config.relay.keys().unwrap().unwrap().public_key(),
            keys.public_key()
        );
        assert!(config.publishers.contains(&keys.public_key().to_hex()));
        assert_eq!(config.kind, 30023);
        assert_eq!(config.relay.query_timeout, Duration::from_secs(3));
        assert_eq!(config.relay.min_acks, 0);
        clear_env();
    }

    #[test]
    fn missing_relays_error() {
        let _g = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        clear_env();
        assert!(matches!(
            ArticleConfig::from_env(),
            Err(Error::MissingEnv("NOSTR_RELAYS"))
        ));
    }

    #[test]
    fn explicit_relays_replace_env() {
        let _g = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        clear_env();
        let config = ArticleConfig::from_env_with_relays(vec!["wss://cli".to_string()]).unwrap();
        assert_eq!(config.relay.relays, vec!["wss://cli"]);

        env::set_var("NOSTR_RELAYS", "wss://env");
        let config = ArticleConfig::from_env_with_relays(vec!["wss://cli".to_string()]).unwrap();
        assert_eq!(config.relay.relays, vec!["wss://cli"]);
        let config = ArticleConfig::from_env_with_relays(Vec::new()).unwrap();
        assert_eq!(config.relay.relays, vec!["wss://env"]);
        clear_env();
    }

    #[test]
    fn invalid_number_errors() {
        let _g = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        clear_env();
        env::set_var("NOSTR_RELAYS", "wss://a");
        env::set_var("ARTICLE_KIND", "long-form");
        assert!(matches!(
            ArticleConfig::from_env(),
            Err(Error::InvalidConfig(_))
        ));
        clear_env();
    }
}
