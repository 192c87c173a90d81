use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("must be logged in to publish articles")]
    NotAuthenticated,
    #[error("not authorized to publish articles: {pubkey}")]
    NotAuthorized { pubkey: String },
    #[error("operation timed out")]
    Timeout,
    #[error("operation cancelled")]
    Cancelled,
    #[error("transport error: {0}")]
    Transport(String),
    #[error("nostr client error: {0}")]
    NostrClient(#[from] nostr_sdk::client::Error),
    #[error("nostr key error: {0}")]
    NostrKey(#[from] nostr_sdk::nostr::key::Error),
    #[error("nostr tag error: {0}")]
    NostrTag(#[from] nostr_sdk::nostr::event::tag::Error),
    #[error("serde json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("missing env var: {0}")]
    MissingEnv(&'static str),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("invalid filter: {0}")]
    InvalidFilter(String),
    #[error("publish quorum failed: required {required}, got {actual}")]
    Quorum { required: usize, actual: usize },
}

impl Error {
    /// True for failures of the query or broadcast executor, including
    /// deadlines and caller cancellation.
    pub fn is_transport_failure(&self) -> bool {
        !matches!(
            self,
            Error::NotAuthenticated
                | Error::NotAuthorized { .. }
                | Error::MissingEnv(_)
                | Error::InvalidConfig(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authorization_faults_are_not_transport_failures() {
        assert!(!Error::NotAuthenticated.is_transport_failure());
        assert!(!Error::NotAuthorized {
            pubkey: "abc".to_string()
        }
        .is_transport_failure());
        assert!(Error::Timeout.is_transport_failure());
        assert!(Error::Cancelled.is_transport_failure());
        assert!(Error::Transport("relay closed".to_string()).is_transport_failure());
    }

    #[test]
    fn authorization_faults_have_distinct_messages() {
        let login = Error::NotAuthenticated.to_string();
        let denied = Error::NotAuthorized {
            pubkey: "abc".to_string(),
        }
        .to_string();
        assert!(login.contains("logged in"));
        assert!(denied.contains("not authorized"));
        assert_ne!(login, denied);
    }
}
