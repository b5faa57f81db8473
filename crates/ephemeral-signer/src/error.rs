use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("no main signer available")]
    NoSignerAvailable,
    #[error("publish failed: {0}")]
    PublishFailed(String),
    #[error("malformed ephemeral key record: {0}")]
    MalformedRecord(String),
    #[error("unsupported record version: {0}")]
    UnsupportedVersion(String),
    #[error("decryption failed after {attempts} attempts: {reason}")]
    DecryptionFailed { attempts: u32, reason: String },
    #[error("signer error: {0}")]
    Signer(String),
    #[error("encoding error: {0}")]
    Encoding(String),
    #[error("nostr client error: {0}")]
    NostrClient(#[from] nostr_sdk::client::Error),
    #[error("nostr key error: {0}")]
    NostrKey(#[from] nostr_sdk::nostr::key::Error),
    #[error("nostr tag error: {0}")]
    NostrTag(#[from] nostr_sdk::nostr::event::tag::Error),
    #[error("serde json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}
