//! Ephemeral signer exchange over Nostr relays.
//!
//! An ephemeral signer is a secondary key pair tied to a main identity, and
//! optionally to a specific event. Its secret key is published as a record
//! encrypted to the main identity itself, indexed by hashed lookup tags so a
//! relay can filter for it without learning the plaintext name.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      EPHEMERAL-SIGNER                           │
//! │                                                                 │
//! │  ┌─────────────────────┐       ┌─────────────────────┐          │
//! │  │   save              │       │   find              │          │
//! │  │   (write path)      │       │   (read path)       │          │
//! │  │                     │       │                     │          │
//! │  │ - encode record     │       │ - fetch by #e tag   │          │
//! │  │ - build tags        │       │ - decrypt w/ retry  │          │
//! │  │ - self-encrypt,sign │       │ - decode, rebuild   │          │
//! │  └──────────┬──────────┘       └──────────┬──────────┘          │
//! │             │                             │                     │
//! │             ▼                             ▼                     │
//! │     SignerCapability  ◄────────►   RelayTransport               │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Wire format
//!
//! | Kind | Author | Content | Tags |
//! |------|--------|---------|------|
//! | 2600 | main identity | encrypted record JSON | `p`, `client`, `e`* |
//! | 0 | ephemeral identity | profile JSON | none |
//!
//! The record JSON is `{ "key", "version": "2", "event"?, ...metadata }`.
//! Each `e` tag holds the hex SHA-256 of a name or an encoded event reference.
//!
//! # Example
//!
//! ```rust,ignore
//! use ephemeral_signer::{
//!     find, generate_ephemeral_signer, save, ExchangeConfig, ExchangeContext, Lookup,
//!     SaveOptions,
//! };
//!
//! let config = ExchangeConfig {
//!     relays: vec!["wss://relay.damus.io".to_string()],
//!     ..Default::default()
//! };
//! let ctx = ExchangeContext::connect(config).await?;
//!
//! let ephemeral = generate_ephemeral_signer();
//! save(&ctx, &ephemeral, SaveOptions::named("shop-bot")).await?;
//!
//! let main = ctx.default_signer.clone().unwrap();
//! let keys = find(&ctx, main.as_ref(), &Lookup::name("shop-bot")).await?;
//! ```

mod config;
mod context;
mod error;
mod events;
mod lookup;
mod publish;
mod record;
mod relay;
mod resolve;
mod signer;
mod tags;

#[cfg(test)]
mod testing;

pub use config::{ExchangeConfig, RetryPolicy};
pub use context::ExchangeContext;
pub use error::Error;
pub use events::{
    client_tag, event_tags, lookup_ref_tag, owner_tag, tag_value, tag_values, NostrTag,
    DEFAULT_CLIENT_NAME, KIND_EPHEMERAL_SIGNER, TAG_CLIENT, TAG_LOOKUP, TAG_OWNER,
};
pub use lookup::{event_reference, lookup_tag, Lookup};
pub use publish::{save, ProfileOutcome, SaveOptions, SaveResult};
pub use record::{decode, encode, EphemeralKeyRecord, RecordVersion, RECORD_VERSION};
pub use relay::{ensure_quorum, LookupFilter, NostrRelays, PublishResult, RelayTransport};
pub use resolve::{find, find_record, ResolvedSigner};
pub use signer::{generate_ephemeral_signer, EncryptionScheme, SdkSigner, SignerCapability};
pub use tags::build_tags;

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
