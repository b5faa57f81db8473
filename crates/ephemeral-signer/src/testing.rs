//! In-memory doubles for the relay transport and signer capability.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use nostr_sdk::prelude::*;

use crate::events::{event_tags, tag_values, TAG_LOOKUP};
use crate::relay::{LookupFilter, PublishResult, RelayTransport};
use crate::signer::{SdkSigner, SignerCapability};
use crate::Error;

#[derive(Default)]
pub struct MemoryRelay {
    events: Mutex<Vec<Event>>,
    publish_calls: AtomicUsize,
    fetch_calls: AtomicUsize,
    acks: Option<usize>,
    rejected_kind: Option<Kind>,
}

impl MemoryRelay {
    pub fn with_acks(acks: usize) -> Self {
        Self {
            acks: Some(acks),
            ..Self::default()
        }
    }

    pub fn rejecting(kind: Kind) -> Self {
        Self {
            rejected_kind: Some(kind),
            ..Self::default()
        }
    }

    pub fn insert(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    pub fn publish_calls(&self) -> usize {
        self.publish_calls.load(Ordering::SeqCst)
    }

    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RelayTransport for MemoryRelay {
    async fn publish(&self, event: &Event) -> Result<PublishResult, Error> {
        self.publish_calls.fetch_add(1, Ordering::SeqCst);
        if self.rejected_kind == Some(event.kind) {
            return Err(Error::PublishFailed(format!(
                "kind {} rejected",
                event.kind.as_u16()
            )));
        }
        self.insert(event.clone());
        let success = self.acks.unwrap_or(1);
        Ok(PublishResult {
            event_id: event.id.to_string(),
            success,
            failed: usize::from(success == 0),
        })
    }

    async fn fetch_one(&self, filter: &LookupFilter) -> Result<Option<Event>, Error> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        let events = self.events.lock().unwrap();
        let found = events
            .iter()
            .rev()
            .find(|event| {
                let tags = event_tags(event);
                event.kind == filter.kind
                    && filter.author.map_or(true, |author| event.pubkey == author)
                    && tag_values(&tags, TAG_LOOKUP).contains(&filter.lookup_tag.as_str())
            })
            .cloned();
        Ok(found)
    }
}

pub struct FailingRelay;

#[async_trait]
impl RelayTransport for FailingRelay {
    async fn publish(&self, _event: &Event) -> Result<PublishResult, Error> {
        Err(Error::PublishFailed("connection refused".to_string()))
    }

    async fn fetch_one(&self, _filter: &LookupFilter) -> Result<Option<Event>, Error> {
        Ok(None)
    }
}

/// Key-backed signer whose first `failures` decrypt calls fail.
pub struct FlakySigner {
    inner: SdkSigner,
    failures: usize,
    decrypt_calls: AtomicUsize,
}

impl FlakySigner {
    pub fn new(keys: Keys, failures: usize) -> Self {
        Self {
            inner: SdkSigner::from_keys(keys),
            failures,
            decrypt_calls: AtomicUsize::new(0),
        }
    }

    pub fn decrypt_calls(&self) -> usize {
        self.decrypt_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SignerCapability for FlakySigner {
    async fn public_key(&self) -> Result<PublicKey, Error> {
        self.inner.public_key().await
    }

    async fn encrypt(&self, recipient: &PublicKey, plaintext: &str) -> Result<String, Error> {
        self.inner.encrypt(recipient, plaintext).await
    }

    async fn decrypt(&self, sender: &PublicKey, ciphertext: &str) -> Result<String, Error> {
        let call = self.decrypt_calls.fetch_add(1, Ordering::SeqCst);
        if call < self.failures {
            return Err(Error::Signer("signer unavailable".to_string()));
        }
        self.inner.decrypt(sender, ciphertext).await
    }

    async fn sign(&self, unsigned: UnsignedEvent) -> Result<Event, Error> {
        self.inner.sign(unsigned).await
    }
}
