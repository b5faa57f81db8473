//! Lookup tags: hashed, non-reversible indexes for ephemeral key records.
//!
//! Both the tag builder and the resolver go through [`lookup_tag`], so a name
//! published under one call site always matches the filter built by the other.

use nostr_sdk::prelude::*;
use sha2::{Digest, Sha256};

use crate::events::{event_tags, tag_value};
use crate::Error;

/// Hex SHA-256 of the exact input bytes. No trimming or case folding.
pub fn lookup_tag(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}

/// `naddr` for addressable kinds, `note` otherwise.
pub fn event_reference(event: &Event) -> Result<String, Error> {
    let encoded = if event.kind.is_addressable() {
        let tags = event_tags(event);
        let identifier = tag_value(&tags, "d").unwrap_or_default();
        let coordinate = Coordinate::new(event.kind, event.pubkey).identifier(identifier);
        Nip19Coordinate::new(coordinate, Vec::<RelayUrl>::new())
            .to_bech32()
            .map_err(|err| err.to_string())
    } else {
        event.id.to_bech32().map_err(|err| err.to_string())
    };
    encoded.map_err(Error::Encoding)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    Name(String),
    AssociatedEvent(String),
}

impl Lookup {
    pub fn name(name: impl Into<String>) -> Self {
        Self::Name(name.into())
    }

    pub fn associated_event(reference: impl Into<String>) -> Self {
        Self::AssociatedEvent(reference.into())
    }

    pub fn for_event(event: &Event) -> Result<Self, Error> {
        Ok(Self::AssociatedEvent(event_reference(event)?))
    }

    pub fn tag(&self) -> String {
        match self {
            Self::Name(name) => lookup_tag(name),
            Self::AssociatedEvent(reference) => lookup_tag(reference),
        }
    }
}
