use nostr_sdk::prelude::*;
use serde::{Deserialize, Serialize};

use crate::Error;

pub const KIND_EPHEMERAL_SIGNER: u16 = 2600;

pub const DEFAULT_CLIENT_NAME: &str = "cofabricate";

pub const TAG_OWNER: &str = "p";
pub const TAG_CLIENT: &str = "client";
pub const TAG_LOOKUP: &str = "e";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
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

    pub fn to_sdk_tag(&self) -> Result<Tag, Error> {
        let mut parts = Vec::with_capacity(1 + self.values.len());
        parts.push(self.name.clone());
        parts.extend(self.values.clone());
        Ok(Tag::parse(parts)?)
    }

    pub fn from_sdk_tag(tag: &Tag) -> Self {
        let parts = tag.clone().to_vec();
        let name = parts.first().cloned().unwrap_or_default();
        let values = parts.into_iter().skip(1).collect();
        Self { name, values }
    }
}

pub fn owner_tag(pubkey: &PublicKey) -> NostrTag {
    NostrTag::new(TAG_OWNER, vec![pubkey.to_hex()])
}

pub fn client_tag(name: &str) -> NostrTag {
    NostrTag::new(TAG_CLIENT, vec![name.to_string()])
}

pub fn lookup_ref_tag(lookup_tag: &str) -> NostrTag {
    NostrTag::new(TAG_LOOKUP, vec![lookup_tag.to_string()])
}

pub fn tag_value<'a>(tags: &'a [NostrTag], name: &str) -> Option<&'a str> {
    tags.iter()
        .find(|tag| tag.name == name)
        .and_then(|tag| tag.values.first().map(|s| s.as_str()))
}

pub fn tag_values<'a>(tags: &'a [NostrTag], name: &str) -> Vec<&'a str> {
    tags.iter()
        .filter(|tag| tag.name == name)
        .filter_map(|tag| tag.values.first().map(|s| s.as_str()))
        .collect()
}

pub fn event_tags(event: &Event) -> Vec<NostrTag> {
    event.tags.iter().map(NostrTag::from_sdk_tag).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_helpers() {
        let tags = vec![
            client_tag(DEFAULT_CLIENT_NAME),
            lookup_ref_tag("aa"),
            lookup_ref_tag("bb"),
        ];
        assert_eq!(tag_value(&tags, TAG_CLIENT), Some(DEFAULT_CLIENT_NAME));
        assert_eq!(tag_value(&tags, TAG_LOOKUP), Some("aa"));
        assert_eq!(tag_values(&tags, TAG_LOOKUP), vec!["aa", "bb"]);
        assert!(tag_value(&tags, TAG_OWNER).is_none());
    }

    #[test]
    fn test_tag_conversion() {
        let tag = client_tag("cofabricate");
        let sdk_tag = tag.to_sdk_tag().unwrap();
        let roundtrip = NostrTag::from_sdk_tag(&sdk_tag);
        assert_eq!(tag, roundtrip);
    }

    #[test]
    fn test_owner_tag_uses_hex_pubkey() {
        let keys = Keys::generate();
        let tag = owner_tag(&keys.public_key());
        assert_eq!(tag.name, "p");
        assert_eq!(tag.values, vec![keys.public_key().to_hex()]);
    }
}
