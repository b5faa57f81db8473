use std::sync::Arc;

use nostr_sdk::prelude::*;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::context::ExchangeContext;
use crate::events::{tag_values, NostrTag, TAG_LOOKUP};
use crate::lookup::event_reference;
use crate::record;
use crate::relay::{ensure_quorum, PublishResult};
use crate::signer::{SdkSigner, SignerCapability};
use crate::tags::build_tags;
use crate::Error;

#[derive(Clone, Default)]
pub struct SaveOptions {
    pub associated_event: Option<String>,
    pub name: Option<String>,
    pub metadata: Map<String, Value>,
    pub key_profile: Option<Metadata>,
    pub main_signer: Option<Arc<dyn SignerCapability>>,
}

impl SaveOptions {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn for_event(reference: impl Into<String>) -> Self {
        Self {
            associated_event: Some(reference.into()),
            ..Self::default()
        }
    }

    pub fn for_nostr_event(event: &Event) -> Result<Self, Error> {
        Ok(Self::for_event(event_reference(event)?))
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_metadata(mut self, metadata: Map<String, Value>) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn with_key_profile(mut self, profile: Metadata) -> Self {
        self.key_profile = Some(profile);
        self
    }

    pub fn with_main_signer(mut self, signer: Arc<dyn SignerCapability>) -> Self {
        self.main_signer = Some(signer);
        self
    }
}

/// The profile is published after the record, so its failure never fails `save`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileOutcome {
    Published(PublishResult),
    Failed(String),
}

impl ProfileOutcome {
    pub fn published(&self) -> Option<&PublishResult> {
        match self {
            Self::Published(result) => Some(result),
            Self::Failed(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveResult {
    pub record: PublishResult,
    pub lookup_tags: Vec<String>,
    pub profile: Option<ProfileOutcome>,
}

pub async fn save(
    ctx: &ExchangeContext,
    target: &Keys,
    options: SaveOptions,
) -> Result<SaveResult, Error> {
    let main_signer = options
        .main_signer
        .clone()
        .or_else(|| ctx.default_signer.clone())
        .ok_or(Error::NoSignerAvailable)?;

    let main_pubkey = main_signer.public_key().await?;
    let content = record::encode(
        target,
        options.associated_event.as_deref(),
        &options.metadata,
    )?;
    let tags = build_tags(&main_pubkey, &ctx.config.client_name, &options);
    let lookup_tags: Vec<String> = tag_values(&tags, TAG_LOOKUP)
        .into_iter()
        .map(String::from)
        .collect();
    let sdk_tags = tags
        .iter()
        .map(NostrTag::to_sdk_tag)
        .collect::<Result<Vec<_>, _>>()?;

    let ciphertext = main_signer.encrypt(&main_pubkey, &content).await?;
    let unsigned = EventBuilder::new(ctx.config.kind, ciphertext)
        .tags(sdk_tags)
        .build(main_pubkey);
    let event = main_signer.sign(unsigned).await?;
    debug!(event_id = %event.id, lookups = lookup_tags.len(), "Signed ephemeral signer record");

    let record = ctx.relays.publish(&event).await?;
    ensure_quorum(&record, ctx.config.min_acks)?;
    info!(
        event_id = %record.event_id,
        ephemeral = %target.public_key(),
        "Saved ephemeral signer"
    );

    let profile = match &options.key_profile {
        Some(profile) => Some(match publish_profile(ctx, target, profile).await {
            Ok(result) => ProfileOutcome::Published(result),
            Err(err) => {
                warn!(
                    record = %record.event_id,
                    ephemeral = %target.public_key(),
                    error = %err,
                    "Ephemeral signer profile publish failed"
                );
                ProfileOutcome::Failed(err.to_string())
            }
        }),
        None => None,
    };

    Ok(SaveResult {
        record,
        lookup_tags,
        profile,
    })
}

async fn publish_profile(
    ctx: &ExchangeContext,
    target: &Keys,
    profile: &Metadata,
) -> Result<PublishResult, Error> {
    let signer = SdkSigner::from_keys(target.clone());
    let unsigned = EventBuilder::metadata(profile).build(target.public_key());
    let event = signer.sign(unsigned).await?;
    let result = ctx.relays.publish(&event).await?;
    ensure_quorum(&result, ctx.config.min_acks)?;
    Ok(result)
}
