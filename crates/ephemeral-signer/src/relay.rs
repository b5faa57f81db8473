use std::time::Duration;

use async_trait::async_trait;
use nostr_sdk::prelude::*;
use tracing::{debug, info};

use crate::config::ExchangeConfig;
use crate::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishResult {
    pub event_id: String,
    pub success: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupFilter {
    pub kind: Kind,
    pub lookup_tag: String,
    pub author: Option<PublicKey>,
}

impl LookupFilter {
    pub fn new(kind: Kind, lookup_tag: impl Into<String>) -> Self {
        Self {
            kind,
            lookup_tag: lookup_tag.into(),
            author: None,
        }
    }

    pub fn author(mut self, author: PublicKey) -> Self {
        self.author = Some(author);
        self
    }

    pub fn to_sdk_filter(&self) -> Filter {
        let mut filter = Filter::new()
            .kind(self.kind)
            .custom_tag(SingleLetterTag::lowercase(Alphabet::E), self.lookup_tag.clone())
            .limit(1);
        if let Some(author) = self.author {
            filter = filter.author(author);
        }
        filter
    }
}

#[async_trait]
pub trait RelayTransport: Send + Sync {
    async fn publish(&self, event: &Event) -> Result<PublishResult, Error>;
    async fn fetch_one(&self, filter: &LookupFilter) -> Result<Option<Event>, Error>;
}

/// Fails with [`Error::PublishFailed`] when fewer than `min_acks` relays
/// accepted the event. A `min_acks` of zero accepts any outcome.
pub fn ensure_quorum(result: &PublishResult, min_acks: usize) -> Result<(), Error> {
    if min_acks > 0 && result.success < min_acks {
        return Err(Error::PublishFailed(format!(
            "quorum not met for {}: required {min_acks}, got {} ({} failed)",
            result.event_id, result.success, result.failed
        )));
    }
    Ok(())
}

#[derive(Clone)]
pub struct NostrRelays {
    client: Client,
    timeout: Duration,
}

impl NostrRelays {
    pub async fn new(config: &ExchangeConfig) -> Result<Self, Error> {
        let client = Client::default();
        for relay in &config.relays {
            client.add_relay(relay).await?;
        }

        client.connect().await;
        Ok(Self {
            client,
            timeout: config.timeout,
        })
    }

    pub fn client(&self) -> &Client {
        &self.client
    }
}

#[async_trait]
impl RelayTransport for NostrRelays {
    async fn publish(&self, event: &Event) -> Result<PublishResult, Error> {
        let output = tokio::time::timeout(self.timeout, self.client.send_event(event))
            .await
            .map_err(|_| {
                Error::PublishFailed(format!("timed out after {}s", self.timeout.as_secs()))
            })?
            .map_err(|err| Error::PublishFailed(err.to_string()))?;

        let success = output.success.len();
        let failed = output.failed.len();
        let event_id = output.id().to_string();
        info!(event_id = %event_id, kind = event.kind.as_u16(), success, failed, "Published nostr event");

        Ok(PublishResult {
            event_id,
            success,
            failed,
        })
    }

    async fn fetch_one(&self, filter: &LookupFilter) -> Result<Option<Event>, Error> {
        let events = self
            .client
            .fetch_events(filter.to_sdk_filter(), self.timeout)
            .await?;

        debug!(lookup_tag = %filter.lookup_tag, found = events.len(), "Fetched ephemeral signer records");
        Ok(events.into_iter().next())
    }
}
