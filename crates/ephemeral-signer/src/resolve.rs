use nostr_sdk::prelude::*;
use tracing::{debug, error, info, warn};

use crate::config::RetryPolicy;
use crate::context::ExchangeContext;
use crate::lookup::Lookup;
use crate::record::{self, EphemeralKeyRecord};
use crate::relay::LookupFilter;
use crate::signer::SignerCapability;
use crate::Error;

#[derive(Debug, Clone)]
pub struct ResolvedSigner {
    pub keys: Keys,
    pub record: EphemeralKeyRecord,
    pub event_id: EventId,
}

/// Returns `Ok(None)` when `main_signer` never published a record under `lookup`.
pub async fn find(
    ctx: &ExchangeContext,
    main_signer: &dyn SignerCapability,
    lookup: &Lookup,
) -> Result<Option<Keys>, Error> {
    Ok(find_record(ctx, main_signer, lookup)
        .await?
        .map(|resolved| resolved.keys))
}

pub async fn find_record(
    ctx: &ExchangeContext,
    main_signer: &dyn SignerCapability,
    lookup: &Lookup,
) -> Result<Option<ResolvedSigner>, Error> {
    let main_pubkey = main_signer.public_key().await?;
    let filter = LookupFilter::new(ctx.config.kind, lookup.tag()).author(main_pubkey);

    let Some(event) = ctx.relays.fetch_one(&filter).await? else {
        debug!(lookup_tag = %filter.lookup_tag, "No ephemeral signer record found");
        return Ok(None);
    };

    let plaintext =
        decrypt_with_retry(main_signer, &main_pubkey, &event.content, &ctx.config.retry).await?;
    let record = record::decode(&plaintext)?;
    let keys = record.keys()?;

    info!(
        event_id = %event.id,
        ephemeral = %keys.public_key(),
        "Resolved ephemeral signer"
    );

    Ok(Some(ResolvedSigner {
        keys,
        record,
        event_id: event.id,
    }))
}

async fn decrypt_with_retry(
    signer: &dyn SignerCapability,
    sender: &PublicKey,
    ciphertext: &str,
    policy: &RetryPolicy,
) -> Result<String, Error> {
    let mut attempts = 0;
    loop {
        attempts += 1;
        match signer.decrypt(sender, ciphertext).await {
            Ok(plaintext) => {
                if attempts > 1 {
                    debug!(attempts, "Decrypted ephemeral signer record after retry");
                }
                return Ok(plaintext);
            }
            Err(err) if policy.should_retry(attempts) => {
                let delay = policy.backoff();
                warn!(
                    attempt = attempts,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "Failed to decrypt ephemeral signer record, retrying"
                );
                tokio::time::sleep(delay).await;
            }
            Err(err) => {
                error!(attempts, error = %err, "Failed to decrypt ephemeral signer record");
                return Err(Error::DecryptionFailed {
                    attempts,
                    reason: err.to_string(),
                });
            }
        }
    }
}
