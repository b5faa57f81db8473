use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use nostr_sdk::prelude::*;
use tracing::{info, warn};

use ephemeral_signer::{
    find_record, generate_ephemeral_signer, save, EncryptionScheme, ExchangeConfig,
    ExchangeContext, Lookup, ProfileOutcome, SaveOptions, SdkSigner, SignerCapability,
};

#[derive(Debug, Parser)]
#[command(name = "ephemeral-signer")]
#[command(about = "Publish and resolve self-encrypted ephemeral Nostr signers")]
struct Args {
    /// Nostr relay URL(s) (falls back to NOSTR_RELAYS)
    #[arg(long, global = true)]
    relay: Vec<String>,
    /// Main identity secret key, hex or nsec (falls back to NOSTR_SECRET_KEY)
    #[arg(long, global = true)]
    key: Option<String>,
    /// Relay timeout in seconds
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,
    /// Record encryption: nip04 (default) or nip44
    #[arg(long, global = true)]
    encryption: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print a fresh key pair without publishing it
    Generate,
    /// Generate an ephemeral signer and publish it under a name and/or event
    Save {
        #[arg(long)]
        name: Option<String>,
        /// NIP-19 reference of the associated event
        #[arg(long)]
        event: Option<String>,
        /// Extra JSON object merged into the record
        #[arg(long)]
        metadata: Option<String>,
        /// Display name for a kind 0 profile of the ephemeral identity
        #[arg(long)]
        profile_name: Option<String>,
        #[arg(long, default_value_t = 1)]
        min_acks: usize,
    },
    /// Resolve a previously saved ephemeral signer
    Find {
        #[arg(long, conflicts_with = "event", required_unless_present = "event")]
        name: Option<String>,
        #[arg(long)]
        event: Option<String>,
    },
}

struct Connection {
    relays: Vec<String>,
    key: Option<String>,
    timeout_secs: Option<u64>,
    encryption: Option<String>,
}

impl Connection {
    async fn open(
        self,
        min_acks: usize,
    ) -> Result<(ExchangeContext, Arc<dyn SignerCapability>), Box<dyn std::error::Error>> {
        let mut config = if self.relays.is_empty() {
            ExchangeConfig::from_env()?.ok_or("missing --relay or NOSTR_RELAYS")?
        } else {
            ExchangeConfig {
                relays: self.relays,
                ..ExchangeConfig::default()
            }
        };
        config.min_acks = min_acks;
        if let Some(secs) = self.timeout_secs {
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(scheme) = self.encryption {
            config.scheme = scheme.parse::<EncryptionScheme>()?;
        }

        let scheme = config.scheme;
        let mut ctx = ExchangeContext::connect(config).await?;
        if let Some(secret) = self.key {
            let signer = SdkSigner::from_keys(Keys::parse(&secret)?).with_scheme(scheme);
            ctx = ctx.with_default_signer(Arc::new(signer));
        }

        let main = ctx
            .default_signer
            .clone()
            .ok_or("missing --key or NOSTR_SECRET_KEY")?;
        Ok((ctx, main))
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();
    let Args {
        relay,
        key,
        timeout_secs,
        encryption,
        command,
    } = Args::parse();
    let connection = Connection {
        relays: relay,
        key,
        timeout_secs,
        encryption,
    };

    match command {
        Command::Generate => {
            let keys = generate_ephemeral_signer();
            println!("pubkey: {}", keys.public_key().to_bech32()?);
            println!("secret: {}", keys.secret_key().to_bech32()?);
        }
        Command::Save {
            name,
            event,
            metadata,
            profile_name,
            min_acks,
        } => {
            let (ctx, _) = connection.open(min_acks).await?;
            let mut options = SaveOptions {
                associated_event: event,
                name,
                ..SaveOptions::default()
            };
            if let Some(raw) = metadata {
                let value: serde_json::Value = serde_json::from_str(&raw)?;
                let object = value.as_object().cloned().ok_or("metadata must be a JSON object")?;
                options = options.with_metadata(object);
            }
            if let Some(display) = profile_name {
                options = options.with_key_profile(Metadata::new().name(display));
            }

            let ephemeral = generate_ephemeral_signer();
            let result = save(&ctx, &ephemeral, options).await?;
            info!(
                event_id = %result.record.event_id,
                success = result.record.success,
                failed = result.record.failed,
                "Published ephemeral signer"
            );
            match result.profile {
                Some(ProfileOutcome::Published(profile)) => {
                    info!(event_id = %profile.event_id, "Published ephemeral signer profile")
                }
                Some(ProfileOutcome::Failed(reason)) => {
                    warn!(%reason, "Ephemeral signer saved without profile")
                }
                None => {}
            }
            println!("ephemeral pubkey: {}", ephemeral.public_key().to_bech32()?);
        }
        Command::Find { name, event } => {
            let lookup = match (name, event) {
                (Some(name), _) => Lookup::Name(name),
                (None, Some(event)) => Lookup::AssociatedEvent(event),
                (None, None) => return Err("either --name or --event is required".into()),
            };

            let (ctx, main) = connection.open(0).await?;
            match find_record(&ctx, main.as_ref(), &lookup).await? {
                Some(resolved) => {
                    println!("record: {}", resolved.event_id);
                    println!("version: {}", resolved.record.record_version()?.as_str());
                    println!("pubkey: {}", resolved.keys.public_key().to_bech32()?);
                    println!("secret: {}", resolved.keys.secret_key().to_bech32()?);
                }
                None => println!("not found"),
            }
        }
    }

    Ok(())
}
