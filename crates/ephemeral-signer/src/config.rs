use std::env;
use std::time::Duration;

use nostr_sdk::{Keys, Kind};
use rand::Rng;

use crate::events::{DEFAULT_CLIENT_NAME, KIND_EPHEMERAL_SIGNER};
use crate::signer::EncryptionScheme;
use crate::Error;

const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_MIN_ACKS: usize = 1;
const DEFAULT_MAX_ATTEMPTS: u32 = 5;
const DEFAULT_MAX_BACKOFF_MS: u64 = 1000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            max_backoff: Duration::from_millis(DEFAULT_MAX_BACKOFF_MS),
        }
    }
}

impl RetryPolicy {
    pub fn backoff(&self) -> Duration {
        let max_ms = self.max_backoff.as_millis() as u64;
        Duration::from_millis(rand::thread_rng().gen_range(0..=max_ms))
    }

    pub fn should_retry(&self, attempts: u32) -> bool {
        attempts < self.max_attempts
    }
}

#[derive(Debug, Clone)]
pub struct ExchangeConfig {
    pub relays: Vec<String>,
    pub min_acks: usize,
    pub timeout: Duration,
    pub client_name: String,
    pub kind: Kind,
    pub retry: RetryPolicy,
    pub scheme: EncryptionScheme,
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            relays: Vec::new(),
            min_acks: DEFAULT_MIN_ACKS,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            client_name: DEFAULT_CLIENT_NAME.to_string(),
            kind: Kind::Custom(KIND_EPHEMERAL_SIGNER),
            retry: RetryPolicy::default(),
            scheme: EncryptionScheme::default(),
        }
    }
}

impl ExchangeConfig {
    /// Returns `None` when `NOSTR_RELAYS` is unset or empty.
    pub fn from_env() -> Result<Option<Self>, Error> {
        let relays = match env::var("NOSTR_RELAYS") {
            Ok(value) => parse_relays(&value),
            Err(_) => Vec::new(),
        };
        if relays.is_empty() {
            return Ok(None);
        }

        let mut config = Self {
            relays,
            ..Self::default()
        };

        if let Ok(value) = env::var("NOSTR_MIN_ACKS") {
            config.min_acks = value
                .trim()
                .parse()
                .map_err(|_| Error::InvalidConfig(format!("NOSTR_MIN_ACKS: {value}")))?;
        }
        if let Ok(value) = env::var("NOSTR_TIMEOUT_SECS") {
            let secs: u64 = value
                .trim()
                .parse()
                .map_err(|_| Error::InvalidConfig(format!("NOSTR_TIMEOUT_SECS: {value}")))?;
            config.timeout = Duration::from_secs(secs);
        }
        if let Ok(value) = env::var("NOSTR_ENCRYPTION") {
            config.scheme = value.parse()?;
        }

        Ok(Some(config))
    }

    pub fn main_keys_from_env() -> Result<Option<Keys>, Error> {
        match env::var("NOSTR_SECRET_KEY") {
            Ok(value) => Ok(Some(Keys::parse(value.trim())?)),
            Err(_) => Ok(None),
        }
    }
}

pub(crate) fn parse_relays(value: &str) -> Vec<String> {
    value
        .split(',')
        .flat_map(|chunk| chunk.split_whitespace())
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_relays() {
        let relays = parse_relays("wss://relay.damus.io, wss://eden.nostr.land  wss://relay.nostr.band,,");
        assert_eq!(
            relays,
            vec![
                "wss://relay.damus.io".to_string(),
                "wss://eden.nostr.land".to_string(),
                "wss://relay.nostr.band".to_string(),
            ]
        );
        assert!(parse_relays(" , ").is_empty());
    }

    #[test]
    fn test_defaults() {
        let config = ExchangeConfig::default();
        assert_eq!(config.kind.as_u16(), 2600);
        assert_eq!(config.client_name, "cofabricate");
        assert_eq!(config.retry.max_attempts, 5);
        assert_eq!(config.retry.max_backoff, Duration::from_secs(1));
        assert_eq!(config.scheme, EncryptionScheme::Nip04);
    }

    #[test]
    fn test_backoff_is_bounded() {
        let policy = RetryPolicy {
            max_attempts: 5,
            max_backoff: Duration::from_millis(20),
        };
        for _ in 0..100 {
            assert!(policy.backoff() <= Duration::from_millis(20));
        }

        let zero = RetryPolicy {
            max_attempts: 5,
            max_backoff: Duration::ZERO,
        };
        assert_eq!(zero.backoff(), Duration::ZERO);
    }

    #[test]
    fn test_should_retry_caps_attempts() {
        let policy = RetryPolicy::default();
        assert!(policy.should_retry(1));
        assert!(policy.should_retry(4));
        assert!(!policy.should_retry(5));
    }
}
