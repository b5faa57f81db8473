use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use nostr_sdk::prelude::*;

use crate::Error;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EncryptionScheme {
    #[default]
    Nip04,
    Nip44,
}

impl FromStr for EncryptionScheme {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "nip04" | "nip-04" => Ok(Self::Nip04),
            "nip44" | "nip-44" => Ok(Self::Nip44),
            other => Err(Error::InvalidConfig(format!(
                "unknown encryption scheme: {other}"
            ))),
        }
    }
}

/// Records are self-addressed by passing the identity's own public key.
#[async_trait]
pub trait SignerCapability: Send + Sync {
    async fn public_key(&self) -> Result<PublicKey, Error>;
    async fn encrypt(&self, recipient: &PublicKey, plaintext: &str) -> Result<String, Error>;
    async fn decrypt(&self, sender: &PublicKey, ciphertext: &str) -> Result<String, Error>;
    async fn sign(&self, unsigned: UnsignedEvent) -> Result<Event, Error>;
}

#[derive(Clone)]
pub struct SdkSigner {
    signer: Arc<dyn NostrSigner>,
    scheme: EncryptionScheme,
}

impl SdkSigner {
    pub fn new(signer: Arc<dyn NostrSigner>, scheme: EncryptionScheme) -> Self {
        Self { signer, scheme }
    }

    pub fn from_keys(keys: Keys) -> Self {
        Self::new(Arc::new(keys), EncryptionScheme::default())
    }

    pub fn with_scheme(mut self, scheme: EncryptionScheme) -> Self {
        self.scheme = scheme;
        self
    }

    pub fn scheme(&self) -> EncryptionScheme {
        self.scheme
    }
}

#[async_trait]
impl SignerCapability for SdkSigner {
    async fn public_key(&self) -> Result<PublicKey, Error> {
        self.signer
            .get_public_key()
            .await
            .map_err(|err| Error::Signer(err.to_string()))
    }

    async fn encrypt(&self, recipient: &PublicKey, plaintext: &str) -> Result<String, Error> {
        let result = match self.scheme {
            EncryptionScheme::Nip04 => self.signer.nip04_encrypt(recipient, plaintext).await,
            EncryptionScheme::Nip44 => self.signer.nip44_encrypt(recipient, plaintext).await,
        };
        result.map_err(|err| Error::Signer(err.to_string()))
    }

    async fn decrypt(&self, sender: &PublicKey, ciphertext: &str) -> Result<String, Error> {
        let result = match self.scheme {
            EncryptionScheme::Nip04 => self.signer.nip04_decrypt(sender, ciphertext).await,
            EncryptionScheme::Nip44 => self.signer.nip44_decrypt(sender, ciphertext).await,
        };
        result.map_err(|err| Error::Signer(err.to_string()))
    }

    async fn sign(&self, unsigned: UnsignedEvent) -> Result<Event, Error> {
        self.signer
            .sign_event(unsigned)
            .await
            .map_err(|err| Error::Signer(err.to_string()))
    }
}

pub fn generate_ephemeral_signer() -> Keys {
    Keys::generate()
}
