use std::sync::Arc;

use crate::config::ExchangeConfig;
use crate::relay::{NostrRelays, RelayTransport};
use crate::signer::{SdkSigner, SignerCapability};
use crate::Error;

#[derive(Clone)]
pub struct ExchangeContext {
    pub relays: Arc<dyn RelayTransport>,
    pub default_signer: Option<Arc<dyn SignerCapability>>,
    pub config: ExchangeConfig,
}

impl ExchangeContext {
    pub fn new(relays: Arc<dyn RelayTransport>, config: ExchangeConfig) -> Self {
        Self {
            relays,
            default_signer: None,
            config,
        }
    }

    pub fn with_default_signer(mut self, signer: Arc<dyn SignerCapability>) -> Self {
        self.default_signer = Some(signer);
        self
    }

    pub async fn connect(config: ExchangeConfig) -> Result<Self, Error> {
        let relays = NostrRelays::new(&config).await?;
        let mut context = Self::new(Arc::new(relays), config);

        if let Some(keys) = ExchangeConfig::main_keys_from_env()? {
            let signer = SdkSigner::from_keys(keys).with_scheme(context.config.scheme);
            context = context.with_default_signer(Arc::new(signer));
        }

        Ok(context)
    }
}
