use chain_ton::{TonAddress, TonNetwork};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::TransferError;

/// Fee budget attached to each submission: 0.35 TON.
pub const DEFAULT_ATTACHED_VALUE: u64 = 350_000_000;

/// Where transfers are sent and how much value rides along with them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransferConfig {
    #[serde(deserialize_with = "network_by_name")]
    pub network: TonNetwork,
    /// Entrypoint contract address, raw or user-friendly. Empty means the
    /// network's default entrypoint.
    #[serde(default)]
    pub entrypoint: String,
    /// Nanoton attached to the message to pay for its execution.
    pub attached_value: u64,
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            network: TonNetwork::Testnet,
            entrypoint: chain_ton::network::TESTNET_ENTRYPOINT.to_string(),
            attached_value: DEFAULT_ATTACHED_VALUE,
        }
    }
}

impl TransferConfig {
    /// Defaults for `network`. Fails when no entrypoint is known for it.
    pub fn for_network(network: TonNetwork) -> Result<Self, TransferError> {
        let entrypoint = network.default_entrypoint().ok_or_else(|| {
            TransferError::InvalidConfig(format!("no default entrypoint for {network}"))
        })?;
        Ok(Self {
            network,
            entrypoint: entrypoint.to_string(),
            attached_value: DEFAULT_ATTACHED_VALUE,
        })
    }

    /// Reads a JSON document. Missing fields take their defaults and a
    /// missing entrypoint is filled in from the network.
    pub fn from_json(json: &str) -> Result<Self, TransferError> {
        let mut config: Self = serde_json::from_str(json)
            .map_err(|e| TransferError::InvalidConfig(format!("malformed JSON: {e}")))?;
        config.validate()?;
        if config.entrypoint.trim().is_empty() {
            config.entrypoint = config.default_entrypoint()?.to_string();
        }
        Ok(config)
    }

    /// Sets the attached value from a decimal TON amount such as `"0.35"`.
    pub fn with_attached_ton(mut self, amount: &str) -> Result<Self, TransferError> {
        self.attached_value = chain_ton::to_nano(amount)?;
        Ok(self)
    }

    /// Resolves the entrypoint and checks it against the network.
    ///
    /// An empty entrypoint falls back to the network default. A
    /// user-friendly entrypoint whose testnet flag disagrees with the
    /// network is rejected; the raw form carries no flag and is not checked.
    pub fn validate(&self) -> Result<TonAddress, TransferError> {
        if self.attached_value == 0 {
            return Err(TransferError::InvalidConfig(
                "attached value must be greater than zero".into(),
            ));
        }

        let entrypoint = self.entrypoint.trim();
        let entrypoint = if entrypoint.is_empty() {
            self.default_entrypoint()?
        } else {
            entrypoint
        };

        let address = TonAddress::parse(entrypoint)
            .map_err(|e| TransferError::InvalidConfig(format!("entrypoint: {e}")))?;

        if !entrypoint.contains(':') && address.is_testnet_only() != self.network.is_testnet() {
            return Err(TransferError::InvalidConfig(format!(
                "entrypoint {entrypoint} is flagged for {}, config is for {}",
                if address.is_testnet_only() { "testnet" } else { "mainnet" },
                self.network
            )));
        }

        Ok(address)
    }

    fn default_entrypoint(&self) -> Result<&'static str, TransferError> {
        self.network.default_entrypoint().ok_or_else(|| {
            TransferError::InvalidConfig(format!(
                "no entrypoint given and none known for {}",
                self.network
            ))
        })
    }
}

/// Network names go through `TonNetwork::from_str`, so they are matched
/// case-insensitively.
fn network_by_name<'de, D: Deserializer<'de>>(deserializer: D) -> Result<TonNetwork, D::Error> {
    let name = String::deserialize(deserializer)?;
    name.parse().map_err(serde::de::Error::custom)
}
