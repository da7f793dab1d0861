use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TonError;

/// Entrypoint contract deployed on testnet.
pub const TESTNET_ENTRYPOINT: &str = "kQAGJK50PW_a1ZbQWK0yldegu56FlX0nXKQIa7xzoWCzQiV2";

/// Supported TON networks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TonNetwork {
    Mainnet,
    #[default]
    Testnet,
}

impl TonNetwork {
    /// Whether this is a test network.
    pub fn is_testnet(self) -> bool {
        matches!(self, TonNetwork::Testnet)
    }

    /// The entrypoint contract known for this network, if any.
    pub fn default_entrypoint(self) -> Option<&'static str> {
        match self {
            TonNetwork::Mainnet => None,
            TonNetwork::Testnet => Some(TESTNET_ENTRYPOINT),
        }
    }

    /// Display name
    pub fn display_name(self) -> &'static str {
        match self {
            TonNetwork::Mainnet => "TON Mainnet",
            TonNetwork::Testnet => "TON Testnet",
        }
    }
}

impl fmt::Display for TonNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TonNetwork::Mainnet => write!(f, "mainnet"),
            TonNetwork::Testnet => write!(f, "testnet"),
        }
    }
}

impl FromStr for TonNetwork {
    type Err = TonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mainnet" => Ok(TonNetwork::Mainnet),
            "testnet" => Ok(TonNetwork::Testnet),
            other => Err(TonError::UnknownNetwork(other.to_string())),
        }
    }
}
