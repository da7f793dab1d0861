use std::fmt;

use crypto_utils::ZeroizingBytes;
use serde::{Deserialize, Serialize};

use crate::error::TransferError;

/// The 20-byte EVM address recorded as the owner of a transfer.
pub type OwnerAddress = chain_eth::EvmAddress;

/// Transfer modes recognized by the receiving proxy wallet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Regime {
    /// Plain value transfer to the destination.
    Direct = 0,
    /// Value forwarded to the destination together with a message body.
    Forward = 1,
}

impl Regime {
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for Regime {
    type Error = TransferError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Regime::Direct),
            1 => Ok(Regime::Forward),
            other => Err(TransferError::UnknownRegime(other)),
        }
    }
}

impl fmt::Display for Regime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Regime::Direct => write!(f, "direct"),
            Regime::Forward => write!(f, "forward"),
        }
    }
}

/// Everything needed to build one signed transfer message.
///
/// `regime`, `query_id` and `destination` hold caller input as given; the
/// message builder validates them. The private key is borrowed for the
/// duration of the build and never copied into the request.
#[derive(Debug, Clone)]
pub struct TransferRequest<'k> {
    pub private_key: &'k ZeroizingBytes,
    /// Amount in nanoton.
    pub value: u64,
    pub regime: u8,
    pub query_id: u128,
    pub owner_evm_address: OwnerAddress,
    pub destination: String,
}

/// Outcome of a transfer the submitter accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionReceipt {
    pub query_id: u64,
    pub owner_evm_address: OwnerAddress,
    /// Destination in raw `wc:hex` form.
    pub destination: String,
    /// Amount in nanoton.
    pub value: u64,
    /// Opaque reference returned by the submitter (a message hash, an
    /// external id, ...).
    pub reference: String,
}
