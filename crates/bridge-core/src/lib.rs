//! Native TON transfers tagged with an owner EVM address.
//!
//! The pipeline is three steps, leaves first: [`derive`] turns a public key
//! into the owner address, [`build`] validates a [`TransferRequest`] and
//! produces the signed [`EncodedMessage`], and [`TransferOrchestrator`]
//! runs both and hands the result to an injected [`Submitter`] once.

pub mod config;
pub mod deriver;
pub mod error;
pub mod keys;
pub mod logging;
pub mod message;
pub mod orchestrator;
pub mod types;

pub use config::{TransferConfig, DEFAULT_ATTACHED_VALUE};
pub use deriver::derive;
pub use error::{SubmitError, TransferError};
pub use keys::{parse_key_material, KeyGenerator, KeyPair, OsKeyGenerator};
pub use logging::init_tracing;
pub use message::{build, DecodedMessage, EncodedMessage, BODY_LEN, MESSAGE_LEN};
pub use orchestrator::{PreparedTransfer, Submission, Submitter, TransferOrchestrator};
pub use types::{OwnerAddress, Regime, SubmissionReceipt, TransferRequest};

// ─── Text-facing helpers ─────────────────────────────────────────────
// Prompts hand over strings; these parse them and run one step.

/// Derive the checksummed owner address from a hex or base64 public key.
///
/// SEC1 encodings are normalized to the raw 64-byte form first; a raw key
/// of any other length is passed through and rejected by [`derive`].
pub fn owner_address_from_text(public_key: &str) -> Result<String, TransferError> {
    let bytes = parse_key_material(public_key)?;
    let owner = match bytes.len() {
        33 | 65 => derive(&chain_eth::raw_public_key_from_sec1(&bytes)?)?,
        _ => derive(&bytes)?,
    };
    Ok(owner.to_checksum())
}

/// Decode a hex-encoded message and check its signature against its owner.
pub fn verify_message_hex(message_hex: &str) -> Result<DecodedMessage, TransferError> {
    let hex_part = message_hex.trim().trim_start_matches("0x");
    let bytes = hex::decode(hex_part)
        .map_err(|e| TransferError::InvalidMessage(format!("not hex: {e}")))?;
    let decoded = EncodedMessage::from_bytes(bytes)?.decode()?;
    if !decoded.verify() {
        return Err(TransferError::InvalidMessage(
            "signature does not match the owner address".into(),
        ));
    }
    Ok(decoded)
}
