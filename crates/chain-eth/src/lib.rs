//! EVM-side primitives for the TON transfer pipeline.
//!
//! This crate provides:
//! - Owner EVM address derivation from raw secp256k1 public keys
//! - EIP-55 checksummed rendering and parsing of 20-byte addresses
//! - EIP-191 personal-message signing over 32-byte digests, and signer
//!   recovery matching what an `ecrecover`-based verifier does

pub mod address;
pub mod error;
pub mod signing;

pub use address::{raw_public_key_from_sec1, EvmAddress, ADDRESS_LEN, PUBLIC_KEY_LEN};
pub use error::EthError;
pub use signing::{
    eth_signed_message_hash, keccak256, public_key_from_private, recover_signer, sign_digest,
    SIGNATURE_LEN,
};
