//! Key pairs: generation on demand and parsing from user-supplied text.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use crypto_utils::random::random_bytes_fixed;
use crypto_utils::ZeroizingBytes;
use zeroize::Zeroize;

use crate::error::TransferError;

const PRIVATE_KEY_LEN: usize = 32;

/// A secp256k1 key pair for one transfer.
///
/// The private key is zeroized on drop and redacted from `Debug`. The
/// public key is kept in raw `X || Y` form when built through the checked
/// constructors; [`KeyPair::new`] stores whatever it is given so that
/// length validation happens where the key is used.
#[derive(Debug, Clone)]
pub struct KeyPair {
    private_key: ZeroizingBytes,
    public_key: Vec<u8>,
}

impl KeyPair {
    /// Wraps key material as is, without consistency checks.
    pub fn new(private_key: Vec<u8>, public_key: Vec<u8>) -> Self {
        Self {
            private_key: ZeroizingBytes::new(private_key),
            public_key,
        }
    }

    /// Builds a pair from a 32-byte private scalar, computing the public key.
    pub fn from_private_key(private_key: &[u8]) -> Result<Self, TransferError> {
        if private_key.len() != PRIVATE_KEY_LEN {
            return Err(TransferError::InvalidKeyMaterial(format!(
                "private key must be {PRIVATE_KEY_LEN} bytes, got {}",
                private_key.len()
            )));
        }

        let mut scalar = [0u8; PRIVATE_KEY_LEN];
        scalar.copy_from_slice(private_key);
        let public = chain_eth::public_key_from_private(&scalar).map_err(|e| {
            TransferError::InvalidKeyMaterial(format!("private key rejected: {e}"))
        });
        scalar.zeroize();

        Ok(Self {
            private_key: ZeroizingBytes::from(private_key),
            public_key: public?.to_vec(),
        })
    }

    /// Builds a pair from text prompts: a private key and the public key the
    /// user claims belongs to it.
    ///
    /// Both accept hex (with or without `0x`) or standard base64. The public
    /// key may be raw (64 bytes) or SEC1 (33 or 65 bytes). It must match the
    /// private key.
    pub fn from_text(private_key: &str, public_key: &str) -> Result<Self, TransferError> {
        let private_bytes = parse_key_material(private_key)?;
        let pair = Self::from_private_key(&private_bytes)?;

        let claimed = parse_key_material(public_key)?;
        let claimed_raw = match claimed.len() {
            chain_eth::PUBLIC_KEY_LEN => claimed.to_vec(),
            _ => chain_eth::raw_public_key_from_sec1(&claimed)?.to_vec(),
        };

        if claimed_raw != pair.public_key {
            return Err(TransferError::InvalidKeyMaterial(
                "public key does not belong to the private key".into(),
            ));
        }

        Ok(pair)
    }

    pub fn private_key(&self) -> &ZeroizingBytes {
        &self.private_key
    }

    pub fn public_key(&self) -> &[u8] {
        &self.public_key
    }

    /// Public key as standard base64, the form wallets usually print.
    pub fn public_key_base64(&self) -> String {
        STANDARD.encode(&self.public_key)
    }
}

/// Produces key pairs on demand.
pub trait KeyGenerator {
    fn generate(&self) -> Result<KeyPair, TransferError>;
}

/// Draws private keys from the operating system RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsKeyGenerator;

impl KeyGenerator for OsKeyGenerator {
    fn generate(&self) -> Result<KeyPair, TransferError> {
        // A uniformly random 32-byte string is outside the curve order with
        // probability ~2^-128, so a handful of attempts is plenty.
        for _ in 0..8 {
            let mut candidate: [u8; PRIVATE_KEY_LEN] = random_bytes_fixed();
            let pair = KeyPair::from_private_key(&candidate);
            candidate.zeroize();
            if let Ok(pair) = pair {
                return Ok(pair);
            }
        }
        Err(TransferError::InvalidKeyMaterial(
            "could not draw a valid secp256k1 scalar".into(),
        ))
    }
}

/// Parses raw key bytes from text.
///
/// Hex is tried first (an optional `0x` prefix is stripped), then standard
/// base64. Input that is valid as both is read as hex.
pub fn parse_key_material(text: &str) -> Result<ZeroizingBytes, TransferError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(TransferError::InvalidKeyMaterial("empty key".into()));
    }

    let hex_part = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    if let Ok(bytes) = hex::decode(hex_part) {
        return Ok(ZeroizingBytes::new(bytes));
    }

    STANDARD
        .decode(trimmed)
        .map(ZeroizingBytes::new)
        .map_err(|_| TransferError::InvalidKeyMaterial("expected hex or base64 key".into()))
}
