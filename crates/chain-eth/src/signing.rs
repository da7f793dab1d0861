use k256::ecdsa::signature::hazmat::PrehashSigner;
use k256::ecdsa::{RecoveryId, Signature, SigningKey, VerifyingKey};
use sha3::{Digest, Keccak256};
use zeroize::Zeroize;

use crate::address::{EvmAddress, PUBLIC_KEY_LEN};
use crate::error::EthError;

/// Length of a recoverable signature: `r (32) || s (32) || v (1)`.
pub const SIGNATURE_LEN: usize = 65;

/// EIP-191 prefix for a 32-byte payload.
const PERSONAL_MESSAGE_PREFIX: &[u8] = b"\x19Ethereum Signed Message:\n32";

/// Keccak-256 of `data`.
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut out = [0u8; 32];
    out.copy_from_slice(&Keccak256::digest(data));
    out
}

/// Wraps a 32-byte digest in the EIP-191 personal-message envelope and
/// hashes it again. This is the value EVM wallets actually sign.
pub fn eth_signed_message_hash(digest: &[u8; 32]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(PERSONAL_MESSAGE_PREFIX);
    hasher.update(digest);

    let mut out = [0u8; 32];
    out.copy_from_slice(&hasher.finalize());
    out
}

/// Signs `digest` as an EIP-191 personal message.
///
/// Returns `r || s || v` where `v` is the raw recovery id (0 or 1). Verifiers
/// that expect 27/28 add the offset themselves.
pub fn sign_digest(
    digest: &[u8; 32],
    private_key: &[u8; 32],
) -> Result<[u8; SIGNATURE_LEN], EthError> {
    let signing_key = signing_key_from_bytes(private_key)?;
    let prehash = eth_signed_message_hash(digest);

    let (signature, recovery_id): (Signature, RecoveryId) = signing_key
        .sign_prehash(&prehash)
        .map_err(|e| EthError::SigningError(e.to_string()))?;

    let mut sig = [0u8; SIGNATURE_LEN];
    sig[..64].copy_from_slice(&signature.to_bytes());
    sig[64] = recovery_id.to_byte();
    Ok(sig)
}

/// Recovers the address that produced `signature` over the EIP-191 envelope
/// of `digest`. Accepts `v` as 0/1 or 27/28.
pub fn recover_signer(
    digest: &[u8; 32],
    signature: &[u8; SIGNATURE_LEN],
) -> Result<EvmAddress, EthError> {
    let v = signature[64];
    let recid = match v {
        0 | 1 => RecoveryId::from_byte(v),
        27 | 28 => RecoveryId::from_byte(v - 27),
        _ => None,
    }
    .ok_or_else(|| EthError::InvalidSignature(format!("invalid recovery id {v}")))?;

    let sig = Signature::from_slice(&signature[..64])
        .map_err(|e| EthError::InvalidSignature(e.to_string()))?;

    let prehash = eth_signed_message_hash(digest);
    let recovered = VerifyingKey::recover_from_prehash(&prehash, &sig, recid)
        .map_err(|e| EthError::InvalidSignature(format!("recovery failed: {e}")))?;

    let uncompressed = recovered.to_encoded_point(false);
    EvmAddress::from_public_key(&uncompressed.as_bytes()[1..])
}

/// Computes the raw 64-byte public key for a 32-byte private scalar.
pub fn public_key_from_private(private_key: &[u8; 32]) -> Result<[u8; PUBLIC_KEY_LEN], EthError> {
    let signing_key = signing_key_from_bytes(private_key)?;
    let uncompressed = signing_key.verifying_key().to_encoded_point(false);

    let mut raw = [0u8; PUBLIC_KEY_LEN];
    raw.copy_from_slice(&uncompressed.as_bytes()[1..]);
    Ok(raw)
}

fn signing_key_from_bytes(private_key: &[u8; 32]) -> Result<SigningKey, EthError> {
    let mut key_bytes = *private_key;
    let signing_key = SigningKey::from_bytes((&key_bytes).into())
        .map_err(|e| EthError::InvalidPrivateKey(e.to_string()));
    key_bytes.zeroize();
    signing_key
}
