//! Signed transfer message: fixed-width layout, builder and decoder.
//!
//! Layout (all integers big-endian):
//!
//! ```text
//! offset  width  field
//!      0      1  regime
//!      1      8  query id
//!      9     20  owner EVM address
//!     29      8  value (nanoton)
//!     37     33  destination (workchain byte + account id)
//!     70     65  signature r || s || v over bytes [0, 70)
//! ```
//!
//! The signature is secp256k1 over the EIP-191 personal-message hash of
//! `keccak256(body)`, so the EVM side can `ecrecover` the owner address.

use std::fmt;

use chain_eth::SIGNATURE_LEN;
use chain_ton::TonAddress;
use tracing::debug;
use zeroize::Zeroize;

use crate::error::TransferError;
use crate::types::{OwnerAddress, Regime, TransferRequest};

const REGIME_OFFSET: usize = 0;
const QUERY_ID_OFFSET: usize = REGIME_OFFSET + 1;
const OWNER_OFFSET: usize = QUERY_ID_OFFSET + 8;
const VALUE_OFFSET: usize = OWNER_OFFSET + chain_eth::ADDRESS_LEN;
const DESTINATION_OFFSET: usize = VALUE_OFFSET + 8;

/// Length of the signed part of the message.
pub const BODY_LEN: usize = DESTINATION_OFFSET + chain_ton::WIRE_LEN;

/// Total encoded length, body plus signature.
pub const MESSAGE_LEN: usize = BODY_LEN + SIGNATURE_LEN;

/// Largest query id that fits the 64-bit deduplication slot.
pub const MAX_QUERY_ID: u128 = u64::MAX as u128;

/// Canonical, signed transfer message handed to the submitter.
#[derive(Clone, PartialEq, Eq)]
pub struct EncodedMessage(Vec<u8>);

impl EncodedMessage {
    /// Wraps bytes received from elsewhere after checking the length.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, TransferError> {
        if bytes.len() != MESSAGE_LEN {
            return Err(TransferError::InvalidMessage(format!(
                "expected {MESSAGE_LEN} bytes, got {}",
                bytes.len()
            )));
        }
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The signed part.
    pub fn body(&self) -> &[u8] {
        &self.0[..BODY_LEN]
    }

    pub fn signature(&self) -> [u8; SIGNATURE_LEN] {
        let mut sig = [0u8; SIGNATURE_LEN];
        sig.copy_from_slice(&self.0[BODY_LEN..]);
        sig
    }

    /// `keccak256(body)`, the digest the signature commits to.
    pub fn body_hash(&self) -> [u8; 32] {
        chain_eth::keccak256(self.body())
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }

    /// Splits the message back into its fields.
    pub fn decode(&self) -> Result<DecodedMessage, TransferError> {
        let bytes = &self.0;

        let regime = Regime::try_from(bytes[REGIME_OFFSET])?;
        let query_id = read_u64(&bytes[QUERY_ID_OFFSET..OWNER_OFFSET]);
        let owner_evm_address = OwnerAddress::from_slice(&bytes[OWNER_OFFSET..VALUE_OFFSET])?;
        let value = read_u64(&bytes[VALUE_OFFSET..DESTINATION_OFFSET]);
        let destination = TonAddress::from_bytes(&bytes[DESTINATION_OFFSET..BODY_LEN])?;

        Ok(DecodedMessage {
            regime,
            query_id,
            owner_evm_address,
            value,
            destination,
            signature: self.signature(),
            body_hash: self.body_hash(),
        })
    }
}

impl fmt::Debug for EncodedMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EncodedMessage({})", self.to_hex())
    }
}

impl AsRef<[u8]> for EncodedMessage {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Fields of an [`EncodedMessage`] parsed by layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedMessage {
    pub regime: Regime,
    pub query_id: u64,
    pub owner_evm_address: OwnerAddress,
    pub value: u64,
    pub destination: TonAddress,
    pub signature: [u8; SIGNATURE_LEN],
    body_hash: [u8; 32],
}

impl DecodedMessage {
    /// Recovers the address that signed the body, as the receiver does.
    pub fn recover_signer(&self) -> Result<OwnerAddress, TransferError> {
        Ok(chain_eth::recover_signer(&self.body_hash, &self.signature)?)
    }

    /// Whether the signer is the owner named in the message.
    pub fn verify(&self) -> bool {
        matches!(self.recover_signer(), Ok(signer) if signer == self.owner_evm_address)
    }
}

/// Validates `request`, lays out its fields and signs them.
///
/// Checks run in a fixed order (value, regime, query id, destination) and
/// stop at the first failure. The private key is only read once all of them
/// passed.
pub fn build(request: &TransferRequest<'_>) -> Result<EncodedMessage, TransferError> {
    if request.value == 0 {
        return Err(TransferError::InvalidAmount(
            "value must be greater than zero".into(),
        ));
    }
    let regime = Regime::try_from(request.regime)?;
    let query_id = u64::try_from(request.query_id)
        .map_err(|_| TransferError::QueryIdOutOfRange(request.query_id))?;
    let destination = TonAddress::parse(&request.destination)?;

    let mut bytes = Vec::with_capacity(MESSAGE_LEN);
    bytes.push(regime.as_u8());
    bytes.extend_from_slice(&query_id.to_be_bytes());
    bytes.extend_from_slice(request.owner_evm_address.as_bytes());
    bytes.extend_from_slice(&request.value.to_be_bytes());
    bytes.extend_from_slice(&destination.to_bytes());
    debug_assert_eq!(bytes.len(), BODY_LEN);

    let digest = chain_eth::keccak256(&bytes);
    let mut private_key: [u8; 32] = request
        .private_key
        .to_array()
        .map_err(|e| TransferError::SigningFailed(e.to_string()))?;
    let signature = chain_eth::sign_digest(&digest, &private_key)
        .map_err(|e| TransferError::SigningFailed(e.to_string()));
    private_key.zeroize();
    bytes.extend_from_slice(&signature?);

    debug!(
        %regime,
        query_id,
        owner = %request.owner_evm_address,
        value = request.value,
        destination = %destination.to_raw_string(),
        "built transfer message"
    );

    Ok(EncodedMessage(bytes))
}

fn read_u64(bytes: &[u8]) -> u64 {
    let mut buf = [0u8; 8];
    buf.copy_from_slice(bytes);
    u64::from_be_bytes(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deriver::derive;
    use crate::keys::KeyPair;
    use crypto_utils::ZeroizingBytes;

    const DESTINATION: &str = "0QCyq_hrs4smOyq_uQ5P-BBAiM-SJtkd6V6FE3MnNJFhWC0J";

    fn test_pair() -> KeyPair {
        let mut scalar = [0u8; 32];
        scalar[31] = 7;
        KeyPair::from_private_key(&scalar).unwrap()
    }

    fn request<'k>(pair: &'k KeyPair) -> TransferRequest<'k> {
        TransferRequest {
            private_key: pair.private_key(),
            value: 50_000_000_000,
            regime: 0,
            query_id: 1234,
            owner_evm_address: derive(pair.public_key()).unwrap(),
            destination: DESTINATION.to_string(),
        }
    }

    #[test]
    fn layout_constants() {
        assert_eq!(BODY_LEN, 70);
        assert_eq!(MESSAGE_LEN, 135);
    }

    #[test]
    fn field_slices_decode_to_request() {
        let pair = test_pair();
        let req = request(&pair);
        let message = build(&req).unwrap();
        let bytes = message.as_bytes();

        assert_eq!(bytes.len(), MESSAGE_LEN);
        assert_eq!(bytes[0], 0);
        assert_eq!(&bytes[1..9], &1234u64.to_be_bytes());
        assert_eq!(&bytes[9..29], req.owner_evm_address.as_bytes());
        assert_eq!(&bytes[29..37], &50_000_000_000u64.to_be_bytes());
        assert_eq!(
            &bytes[37..70],
            &TonAddress::parse(DESTINATION).unwrap().to_bytes()
        );

        let decoded = message.decode().unwrap();
        assert_eq!(decoded.regime, Regime::Direct);
        assert_eq!(decoded.query_id, 1234);
        assert_eq!(decoded.owner_evm_address, req.owner_evm_address);
        assert_eq!(decoded.value, 50_000_000_000);
        assert_eq!(decoded.destination, TonAddress::parse(DESTINATION).unwrap());
    }

    #[test]
    fn output_is_deterministic() {
        let pair = test_pair();
        let a = build(&request(&pair)).unwrap();
        let b = build(&request(&pair)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn signature_recovers_owner() {
        let pair = test_pair();
        let req = request(&pair);
        let decoded = build(&req).unwrap().decode().unwrap();
        assert_eq!(decoded.recover_signer().unwrap(), req.owner_evm_address);
        assert!(decoded.verify());
    }

    #[test]
    fn tampered_body_fails_verification() {
        let pair = test_pair();
        let mut bytes = build(&request(&pair)).unwrap().into_bytes();
        // Bump the value.
        bytes[36] ^= 0x01;
        let decoded = EncodedMessage::from_bytes(bytes).unwrap().decode().unwrap();
        assert!(!decoded.verify());
    }

    #[test]
    fn foreign_owner_fails_verification() {
        let pair = test_pair();
        let mut req = request(&pair);
        req.owner_evm_address = OwnerAddress::new([0x11; 20]);
        let decoded = build(&req).unwrap().decode().unwrap();
        assert!(!decoded.verify());
    }

    #[test]
    fn zero_value_is_rejected() {
        let pair = test_pair();
        let mut req = request(&pair);
        req.value = 0;
        assert!(matches!(build(&req), Err(TransferError::InvalidAmount(_))));
    }

    #[test]
    fn unknown_regime_is_rejected() {
        let pair = test_pair();
        let mut req = request(&pair);
        req.regime = 99;
        assert!(matches!(build(&req), Err(TransferError::UnknownRegime(99))));
    }

    #[test]
    fn forward_regime_is_encoded() {
        let pair = test_pair();
        let mut req = request(&pair);
        req.regime = 1;
        let message = build(&req).unwrap();
        assert_eq!(message.as_bytes()[0], 1);
        assert_eq!(message.decode().unwrap().regime, Regime::Forward);
    }

    #[test]
    fn query_id_bounds() {
        let pair = test_pair();
        let mut req = request(&pair);

        req.query_id = MAX_QUERY_ID;
        assert_eq!(build(&req).unwrap().decode().unwrap().query_id, u64::MAX);

        req.query_id = MAX_QUERY_ID + 1;
        assert!(matches!(
            build(&req),
            Err(TransferError::QueryIdOutOfRange(q)) if q == MAX_QUERY_ID + 1
        ));
    }

    #[test]
    fn invalid_destination_is_rejected() {
        let pair = test_pair();
        let mut req = request(&pair);
        req.destination = "not-an-address".into();
        assert!(matches!(build(&req), Err(TransferError::InvalidAddress(_))));
    }

    #[test]
    fn first_failing_check_wins_and_signing_is_skipped() {
        // Bad amount, bad regime, bad query id, bad destination and a key
        // that cannot sign: only the amount is reported.
        let bad_key = ZeroizingBytes::new(vec![0u8; 5]);
        let req = TransferRequest {
            private_key: &bad_key,
            value: 0,
            regime: 99,
            query_id: MAX_QUERY_ID + 1,
            owner_evm_address: OwnerAddress::new([0u8; 20]),
            destination: "garbage".into(),
        };
        assert!(matches!(build(&req), Err(TransferError::InvalidAmount(_))));

        let req = TransferRequest { value: 1, ..req };
        assert!(matches!(build(&req), Err(TransferError::UnknownRegime(99))));

        let req = TransferRequest { regime: 0, ..req };
        assert!(matches!(build(&req), Err(TransferError::QueryIdOutOfRange(_))));

        let req = TransferRequest { query_id: 1, ..req };
        assert!(matches!(build(&req), Err(TransferError::InvalidAddress(_))));

        let req = TransferRequest {
            destination: DESTINATION.into(),
            ..req
        };
        assert!(matches!(build(&req), Err(TransferError::SigningFailed(_))));
    }

    #[test]
    fn malformed_private_keys_fail_signing() {
        let pair = test_pair();
        let owner = derive(pair.public_key()).unwrap();
        for key in [vec![0u8; 32], vec![0xFF; 32], vec![1u8; 33]] {
            let key = ZeroizingBytes::new(key);
            let req = TransferRequest {
                private_key: &key,
                owner_evm_address: owner,
                ..request(&pair)
            };
            assert!(matches!(build(&req), Err(TransferError::SigningFailed(_))));
        }
    }

    #[test]
    fn from_bytes_checks_length() {
        assert!(EncodedMessage::from_bytes(vec![0u8; MESSAGE_LEN - 1]).is_err());
        assert!(EncodedMessage::from_bytes(vec![0u8; MESSAGE_LEN + 1]).is_err());
    }

    #[test]
    fn decode_rejects_unknown_regime_byte() {
        let pair = test_pair();
        let mut bytes = build(&request(&pair)).unwrap().into_bytes();
        bytes[0] = 7;
        let message = EncodedMessage::from_bytes(bytes).unwrap();
        assert!(matches!(message.decode(), Err(TransferError::UnknownRegime(7))));
    }
}
