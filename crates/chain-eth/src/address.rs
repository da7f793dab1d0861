use std::fmt;
use std::str::FromStr;

use k256::elliptic_curve::sec1::{FromEncodedPoint, ToEncodedPoint};
use k256::{EncodedPoint, PublicKey};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha3::{Digest, Keccak256};

use crate::error::EthError;

/// Length of a raw secp256k1 public key: `X || Y` without the SEC1 tag.
pub const PUBLIC_KEY_LEN: usize = 64;

/// Length of an EVM account address.
pub const ADDRESS_LEN: usize = 20;

/// A 20-byte EVM account address.
///
/// Displays as an EIP-55 checksummed `0x` string. The raw bytes are the
/// canonical form exchanged with contracts.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct EvmAddress([u8; ADDRESS_LEN]);

impl EvmAddress {
    /// Wraps raw address bytes.
    pub const fn new(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }

    /// Derives the address owned by a raw 64-byte secp256k1 public key.
    ///
    /// The address is the last 20 bytes of `keccak256(X || Y)`, the same rule
    /// `ecrecover` applies on the EVM side. Any other input length is
    /// rejected; SEC1-encoded keys go through [`raw_public_key_from_sec1`]
    /// first.
    pub fn from_public_key(public_key: &[u8]) -> Result<Self, EthError> {
        if public_key.len() != PUBLIC_KEY_LEN {
            return Err(EthError::InvalidKeyLength {
                expected: PUBLIC_KEY_LEN,
                actual: public_key.len(),
            });
        }

        let hash = Keccak256::digest(public_key);

        let mut addr = [0u8; ADDRESS_LEN];
        addr.copy_from_slice(&hash[12..]);
        Ok(Self(addr))
    }

    /// Builds an address from a 20-byte slice.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, EthError> {
        let arr: [u8; ADDRESS_LEN] = bytes.try_into().map_err(|_| {
            EthError::InvalidAddress(format!(
                "expected {ADDRESS_LEN} bytes, got {}",
                bytes.len()
            ))
        })?;
        Ok(Self(arr))
    }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }

    pub fn to_bytes(self) -> [u8; ADDRESS_LEN] {
        self.0
    }

    /// EIP-55 mixed-case checksum rendering.
    pub fn to_checksum(&self) -> String {
        let hex_part = hex::encode(self.0);
        let hash = Keccak256::digest(hex_part.as_bytes());

        let mut checksummed = String::with_capacity(2 + ADDRESS_LEN * 2);
        checksummed.push_str("0x");

        for (i, c) in hex_part.chars().enumerate() {
            // Nibble i of the hash decides the case of hex digit i.
            let byte = hash[i / 2];
            let nibble = if i % 2 == 0 { byte >> 4 } else { byte & 0x0f };
            if c.is_ascii_alphabetic() && nibble >= 8 {
                checksummed.push(c.to_ascii_uppercase());
            } else {
                checksummed.push(c);
            }
        }

        checksummed
    }
}

impl fmt::Display for EvmAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_checksum())
    }
}

impl fmt::Debug for EvmAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EvmAddress({})", self.to_checksum())
    }
}

impl FromStr for EvmAddress {
    type Err = EthError;

    /// Parses `0x` + 40 hex characters.
    ///
    /// All-lowercase and all-uppercase inputs carry no checksum and are
    /// accepted as is. Mixed case must match EIP-55 exactly.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex_part = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .ok_or_else(|| EthError::InvalidAddress("address must start with 0x".into()))?;

        if hex_part.len() != ADDRESS_LEN * 2 {
            return Err(EthError::InvalidAddress(format!(
                "expected 40 hex characters, got {}",
                hex_part.len()
            )));
        }

        let bytes = hex::decode(hex_part)
            .map_err(|_| EthError::InvalidAddress("address contains non-hex characters".into()))?;
        let address = Self::from_slice(&bytes)?;

        let is_all_lower = !hex_part.chars().any(|c| c.is_ascii_uppercase());
        let is_all_upper = !hex_part.chars().any(|c| c.is_ascii_lowercase());
        if !is_all_lower && !is_all_upper && &address.to_checksum()[2..] != hex_part {
            return Err(EthError::InvalidAddress("EIP-55 checksum mismatch".into()));
        }

        Ok(address)
    }
}

impl From<[u8; ADDRESS_LEN]> for EvmAddress {
    fn from(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }
}

impl Serialize for EvmAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_checksum())
    }
}

impl<'de> Deserialize<'de> for EvmAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Converts a SEC1-encoded secp256k1 public key (33-byte compressed or
/// 65-byte uncompressed) into the raw 64-byte `X || Y` form.
pub fn raw_public_key_from_sec1(sec1: &[u8]) -> Result<[u8; PUBLIC_KEY_LEN], EthError> {
    let encoded = EncodedPoint::from_bytes(sec1)
        .map_err(|e| EthError::InvalidPublicKey(format!("invalid SEC1 encoding: {e}")))?;

    let pubkey: Option<PublicKey> = PublicKey::from_encoded_point(&encoded).into();
    let pubkey = pubkey
        .ok_or_else(|| EthError::InvalidPublicKey("point is not on the secp256k1 curve".into()))?;

    let uncompressed = pubkey.to_encoded_point(false);

    let mut raw = [0u8; PUBLIC_KEY_LEN];
    raw.copy_from_slice(&uncompressed.as_bytes()[1..]);
    Ok(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use k256::SecretKey;

    fn raw_pubkey_for_scalar(last_byte: u8) -> [u8; PUBLIC_KEY_LEN] {
        let mut privkey = [0u8; 32];
        privkey[31] = last_byte;
        let secret = SecretKey::from_bytes((&privkey).into()).expect("valid private key");
        let uncompressed = secret.public_key().to_encoded_point(false);
        let mut raw = [0u8; PUBLIC_KEY_LEN];
        raw.copy_from_slice(&uncompressed.as_bytes()[1..]);
        raw
    }

    #[test]
    fn derives_known_vector() {
        // Private key 0x00..01 owns the well-known address below.
        let address = EvmAddress::from_public_key(&raw_pubkey_for_scalar(1)).unwrap();
        assert_eq!(
            address.to_checksum(),
            "0x7E5F4552091A69125d5DfCb7b8C2659029395Bdf"
        );
    }

    #[test]
    fn derivation_is_deterministic() {
        let pk = raw_pubkey_for_scalar(7);
        let a = EvmAddress::from_public_key(&pk).unwrap();
        let b = EvmAddress::from_public_key(&pk).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn distinct_keys_give_distinct_addresses() {
        let a = EvmAddress::from_public_key(&raw_pubkey_for_scalar(2)).unwrap();
        let b = EvmAddress::from_public_key(&raw_pubkey_for_scalar(3)).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn rejects_wrong_lengths() {
        for len in [0usize, 31, 32, 33, 63, 65] {
            match EvmAddress::from_public_key(&vec![1u8; len]) {
                Err(EthError::InvalidKeyLength { expected, actual }) => {
                    assert_eq!(expected, PUBLIC_KEY_LEN);
                    assert_eq!(actual, len);
                }
                other => panic!("expected InvalidKeyLength for {len}, got {:?}", other),
            }
        }
    }

    #[test]
    fn eip55_checksum_known_addresses() {
        // Test vectors from EIP-55.
        let cases = [
            "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed",
            "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359",
            "0xdbF03B407c01E7cD3CBea99509d93f8DDDC8C6FB",
            "0xD1220A0cf47c7B9Be7A2E6BA89F429762e7b9aDb",
        ];

        for expected in &cases {
            let lower = format!("0x{}", expected[2..].to_lowercase());
            let parsed: EvmAddress = lower.parse().unwrap();
            assert_eq!(&parsed.to_checksum(), expected);
        }
    }

    #[test]
    fn parse_accepts_valid_checksum() {
        let addr: EvmAddress = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed".parse().unwrap();
        assert_eq!(addr.to_string(), "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed");
    }

    #[test]
    fn parse_accepts_uniform_case() {
        assert!("0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed"
            .parse::<EvmAddress>()
            .is_ok());
        assert!("0x5AAEB6053F3E94C9B9A09F33669435E7EF1BEAED"
            .parse::<EvmAddress>()
            .is_ok());
    }

    #[test]
    fn parse_rejects_bad_checksum() {
        let result = "0x5AAEB6053F3E94C9b9A09f33669435E7Ef1BeAed".parse::<EvmAddress>();
        assert!(result.is_err());
    }

    #[test]
    fn parse_rejects_malformed() {
        assert!("5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed"
            .parse::<EvmAddress>()
            .is_err());
        assert!("0x5aAeb6053F".parse::<EvmAddress>().is_err());
        assert!("0xGGGGb6053F3E94C9b9A09f33669435E7Ef1BeAed"
            .parse::<EvmAddress>()
            .is_err());
    }

    #[test]
    fn serde_uses_checksum_string() {
        let addr: EvmAddress = "0x7E5F4552091A69125d5DfCb7b8C2659029395Bdf".parse().unwrap();
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(json, "\"0x7E5F4552091A69125d5DfCb7b8C2659029395Bdf\"");

        let back: EvmAddress = serde_json::from_str(&json).unwrap();
        assert_eq!(back, addr);
    }

    #[test]
    fn sec1_compressed_and_uncompressed_agree() {
        let mut privkey = [0u8; 32];
        privkey[31] = 1;
        let secret = SecretKey::from_bytes((&privkey).into()).unwrap();
        let public = secret.public_key();

        let from_compressed =
            raw_public_key_from_sec1(public.to_encoded_point(true).as_bytes()).unwrap();
        let from_uncompressed =
            raw_public_key_from_sec1(public.to_encoded_point(false).as_bytes()).unwrap();

        assert_eq!(from_compressed, from_uncompressed);
        assert_eq!(from_compressed, raw_pubkey_for_scalar(1));
    }

    #[test]
    fn sec1_rejects_garbage() {
        assert!(raw_public_key_from_sec1(&[0x07u8; 33]).is_err());
        assert!(raw_public_key_from_sec1(&[]).is_err());
    }
}
