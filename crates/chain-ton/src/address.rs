//! TON account address parsing and formatting.
//!
//! A standard TON address is a signed 8-bit workchain id plus a 32-byte
//! account id. It is written either in raw form (`0:4f2c...`) or in the
//! 48-character user-friendly form, which base64-encodes
//! `flags || workchain || account_id || crc16` (36 bytes). The flags only
//! affect how wallets treat the address; they are not part of its identity.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use base64::engine::general_purpose::{STANDARD, URL_SAFE};
use base64::Engine;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::TonError;

/// Length of the account id part.
pub const ACCOUNT_ID_LEN: usize = 32;

/// Length of the wire encoding: workchain byte followed by the account id.
pub const WIRE_LEN: usize = 1 + ACCOUNT_ID_LEN;

const FRIENDLY_LEN: usize = 48;
const FRIENDLY_BYTES: usize = 36;

const TAG_BOUNCEABLE: u8 = 0x11;
const TAG_NON_BOUNCEABLE: u8 = 0x51;
const TAG_TESTNET: u8 = 0x80;

/// A standard (non-anycast) TON account address.
#[derive(Clone, Copy)]
pub struct TonAddress {
    workchain: i8,
    account_id: [u8; ACCOUNT_ID_LEN],
    bounceable: bool,
    testnet: bool,
}

impl TonAddress {
    /// Creates a bounceable mainnet-flagged address.
    pub fn new(workchain: i8, account_id: [u8; ACCOUNT_ID_LEN]) -> Self {
        Self {
            workchain,
            account_id,
            bounceable: true,
            testnet: false,
        }
    }

    /// Parses either the raw or the user-friendly form.
    pub fn parse(s: &str) -> Result<Self, TonError> {
        let s = s.trim();
        if s.contains(':') {
            Self::parse_raw(s)
        } else {
            Self::parse_friendly(s)
        }
    }

    /// Parses `<workchain>:<64 hex chars>`.
    pub fn parse_raw(s: &str) -> Result<Self, TonError> {
        let (wc, id_hex) = s
            .split_once(':')
            .ok_or_else(|| TonError::InvalidAddress("raw address must contain ':'".into()))?;

        let workchain: i8 = wc
            .parse()
            .map_err(|_| TonError::InvalidAddress(format!("invalid workchain '{wc}'")))?;

        if id_hex.len() != ACCOUNT_ID_LEN * 2 {
            return Err(TonError::InvalidAddress(format!(
                "expected 64 hex characters, got {}",
                id_hex.len()
            )));
        }

        let bytes = hex::decode(id_hex)
            .map_err(|e| TonError::InvalidAddress(format!("hex decode failed: {e}")))?;
        let mut account_id = [0u8; ACCOUNT_ID_LEN];
        account_id.copy_from_slice(&bytes);

        Ok(Self::new(workchain, account_id))
    }

    /// Parses the 48-character base64url (or standard base64) form and
    /// checks its CRC16.
    pub fn parse_friendly(s: &str) -> Result<Self, TonError> {
        if s.len() != FRIENDLY_LEN {
            return Err(TonError::InvalidAddress(format!(
                "expected {FRIENDLY_LEN} characters, got {}",
                s.len()
            )));
        }

        let bytes = URL_SAFE
            .decode(s)
            .or_else(|_| STANDARD.decode(s))
            .map_err(|e| TonError::InvalidAddress(format!("base64 decode failed: {e}")))?;

        if bytes.len() != FRIENDLY_BYTES {
            return Err(TonError::InvalidAddress(format!(
                "expected {FRIENDLY_BYTES} bytes, got {}",
                bytes.len()
            )));
        }

        let (body, checksum) = bytes.split_at(FRIENDLY_BYTES - 2);
        let expected = crc16(body);
        let actual = u16::from_be_bytes([checksum[0], checksum[1]]);
        if expected != actual {
            return Err(TonError::InvalidAddress(format!(
                "checksum mismatch: expected {expected:04x}, got {actual:04x}"
            )));
        }

        let tag = body[0];
        let testnet = tag & TAG_TESTNET != 0;
        let bounceable = match tag & !TAG_TESTNET {
            TAG_BOUNCEABLE => true,
            TAG_NON_BOUNCEABLE => false,
            other => {
                return Err(TonError::InvalidAddress(format!(
                    "unknown address tag 0x{other:02x}"
                )))
            }
        };

        let mut account_id = [0u8; ACCOUNT_ID_LEN];
        account_id.copy_from_slice(&body[2..]);

        Ok(Self {
            workchain: body[1] as i8,
            account_id,
            bounceable,
            testnet,
        })
    }

    /// Decodes the 33-byte wire form produced by [`TonAddress::to_bytes`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TonError> {
        if bytes.len() != WIRE_LEN {
            return Err(TonError::InvalidAddress(format!(
                "expected {WIRE_LEN} bytes, got {}",
                bytes.len()
            )));
        }

        let mut account_id = [0u8; ACCOUNT_ID_LEN];
        account_id.copy_from_slice(&bytes[1..]);
        Ok(Self::new(bytes[0] as i8, account_id))
    }

    /// Wire form: workchain as a two's-complement byte, then the account id.
    pub fn to_bytes(&self) -> [u8; WIRE_LEN] {
        let mut out = [0u8; WIRE_LEN];
        out[0] = self.workchain as u8;
        out[1..].copy_from_slice(&self.account_id);
        out
    }

    pub fn to_raw_string(&self) -> String {
        format!("{}:{}", self.workchain, hex::encode(self.account_id))
    }

    /// User-friendly base64url form with explicit flags.
    pub fn to_friendly(&self, bounceable: bool, testnet: bool) -> String {
        let mut tag = if bounceable {
            TAG_BOUNCEABLE
        } else {
            TAG_NON_BOUNCEABLE
        };
        if testnet {
            tag |= TAG_TESTNET;
        }

        let mut bytes = Vec::with_capacity(FRIENDLY_BYTES);
        bytes.push(tag);
        bytes.push(self.workchain as u8);
        bytes.extend_from_slice(&self.account_id);
        let checksum = crc16(&bytes);
        bytes.extend_from_slice(&checksum.to_be_bytes());

        URL_SAFE.encode(bytes)
    }

    /// Returns the same account with different display flags.
    pub fn with_flags(mut self, bounceable: bool, testnet: bool) -> Self {
        self.bounceable = bounceable;
        self.testnet = testnet;
        self
    }

    pub fn workchain(&self) -> i8 {
        self.workchain
    }

    pub fn account_id(&self) -> &[u8; ACCOUNT_ID_LEN] {
        &self.account_id
    }

    pub fn is_bounceable(&self) -> bool {
        self.bounceable
    }

    pub fn is_testnet_only(&self) -> bool {
        self.testnet
    }
}

impl PartialEq for TonAddress {
    fn eq(&self, other: &Self) -> bool {
        self.workchain == other.workchain && self.account_id == other.account_id
    }
}

impl Eq for TonAddress {}

impl Hash for TonAddress {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.workchain.hash(state);
        self.account_id.hash(state);
    }
}

impl fmt::Display for TonAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_friendly(self.bounceable, self.testnet))
    }
}

impl fmt::Debug for TonAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TonAddress({})", self.to_raw_string())
    }
}

impl FromStr for TonAddress {
    type Err = TonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for TonAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for TonAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// CRC-16/XMODEM (poly 0x1021, init 0), as used by user-friendly addresses.
pub fn crc16(data: &[u8]) -> u16 {
    let mut crc: u16 = 0;
    for &byte in data {
        crc ^= (byte as u16) << 8;
        for _ in 0..8 {
            crc = if crc & 0x8000 != 0 {
                (crc << 1) ^ 0x1021
            } else {
                crc << 1
            };
        }
    }
    crc
}
