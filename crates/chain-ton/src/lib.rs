//! TON chain support for the transfer pipeline.
//!
//! This crate handles TON account addresses (raw `wc:hex` and 48-character
//! user-friendly forms with CRC16 checksums), network selection, and
//! conversion between whole TON amounts and nanoton.
//!
//! There is no cell or BoC serialization here: the transfer message is a
//! flat, fixed-width byte layout.

pub mod address;
pub mod error;
pub mod network;
pub mod units;

pub use address::{crc16, TonAddress, ACCOUNT_ID_LEN, WIRE_LEN};
pub use error::TonError;
pub use network::TonNetwork;
pub use units::{from_nano, to_nano, NANO_PER_TON};
