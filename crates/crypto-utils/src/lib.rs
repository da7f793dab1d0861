//! # crypto-utils
//!
//! Secret-holding containers, secure random generation and shared error
//! types used by the transfer pipeline.

pub mod error;
pub mod random;
pub mod zeroizing;

pub use error::CryptoError;
pub use zeroizing::ZeroizingBytes;
