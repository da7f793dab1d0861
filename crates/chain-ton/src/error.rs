use thiserror::Error;

/// TON chain operation errors.
#[derive(Debug, Error)]
pub enum TonError {
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("unknown network: {0}")]
    UnknownNetwork(String),
}
