use thiserror::Error;

/// Failure reported by a [`Submitter`](crate::orchestrator::Submitter).
///
/// The message is whatever the submitter chose to report; the pipeline
/// passes it through unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct SubmitError(pub String);

impl SubmitError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

#[derive(Debug, Error)]
pub enum TransferError {
    #[error("Invalid key length: expected {expected} bytes, got {actual}")]
    InvalidKeyLength { expected: usize, actual: usize },

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Unknown regime: {0}")]
    UnknownRegime(u8),

    #[error("Query id out of range: {0} does not fit in 64 bits")]
    QueryIdOutOfRange(u128),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Signing failed: {0}")]
    SigningFailed(String),

    #[error("Submission failed: {0}")]
    SubmissionFailed(#[source] SubmitError),

    #[error("Invalid key material: {0}")]
    InvalidKeyMaterial(String),

    #[error("Invalid message: {0}")]
    InvalidMessage(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<crypto_utils::error::CryptoError> for TransferError {
    fn from(e: crypto_utils::error::CryptoError) -> Self {
        use crypto_utils::error::CryptoError;
        match e {
            CryptoError::InvalidKeyLength { expected, actual } => {
                TransferError::InvalidKeyLength { expected, actual }
            }
            CryptoError::InvalidInput(msg) => TransferError::InvalidKeyMaterial(msg),
        }
    }
}

impl From<chain_eth::error::EthError> for TransferError {
    fn from(e: chain_eth::error::EthError) -> Self {
        use chain_eth::error::EthError;
        match e {
            EthError::InvalidKeyLength { expected, actual } => {
                TransferError::InvalidKeyLength { expected, actual }
            }
            EthError::InvalidPublicKey(msg) => TransferError::InvalidKeyMaterial(msg),
            EthError::InvalidAddress(msg) => TransferError::InvalidAddress(format!("EVM: {msg}")),
            EthError::InvalidPrivateKey(msg) | EthError::SigningError(msg) => {
                TransferError::SigningFailed(msg)
            }
            EthError::InvalidSignature(msg) => TransferError::InvalidMessage(msg),
        }
    }
}

impl From<chain_ton::error::TonError> for TransferError {
    fn from(e: chain_ton::error::TonError) -> Self {
        use chain_ton::error::TonError;
        match e {
            TonError::InvalidAddress(msg) => TransferError::InvalidAddress(msg),
            TonError::InvalidAmount(msg) => TransferError::InvalidAmount(msg),
            TonError::UnknownNetwork(name) => {
                TransferError::InvalidConfig(format!("unknown network '{name}'"))
            }
        }
    }
}
