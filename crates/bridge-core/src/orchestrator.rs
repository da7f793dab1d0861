//! Single-shot transfer pipeline: derive → build → sign → hand off.

use chain_ton::TonAddress;
use crypto_utils::random::random_u64;
use tracing::{debug, info, warn};

use crate::config::TransferConfig;
use crate::deriver;
use crate::error::{SubmitError, TransferError};
use crate::keys::{KeyGenerator, KeyPair};
use crate::message::{self, EncodedMessage};
use crate::types::{OwnerAddress, SubmissionReceipt, TransferRequest};

/// What the submitter is asked to deliver.
#[derive(Debug, Clone, Copy)]
pub struct Submission<'a> {
    pub message: &'a EncodedMessage,
    /// Nanoton sent along with the message to cover execution.
    pub attached_value: u64,
    /// Contract that receives the message.
    pub entrypoint: &'a TonAddress,
}

/// Delivers a message to the network.
///
/// Retries, polling for confirmation and timeouts are the submitter's
/// business. On success it returns an opaque reference for the delivery.
pub trait Submitter {
    fn submit(&self, submission: Submission<'_>) -> Result<String, SubmitError>;
}

impl<F> Submitter for F
where
    F: Fn(Submission<'_>) -> Result<String, SubmitError>,
{
    fn submit(&self, submission: Submission<'_>) -> Result<String, SubmitError> {
        self(submission)
    }
}

/// A message ready for submission, with the values it was built from.
#[derive(Debug, Clone)]
pub struct PreparedTransfer {
    pub message: EncodedMessage,
    pub query_id: u64,
    pub owner_evm_address: OwnerAddress,
}

/// Runs transfers against one entrypoint. Holds configuration only, so a
/// single instance can serve concurrent callers.
#[derive(Debug, Clone)]
pub struct TransferOrchestrator {
    entrypoint: TonAddress,
    attached_value: u64,
    fixed_query_id: Option<u64>,
}

impl TransferOrchestrator {
    pub fn new(config: &TransferConfig) -> Result<Self, TransferError> {
        let entrypoint = config.validate()?;
        Ok(Self {
            entrypoint,
            attached_value: config.attached_value,
            fixed_query_id: None,
        })
    }

    /// Pins the query id instead of drawing a random one per transfer.
    pub fn with_query_id(mut self, query_id: u64) -> Self {
        self.fixed_query_id = Some(query_id);
        self
    }

    pub fn entrypoint(&self) -> &TonAddress {
        &self.entrypoint
    }

    pub fn attached_value(&self) -> u64 {
        self.attached_value
    }

    /// Derives the owner address and builds the signed message without
    /// submitting anything.
    ///
    /// Fails with [`TransferError::SigningFailed`] when the signature does not
    /// recover to the owner address, which happens when the private key does
    /// not belong to the public key.
    pub fn prepare(
        &self,
        key_pair: &KeyPair,
        value: u64,
        regime: u8,
        destination: &str,
    ) -> Result<PreparedTransfer, TransferError> {
        let query_id = self.fixed_query_id.unwrap_or_else(random_u64);
        let owner_evm_address = deriver::derive(key_pair.public_key())?;

        let request = TransferRequest {
            private_key: key_pair.private_key(),
            value,
            regime,
            query_id: u128::from(query_id),
            owner_evm_address,
            destination: destination.to_string(),
        };
        let message = message::build(&request)?;

        let signer = message.decode()?.recover_signer()?;
        if signer != owner_evm_address {
            warn!(owner = %owner_evm_address, %signer, "signature does not recover to owner");
            return Err(TransferError::SigningFailed(
                "private key does not match the public key".into(),
            ));
        }

        Ok(PreparedTransfer {
            message,
            query_id,
            owner_evm_address,
        })
    }

    /// Builds the message and hands it to `submitter` exactly once.
    ///
    /// Nothing is submitted if derivation or building fails. A submitter
    /// failure comes back as [`TransferError::SubmissionFailed`] carrying the
    /// submitter's own error.
    pub fn execute<S>(
        &self,
        key_pair: &KeyPair,
        value: u64,
        regime: u8,
        destination: &str,
        submitter: &S,
    ) -> Result<SubmissionReceipt, TransferError>
    where
        S: Submitter + ?Sized,
    {
        let prepared = self.prepare(key_pair, value, regime, destination)?;
        let destination = TonAddress::parse(destination)?;

        info!(
            query_id = prepared.query_id,
            owner = %prepared.owner_evm_address,
            entrypoint = %self.entrypoint,
            attached_value = self.attached_value,
            "submitting transfer"
        );

        let reference = submitter
            .submit(Submission {
                message: &prepared.message,
                attached_value: self.attached_value,
                entrypoint: &self.entrypoint,
            })
            .map_err(|e| {
                warn!(query_id = prepared.query_id, error = %e, "submission failed");
                TransferError::SubmissionFailed(e)
            })?;

        info!(query_id = prepared.query_id, %reference, "transfer submitted");

        Ok(SubmissionReceipt {
            query_id: prepared.query_id,
            owner_evm_address: prepared.owner_evm_address,
            destination: destination.to_raw_string(),
            value,
            reference,
        })
    }

    /// Generates a key pair for this transfer only, then runs [`execute`].
    /// The pair is dropped, and its private key zeroized, before returning.
    ///
    /// [`execute`]: TransferOrchestrator::execute
    pub fn execute_with_fresh_key<G, S>(
        &self,
        generator: &G,
        value: u64,
        regime: u8,
        destination: &str,
        submitter: &S,
    ) -> Result<SubmissionReceipt, TransferError>
    where
        G: KeyGenerator + ?Sized,
        S: Submitter + ?Sized,
    {
        let key_pair = generator.generate()?;
        debug!("generated key pair for transfer");
        self.execute(&key_pair, value, regime, destination, submitter)
    }
}
