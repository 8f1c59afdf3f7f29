//! Submission gateway
//!
//! Hands a composed transaction to the external wallet for signing and
//! broadcast. Exactly one attempt per user-initiated listing action: a
//! rejection is terminal for the attempt and is never retried
//! automatically, since resubmitting without fresh consent is incorrect.

use crate::composer::ComposedTransaction;
use crate::errors::{ListingError, SignerError};
use crate::types::Receipt;
use async_trait::async_trait;
use std::sync::Arc;

/// External wallet/signer collaborator
///
/// Opaque and untrusted regarding timing: the call may take arbitrary
/// user-interaction time before it resolves.
#[async_trait]
pub trait WalletSigner: Send + Sync {
    async fn sign_and_execute(&self, tx: &ComposedTransaction) -> Result<Receipt, SignerError>;
}

/// Single-attempt submission front for the wallet collaborator
#[derive(Clone)]
pub struct SubmissionGateway<S: WalletSigner> {
    signer: Arc<S>,
}

impl<S: WalletSigner> SubmissionGateway<S> {
    pub fn new(signer: Arc<S>) -> Self {
        Self { signer }
    }

    /// Submit the transaction for signing and broadcast.
    ///
    /// Any signer-side failure maps to `SubmissionRejected`.
    pub async fn submit(&self, tx: &ComposedTransaction) -> Result<Receipt, ListingError> {
        match self.signer.sign_and_execute(tx).await {
            Ok(receipt) => {
                tracing::info!(digest = %receipt.digest, "Transaction accepted by signer");
                Ok(receipt)
            }
            Err(err) => {
                tracing::warn!(error = %err, "Signer rejected transaction");
                Err(ListingError::SubmissionRejected(err.to_string()))
            }
        }
    }
}
