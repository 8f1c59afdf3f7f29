//! Error taxonomy for the listing pipeline
//!
//! Every failure of the pipeline propagates to the caller as a
//! `ListingError` variant; nothing is swallowed. Collaborator-side
//! failures (`SignerError`, `LedgerError`) are converted at the gateway
//! and resolver boundaries.

use crate::types::{ObjectId, TransactionDigest};
use thiserror::Error;

/// Failures surfaced by the listing pipeline
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ListingError {
    /// Bad listing terms or an incomplete asset; local, never retried
    #[error("Validation failed: {0}")]
    Validation(String),

    /// No custody vault available for the connected account
    #[error("No custody vault found for the connected account")]
    MissingVault,

    /// The external signer declined the transaction or broadcast failed.
    /// Terminal for this attempt: resubmitting a user-rejected
    /// transaction without new consent is incorrect.
    #[error("Submission rejected: {0}")]
    SubmissionRejected(String),

    /// The ledger never indexed a matching created object within the
    /// retry budget. Carries the digest so the caller can re-resolve
    /// manually or inspect the transaction out of band.
    #[error("Resolution exhausted after {attempts} attempts for digest {digest}")]
    ResolutionExhausted {
        digest: TransactionDigest,
        attempts: u32,
    },

    /// More than one created object matched the recognized type.
    /// Picking one silently would corrupt the registry entry.
    #[error("Ambiguous resolution for digest {digest}: {} matching objects", .candidates.len())]
    AmbiguousResolution {
        digest: TransactionDigest,
        candidates: Vec<ObjectId>,
    },

    /// Ledger transport failure outside the resolver's retry loop
    /// (inventory or vault directory lookups)
    #[error("Ledger error: {0}")]
    Ledger(String),
}

impl ListingError {
    /// Whether a fresh attempt with the same inputs could succeed.
    ///
    /// `SubmissionRejected` is deliberately non-retryable here: a new
    /// attempt requires fresh user consent.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::ResolutionExhausted { .. } => true,
            Self::Ledger(_) => true,
            Self::Validation(_) => false,
            Self::MissingVault => false,
            Self::SubmissionRejected(_) => false,
            Self::AmbiguousResolution { .. } => false,
        }
    }

    /// Error category for logging and metrics labels.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::MissingVault => "vault",
            Self::SubmissionRejected(_) => "submission",
            Self::ResolutionExhausted { .. } => "resolution",
            Self::AmbiguousResolution { .. } => "resolution",
            Self::Ledger(_) => "ledger",
        }
    }

    /// The pipeline failure state this error exits through.
    pub fn failure_state(&self) -> crate::types::PipelineState {
        use crate::types::PipelineState;
        match self {
            Self::Validation(_) | Self::MissingVault => PipelineState::RefusedComposition,
            Self::SubmissionRejected(_) => PipelineState::SubmissionRejected,
            Self::ResolutionExhausted { .. }
            | Self::AmbiguousResolution { .. }
            | Self::Ledger(_) => PipelineState::ResolutionExhausted,
        }
    }
}

/// Failures reported by the external wallet/signer collaborator
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SignerError {
    /// The user declined to sign
    #[error("User declined to sign: {0}")]
    Declined(String),

    /// Signing succeeded but broadcast failed
    #[error("Broadcast failed: {0}")]
    Broadcast(String),
}

/// Failures reported by the ledger query collaborator
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LedgerError {
    /// The node accepted the transaction but has not indexed its
    /// effects yet
    #[error("Transaction not yet indexed")]
    NotIndexed,

    /// Network or node failure
    #[error("Ledger transport error: {0}")]
    Transport(String),
}

impl LedgerError {
    /// Both variants are transient from the resolver's point of view:
    /// indexing lag and transport blips are retried within the budget.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::NotIndexed | Self::Transport(_))
    }
}
