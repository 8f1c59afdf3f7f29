//! Listing commit pipeline for a rent-to-own NFT kiosk marketplace
//!
//! Converts an owned collectible into an actively rentable listing in
//! three hard-sequenced steps: compose one atomic transaction (vault
//! placement, withdrawal, contract invocation), submit it through the
//! external signer, then resolve the created rental-state object's id by
//! polling the ledger with bounded exponential backoff. A listing is
//! committed to the registry only after all three succeed.
//!
//! External systems (wallet, ledger queries, asset inventory, vault
//! directory) are trait seams in [`gateway`] and [`ledger`] so they can
//! be mocked deterministically.

pub mod composer;
pub mod config;
pub mod errors;
pub mod gateway;
pub mod ledger;
pub mod observability;
pub mod pipeline;
pub mod registry;
pub mod resolver;
pub mod selector;
pub mod types;

pub use composer::{compose, ComposedTransaction, Operation};
pub use config::Config;
pub use errors::{LedgerError, ListingError, SignerError};
pub use gateway::{SubmissionGateway, WalletSigner};
pub use ledger::{AssetInventory, LedgerQuery, VaultDirectory};
pub use pipeline::ListingPipeline;
pub use registry::ListingRegistry;
pub use resolver::{RetryPolicy, StateResolver};
pub use types::{
    Asset, Listing, ListingTerms, ObjectId, PipelineState, Receipt, ResolutionRecord,
    TransactionDigest, VaultHandle,
};
