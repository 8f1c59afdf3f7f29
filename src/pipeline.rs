//! Listing commit pipeline
//!
//! Orchestrates one listing attempt end to end: compose the custody
//! transaction, submit it through the external signer, resolve the
//! created rental-state object, and only then append the confirmed
//! listing to the registry. Each step begins only once its predecessor
//! produced a definitive success; any failure short-circuits without
//! touching the registry.
//!
//! State transitions are published on a watch channel for the
//! presentation layer: `Idle → Composing → AwaitingSignature →
//! AwaitingResolution → Committed`, with failure exits
//! (`RefusedComposition`, `SubmissionRejected`, `ResolutionExhausted`)
//! resting as the channel value until the next attempt returns the
//! machine to `Idle`.

use crate::composer::compose;
use crate::config::Config;
use crate::errors::ListingError;
use crate::gateway::{SubmissionGateway, WalletSigner};
use crate::ledger::{AssetInventory, LedgerQuery, VaultDirectory};
use crate::observability::AttemptLogger;
use crate::registry::ListingRegistry;
use crate::resolver::{RetryPolicy, StateResolver};
use crate::selector::AssetSelector;
use crate::types::{Asset, Listing, ListingStatus, ListingTerms, PipelineState, VaultHandle};
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::watch;

/// Orchestrator for listing attempts
///
/// One instance serves a session; independent attempts may interleave
/// and share only the registry append.
pub struct ListingPipeline<S: WalletSigner, L: LedgerQuery> {
    gateway: SubmissionGateway<S>,
    resolver: StateResolver<L>,
    registry: ListingRegistry,
    list_target: String,
    state_tx: watch::Sender<PipelineState>,
}

impl<S: WalletSigner, L: LedgerQuery> ListingPipeline<S, L> {
    pub fn new(
        signer: Arc<S>,
        ledger: Arc<L>,
        registry: ListingRegistry,
        config: &Config,
    ) -> Self {
        let policy = RetryPolicy::new(
            config.resolver.max_attempts,
            config.resolver.initial_delay(),
        );
        let (state_tx, _) = watch::channel(PipelineState::Idle);
        Self {
            gateway: SubmissionGateway::new(signer),
            resolver: StateResolver::new(ledger, policy, &config.contract.rental_state_type),
            registry,
            list_target: config.contract.list_target(),
            state_tx,
        }
    }

    /// Subscribe to pipeline state transitions.
    pub fn subscribe(&self) -> watch::Receiver<PipelineState> {
        self.state_tx.subscribe()
    }

    /// Current pipeline state.
    pub fn state(&self) -> PipelineState {
        self.state_tx.borrow().clone()
    }

    /// The registry this pipeline commits to.
    pub fn registry(&self) -> &ListingRegistry {
        &self.registry
    }

    fn transition(&self, state: PipelineState) {
        // send_replace so transitions land even with no subscribers.
        self.state_tx.send_replace(state);
    }

    fn fail(&self, logger: &AttemptLogger, err: ListingError) -> ListingError {
        logger.log_failed(err.category(), &err.to_string());
        // The failure state stays as the channel's resting value so
        // subscribers can observe it; Idle is published when the next
        // attempt starts.
        self.transition(err.failure_state());
        err
    }

    /// Run one listing attempt for `asset` under `terms`.
    ///
    /// `vault` is the session vault handle (see [`fetch_session_vault`]);
    /// `None` refuses composition. On success the confirmed listing has
    /// been appended to the registry and `Committed` published.
    pub async fn list_for_rent(
        &self,
        asset: &Asset,
        terms: &ListingTerms,
        vault: Option<&VaultHandle>,
        owner: &str,
    ) -> Result<Listing, ListingError> {
        let logger = AttemptLogger::new();

        // A fresh attempt clears the previous terminal state.
        if self.state() != PipelineState::Idle {
            self.transition(PipelineState::Idle);
        }
        self.transition(PipelineState::Composing);
        logger.log_compose(asset.id.as_str(), &asset.object_type);
        let tx = compose(asset, terms, vault, &self.list_target)
            .map_err(|e| self.fail(&logger, e))?;

        self.transition(PipelineState::AwaitingSignature);
        let receipt = self
            .gateway
            .submit(&tx)
            .await
            .map_err(|e| self.fail(&logger, e))?;

        self.transition(PipelineState::AwaitingResolution);
        logger.log_submitted(receipt.digest.as_str());
        let resolution = self
            .resolver
            .resolve(&receipt.digest)
            .await
            .map_err(|e| self.fail(&logger, e))?;

        let listing = Listing {
            id: asset.id.clone(),
            name: asset.name_or_default(),
            description: asset.description_or_default(),
            image: asset.image_or_default(),
            contract_type: asset.object_type.clone(),
            price_to_own: terms.price_to_own,
            min_rent: terms.daily_rent,
            owner: owner.to_string(),
            listed_at: Utc::now(),
            status: ListingStatus::Active,
            rental_state_id: resolution.object_id,
            current_progress: "0".to_string(),
        };

        self.registry.append(listing.clone()).await;
        self.transition(PipelineState::Committed);
        logger.log_committed(listing.id.as_str(), listing.rental_state_id.as_str());

        Ok(listing)
    }
}

/// Fetch the session's vault handle once from the vault directory.
///
/// `Ok(None)` means the account has no vault yet; composition with a
/// `None` handle is refused with `MissingVault`.
pub async fn fetch_session_vault<D: VaultDirectory>(
    directory: &D,
    owner: &str,
) -> Result<Option<VaultHandle>, ListingError> {
    directory
        .vault_for(owner)
        .await
        .map_err(|e| ListingError::Ledger(e.to_string()))
}

/// Populate the selector from the inventory collaborator.
pub async fn load_selector<I: AssetInventory>(
    selector: &mut AssetSelector,
    inventory: &I,
    owner: &str,
) -> Result<(), ListingError> {
    let assets = inventory
        .owned_assets(owner)
        .await
        .map_err(|e| ListingError::Ledger(e.to_string()))?;
    selector.load(assets);
    Ok(())
}
