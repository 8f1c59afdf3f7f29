//! Listing registry
//!
//! Append-only, in-memory collection of confirmed listings. Only the
//! pipeline's final success path appends; there is no removal or update
//! operation and no pending/optimistic entry. Persistence beyond the
//! process lifetime is an external collaborator concern.

use crate::types::Listing;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared, clone-able registry handle
///
/// Backed by a `tokio::sync::RwLock`, so an append completes atomically
/// relative to other cooperative steps even when independent listing
/// attempts interleave.
#[derive(Clone, Default)]
pub struct ListingRegistry {
    inner: Arc<RwLock<Vec<Listing>>>,
}

impl ListingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a confirmed listing.
    pub async fn append(&self, listing: Listing) {
        let mut listings = self.inner.write().await;
        tracing::info!(
            listing_id = %listing.id,
            rental_state_id = %listing.rental_state_id,
            total = listings.len() + 1,
            "Listing committed to registry"
        );
        listings.push(listing);
    }

    /// All confirmed listings in insertion order.
    pub async fn all(&self) -> Vec<Listing> {
        self.inner.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}
