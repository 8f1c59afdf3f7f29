//! Asset selector
//!
//! Pure state: the set of eligible assets fetched by the inventory
//! collaborator and the one the user currently has chosen. No I/O.

use crate::errors::ListingError;
use crate::types::{Asset, ObjectId};

/// Type tags recognized as listable outright; anything whose type
/// contains "NFT" is accepted as a fallback, matching the marketplace's
/// inventory filter.
const ELIGIBLE_TYPES: &[&str] = &["0x2::devnet_nft::DevNetNFT"];

/// True if the asset may be offered for listing.
pub fn is_eligible(asset: &Asset) -> bool {
    ELIGIBLE_TYPES.contains(&asset.object_type.as_str()) || asset.object_type.contains("NFT")
}

/// Holds the eligible assets and the current choice
#[derive(Debug, Clone, Default)]
pub struct AssetSelector {
    assets: Vec<Asset>,
    selected: Option<ObjectId>,
}

impl AssetSelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the asset set with the eligible subset of `assets`.
    /// Clears the selection if the chosen asset is no longer present.
    pub fn load(&mut self, assets: Vec<Asset>) {
        self.assets = assets.into_iter().filter(is_eligible).collect();
        if let Some(id) = &self.selected {
            if !self.assets.iter().any(|a| &a.id == id) {
                self.selected = None;
            }
        }
    }

    pub fn assets(&self) -> &[Asset] {
        &self.assets
    }

    /// Choose an asset by id. Fails if the id is not in the loaded set.
    pub fn select(&mut self, id: &ObjectId) -> Result<(), ListingError> {
        if self.assets.iter().any(|a| &a.id == id) {
            self.selected = Some(id.clone());
            Ok(())
        } else {
            Err(ListingError::Validation(format!(
                "asset {id} is not in the eligible set"
            )))
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// The currently chosen asset, if any.
    pub fn selected(&self) -> Option<&Asset> {
        let id = self.selected.as_ref()?;
        self.assets.iter().find(|a| &a.id == id)
    }
}
