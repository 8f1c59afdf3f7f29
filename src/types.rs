//! Common types used throughout the listing pipeline

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of an on-ledger object (asset, vault, rental state, ...)
///
/// Opaque content: the ledger hands these out as hex strings and the
/// pipeline never inspects them beyond equality.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ObjectId(String);

impl ObjectId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ObjectId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ObjectId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Content-addressed identifier of a submitted transaction
///
/// The sole handle for looking up a transaction's eventual effects.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct TransactionDigest(String);

impl TransactionDigest {
    pub fn new(digest: impl Into<String>) -> Self {
        Self(digest.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TransactionDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for TransactionDigest {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for TransactionDigest {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// An owned digital collectible eligible for listing
///
/// Immutable once fetched from the inventory collaborator; identity is
/// `id`. The asset stays owned by the connected account until a
/// submitted transaction moves it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Asset {
    /// On-ledger object id
    pub id: ObjectId,

    /// Fully qualified type tag, e.g. `0x2::devnet_nft::DevNetNFT`
    pub object_type: String,

    /// Display name from the object's display metadata
    pub display_name: String,

    /// Description from the object's display metadata (may be empty)
    pub display_description: String,

    /// Display image URL (may be empty)
    pub display_image: String,

    /// Raw content fields as returned by the inventory collaborator
    pub raw_fields: serde_json::Value,
}

impl Asset {
    /// Best-effort display name: display metadata, then the raw `name`
    /// field, then a fixed fallback.
    pub fn name_or_default(&self) -> String {
        if !self.display_name.is_empty() {
            return self.display_name.clone();
        }
        self.raw_fields
            .get("name")
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
            .unwrap_or("Unnamed NFT")
            .to_string()
    }

    /// Best-effort description: display metadata, then the raw
    /// `description` field (may be empty).
    pub fn description_or_default(&self) -> String {
        if !self.display_description.is_empty() {
            return self.display_description.clone();
        }
        self.raw_fields
            .get("description")
            .and_then(|v| v.as_str())
            .unwrap_or("")
            .to_string()
    }

    /// Best-effort image URL: raw `url` field, then display metadata.
    pub fn image_or_default(&self) -> String {
        if let Some(url) = self.raw_fields.get("url").and_then(|v| v.as_str()) {
            if !url.is_empty() {
                return url.to_string();
            }
        }
        self.display_image.clone()
    }
}

/// Listing terms entered by the owner, in display units (whole coins)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ListingTerms {
    /// Price to own the asset outright
    pub price_to_own: f64,

    /// Daily rent
    pub daily_rent: f64,
}

/// The user's custody vault and the credential authorizing operations on it
///
/// Fetched once per session from the vault directory and treated as
/// read-only by the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VaultHandle {
    /// The vault object itself
    pub vault_id: ObjectId,

    /// Owner capability proving authority over the vault
    pub authority_cap_id: ObjectId,
}

/// Receipt returned by the submission gateway on acceptance
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Receipt {
    pub digest: TransactionDigest,
}

/// The created on-chain object resolved from a transaction's effects
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResolutionRecord {
    pub object_id: ObjectId,
    pub object_type: String,
}

/// Lifecycle status of a listing
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ListingStatus {
    Active,
}

/// A confirmed rental listing
///
/// Created only after both submission and resolution succeed; appended to
/// the registry and never mutated by this pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Listing {
    /// Same identity as the listed asset
    pub id: ObjectId,

    pub name: String,
    pub description: String,
    pub image: String,

    /// Type tag of the listed asset
    pub contract_type: String,

    /// Display-unit prices as entered by the owner
    pub price_to_own: f64,
    pub min_rent: f64,

    /// Owner account address
    pub owner: String,

    pub listed_at: DateTime<Utc>,
    pub status: ListingStatus,

    /// Id of the rental-state object the contract created
    pub rental_state_id: ObjectId,

    /// Rental progress indicator, "0" on a fresh listing
    pub current_progress: String,
}

/// Pipeline states visible to the presentation layer
///
/// `Committed` is terminal per attempt; failure states return to `Idle`
/// when the next attempt starts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    Composing,
    AwaitingSignature,
    AwaitingResolution,
    Committed,
    RefusedComposition,
    SubmissionRejected,
    ResolutionExhausted,
}

impl PipelineState {
    /// True for the failure exits of the state machine.
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Self::RefusedComposition | Self::SubmissionRejected | Self::ResolutionExhausted
        )
    }
}
