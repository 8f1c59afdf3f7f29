//! Ledger-side collaborator interfaces
//!
//! Every external system the pipeline talks to is a trait here so tests
//! can substitute deterministic mocks: the ledger query endpoint (consumed
//! by the resolver), the asset inventory (feeds the selector), and the
//! vault directory (one lookup per session).

use crate::errors::LedgerError;
use crate::types::{Asset, ObjectId, TransactionDigest, VaultHandle};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Detail flags for a transaction record query
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct QueryOptions {
    pub include_effects: bool,
    pub include_object_changes: bool,
}

impl QueryOptions {
    /// Options the resolver always uses: effects plus object changes.
    pub fn effects_and_changes() -> Self {
        Self {
            include_effects: true,
            include_object_changes: true,
        }
    }
}

/// Kind of state change a transaction applied to an object
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Created,
    Mutated,
    Deleted,
    Transferred,
    Wrapped,
    Published,
}

/// One object change from a transaction's effects
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ObjectChange {
    #[serde(rename = "type")]
    pub kind: ChangeKind,
    pub object_id: ObjectId,
    pub object_type: String,
}

/// A transaction record as returned by the ledger node
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransactionRecord {
    pub digest: TransactionDigest,

    /// Present when the query asked for object changes
    #[serde(default)]
    pub object_changes: Vec<ObjectChange>,
}

impl TransactionRecord {
    /// Object changes of kind `created`.
    pub fn created_objects(&self) -> impl Iterator<Item = &ObjectChange> {
        self.object_changes
            .iter()
            .filter(|c| c.kind == ChangeKind::Created)
    }
}

/// Read-only query endpoint of the ledger node
///
/// The resolver is its only consumer. Implementations may return
/// `LedgerError::NotIndexed` for a transaction that was accepted but
/// whose effects are not queryable yet.
#[async_trait]
pub trait LedgerQuery: Send + Sync {
    async fn transaction_record(
        &self,
        digest: &TransactionDigest,
        options: QueryOptions,
    ) -> Result<TransactionRecord, LedgerError>;
}

/// Supplies the set of assets owned by the connected account
///
/// Fetching and caching strategy is the implementation's concern.
#[async_trait]
pub trait AssetInventory: Send + Sync {
    async fn owned_assets(&self, owner: &str) -> Result<Vec<Asset>, LedgerError>;
}

/// Supplies the user's custody vault handle for an account address
///
/// Queried once per session; `None` means the account has no vault yet
/// and composition must be refused.
#[async_trait]
pub trait VaultDirectory: Send + Sync {
    async fn vault_for(&self, owner: &str) -> Result<Option<VaultHandle>, LedgerError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn created_objects_filters_kind() {
        let record = TransactionRecord {
            digest: TransactionDigest::from("0xabc"),
            object_changes: vec![
                ObjectChange {
                    kind: ChangeKind::Mutated,
                    object_id: ObjectId::from("0x1"),
                    object_type: "pkg::vault::Vault".to_string(),
                },
                ObjectChange {
                    kind: ChangeKind::Created,
                    object_id: ObjectId::from("0x2"),
                    object_type: "pkg::rental::RentalStateWithMetadata".to_string(),
                },
                ObjectChange {
                    kind: ChangeKind::Transferred,
                    object_id: ObjectId::from("0x3"),
                    object_type: "pkg::nft::T".to_string(),
                },
            ],
        };

        let created: Vec<_> = record.created_objects().collect();
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].object_id, ObjectId::from("0x2"));
    }

    #[test]
    fn change_kind_serde_is_lowercase() {
        let change = ObjectChange {
            kind: ChangeKind::Created,
            object_id: ObjectId::from("0x2"),
            object_type: "pkg::rental::RentalStateWithMetadata".to_string(),
        };
        let json = serde_json::to_value(&change).unwrap();
        assert_eq!(json["type"], "created");

        let parsed: ObjectChange = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, change);
    }

    #[test]
    fn object_changes_default_to_empty() {
        let record: TransactionRecord =
            serde_json::from_str(r#"{"digest":"0xabc"}"#).unwrap();
        assert!(record.object_changes.is_empty());
    }
}
