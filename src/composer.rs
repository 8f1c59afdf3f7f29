//! Transaction composer
//!
//! Builds the single atomic transaction behind a listing: place the asset
//! into the custody vault, withdraw it again to obtain a call-scoped
//! handle, then invoke the listing entry point. Pure data construction,
//! no network access.
//!
//! The place-then-withdraw pair looks redundant but is load-bearing: the
//! contract's entry point requires sole custody of the asset inside the
//! vault at call time, and a call-scoped handle is obtainable only via a
//! withdrawal in the same transaction. Both operations must be preserved.

use crate::errors::ListingError;
use crate::types::{Asset, ListingTerms, ObjectId, VaultHandle};
use serde::{Deserialize, Serialize};

/// Smallest ledger unit per display unit (MIST per SUI)
pub const BASE_UNIT_SCALE: f64 = 1_000_000_000.0;

/// Convert a display-unit amount to the ledger's smallest integer unit,
/// truncating toward zero.
pub fn to_base_units(amount: f64) -> u64 {
    (amount * BASE_UNIT_SCALE).trunc() as u64
}

/// Argument to a contract invocation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum CallArg {
    /// An on-ledger object passed by reference
    Object(ObjectId),

    /// The transaction-scoped handle produced by the withdraw operation
    WithdrawnAsset,

    /// Pure byte-vector argument
    Bytes(Vec<u8>),

    /// Pure u64 argument
    U64(u64),
}

/// One operation inside the composed transaction
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Operation {
    /// Move the asset from the account's holdings into the vault
    PlaceInVault {
        vault_id: ObjectId,
        asset_id: ObjectId,
        asset_type: String,
    },

    /// Take the asset back out, producing a call-scoped handle
    WithdrawFromVault {
        vault_id: ObjectId,
        asset_id: ObjectId,
        asset_type: String,
    },

    /// Call the listing entry point
    InvokeContract {
        target: String,
        type_arguments: Vec<String>,
        arguments: Vec<CallArg>,
    },
}

/// An ordered, immutable multi-operation transaction
///
/// The ledger guarantees all operations commit or none do; the composer
/// never produces a partially executable transaction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComposedTransaction {
    pub operations: Vec<Operation>,
}

impl ComposedTransaction {
    /// The contract invocation, if present.
    pub fn invocation(&self) -> Option<&Operation> {
        self.operations
            .iter()
            .find(|op| matches!(op, Operation::InvokeContract { .. }))
    }
}

fn validate_amount(value: f64, field: &str) -> Result<(), ListingError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ListingError::Validation(format!(
            "{field} must be a positive finite number"
        )));
    }
    // The float-to-u64 cast saturates; a value this large is operator
    // error, not a listable price.
    if value * BASE_UNIT_SCALE >= u64::MAX as f64 {
        return Err(ListingError::Validation(format!(
            "{field} exceeds the ledger's representable amount"
        )));
    }
    Ok(())
}

/// Reject non-finite, non-positive, or unrepresentably large listing terms.
pub fn validate_terms(terms: &ListingTerms) -> Result<(), ListingError> {
    validate_amount(terms.price_to_own, "price_to_own")?;
    validate_amount(terms.daily_rent, "daily_rent")?;
    Ok(())
}

/// Compose the listing transaction for `asset` under `terms`.
///
/// `vault` is the session's custody vault; without one the composition is
/// refused with `MissingVault`. `target` is the fully qualified entry
/// point, e.g. `0xPKG::kiosk_rto::list_nft_for_rent`.
pub fn compose(
    asset: &Asset,
    terms: &ListingTerms,
    vault: Option<&VaultHandle>,
    target: &str,
) -> Result<ComposedTransaction, ListingError> {
    if asset.id.is_empty() {
        return Err(ListingError::Validation(
            "asset id must not be empty".to_string(),
        ));
    }
    if asset.object_type.is_empty() {
        return Err(ListingError::Validation(
            "asset type must not be empty".to_string(),
        ));
    }
    validate_terms(terms)?;

    let vault = vault.ok_or(ListingError::MissingVault)?;

    let type_tag_bytes = asset.object_type.as_bytes().to_vec();
    let price_base = to_base_units(terms.price_to_own);
    let rent_base = to_base_units(terms.daily_rent);

    let operations = vec![
        Operation::PlaceInVault {
            vault_id: vault.vault_id.clone(),
            asset_id: asset.id.clone(),
            asset_type: asset.object_type.clone(),
        },
        Operation::WithdrawFromVault {
            vault_id: vault.vault_id.clone(),
            asset_id: asset.id.clone(),
            asset_type: asset.object_type.clone(),
        },
        Operation::InvokeContract {
            target: target.to_string(),
            type_arguments: vec![asset.object_type.clone()],
            arguments: vec![
                CallArg::Object(vault.vault_id.clone()),
                CallArg::Object(vault.authority_cap_id.clone()),
                CallArg::WithdrawnAsset,
                CallArg::Bytes(type_tag_bytes),
                CallArg::U64(price_base),
                CallArg::U64(rent_base),
            ],
        },
    ];

    tracing::debug!(
        asset_id = %asset.id,
        asset_type = %asset.object_type,
        price_base = price_base,
        rent_base = rent_base,
        target = %target,
        "Composed listing transaction"
    );

    Ok(ComposedTransaction { operations })
}
