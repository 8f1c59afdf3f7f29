//! Logging initialization and per-attempt structured logging

use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use uuid::Uuid;

/// Initialize the tracing subscriber.
///
/// Respects `RUST_LOG`; falls back to `info` for this crate and `warn`
/// elsewhere. Safe to call once at startup.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("kiosk_rto=info,warn"));
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}

/// Structured logger for one listing attempt
///
/// Carries a correlation id so interleaved attempts can be told apart in
/// the log stream.
#[derive(Debug, Clone)]
pub struct AttemptLogger {
    attempt_id: String,
}

impl AttemptLogger {
    pub fn new() -> Self {
        Self {
            attempt_id: Uuid::new_v4().to_string(),
        }
    }

    pub fn attempt_id(&self) -> &str {
        &self.attempt_id
    }

    pub fn log_compose(&self, asset_id: &str, asset_type: &str) {
        tracing::info!(
            attempt_id = %self.attempt_id,
            asset_id = %asset_id,
            asset_type = %asset_type,
            "Composing listing transaction"
        );
    }

    pub fn log_submitted(&self, digest: &str) {
        tracing::info!(
            attempt_id = %self.attempt_id,
            digest = %digest,
            "Transaction submitted, awaiting resolution"
        );
    }

    pub fn log_committed(&self, listing_id: &str, rental_state_id: &str) {
        tracing::info!(
            attempt_id = %self.attempt_id,
            listing_id = %listing_id,
            rental_state_id = %rental_state_id,
            "Listing committed"
        );
    }

    pub fn log_failed(&self, category: &str, error: &str) {
        tracing::warn!(
            attempt_id = %self.attempt_id,
            category = %category,
            error = %error,
            "Listing attempt failed"
        );
    }
}

impl Default for AttemptLogger {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attempt_ids_are_unique() {
        let a = AttemptLogger::new();
        let b = AttemptLogger::new();
        assert_ne!(a.attempt_id(), b.attempt_id());
        assert!(!a.attempt_id().is_empty());
    }
}
