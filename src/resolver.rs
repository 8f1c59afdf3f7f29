//! State resolver
//!
//! The node that accepted a transaction may take an unbounded but
//! typically short time to index its effects, so the created rental-state
//! object is not visible the instant the gateway resolves. The resolver
//! polls the ledger for the transaction record under a bounded
//! exponential-backoff policy and returns the created object matching the
//! recognized type, or a terminal resolution failure.
//!
//! Backoff is exponential rather than fixed-interval because indexing
//! latency is right-skewed: most confirmations land within one or two
//! short waits, but tail cases need materially longer waits without
//! spamming the node.

use crate::errors::ListingError;
use crate::ledger::{LedgerQuery, QueryOptions};
use crate::types::{ResolutionRecord, TransactionDigest};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

/// Bounded exponential-backoff policy
///
/// Attempt `n` (1-based) that fails waits `initial_delay * 2^(n-1)`
/// before attempt `n+1`; no wait follows the final attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total number of attempts, including the first
    pub max_attempts: u32,

    /// Backoff after the first failed attempt
    pub initial_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial_delay: Duration::from_millis(1000),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, initial_delay: Duration) -> Self {
        Self {
            max_attempts,
            initial_delay,
        }
    }

    /// Backoff to apply after a failed attempt (1-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.initial_delay * 2u32.saturating_pow(attempt.saturating_sub(1))
    }
}

/// Resolves the created object a transaction produced, by digest
pub struct StateResolver<L: LedgerQuery> {
    ledger: Arc<L>,
    policy: RetryPolicy,
    recognized_type: String,
}

impl<L: LedgerQuery> StateResolver<L> {
    /// `recognized_type` is the substring identifying the expected
    /// created object's type, e.g. `RentalStateWithMetadata`.
    pub fn new(ledger: Arc<L>, policy: RetryPolicy, recognized_type: impl Into<String>) -> Self {
        Self {
            ledger,
            policy,
            recognized_type: recognized_type.into(),
        }
    }

    /// Poll the ledger until the transaction record exists and contains
    /// exactly one created object of the recognized type.
    ///
    /// Query failures and zero-match records are treated alike as
    /// not-yet-indexed and retried within the budget. Multiple matches
    /// terminate immediately with `AmbiguousResolution`: retrying cannot
    /// reduce the number of created objects.
    pub async fn resolve(
        &self,
        digest: &TransactionDigest,
    ) -> Result<ResolutionRecord, ListingError> {
        let max_attempts = self.policy.max_attempts;

        for attempt in 1..=max_attempts {
            tracing::debug!(
                digest = %digest,
                attempt = attempt,
                max_attempts = max_attempts,
                "Querying transaction record"
            );

            match self
                .ledger
                .transaction_record(digest, QueryOptions::effects_and_changes())
                .await
            {
                Ok(record) => {
                    let matches: Vec<_> = record
                        .created_objects()
                        .filter(|c| c.object_type.contains(&self.recognized_type))
                        .collect();

                    match matches.as_slice() {
                        [only] => {
                            tracing::info!(
                                digest = %digest,
                                object_id = %only.object_id,
                                object_type = %only.object_type,
                                attempts = attempt,
                                "Resolved created object"
                            );
                            return Ok(ResolutionRecord {
                                object_id: only.object_id.clone(),
                                object_type: only.object_type.clone(),
                            });
                        }
                        [] => {
                            tracing::debug!(
                                digest = %digest,
                                attempt = attempt,
                                "Record present but no matching created object yet"
                            );
                        }
                        many => {
                            let candidates =
                                many.iter().map(|c| c.object_id.clone()).collect();
                            tracing::error!(
                                digest = %digest,
                                count = many.len(),
                                "Multiple created objects match the recognized type"
                            );
                            return Err(ListingError::AmbiguousResolution {
                                digest: digest.clone(),
                                candidates,
                            });
                        }
                    }
                }
                Err(err) => {
                    tracing::debug!(
                        digest = %digest,
                        attempt = attempt,
                        error = %err,
                        "Transaction record query failed"
                    );
                }
            }

            if attempt < max_attempts {
                let backoff = self.policy.delay_for(attempt);
                tracing::debug!(
                    digest = %digest,
                    attempt = attempt,
                    backoff_ms = backoff.as_millis() as u64,
                    "Backing off before retry"
                );
                sleep(backoff).await;
            }
        }

        tracing::warn!(
            digest = %digest,
            attempts = max_attempts,
            "All resolution attempts exhausted"
        );
        Err(ListingError::ResolutionExhausted {
            digest: digest.clone(),
            attempts: max_attempts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::LedgerError;
    use crate::ledger::{ChangeKind, ObjectChange, TransactionRecord};
    use crate::types::ObjectId;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use tokio::sync::Mutex;
    use tokio::time::Instant;

    /// Replays a scripted response per query and records when each
    /// query arrived (under paused time, so deltas are exact).
    struct ScriptedLedger {
        responses: Mutex<VecDeque<Result<TransactionRecord, LedgerError>>>,
        query_times: Mutex<Vec<Instant>>,
    }

    impl ScriptedLedger {
        fn new(responses: Vec<Result<TransactionRecord, LedgerError>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                query_times: Mutex::new(Vec::new()),
            }
        }

        async fn query_count(&self) -> usize {
            self.query_times.lock().await.len()
        }

        async fn wait_sequence_ms(&self) -> Vec<u64> {
            let times = self.query_times.lock().await;
            times
                .windows(2)
                .map(|w| (w[1] - w[0]).as_millis() as u64)
                .collect()
        }
    }

    #[async_trait]
    impl LedgerQuery for ScriptedLedger {
        async fn transaction_record(
            &self,
            _digest: &TransactionDigest,
            options: QueryOptions,
        ) -> Result<TransactionRecord, LedgerError> {
            assert!(options.include_effects && options.include_object_changes);
            self.query_times.lock().await.push(Instant::now());
            self.responses
                .lock()
                .await
                .pop_front()
                .unwrap_or(Err(LedgerError::NotIndexed))
        }
    }

    fn created(object_id: &str, object_type: &str) -> ObjectChange {
        ObjectChange {
            kind: ChangeKind::Created,
            object_id: ObjectId::from(object_id),
            object_type: object_type.to_string(),
        }
    }

    fn record_with(changes: Vec<ObjectChange>) -> TransactionRecord {
        TransactionRecord {
            digest: TransactionDigest::from("0xdigest1"),
            object_changes: changes,
        }
    }

    fn digest() -> TransactionDigest {
        TransactionDigest::from("0xdigest1")
    }

    #[test]
    fn delay_doubles_per_attempt() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for(1), Duration::from_millis(1000));
        assert_eq!(policy.delay_for(2), Duration::from_millis(2000));
        assert_eq!(policy.delay_for(3), Duration::from_millis(4000));
        assert_eq!(policy.delay_for(4), Duration::from_millis(8000));
    }

    #[tokio::test(start_paused = true)]
    async fn resolves_after_not_indexed_queries_with_exact_backoff() {
        // First 3 queries fail, 4th returns the match.
        let ledger = Arc::new(ScriptedLedger::new(vec![
            Err(LedgerError::NotIndexed),
            Err(LedgerError::Transport("connection reset".to_string())),
            Err(LedgerError::NotIndexed),
            Ok(record_with(vec![created(
                "0xR1",
                "pkg::rental::RentalStateWithMetadata",
            )])),
        ]));
        let resolver = StateResolver::new(
            ledger.clone(),
            RetryPolicy::default(),
            "RentalStateWithMetadata",
        );

        let record = resolver.resolve(&digest()).await.unwrap();
        assert_eq!(record.object_id, ObjectId::from("0xR1"));

        assert_eq!(ledger.query_count().await, 4);
        assert_eq!(ledger.wait_sequence_ms().await, vec![1000, 2000, 4000]);
    }

    #[tokio::test(start_paused = true)]
    async fn exhausts_after_exactly_max_attempts() {
        let ledger = Arc::new(ScriptedLedger::new(vec![]));
        let resolver = StateResolver::new(
            ledger.clone(),
            RetryPolicy::default(),
            "RentalStateWithMetadata",
        );

        let err = resolver.resolve(&digest()).await.unwrap_err();
        assert_eq!(
            err,
            ListingError::ResolutionExhausted {
                digest: digest(),
                attempts: 5,
            }
        );
        assert_eq!(ledger.query_count().await, 5);
        assert_eq!(
            ledger.wait_sequence_ms().await,
            vec![1000, 2000, 4000, 8000]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn record_without_match_counts_as_not_indexed() {
        // Record exists but only unrelated created objects; the match
        // appears on the second query.
        let ledger = Arc::new(ScriptedLedger::new(vec![
            Ok(record_with(vec![created("0xOTHER", "pkg::vault::Receipt")])),
            Ok(record_with(vec![
                created("0xOTHER", "pkg::vault::Receipt"),
                created("0xR1", "pkg::rental::RentalStateWithMetadata"),
            ])),
        ]));
        let resolver = StateResolver::new(
            ledger.clone(),
            RetryPolicy::default(),
            "RentalStateWithMetadata",
        );

        let record = resolver.resolve(&digest()).await.unwrap();
        assert_eq!(record.object_id, ObjectId::from("0xR1"));
        assert_eq!(ledger.query_count().await, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn multiple_matches_fail_ambiguous_without_retry() {
        let ledger = Arc::new(ScriptedLedger::new(vec![Ok(record_with(vec![
            created("0xR1", "pkg::rental::RentalStateWithMetadata"),
            created("0xR2", "pkg::rental::RentalStateWithMetadata"),
        ]))]));
        let resolver = StateResolver::new(
            ledger.clone(),
            RetryPolicy::default(),
            "RentalStateWithMetadata",
        );

        let err = resolver.resolve(&digest()).await.unwrap_err();
        assert_eq!(
            err,
            ListingError::AmbiguousResolution {
                digest: digest(),
                candidates: vec![ObjectId::from("0xR1"), ObjectId::from("0xR2")],
            }
        );
        // Ambiguity is terminal: no further queries.
        assert_eq!(ledger.query_count().await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn non_created_changes_are_ignored() {
        let ledger = Arc::new(ScriptedLedger::new(vec![Ok(record_with(vec![
            ObjectChange {
                kind: ChangeKind::Mutated,
                object_id: ObjectId::from("0xMUT"),
                object_type: "pkg::rental::RentalStateWithMetadata".to_string(),
            },
            created("0xR1", "pkg::rental::RentalStateWithMetadata"),
        ]))]));
        let resolver = StateResolver::new(
            ledger.clone(),
            RetryPolicy::default(),
            "RentalStateWithMetadata",
        );

        let record = resolver.resolve(&digest()).await.unwrap();
        assert_eq!(record.object_id, ObjectId::from("0xR1"));
    }
}
