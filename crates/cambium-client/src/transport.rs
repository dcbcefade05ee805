//! HTTP transport with bounded sequential retry
//!
//! Submission is the only suspending operation in the system. A
//! [`NodeEndpoint`] performs exactly one submission attempt;
//! [`send`]/[`send_signed`] wrap it in the retry discipline: at most
//! `attempts` strictly sequential tries, each bounded by a timeout, with a
//! timed-out attempt abandoned and counted against the budget. Dropping
//! the returned future cancels the in-flight HTTP call and starts no
//! further attempt.

use crate::error::TransportErrorBuilder;
use async_trait::async_trait;
use cambium_core::crypto::SecretKey;
use cambium_core::{BodyData, Error, Hash, MessageFrame, Result, SignedTransaction, Transaction};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// One submission attempt against a node. No retry at this level.
#[async_trait]
pub trait NodeEndpoint: Send + Sync {
    /// Submit a canonical transaction byte sequence; resolves with the
    /// node-acknowledged transaction hash on acceptance.
    async fn submit(&self, tx_body: &[u8]) -> Result<Hash>;
}

/// Configuration for the retry discipline around [`NodeEndpoint::submit`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Maximum number of submission attempts before giving up
    pub attempts: u32,
    /// Bound on each individual attempt
    pub timeout: Duration,
    /// Optional fixed delay between attempts
    pub backoff: Option<Duration>,
}

impl RetryPolicy {
    /// Policy with the given attempt budget and per-attempt timeout, no
    /// backoff.
    #[must_use]
    pub fn new(attempts: u32, timeout: Duration) -> Self {
        Self {
            attempts,
            timeout,
            backoff: None,
        }
    }

    /// Add a fixed delay between attempts.
    #[must_use]
    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = Some(backoff);
        self
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 10,
            timeout: Duration::from_secs(1),
            backoff: None,
        }
    }
}

#[derive(Serialize)]
struct SubmitRequest<'a> {
    tx_body: &'a str,
}

#[derive(Deserialize)]
struct SubmitResponse {
    tx_hash: Hash,
}

/// HTTP endpoint for a node's transaction API.
///
/// Submits the canonical bytes hex-encoded as JSON `{"tx_body": "<hex>"}`
/// to the configured base path and expects `{"tx_hash": "<hex>"}` back.
#[derive(Debug, Clone)]
pub struct HttpEndpoint {
    base_url: String,
    client: reqwest::Client,
}

impl HttpEndpoint {
    /// Create an endpoint for the given transaction API base path.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::new(),
        }
    }

    /// The configured base path.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl NodeEndpoint for HttpEndpoint {
    async fn submit(&self, tx_body: &[u8]) -> Result<Hash> {
        let encoded = hex::encode(tx_body);
        let request = SubmitRequest { tx_body: &encoded };
        let response = self
            .client
            .post(&self.base_url)
            .json(&request)
            .send()
            .await
            .map_err(TransportErrorBuilder::unreachable)?;

        if response.status().is_success() {
            let parsed: SubmitResponse = response
                .json()
                .await
                .map_err(TransportErrorBuilder::bad_response)?;
            Ok(parsed.tx_hash)
        } else {
            Err(TransportErrorBuilder::rejected(response.status()))
        }
    }
}

/// Sign `data` under `transaction` and submit the canonical bytes.
///
/// Signing happens once, up front; only the network submission is retried.
pub async fn send(
    endpoint: &dyn NodeEndpoint,
    transaction: &Transaction,
    data: &BodyData,
    secret_key: &SecretKey,
    policy: &RetryPolicy,
) -> Result<Hash> {
    let signed = transaction.sign(secret_key, data)?;
    send_signed(endpoint, &signed, data, policy).await
}

/// Submit an already-signed transaction with bounded sequential retry.
///
/// Resolves on the first accepted attempt; fails with
/// [`Error::Transport`] only after the whole attempt budget is exhausted.
pub async fn send_signed(
    endpoint: &dyn NodeEndpoint,
    signed: &SignedTransaction,
    data: &BodyData,
    policy: &RetryPolicy,
) -> Result<Hash> {
    if policy.attempts == 0 {
        return Err(Error::transport("retry policy allows zero attempts"));
    }

    let bytes = signed.serialize(data)?;
    let mut last_error = String::new();

    for attempt in 1..=policy.attempts {
        match tokio::time::timeout(policy.timeout, endpoint.submit(&bytes)).await {
            Ok(Ok(tx_hash)) => {
                debug!(%tx_hash, attempt, "transaction accepted");
                return Ok(tx_hash);
            }
            Ok(Err(error)) => {
                warn!(attempt, attempts = policy.attempts, %error, "submission attempt failed");
                last_error = error.to_string();
            }
            Err(_) => {
                warn!(attempt, attempts = policy.attempts, "submission attempt timed out");
                last_error = format!("attempt timed out after {:?}", policy.timeout);
            }
        }

        if attempt < policy.attempts {
            if let Some(backoff) = policy.backoff {
                tokio::time::sleep(backoff).await;
            }
        }
    }

    Err(TransportErrorBuilder::exhausted(policy.attempts, last_error))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cambium_core::crypto::Keypair;
    use cambium_core::{new_transaction, Field, FieldKind, MessageType, Schema, Value};
    use std::sync::atomic::{AtomicU32, Ordering};

    struct FlakyEndpoint {
        failures_before_success: u32,
        calls: AtomicU32,
    }

    impl FlakyEndpoint {
        fn new(failures_before_success: u32) -> Self {
            Self {
                failures_before_success,
                calls: AtomicU32::new(0),
            }
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl NodeEndpoint for FlakyEndpoint {
        async fn submit(&self, tx_body: &[u8]) -> Result<Hash> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures_before_success {
                Err(TransportErrorBuilder::rejected("503 Service Unavailable"))
            } else {
                Ok(Hash::new(
                    sha2_digest(tx_body),
                ))
            }
        }
    }

    struct StalledEndpoint {
        calls: AtomicU32,
    }

    #[async_trait]
    impl NodeEndpoint for StalledEndpoint {
        async fn submit(&self, _tx_body: &[u8]) -> Result<Hash> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(Hash::new([0u8; 32]))
        }
    }

    fn sha2_digest(bytes: &[u8]) -> [u8; 32] {
        use sha2::{Digest, Sha256};
        Sha256::digest(bytes).into()
    }

    fn fixture() -> (Keypair, Transaction, BodyData) {
        let keypair = Keypair::generate();
        let schema = Schema::new(vec![Field::new("amount", FieldKind::U64)]);
        let tx = new_transaction(
            MessageType::new(schema, *keypair.public_key()).with_routing(1, 0),
        );
        let mut data = BodyData::new();
        data.insert("amount".into(), Value::U64(10));
        (keypair, tx, data)
    }

    #[tokio::test]
    async fn test_send_succeeds_on_third_attempt() {
        let (keypair, tx, data) = fixture();
        let endpoint = FlakyEndpoint::new(2);
        let policy = RetryPolicy::new(3, Duration::from_secs(1));

        let result = send(&endpoint, &tx, &data, keypair.secret_key(), &policy).await;
        assert!(result.is_ok());
        assert_eq!(endpoint.calls(), 3);
    }

    #[tokio::test]
    async fn test_send_exhausts_exact_attempt_budget() {
        let (keypair, tx, data) = fixture();
        let endpoint = FlakyEndpoint::new(u32::MAX);
        let policy = RetryPolicy::new(3, Duration::from_secs(1));

        let err = send(&endpoint, &tx, &data, keypair.secret_key(), &policy)
            .await
            .unwrap_err();
        assert_eq!(endpoint.calls(), 3);
        assert!(matches!(err, Error::Transport { .. }));
        assert!(err.to_string().contains("all 3 attempts exhausted"));
    }

    #[tokio::test]
    async fn test_timed_out_attempts_count_toward_budget() {
        let (keypair, tx, data) = fixture();
        let endpoint = StalledEndpoint {
            calls: AtomicU32::new(0),
        };
        let policy = RetryPolicy::new(2, Duration::from_millis(20));

        let err = send(&endpoint, &tx, &data, keypair.secret_key(), &policy)
            .await
            .unwrap_err();
        assert_eq!(endpoint.calls.load(Ordering::SeqCst), 2);
        assert!(err.to_string().contains("timed out"));
    }

    #[tokio::test]
    async fn test_send_signed_submits_canonical_bytes() {
        let (keypair, tx, data) = fixture();
        let signed = tx.sign(keypair.secret_key(), &data).unwrap();
        let endpoint = FlakyEndpoint::new(0);
        let policy = RetryPolicy::default();

        let tx_hash = send_signed(&endpoint, &signed, &data, &policy)
            .await
            .unwrap();
        // The mock hashes exactly what it received; it must match the
        // canonical signed serialization.
        let expected = Hash::new(sha2_digest(&signed.serialize(&data).unwrap()));
        assert_eq!(tx_hash, expected);
        assert_eq!(endpoint.calls(), 1);
    }

    #[tokio::test]
    async fn test_zero_attempt_policy_is_rejected() {
        let (keypair, tx, data) = fixture();
        let endpoint = FlakyEndpoint::new(0);
        let policy = RetryPolicy::new(0, Duration::from_secs(1));

        let err = send(&endpoint, &tx, &data, keypair.secret_key(), &policy)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("zero attempts"));
        assert_eq!(endpoint.calls(), 0);
    }

    #[test]
    fn test_retry_policy_default() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.attempts, 10);
        assert_eq!(policy.timeout, Duration::from_secs(1));
        assert!(policy.backoff.is_none());
    }
}
