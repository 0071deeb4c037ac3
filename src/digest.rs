//! Content digests used as ETag material.
//!
//! # Responsibilities
//! - Hash a byte buffer into a lowercase hex string
//! - Resolve a usable digest backend once per process
//! - Let callers inject their own backend instead
//!
//! # Design Decisions
//! - Backends sit behind the `DigestProvider` trait
//! - Resolution runs a known-answer self-test; a backend that fails it is
//!   never used
//! - An unavailable backend is an error, never an empty digest

use std::fmt;
use std::sync::Arc;

use sha2::{Digest, Sha256};
use thiserror::Error;
use tokio::sync::OnceCell;

/// Errors produced while computing a digest.
#[derive(Debug, Error)]
pub enum DigestError {
    /// No backend passed the capability check.
    #[error("no usable digest backend is available")]
    Unavailable,

    /// A backend was selected but failed to hash the input.
    #[error("digest backend {backend} failed: {reason}")]
    Backend {
        backend: &'static str,
        reason: String,
    },
}

/// A hashing backend producing hex digests.
pub trait DigestProvider: Send + Sync + fmt::Debug {
    /// Algorithm name, for logs.
    fn algorithm(&self) -> &'static str;

    /// Hash `data` into a lowercase hex string.
    fn hexdigest(&self, data: &[u8]) -> Result<String, DigestError>;
}

/// SHA-256 backed by the `sha2` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct Sha256Provider;

impl DigestProvider for Sha256Provider {
    fn algorithm(&self) -> &'static str {
        "SHA-256"
    }

    fn hexdigest(&self, data: &[u8]) -> Result<String, DigestError> {
        let mut hasher = Sha256::new();
        hasher.update(data);
        Ok(hex::encode(hasher.finalize()))
    }
}

/// FIPS 180-2 test vector for SHA-256("abc").
const SELF_TEST_INPUT: &[u8] = b"abc";
const SELF_TEST_DIGEST: &str = "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad";

static PROCESS_PROVIDER: OnceCell<Option<Arc<dyn DigestProvider>>> = OnceCell::const_new();

fn self_test(provider: &dyn DigestProvider) -> Result<(), DigestError> {
    let digest = provider.hexdigest(SELF_TEST_INPUT)?;
    if digest == SELF_TEST_DIGEST {
        Ok(())
    } else {
        Err(DigestError::Backend {
            backend: provider.algorithm(),
            reason: format!("self-test produced {digest}"),
        })
    }
}

/// Backends tried by [`process_provider`], in order of preference.
pub fn default_candidates() -> Vec<Arc<dyn DigestProvider>> {
    vec![Arc::new(Sha256Provider)]
}

/// Pick the first candidate that passes the self-test.
///
/// The check runs on the blocking pool so a slow backend never stalls the
/// request task that triggered resolution.
pub async fn select_provider(
    candidates: Vec<Arc<dyn DigestProvider>>,
) -> Result<Arc<dyn DigestProvider>, DigestError> {
    for candidate in candidates {
        let backend = Arc::clone(&candidate);
        match tokio::task::spawn_blocking(move || self_test(backend.as_ref())).await {
            Ok(Ok(())) => return Ok(candidate),
            Ok(Err(e)) => {
                tracing::warn!(
                    algorithm = candidate.algorithm(),
                    error = %e,
                    "Digest backend rejected"
                );
            }
            Err(e) => {
                tracing::warn!(
                    algorithm = candidate.algorithm(),
                    error = %e,
                    "Digest backend self-test did not complete"
                );
            }
        }
    }
    Err(DigestError::Unavailable)
}

/// The digest backend for this process, resolved on first use.
pub async fn process_provider() -> Result<Arc<dyn DigestProvider>, DigestError> {
    let resolved = PROCESS_PROVIDER
        .get_or_init(|| async {
            match select_provider(default_candidates()).await {
                Ok(provider) => {
                    tracing::info!(algorithm = provider.algorithm(), "Digest backend resolved");
                    Some(provider)
                }
                Err(e) => {
                    tracing::warn!(error = %e, "No digest backend available, ETags disabled");
                    None
                }
            }
        })
        .await;

    resolved.clone().ok_or(DigestError::Unavailable)
}

/// Hex digest of `data` using the process backend.
pub async fn hexdigest(data: &[u8]) -> Result<String, DigestError> {
    process_provider().await?.hexdigest(data)
}
