//! Determinism helpers.
//!
//! Outputs are compared through the BLAKE3 hash of their JSON encoding, so any
//! serializable value (event lists, score reports) can be checked the same way.

use serde::Serialize;

/// Result of a determinism verification.
#[derive(Debug, Clone)]
pub struct DeterminismResult {
    /// Whether all runs produced identical output.
    pub is_deterministic: bool,
    /// Number of runs performed.
    pub runs: usize,
    /// Hash of the first run's output.
    pub hash: String,
    /// First run whose output differed, if any.
    pub first_mismatch: Option<usize>,
}

/// Hashes a value's JSON encoding.
pub fn output_hash<T: Serialize>(value: &T) -> String {
    let bytes = serde_json::to_vec(value).unwrap_or_default();
    blake3::hash(&bytes).to_hex().to_string()
}

/// Runs `generate` `runs` times and compares the outputs.
pub fn verify_determinism<T, F>(mut generate: F, runs: usize) -> DeterminismResult
where
    T: Serialize,
    F: FnMut() -> T,
{
    let runs = runs.max(2);
    let hash = output_hash(&generate());
    let first_mismatch = (1..runs).find(|_| output_hash(&generate()) != hash);
    DeterminismResult {
        is_deterministic: first_mismatch.is_none(),
        runs,
        hash,
        first_mismatch,
    }
}

/// Asserts that a closure's output is identical across runs.
#[macro_export]
macro_rules! assert_deterministic {
    ($runs:expr, $body:expr) => {{
        let result = $crate::determinism::verify_determinism(|| $body, $runs);
        assert!(
            result.is_deterministic,
            "output changed on run {:?} (first hash {})",
            result.first_mismatch,
            result.hash
        );
        result
    }};
}
