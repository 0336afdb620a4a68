//! Context-signature fingerprinting for Intervention Learning.
//!
//! Two gated tool calls get the same signature when they'd look the
//! same to a human: same tool, same feature, same kind of action, same
//! autonomy level. Grounded on the allowance system's pattern lookup
//! (`AllowanceStore::find_matching_and_consume`), generalized from "has
//! this exact action already been allowed" to "has a human already
//! answered this exact situation enough times to trust the learned
//! answer" — a flat hash fingerprint standing in for the teacher's
//! glob-matched `AllowancePattern`.

use arcadia_storage::models::AutonomyLevel;
use sha2::{Digest, Sha256};

/// Fingerprint the shape of a gated tool call.
#[must_use]
pub fn fingerprint(
    tool_name: &str,
    feature_index: Option<i64>,
    invocation_kind: &str,
    autonomy_level: AutonomyLevel,
) -> String {
    let feature = feature_index.map_or_else(|| "-".to_string(), |i| i.to_string());
    let raw = format!("{tool_name}|{feature}|{invocation_kind}|{autonomy_level:?}");
    let mut hasher = Sha256::new();
    hasher.update(raw.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_inputs_produce_same_signature() {
        let a = fingerprint("file_delete", Some(3), "file_delete", AutonomyLevel::Plan);
        let b = fingerprint("file_delete", Some(3), "file_delete", AutonomyLevel::Plan);
        assert_eq!(a, b);
    }

    #[test]
    fn different_autonomy_level_changes_signature() {
        let a = fingerprint("file_delete", Some(3), "file_delete", AutonomyLevel::Plan);
        let b = fingerprint("file_delete", Some(3), "file_delete", AutonomyLevel::ExecuteSafe);
        assert_ne!(a, b);
    }

    #[test]
    fn missing_feature_index_is_stable() {
        let a = fingerprint("shell", None, "execute_command", AutonomyLevel::Observe);
        let b = fingerprint("shell", None, "execute_command", AutonomyLevel::Observe);
        assert_eq!(a, b);
    }
}
