//! Snapshot canonicalization and change detection
//!
//! A snapshot is persisted as canonical JSON. Field order is fixed by the struct
//! declaration, so two equal snapshots always serialize to the same string and
//! change detection is a plain string comparison against the stored value.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::compat::extractor::VersionPair;

/// Everything observed from the outside world in one cycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct VersionSnapshot {
    // Absent values are stored as explicit nulls; a missing key is corrupt
    #[serde(deserialize_with = "Option::deserialize")]
    pub vanilla: Option<VersionPair>,
    #[serde(deserialize_with = "Option::deserialize")]
    pub fx: Option<VersionPair>,
    #[serde(deserialize_with = "Option::deserialize")]
    pub custom_lobby: Option<String>,
}

impl VersionSnapshot {
    pub fn new(
        vanilla: Option<VersionPair>,
        fx: Option<VersionPair>,
        custom_lobby: Option<String>,
    ) -> Self {
        Self {
            vanilla,
            fx,
            custom_lobby,
        }
    }

    /// Canonical string form used for comparison and persistence
    pub fn canonical(&self) -> String {
        // Only strings and options are serialized, which cannot fail
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Parse a persisted snapshot for display, treating anything unreadable as absent
    pub fn parse(persisted: &str) -> Option<Self> {
        serde_json::from_str(persisted)
            .inspect_err(|e| warn!("Ignoring unreadable persisted snapshot: {}", e))
            .ok()
    }
}

/// Outcome of comparing a fresh snapshot with the persisted one
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    /// Whether watchers should be told about a change
    pub should_notify: bool,
    /// Canonical form of the new snapshot, to be persisted after notifying
    pub canonical: String,
    /// Previously persisted snapshot, if one could be read; only used to describe the change
    pub previous: Option<VersionSnapshot>,
}

/// Decide whether `snapshot` differs from what was persisted last time
pub fn reconcile(snapshot: &VersionSnapshot, persisted: Option<&str>) -> Reconciliation {
    let canonical = snapshot.canonical();
    let should_notify = persisted != Some(canonical.as_str());
    let previous = persisted.and_then(VersionSnapshot::parse);

    Reconciliation {
        should_notify,
        canonical,
        previous,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn snapshot() -> VersionSnapshot {
        VersionSnapshot::new(
            Some(VersionPair::new("123", "1234")),
            Some(VersionPair::new("123", "1233")),
            Some("123".to_string()),
        )
    }

    #[test]
    fn canonical_uses_fixed_key_order() {
        assert_eq!(
            snapshot().canonical(),
            r#"{"vanilla":{"protocol":"123","game":"1234"},"fx":{"protocol":"123","game":"1233"},"customLobby":"123"}"#
        );
    }

    #[test]
    fn canonical_keeps_absent_values_as_null() {
        let snapshot = VersionSnapshot::new(None, None, None);

        assert_eq!(
            snapshot.canonical(),
            r#"{"vanilla":null,"fx":null,"customLobby":null}"#
        );
    }

    #[test]
    fn reconcile_notifies_when_nothing_persisted() {
        let result = reconcile(&snapshot(), None);

        assert!(result.should_notify);
        assert_eq!(result.previous, None);
        assert_eq!(result.canonical, snapshot().canonical());
    }

    #[test]
    fn reconcile_is_idempotent() {
        let first = reconcile(&snapshot(), None);
        let second = reconcile(&snapshot(), Some(&first.canonical));

        assert!(first.should_notify);
        assert!(!second.should_notify);
        assert_eq!(second.previous, Some(snapshot()));
    }

    #[test]
    fn reconcile_notifies_on_changed_version() {
        let persisted = snapshot().canonical();
        let mut changed = snapshot();
        changed.fx = Some(VersionPair::new("123", "1234"));

        let result = reconcile(&changed, Some(&persisted));

        assert!(result.should_notify);
        assert_eq!(result.previous, Some(snapshot()));
    }

    #[test]
    fn reconcile_notifies_when_persisted_text_is_not_canonical() {
        let persisted = r#"{ "customLobby": "123",
            "fx": { "game": "1233", "protocol": "123" },
            "vanilla": { "game": "1234", "protocol": "123" } }"#;

        let result = reconcile(&snapshot(), Some(persisted));

        assert!(result.should_notify);
        assert_eq!(result.previous, Some(snapshot()));
    }

    #[test]
    fn reconcile_notifies_for_empty_object_even_when_new_snapshot_is_all_null() {
        let snapshot = VersionSnapshot::new(None, None, None);

        let result = reconcile(&snapshot, Some("{}"));

        assert!(result.should_notify);
        assert_eq!(result.previous, None);
        assert_eq!(
            result.canonical,
            r#"{"vanilla":null,"fx":null,"customLobby":null}"#
        );
    }

    #[rstest]
    #[case::garbage("not json")]
    #[case::empty("")]
    #[case::wrong_shape(r#"{"vanilla":"1234"}"#)]
    #[case::legacy_flag("true")]
    #[case::empty_object("{}")]
    #[case::missing_lobby(r#"{"vanilla":{"protocol":"123","game":"1234"},"fx":{"protocol":"123","game":"1233"}}"#)]
    #[case::extra_key(r#"{"vanilla":{"protocol":"123","game":"1234"},"fx":{"protocol":"123","game":"1233"},"customLobby":"123","checkedAt":1}"#)]
    #[case::extra_pair_key(r#"{"vanilla":{"protocol":"123","game":"1234","build":7},"fx":{"protocol":"123","game":"1233"},"customLobby":"123"}"#)]
    fn reconcile_treats_corrupt_state_as_absent(#[case] persisted: &str) {
        let result = reconcile(&snapshot(), Some(persisted));

        assert!(result.should_notify);
        assert_eq!(result.previous, None);
    }
}
