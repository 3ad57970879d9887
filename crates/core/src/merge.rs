//! Set-union reconciliation of wishlists.
//!
//! `merge` keeps server entries first (in server order) followed by local
//! entries the server did not have. Only membership is part of the contract:
//! the result contains every id from either side exactly once.

use std::collections::HashSet;

use crate::types::ProductId;

/// Result of merging a local wishlist into a server wishlist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOutcome {
    /// Deduplicated union of both lists.
    pub merged: Vec<ProductId>,
    /// Number of ids the server list did not already contain.
    pub added: usize,
}

impl MergeOutcome {
    /// Whether the merge changed the server list.
    ///
    /// A server list that only contained duplicates is not considered changed;
    /// its set of members is the same.
    #[must_use]
    pub const fn is_unchanged(&self) -> bool {
        self.added == 0
    }
}

/// Merge two id lists into their duplicate-free union.
#[must_use]
pub fn merge(server: &[ProductId], local: &[ProductId]) -> Vec<ProductId> {
    merge_with_outcome(server, local).merged
}

/// Merge two id lists and report how many ids were new to the server.
#[must_use]
pub fn merge_with_outcome(server: &[ProductId], local: &[ProductId]) -> MergeOutcome {
    let mut seen: HashSet<&ProductId> = HashSet::with_capacity(server.len() + local.len());
    let mut merged = Vec::with_capacity(server.len() + local.len());

    for id in server {
        if seen.insert(id) {
            merged.push(id.clone());
        }
    }
    let server_unique = merged.len();

    for id in local {
        if seen.insert(id) {
            merged.push(id.clone());
        }
    }

    MergeOutcome {
        added: merged.len() - server_unique,
        merged,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    fn ids(raw: &[&str]) -> Vec<ProductId> {
        raw.iter().map(|s| ProductId::parse(s).unwrap()).collect()
    }

    fn set(list: &[ProductId]) -> BTreeSet<&str> {
        list.iter().map(ProductId::as_str).collect()
    }

    fn samples() -> Vec<Vec<ProductId>> {
        vec![
            ids(&[]),
            ids(&["a"]),
            ids(&["a", "b"]),
            ids(&["b", "c", "b"]),
            ids(&["d", "a", "e", "f"]),
            ids(&["c", "c", "c"]),
        ]
    }

    #[test]
    fn test_merge_is_idempotent() {
        for a in &samples() {
            for b in &samples() {
                let once = merge(a, b);
                let twice = merge(&once, &[]);
                assert_eq!(set(&once), set(&twice));
                assert_eq!(set(&merge(&once, b)), set(&once));
            }
        }
    }

    #[test]
    fn test_merge_is_commutative_as_set() {
        for a in &samples() {
            for b in &samples() {
                assert_eq!(set(&merge(a, b)), set(&merge(b, a)));
            }
        }
    }

    #[test]
    fn test_merge_loses_nothing_and_has_no_duplicates() {
        for a in &samples() {
            for b in &samples() {
                let merged = merge(a, b);
                let merged_set = set(&merged);
                assert!(set(a).is_subset(&merged_set));
                assert!(set(b).is_subset(&merged_set));
                assert_eq!(merged.len(), merged_set.len(), "duplicate in {merged:?}");
            }
        }
    }

    #[test]
    fn test_merge_into_empty_server() {
        let outcome = merge_with_outcome(&[], &ids(&["p1", "p2"]));
        assert_eq!(outcome.merged, ids(&["p1", "p2"]));
        assert_eq!(outcome.added, 2);
    }

    #[test]
    fn test_merge_partial_overlap() {
        let outcome = merge_with_outcome(&ids(&["p3"]), &ids(&["p3", "p4"]));
        assert_eq!(outcome.merged, ids(&["p3", "p4"]));
        assert_eq!(outcome.added, 1);
    }

    #[test]
    fn test_merge_full_overlap_is_unchanged() {
        let outcome = merge_with_outcome(&ids(&["a", "b"]), &ids(&["b", "a"]));
        assert!(outcome.is_unchanged());
        assert_eq!(outcome.merged, ids(&["a", "b"]));
    }

    #[test]
    fn test_duplicate_server_entries_do_not_count_as_added() {
        let outcome = merge_with_outcome(&ids(&["a", "a"]), &ids(&["a"]));
        assert_eq!(outcome.added, 0);
        assert_eq!(outcome.merged, ids(&["a"]));
    }
}
