//! Container scope resolution.
//!
//! Turns the configured scope roots (plus the optional extra sysfolder) into
//! the flattened list of container ids a pass queries.

use std::collections::HashSet;

use crate::error::Result;
use crate::store::RecordStore;

/// Hard safety cap on expansion depth. Not user-configurable.
const MAX_SCOPE_DEPTH: usize = 99;

/// Expands every starting container to include all of its descendants,
/// de-duplicated in first-seen order, then appends `extra_container` when
/// present.
///
/// Returns empty when nothing is configured. Callers must treat an empty
/// result as "nothing to index" and report a configuration failure, never as
/// an unrestricted match.
pub async fn resolve_scope(
    store: &dyn RecordStore,
    starting_containers: &[i64],
    extra_container: Option<i64>,
) -> Result<Vec<i64>> {
    let mut resolved = Vec::new();
    let mut seen = HashSet::new();

    for &root in starting_containers {
        if seen.insert(root) {
            resolved.push(root);
        }

        // Breadth-first, one tree level per iteration. The seen set keeps a
        // cyclic container tree from looping; the depth cap bounds the walk
        // even without cycles.
        let mut frontier = vec![root];
        for _ in 0..MAX_SCOPE_DEPTH {
            let mut next = Vec::new();
            for &parent in &frontier {
                for child in store.child_containers(parent).await? {
                    if seen.insert(child) {
                        resolved.push(child);
                        next.push(child);
                    }
                }
            }
            if next.is_empty() {
                break;
            }
            frontier = next;
        }
    }

    if let Some(extra) = extra_container {
        if seen.insert(extra) {
            resolved.push(extra);
        }
    }

    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;

    use crate::models::{EventRecord, Restriction};

    /// Store stub exposing only a container tree.
    struct TreeStore {
        children: HashMap<i64, Vec<i64>>,
    }

    impl TreeStore {
        fn new(edges: &[(i64, i64)]) -> Self {
            let mut children: HashMap<i64, Vec<i64>> = HashMap::new();
            for &(parent, child) in edges {
                children.entry(parent).or_default().push(child);
            }
            Self { children }
        }
    }

    #[async_trait]
    impl RecordStore for TreeStore {
        async fn select_events(
            &self,
            _container_ids: &[i64],
            _restriction: Restriction,
            _now: i64,
        ) -> Result<Vec<EventRecord>> {
            Ok(Vec::new())
        }

        async fn event_category_uids(&self, _event_uid: i64) -> Result<Vec<i64>> {
            Ok(Vec::new())
        }

        async fn child_containers(&self, container_id: i64) -> Result<Vec<i64>> {
            Ok(self.children.get(&container_id).cloned().unwrap_or_default())
        }
    }

    #[tokio::test]
    async fn test_empty_configuration_resolves_empty() {
        let store = TreeStore::new(&[]);
        let scope = resolve_scope(&store, &[], None).await.unwrap();
        assert!(scope.is_empty());
    }

    #[tokio::test]
    async fn test_expands_descendants_in_first_seen_order() {
        let store = TreeStore::new(&[(1, 2), (1, 3), (2, 4)]);
        let scope = resolve_scope(&store, &[1], None).await.unwrap();
        assert_eq!(scope, vec![1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn test_sysfolder_appended_after_expansion() {
        let store = TreeStore::new(&[(1, 2)]);
        let scope = resolve_scope(&store, &[1], Some(87)).await.unwrap();
        assert_eq!(scope, vec![1, 2, 87]);
    }

    #[tokio::test]
    async fn test_sysfolder_only_configuration() {
        let store = TreeStore::new(&[]);
        let scope = resolve_scope(&store, &[], Some(87)).await.unwrap();
        assert_eq!(scope, vec![87]);
    }

    #[tokio::test]
    async fn test_duplicate_roots_and_sysfolder_deduplicated() {
        let store = TreeStore::new(&[(1, 2)]);
        let scope = resolve_scope(&store, &[1, 2, 1], Some(2)).await.unwrap();
        assert_eq!(scope, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_cyclic_tree_terminates() {
        let store = TreeStore::new(&[(1, 2), (2, 1)]);
        let scope = resolve_scope(&store, &[1], None).await.unwrap();
        assert_eq!(scope, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_depth_capped_at_ninety_nine() {
        // A chain 0 -> 1 -> 2 -> ... -> 150; only the first 99 levels below
        // the root may be visited.
        let edges: Vec<(i64, i64)> = (0..150).map(|i| (i, i + 1)).collect();
        let store = TreeStore::new(&edges);
        let scope = resolve_scope(&store, &[0], None).await.unwrap();
        assert_eq!(scope.len(), 100);
        assert_eq!(*scope.last().unwrap(), 99);
    }
}
