//! Patching cached search results after a resource is deleted.
//!
//! A delete is reflected locally instead of refetching:
//! - From the results table, the resource is removed from the items entry
//! - From a related table, it is removed from that kind's related items and
//!   the kind's related count is decremented (or the kind dropped at zero)
//!
//! Every step is best-effort. A missing entry means nothing was fetched for
//! that key yet, so there is nothing stale to repair.

use super::types::*;
use super::ResultCache;
use crate::search::{compile, StructuredQuery};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// How a cached item is recognised as the deleted resource.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchRule {
    /// Same uid and same name.
    #[default]
    UidAndName,
    /// Same cluster, namespace, kind and name.
    Composite,
}

impl MatchRule {
    pub fn matches(self, item: &Resource, deleted: &Resource) -> bool {
        match self {
            MatchRule::UidAndName => item.uid == deleted.uid && item.name == deleted.name,
            MatchRule::Composite => {
                item.cluster == deleted.cluster
                    && item.namespace == deleted.namespace
                    && item.kind == deleted.kind
                    && item.name == deleted.name
            }
        }
    }
}

/// Where the user started the delete from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeleteOrigin {
    /// The direct search results table.
    Results,
    /// A related resources table.
    Related,
}

/// Outcome of one patch step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PatchOutcome {
    /// The entry was rewritten. `removed` counts dropped items or groups.
    Patched { removed: usize },
    /// Nothing cached under the key.
    Miss,
    /// The key held a different kind of response.
    Mismatch,
}

/// What a reconciliation touched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<PatchOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related_items: Option<PatchOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related_count: Option<PatchOutcome>,
}

/// Rewrites cached responses so they no longer show a deleted resource.
#[derive(Debug, Clone, Copy, Default)]
pub struct Reconciler {
    rule: MatchRule,
}

impl Reconciler {
    pub fn new(rule: MatchRule) -> Self {
        Self { rule }
    }

    pub fn rule(&self) -> MatchRule {
        self.rule
    }

    /// Patch the store(s) behind the view the delete started from.
    ///
    /// `current_query` is the raw search text the page is showing.
    pub fn reconcile(
        &self,
        origin: DeleteOrigin,
        current_query: &str,
        deleted: &Resource,
        items_store: &mut dyn ResultCache,
        related_store: &mut dyn ResultCache,
    ) -> ReconcileReport {
        let query = compile(current_query);
        let report = match origin {
            DeleteOrigin::Results => ReconcileReport {
                items: Some(self.remove_from_items(items_store, &query, deleted)),
                ..Default::default()
            },
            DeleteOrigin::Related => ReconcileReport {
                related_items: Some(self.remove_from_related_items(related_store, &query, deleted)),
                related_count: Some(decrement_related_count(related_store, &query, &deleted.kind)),
                ..Default::default()
            },
        };
        debug!(
            ?origin,
            kind = %deleted.kind,
            name = %deleted.name,
            ?report,
            "Reconciled cached search results"
        );
        report
    }

    /// Drop the deleted resource from the cached direct results.
    pub fn remove_from_items(
        &self,
        store: &mut dyn ResultCache,
        query: &StructuredQuery,
        deleted: &Resource,
    ) -> PatchOutcome {
        let key = CacheKey::items(query);
        let items = match store.read(&key) {
            None => return PatchOutcome::Miss,
            Some(CachedResultEntry::Items { items }) => items,
            Some(_) => return PatchOutcome::Mismatch,
        };

        let before = items.len();
        let items: Vec<Resource> = items
            .into_iter()
            .filter(|item| !self.rule.matches(item, deleted))
            .collect();
        let removed = before - items.len();

        store.write(key, CachedResultEntry::Items { items });
        PatchOutcome::Patched { removed }
    }

    /// Drop the deleted resource from its kind's cached related items.
    pub fn remove_from_related_items(
        &self,
        store: &mut dyn ResultCache,
        query: &StructuredQuery,
        deleted: &Resource,
    ) -> PatchOutcome {
        let key = CacheKey::related_items(query, &deleted.kind);
        let related = match store.read(&key) {
            None => return PatchOutcome::Miss,
            Some(CachedResultEntry::RelatedItems { related }) => related,
            Some(_) => return PatchOutcome::Mismatch,
        };

        let mut removed = 0;
        let related: Vec<RelatedItems> = related
            .into_iter()
            .map(|group| {
                if group.kind != deleted.kind {
                    return group;
                }
                let before = group.items.len();
                let items: Vec<Resource> = group
                    .items
                    .into_iter()
                    .filter(|item| !self.rule.matches(item, deleted))
                    .collect();
                removed += before - items.len();
                RelatedItems {
                    kind: group.kind,
                    items,
                }
            })
            .collect();

        store.write(key, CachedResultEntry::RelatedItems { related });
        PatchOutcome::Patched { removed }
    }
}

/// Decrement the cached related count of `kind`, dropping the kind when its
/// last member goes away.
pub fn decrement_related_count(
    store: &mut dyn ResultCache,
    query: &StructuredQuery,
    kind: &str,
) -> PatchOutcome {
    let key = CacheKey::related_count(query);
    let related = match store.read(&key) {
        None => return PatchOutcome::Miss,
        Some(CachedResultEntry::RelatedCount { related }) => related,
        Some(_) => return PatchOutcome::Mismatch,
    };

    let before = related.len();
    let related: Vec<RelatedCount> = related
        .into_iter()
        .filter_map(|group| {
            if group.kind != kind {
                Some(group)
            } else if group.count > 1 {
                Some(RelatedCount {
                    count: group.count - 1,
                    ..group
                })
            } else {
                None
            }
        })
        .collect();
    let removed = before - related.len();

    store.write(key, CachedResultEntry::RelatedCount { related });
    PatchOutcome::Patched { removed }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryCache;
    use pretty_assertions::assert_eq;

    const QUERY: &str = "kind:deployment name:web";

    fn pod(uid: &str, name: &str) -> Resource {
        Resource::new(uid, name, "pod").with_location("local-cluster", "default")
    }

    fn items_store(items: Vec<Resource>) -> MemoryCache {
        let mut store = MemoryCache::new();
        store.write(
            CacheKey::items(&compile(QUERY)),
            CachedResultEntry::Items { items },
        );
        store
    }

    fn related_store(groups: Vec<RelatedItems>, counts: Vec<RelatedCount>) -> MemoryCache {
        let query = compile(QUERY);
        let mut store = MemoryCache::new();
        for group in &groups {
            store.write(
                CacheKey::related_items(&query, &group.kind),
                CachedResultEntry::RelatedItems {
                    related: groups.clone(),
                },
            );
        }
        store.write(
            CacheKey::related_count(&query),
            CachedResultEntry::RelatedCount { related: counts },
        );
        store
    }

    fn count(kind: &str, count: u64) -> RelatedCount {
        RelatedCount {
            kind: kind.to_string(),
            count,
        }
    }

    fn cached_counts(store: &MemoryCache) -> Vec<RelatedCount> {
        match store.read(&CacheKey::related_count(&compile(QUERY))) {
            Some(CachedResultEntry::RelatedCount { related }) => related,
            other => panic!("unexpected entry: {:?}", other),
        }
    }

    // -- Direct results --

    #[test]
    fn test_direct_delete_removes_item() {
        let mut items = items_store(vec![pod("1", "pod-a"), pod("2", "pod-b")]);
        let mut related = MemoryCache::new();

        let report = Reconciler::default().reconcile(
            DeleteOrigin::Results,
            QUERY,
            &pod("1", "pod-a"),
            &mut items,
            &mut related,
        );

        assert_eq!(report.items, Some(PatchOutcome::Patched { removed: 1 }));
        assert_eq!(report.related_items, None);
        assert_eq!(
            items.read(&CacheKey::items(&compile(QUERY))),
            Some(CachedResultEntry::Items {
                items: vec![pod("2", "pod-b")]
            })
        );
        assert!(related.is_empty());
    }

    #[test]
    fn test_direct_delete_requires_uid_and_name() {
        let mut items = items_store(vec![pod("1", "pod-b"), pod("2", "pod-a")]);
        let outcome = Reconciler::default().remove_from_items(
            &mut items,
            &compile(QUERY),
            &pod("1", "pod-a"),
        );
        assert_eq!(outcome, PatchOutcome::Patched { removed: 0 });
    }

    #[test]
    fn test_direct_delete_uses_full_query_as_key() {
        let mut items = items_store(vec![pod("1", "pod-a")]);
        let outcome = Reconciler::default().remove_from_items(
            &mut items,
            &compile("kind:deployment"),
            &pod("1", "pod-a"),
        );
        assert_eq!(outcome, PatchOutcome::Miss);
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn test_direct_delete_ignores_in_progress_filter() {
        let mut items = items_store(vec![pod("1", "pod-a")]);
        let outcome = Reconciler::default().remove_from_items(
            &mut items,
            &compile(&format!("{} status:=", QUERY)),
            &pod("1", "pod-a"),
        );
        assert_eq!(outcome, PatchOutcome::Patched { removed: 1 });
    }

    #[test]
    fn test_composite_rule() {
        let other_cluster = Resource::new("9", "pod-a", "pod").with_location("edge", "default");
        let mut items = items_store(vec![pod("1", "pod-a"), other_cluster.clone()]);

        let outcome = Reconciler::new(MatchRule::Composite).remove_from_items(
            &mut items,
            &compile(QUERY),
            &pod("7", "pod-a"),
        );

        assert_eq!(outcome, PatchOutcome::Patched { removed: 1 });
        assert_eq!(
            items.read(&CacheKey::items(&compile(QUERY))),
            Some(CachedResultEntry::Items {
                items: vec![other_cluster]
            })
        );
    }

    #[test]
    fn test_mismatched_entry_is_left_alone() {
        let mut store = MemoryCache::new();
        let key = CacheKey::items(&compile(QUERY));
        let entry = CachedResultEntry::RelatedCount {
            related: vec![count("pod", 1)],
        };
        store.write(key.clone(), entry.clone());

        let outcome =
            Reconciler::default().remove_from_items(&mut store, &compile(QUERY), &pod("1", "pod-a"));

        assert_eq!(outcome, PatchOutcome::Mismatch);
        assert_eq!(store.read(&key), Some(entry));
    }

    // -- Related resources --

    #[test]
    fn test_related_delete_patches_items_and_counts() {
        let groups = vec![
            RelatedItems {
                kind: "pod".to_string(),
                items: vec![pod("1", "pod-a"), pod("2", "pod-b")],
            },
            RelatedItems {
                kind: "replicaset".to_string(),
                items: vec![Resource::new("3", "pod-a", "replicaset")],
            },
        ];
        let mut related = related_store(groups, vec![count("pod", 2), count("replicaset", 1)]);
        let mut items = items_store(vec![pod("1", "pod-a")]);

        let report = Reconciler::default().reconcile(
            DeleteOrigin::Related,
            QUERY,
            &pod("1", "pod-a"),
            &mut items,
            &mut related,
        );

        assert_eq!(report.items, None);
        assert_eq!(report.related_items, Some(PatchOutcome::Patched { removed: 1 }));
        assert_eq!(report.related_count, Some(PatchOutcome::Patched { removed: 0 }));

        let key = CacheKey::related_items(&compile(QUERY), "pod");
        assert_eq!(
            related.read(&key),
            Some(CachedResultEntry::RelatedItems {
                related: vec![
                    RelatedItems {
                        kind: "pod".to_string(),
                        items: vec![pod("2", "pod-b")],
                    },
                    RelatedItems {
                        kind: "replicaset".to_string(),
                        items: vec![Resource::new("3", "pod-a", "replicaset")],
                    },
                ]
            })
        );
        assert_eq!(
            cached_counts(&related),
            vec![count("pod", 1), count("replicaset", 1)]
        );
        // The direct results store is a separate cache and is not touched.
        assert_eq!(
            items.read(&CacheKey::items(&compile(QUERY))),
            Some(CachedResultEntry::Items {
                items: vec![pod("1", "pod-a")]
            })
        );
    }

    #[test]
    fn test_count_of_one_removes_group() {
        let mut store = related_store(Vec::new(), vec![count("pod", 1)]);
        let outcome = decrement_related_count(&mut store, &compile(QUERY), "pod");
        assert_eq!(outcome, PatchOutcome::Patched { removed: 1 });
        assert_eq!(cached_counts(&store), Vec::new());
    }

    #[test]
    fn test_count_above_one_decrements() {
        let mut store = related_store(Vec::new(), vec![count("pod", 3)]);
        decrement_related_count(&mut store, &compile(QUERY), "pod");
        assert_eq!(cached_counts(&store), vec![count("pod", 2)]);
    }

    #[test]
    fn test_count_of_zero_removes_group() {
        let mut store = related_store(Vec::new(), vec![count("service", 4), count("pod", 0)]);
        decrement_related_count(&mut store, &compile(QUERY), "pod");
        assert_eq!(cached_counts(&store), vec![count("service", 4)]);
    }

    #[test]
    fn test_related_delete_with_empty_cache() {
        let mut items = MemoryCache::new();
        let mut related = MemoryCache::new();

        let report = Reconciler::default().reconcile(
            DeleteOrigin::Related,
            QUERY,
            &pod("1", "pod-a"),
            &mut items,
            &mut related,
        );

        assert_eq!(report.related_items, Some(PatchOutcome::Miss));
        assert_eq!(report.related_count, Some(PatchOutcome::Miss));
        assert!(related.is_empty());
    }
}
