//! Concurrent registry of graph providers.

use std::collections::BTreeSet;
use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::graph::Graph;
use crate::provider::GraphProvider;

type Providers = Vec<Arc<dyn GraphProvider>>;

/// Ordered, copy-on-write list of providers.
///
/// Writers swap in a new list; readers take a snapshot and never block. A
/// lookup or listing always sees one consistent provider set, even while
/// providers are being added or removed from other threads.
pub struct GraphRegistry {
    providers: ArcSwap<Providers>,
}

impl Default for GraphRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for GraphRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphRegistry")
            .field("providers", &self.len())
            .finish()
    }
}

fn same_provider(a: &Arc<dyn GraphProvider>, b: &Arc<dyn GraphProvider>) -> bool {
    std::ptr::eq(Arc::as_ptr(a) as *const (), Arc::as_ptr(b) as *const ())
}

impl GraphRegistry {
    pub fn new() -> Self {
        Self {
            providers: ArcSwap::from_pointee(Vec::new()),
        }
    }

    pub fn with_providers(providers: impl IntoIterator<Item = Arc<dyn GraphProvider>>) -> Self {
        let registry = Self::new();
        for p in providers {
            registry.add_provider(p);
        }
        registry
    }

    /// Append `provider`. Adding the same provider twice is a no-op.
    pub fn add_provider(&self, provider: Arc<dyn GraphProvider>) {
        self.providers.rcu(|current| {
            let mut next: Providers = current.iter().cloned().collect();
            if !next.iter().any(|p| same_provider(p, &provider)) {
                next.push(Arc::clone(&provider));
            }
            next
        });
    }

    /// Remove `provider` (by identity). Removing an absent provider is a no-op.
    pub fn remove_provider(&self, provider: &Arc<dyn GraphProvider>) {
        self.providers.rcu(|current| {
            current
                .iter()
                .filter(|p| !same_provider(p, provider))
                .cloned()
                .collect::<Providers>()
        });
    }

    /// Graph called `name`; the most recently added provider that knows it wins.
    pub fn lookup(&self, name: &str) -> Option<Arc<Graph>> {
        let providers = self.providers.load();
        providers.iter().rev().find_map(|p| p.graph(name))
    }

    /// Union of all provider graph names, sorted and deduplicated.
    pub fn graph_names(&self) -> Vec<String> {
        let providers = self.providers.load();
        providers
            .iter()
            .flat_map(|p| p.graph_names())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.providers.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
