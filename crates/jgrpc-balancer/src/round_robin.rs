use std::sync::atomic::{AtomicUsize, Ordering};

use jgrpc_types::Endpoint;
use scc::HashMap;

use crate::{trivial_pick, LoadBalancer};

/// Per-interface atomic counter so rotation of different services stays
/// independent (spec.md §4.4). `key` is typically the interface name.
#[derive(Default)]
pub struct RoundRobin {
    counters: HashMap<String, AtomicUsize>,
}

impl RoundRobin {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn next_index(&self, key: &str, len: usize) -> usize {
        let entry = self.counters.entry(key.to_owned()).or_insert_with(|| AtomicUsize::new(0));
        entry.get().fetch_add(1, Ordering::Relaxed) % len
    }
}

impl LoadBalancer for RoundRobin {
    fn pick(&self, providers: &[Endpoint], key: &str) -> Option<Endpoint> {
        if let Some(trivial) = trivial_pick(providers) {
            return trivial;
        }
        let index = self.next_index(key, providers.len());
        providers.get(index).cloned()
    }
}
