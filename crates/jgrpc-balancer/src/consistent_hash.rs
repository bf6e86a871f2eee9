use std::collections::BTreeMap;

use jgrpc_types::Endpoint;
use md5::{Digest, Md5};

use crate::{trivial_pick, LoadBalancer};

/// Virtual nodes per endpoint (spec.md §4.4).
const VIRTUAL_NODES: u32 = 160;

/// Builds a hash ring from 160 virtual nodes per endpoint and returns the
/// endpoint of the first virtual node at or clockwise from the call key's
/// position, wrapping to the minimum if none is found.
///
/// The ring is rebuilt from the passed-in provider set on every `pick`
/// call, per spec.md §4.4 ("implementations may cache if the set is
/// unchanged" — left as a documented extension point, not built here, to
/// keep the core path simple and always correct).
#[derive(Debug, Default)]
pub struct ConsistentHash;

impl ConsistentHash {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn ring(providers: &[Endpoint]) -> BTreeMap<u64, Endpoint> {
        let mut ring = BTreeMap::new();
        for endpoint in providers {
            for i in 0..VIRTUAL_NODES {
                let label = format!("{endpoint}#{i}");
                ring.insert(ring_position(label.as_bytes()), endpoint.clone());
            }
        }
        ring
    }
}

fn ring_position(bytes: &[u8]) -> u64 {
    let digest = Md5::digest(bytes);
    u64::from_be_bytes(digest[0..8].try_into().expect("md5 digest is 16 bytes"))
}

impl LoadBalancer for ConsistentHash {
    fn pick(&self, providers: &[Endpoint], key: &str) -> Option<Endpoint> {
        if let Some(trivial) = trivial_pick(providers) {
            return trivial;
        }

        let ring = Self::ring(providers);
        let position = ring_position(key.as_bytes());
        ring.range(position..)
            .next()
            .or_else(|| ring.iter().next())
            .map(|(_, endpoint)| endpoint.clone())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn endpoints(n: u16) -> Vec<Endpoint> {
        (0..n).map(|i| Endpoint::new("127.0.0.1", 9000 + i)).collect()
    }

    #[test]
    fn empty_set_returns_none() {
        assert_eq!(ConsistentHash::new().pick(&[], "demo.Hello"), None);
    }

    #[test]
    fn single_provider_is_returned_directly() {
        let providers = endpoints(1);
        assert_eq!(ConsistentHash::new().pick(&providers, "demo.Hello"), Some(providers[0].clone()));
    }

    #[test]
    fn same_key_same_set_is_stable() {
        let providers = endpoints(5);
        let balancer = ConsistentHash::new();
        let first = balancer.pick(&providers, "demo.Hello");
        for _ in 0..20 {
            assert_eq!(balancer.pick(&providers, "demo.Hello"), first);
        }
    }

    #[test]
    fn removing_one_endpoint_remaps_a_bounded_fraction_of_keys() {
        let providers = endpoints(8);
        let balancer = ConsistentHash::new();
        let keys: Vec<String> = (0..500).map(|i| format!("key-{i}")).collect();

        let before: HashMap<&str, Endpoint> = keys
            .iter()
            .map(|k| (k.as_str(), balancer.pick(&providers, k).unwrap()))
            .collect();

        let removed = providers[0].clone();
        let after_providers: Vec<_> = providers.into_iter().filter(|e| *e != removed).collect();

        let remapped = keys
            .iter()
            .filter(|k| {
                let after = balancer.pick(&after_providers, k).unwrap();
                after != before[k.as_str()]
            })
            .count();

        // Only keys owned by the removed endpoint should move; with 8
        // endpoints that is expected to be roughly keys.len() / 8, bounded
        // generously here to keep the test non-flaky.
        assert!(remapped <= keys.len() / 2, "remapped {remapped} of {}", keys.len());
    }
}
