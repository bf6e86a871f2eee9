use jgrpc_types::Endpoint;
use rand::Rng;

use crate::{trivial_pick, LoadBalancer};

/// Uniform pick. `rand`'s thread-local RNG is already thread-safe.
#[derive(Debug, Default)]
pub struct Random;

impl Random {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl LoadBalancer for Random {
    fn pick(&self, providers: &[Endpoint], _key: &str) -> Option<Endpoint> {
        if let Some(trivial) = trivial_pick(providers) {
            return trivial;
        }
        let index = rand::thread_rng().gen_range(0..providers.len());
        providers.get(index).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_set_returns_none() {
        assert_eq!(Random::new().pick(&[], "demo.Hello"), None);
    }

    #[test]
    fn single_provider_is_returned_directly() {
        let providers = vec![Endpoint::new("127.0.0.1", 9000)];
        assert_eq!(Random::new().pick(&providers, "demo.Hello"), Some(providers[0].clone()));
    }

    #[test]
    fn always_picks_from_the_set() {
        let providers: Vec<_> = (0..5).map(|i| Endpoint::new("127.0.0.1", 9000 + i)).collect();
        let balancer = Random::new();
        for _ in 0..200 {
            let picked = balancer.pick(&providers, "demo.Hello").unwrap();
            assert!(providers.contains(&picked));
        }
    }
}
