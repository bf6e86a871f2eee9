//! Pure `(provider set, call key) -> one provider` selection (spec.md §4.4).

#![forbid(unsafe_code)]

mod consistent_hash;
mod random;
mod round_robin;

pub use consistent_hash::ConsistentHash;
pub use random::Random;
pub use round_robin::RoundRobin;

use jgrpc_types::Endpoint;

/// Contract: on an empty set, `pick` returns `None`; on a one-element set,
/// every implementation returns that element directly without consulting
/// its selection strategy.
pub trait LoadBalancer: Send + Sync {
    fn pick(&self, providers: &[Endpoint], key: &str) -> Option<Endpoint>;
}

/// Shared tie-break for the size-0/size-1 cases every balancer has in
/// common (spec.md §4.4 "Tie-break for size-1 sets").
fn trivial_pick(providers: &[Endpoint]) -> Option<Option<Endpoint>> {
    match providers {
        [] => Some(None),
        [only] => Some(Some(only.clone())),
        _ => None,
    }
}
