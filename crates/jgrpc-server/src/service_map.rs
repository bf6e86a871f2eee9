use std::sync::Arc;

use scc::HashMap;

use crate::dispatch::DispatchEntry;

#[derive(Debug, thiserror::Error)]
pub enum RegisterError {
    #[error("implementation declares no interface name")]
    NoInterfaces,
}

/// Append-only table of registered implementations, keyed by interface
/// name (spec.md §4.5). Registration never fails on a duplicate name —
/// the newest registration wins, matching `jgrpc-codec::SerializerRegistry`'s
/// "last registration wins" stance.
#[derive(Default)]
pub struct ServiceMap {
    entries: HashMap<String, Arc<dyn DispatchEntry>>,
}

impl ServiceMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn register(&self, entry: Arc<dyn DispatchEntry>) -> Result<(), RegisterError> {
        let name = entry.interface_name();
        if name.is_empty() {
            return Err(RegisterError::NoInterfaces);
        }
        let _ = self.entries.remove_async(name).await;
        let _ = self.entries.insert_async(name.to_owned(), entry).await;
        Ok(())
    }

    pub async fn resolve(&self, interface: &str) -> Option<Arc<dyn DispatchEntry>> {
        self.entries.get_async(interface).await.map(|entry| Arc::clone(entry.get()))
    }

    pub async fn interface_names(&self) -> Vec<String> {
        let mut names = Vec::new();
        self.entries
            .scan_async(|key, _value| names.push(key.clone()))
            .await;
        names
    }
}
