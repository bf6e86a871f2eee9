use std::sync::{Arc, OnceLock};

use scc::HashMap;

use crate::json::{JsonSerializer, JSON_TAG};
use crate::native::{NativeSerializer, NATIVE_TAG};
use crate::serializer::{CodecError, Serializer};

/// Process-wide, keyed by tag byte; last registration wins (spec.md §4.2).
///
/// Backed by `scc::HashMap`, the same concurrent map the teacher's
/// `harpc-net`/`harpc-server` crates reach for whenever a process-wide
/// table needs lock-free reads under concurrent mutation.
pub struct SerializerRegistry {
    inner: HashMap<u8, Arc<dyn Serializer>>,
}

impl Default for SerializerRegistry {
    fn default() -> Self {
        let registry = Self { inner: HashMap::new() };
        registry.register(Arc::new(NativeSerializer));
        registry.register(Arc::new(JsonSerializer));
        registry
    }
}

impl SerializerRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the serializer for `serializer.tag()`.
    pub fn register(&self, serializer: Arc<dyn Serializer>) {
        let tag = serializer.tag();
        let _ = self.inner.remove(&tag);
        let _ = self.inner.insert(tag, serializer);
    }

    pub fn get(&self, tag: u8) -> Result<Arc<dyn Serializer>, CodecError> {
        self.inner
            .get(&tag)
            .map(|entry| Arc::clone(entry.get()))
            .ok_or(CodecError::UnknownSerializer(tag))
    }
}

static GLOBAL: OnceLock<SerializerRegistry> = OnceLock::new();

/// The shared, process-wide registry seeded with [`NATIVE_TAG`] and
/// [`JSON_TAG`]. Most callers want this; construct a private
/// [`SerializerRegistry`] directly only in tests that need isolation from
/// other tests' `register()` calls.
pub fn global() -> &'static SerializerRegistry {
    GLOBAL.get_or_init(SerializerRegistry::default)
}
