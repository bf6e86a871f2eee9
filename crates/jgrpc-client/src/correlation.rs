use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;
use std::time::Instant;

static NEXT_TID: AtomicU64 = AtomicU64::new(1);
static PROCESS_EPOCH: OnceLock<Instant> = OnceLock::new();

thread_local! {
    static THREAD_ID: u64 = NEXT_TID.fetch_add(1, Ordering::Relaxed);
}

/// `"{tid}-{nanos}"` exactly as spec.md §4.6 prescribes: a per-thread id
/// (assigned lazily on first use, standing in for the source runtime's
/// native thread id) and a monotonic nanosecond clock reading (elapsed
/// time since this process's first call, via `Instant`, which unlike
/// `SystemTime` cannot run backward under a clock adjustment).
#[must_use]
pub fn next_correlation_id() -> String {
    let tid = THREAD_ID.with(|id| *id);
    let epoch = PROCESS_EPOCH.get_or_init(Instant::now);
    let nanos = epoch.elapsed().as_nanos();
    format!("{tid}-{nanos}")
}
