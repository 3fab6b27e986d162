use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_ID: AtomicU64 = AtomicU64::new(0);

// Opaque identity of a loaded clip, shared between the control side and the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ClipId(pub u64);

// atomic so clips can be minted from any thread (the loader runs before the stream starts,
// tests run in parallel)
pub fn next_clip_id() -> ClipId {
    ClipId(NEXT_ID.fetch_add(1, Ordering::Relaxed))
}
