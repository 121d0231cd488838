use std::sync::atomic::{AtomicU64, Ordering};

use crate::search::ThreadId;

/// Hands out thread ids for overlay sessions, starting at 1.
///
/// Create one at application start and share it between every overlay.
#[derive(Debug)]
pub struct SessionFactory {
    next: AtomicU64,
}

impl SessionFactory {
    pub fn new() -> Self {
        Self {
            next: AtomicU64::new(1),
        }
    }

    pub fn next_thread_id(&self) -> ThreadId {
        ThreadId::new(self.next.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for SessionFactory {
    fn default() -> Self {
        Self::new()
    }
}
