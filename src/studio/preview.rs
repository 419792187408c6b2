//! Preview Handles
//!
//! Revocable in-memory handles for uploaded artwork, the native stand-in for
//! browser object URLs. Every handle issued must be released exactly once;
//! the registry keeps the books so a long session cannot accumulate them.

use std::collections::HashSet;
use std::fmt;

/// Opaque handle to a live preview resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PreviewHandle(u64);

impl PreviewHandle {
    pub fn id(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for PreviewHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "preview:{}", self.0)
    }
}

/// Issues and revokes preview handles.
#[derive(Debug, Default)]
pub struct PreviewRegistry {
    next_id: u64,
    live: HashSet<PreviewHandle>,
    issued: u64,
    released: u64,
}

impl PreviewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a new handle.
    pub fn create(&mut self) -> PreviewHandle {
        self.next_id += 1;
        let handle = PreviewHandle(self.next_id);
        self.live.insert(handle);
        self.issued += 1;
        tracing::debug!(%handle, "preview handle created");
        handle
    }

    /// Release a handle. Returns `false` (and changes nothing) when the handle
    /// is unknown or was already released.
    pub fn release(&mut self, handle: PreviewHandle) -> bool {
        if self.live.remove(&handle) {
            self.released += 1;
            tracing::debug!(%handle, "preview handle released");
            true
        } else {
            tracing::warn!(%handle, "release of a handle that is not live");
            false
        }
    }

    /// Release everything still live. Used on teardown.
    pub fn release_all(&mut self) -> usize {
        let count = self.live.len();
        self.released += count as u64;
        self.live.clear();
        if count > 0 {
            tracing::debug!(count, "released remaining preview handles");
        }
        count
    }

    pub fn is_live(&self, handle: PreviewHandle) -> bool {
        self.live.contains(&handle)
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn issued_count(&self) -> u64 {
        self.issued
    }

    pub fn released_count(&self) -> u64 {
        self.released
    }
}
