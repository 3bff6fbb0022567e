//! Single-flight gate for progression checks.
//!
//! Two checks racing for the same owner could both observe a future balance
//! and double-promote it. The gate hands out at most one guard per key; the
//! guard releases the key when dropped.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use uuid::Uuid;

/// Tracks in-flight progression checks keyed by owner/group id.
#[derive(Debug, Clone, Default)]
pub struct ProgressionGate {
    in_flight: Arc<Mutex<HashSet<Uuid>>>,
}

impl ProgressionGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquires the gate for `key`, or returns `None` while another check
    /// for the same key is still running.
    pub fn try_acquire(&self, key: Uuid) -> Option<GateGuard> {
        let mut in_flight = match self.in_flight.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if !in_flight.insert(key) {
            return None;
        }
        Some(GateGuard {
            key,
            in_flight: Arc::clone(&self.in_flight),
        })
    }
}

/// Releases its key when dropped, letting the next check for that owner in.
#[derive(Debug)]
pub struct GateGuard {
    key: Uuid,
    in_flight: Arc<Mutex<HashSet<Uuid>>>,
}

impl Drop for GateGuard {
    fn drop(&mut self) {
        if let Ok(mut in_flight) = self.in_flight.lock() {
            in_flight.remove(&self.key);
        }
    }
}
