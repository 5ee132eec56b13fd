//! Handle Lifecycle
//!
//! `HandleGuard` owns a native processing handle and arbitrates its release
//! against calls that are still executing. Closing swaps the stored handle
//! to `NULL_HANDLE` immediately, so no *new* call can observe the old value,
//! and retires the old value for deferred release: the native `free` runs
//! only when the in-flight call count drains to zero.
//!
//! Invariant: `free` is called exactly once per allocated handle, and never
//! while an `ActiveCall` for that handle exists.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use tracing::debug;

use crate::native::{NativeDsp, RawHandle, NULL_HANDLE};

/// Owns one native handle and tracks calls in flight against it.
pub struct HandleGuard {
    native: Arc<dyn NativeDsp>,
    /// Current handle value; `NULL_HANDLE` once closed.
    handle: AtomicU64,
    /// Handle awaiting release; `NULL_HANDLE` when none is pending.
    retired: AtomicU64,
    /// Number of `ActiveCall`s currently alive.
    in_flight: AtomicUsize,
}

impl HandleGuard {
    pub fn new(native: Arc<dyn NativeDsp>, handle: RawHandle) -> Self {
        Self {
            native,
            handle: AtomicU64::new(handle),
            retired: AtomicU64::new(NULL_HANDLE),
            in_flight: AtomicUsize::new(0),
        }
    }

    /// The native implementation this guard allocates against.
    pub fn native(&self) -> &Arc<dyn NativeDsp> {
        &self.native
    }

    /// Current handle value, `NULL_HANDLE` after close.
    pub fn raw(&self) -> RawHandle {
        self.handle.load(Ordering::Acquire)
    }

    pub fn is_closed(&self) -> bool {
        self.raw() == NULL_HANDLE
    }

    /// Begin a call against the handle.
    ///
    /// Returns `None` if the guard is closed; the caller must then treat the
    /// operation as a no-op. While the returned `ActiveCall` is alive the
    /// handle value it carries will not be freed.
    pub fn enter(&self) -> Option<ActiveCall<'_>> {
        // Register before reading the handle so a concurrent close either
        // sees our registration or we see its sentinel.
        self.in_flight.fetch_add(1, Ordering::AcqRel);
        let handle = self.handle.load(Ordering::Acquire);
        if handle == NULL_HANDLE {
            self.exit();
            return None;
        }
        Some(ActiveCall {
            guard: self,
            handle,
        })
    }

    /// Close the guard: block new calls immediately, release the native
    /// resource once outstanding calls finish. Idempotent.
    pub fn close(&self) {
        let old = self.handle.swap(NULL_HANDLE, Ordering::AcqRel);
        if old == NULL_HANDLE {
            return;
        }
        debug!(handle = old, "closing native handle");
        self.retired.store(old, Ordering::Release);
        if self.in_flight.load(Ordering::Acquire) == 0 {
            self.reap();
        }
    }

    fn exit(&self) {
        if self.in_flight.fetch_sub(1, Ordering::AcqRel) == 1 {
            self.reap();
        }
    }

    fn reap(&self) {
        // swap guarantees a single free even if the last caller and close
        // race into reap together
        let retired = self.retired.swap(NULL_HANDLE, Ordering::AcqRel);
        if retired != NULL_HANDLE {
            self.native.free(retired);
            debug!(handle = retired, "native handle freed");
        }
    }
}

impl Drop for HandleGuard {
    fn drop(&mut self) {
        self.close();
    }
}

/// RAII token for one call in flight. Holds the handle value that was
/// current when the call began.
pub struct ActiveCall<'a> {
    guard: &'a HandleGuard,
    handle: RawHandle,
}

impl ActiveCall<'_> {
    pub fn handle(&self) -> RawHandle {
        self.handle
    }
}

impl Drop for ActiveCall<'_> {
    fn drop(&mut self) {
        self.guard.exit();
    }
}
