use std::ops::{Deref, DerefMut};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use super::errors::PoolError;

/// Creates and recycles the handles a [`StatementPool`] hands out
#[async_trait]
pub trait Prepare: Send + Sync {
    type Handle: Send;

    /// Compile a fresh handle. Called outside the pool lock.
    async fn prepare(&self) -> Result<Self::Handle, PoolError>;

    /// Clear per-use state (bound parameters, open cursors) before the
    /// handle goes back to the pool.
    fn reset(&self, _handle: &mut Self::Handle) {}
}

/// Snapshot of pool membership
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolStats {
    /// Handles currently alive, borrowed or not
    pub created: usize,
    /// Handles sitting in the pool waiting for a caller
    pub available: usize,
}

impl PoolStats {
    pub fn borrowed(&self) -> usize {
        self.created - self.available
    }
}

struct PoolState<H> {
    available: Vec<H>,
    created: usize,
    closed: bool,
}

/// Growable pool of prepared statement handles
///
/// The mutex only guards checkout and return; no I/O happens while it is held.
/// The pool grows to the peak number of concurrent borrowers and never shrinks
/// until [`StatementPool::close`] finalizes everything.
pub struct StatementPool<P: Prepare> {
    preparer: P,
    state: Mutex<PoolState<P::Handle>>,
}

impl<P: Prepare> StatementPool<P> {
    pub fn new(preparer: P) -> Self {
        Self {
            preparer,
            state: Mutex::new(PoolState {
                available: Vec::new(),
                created: 0,
                closed: false,
            }),
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, PoolState<P::Handle>> {
        // A panic while holding this lock cannot leave the Vec half-updated
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Borrow a handle, preparing a new one if none is available
    ///
    /// The returned guard gives the handle back when dropped, on every exit path.
    pub async fn acquire(&self) -> Result<PooledHandle<'_, P>, PoolError> {
        let recycled = {
            let mut state = self.lock_state();
            if state.closed {
                return Err(PoolError::Closed);
            }
            let handle = state.available.pop();
            if handle.is_none() {
                // Reserve the slot now so `created` already counts the handle being prepared
                state.created += 1;
            }
            handle
        };

        let handle = match recycled {
            Some(handle) => handle,
            None => {
                let reservation = Reservation {
                    pool: self,
                    armed: true,
                };
                let handle = self.preparer.prepare().await.inspect_err(|e| {
                    tracing::error!(error = %e, "Failed to prepare pooled statement");
                })?;
                reservation.commit();
                tracing::debug!(created = self.stats().created, "Pool grew by one statement");
                handle
            }
        };

        Ok(PooledHandle {
            pool: self,
            handle: Some(handle),
        })
    }

    fn release(&self, mut handle: P::Handle) {
        self.preparer.reset(&mut handle);

        let mut state = self.lock_state();
        if state.closed {
            state.created -= 1;
            drop(state);
            tracing::debug!("Finalized statement returned after pool close");
            return;
        }
        state.available.push(handle);
    }

    pub fn stats(&self) -> PoolStats {
        let state = self.lock_state();
        PoolStats {
            created: state.created,
            available: state.available.len(),
        }
    }

    /// Finalize every idle handle and refuse further checkouts
    ///
    /// Handles still borrowed are finalized as their guards drop.
    /// Returns the number of handles finalized now.
    pub fn close(&self) -> usize {
        let drained = {
            let mut state = self.lock_state();
            state.closed = true;
            let drained = std::mem::take(&mut state.available);
            state.created -= drained.len();
            drained
        };

        let finalized = drained.len();
        drop(drained);
        finalized
    }

    pub fn is_closed(&self) -> bool {
        self.lock_state().closed
    }
}

/// Gives a reserved slot back if preparation fails or the acquiring future is dropped
struct Reservation<'p, P: Prepare> {
    pool: &'p StatementPool<P>,
    armed: bool,
}

impl<P: Prepare> Reservation<'_, P> {
    fn commit(mut self) {
        self.armed = false;
    }
}

impl<P: Prepare> Drop for Reservation<'_, P> {
    fn drop(&mut self) {
        if self.armed {
            self.pool.lock_state().created -= 1;
        }
    }
}

/// A handle borrowed from a [`StatementPool`]
pub struct PooledHandle<'p, P: Prepare> {
    pool: &'p StatementPool<P>,
    handle: Option<P::Handle>,
}

impl<P: Prepare> Deref for PooledHandle<'_, P> {
    type Target = P::Handle;

    fn deref(&self) -> &Self::Target {
        // Only `None` after drop has run
        self.handle.as_ref().unwrap_or_else(|| unreachable!())
    }
}

impl<P: Prepare> DerefMut for PooledHandle<'_, P> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.handle.as_mut().unwrap_or_else(|| unreachable!())
    }
}

impl<P: Prepare> Drop for PooledHandle<'_, P> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.pool.release(handle);
        }
    }
}
