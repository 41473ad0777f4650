/**
 * Scope Lock Registry
 *
 * One `tokio::sync::Mutex<()>` per scope, created on first use and shared
 * through an `Arc`. The registry map itself sits behind a short-lived std
 * mutex that is never held across an await.
 *
 * # Lifecycle
 *
 * Entries nobody holds or waits on are dropped by `prune_idle`, which the
 * server's maintenance task calls periodically. A waiter keeps its slot
 * alive through its own `Arc` clone, so pruning can never split waiters of
 * one scope across two mutexes.
 */

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use thiserror::Error;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use super::scope::ScopeId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LockError {
    #[error("timed out after {waited:?} waiting for the lock on {scope}")]
    Timeout { scope: ScopeId, waited: Duration },
}

type Slot = Arc<AsyncMutex<()>>;

#[derive(Clone, Default)]
pub struct ScopeLocks {
    slots: Arc<Mutex<HashMap<ScopeId, Slot>>>,
}

/// Holds every lock taken by one `acquire` call
#[derive(Debug)]
pub struct ScopeGuard {
    held: Vec<(ScopeId, OwnedMutexGuard<()>)>,
}

impl ScopeGuard {
    /// Scopes held, in acquisition order
    pub fn scopes(&self) -> Vec<ScopeId> {
        self.held.iter().map(|(scope, _)| *scope).collect()
    }
}

impl Drop for ScopeGuard {
    fn drop(&mut self) {
        // Release in reverse acquisition order.
        while let Some((scope, guard)) = self.held.pop() {
            drop(guard);
            tracing::trace!(%scope, "[Lock] released");
        }
    }
}

impl ScopeLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire every scope in `scopes`, in canonical order
    ///
    /// Duplicates are collapsed. Each acquisition may wait at most `timeout`;
    /// on expiry the locks already taken are released before returning.
    pub async fn acquire<I>(&self, scopes: I, timeout: Duration) -> Result<ScopeGuard, LockError>
    where
        I: IntoIterator<Item = ScopeId>,
    {
        let mut ordered: Vec<ScopeId> = scopes.into_iter().collect();
        ordered.sort();
        ordered.dedup();

        let mut guard = ScopeGuard {
            held: Vec::with_capacity(ordered.len()),
        };

        for scope in ordered {
            let slot = self.slot(scope);
            match tokio::time::timeout(timeout, slot.lock_owned()).await {
                Ok(held) => {
                    tracing::trace!(%scope, "[Lock] acquired");
                    guard.held.push((scope, held));
                }
                Err(_) => {
                    tracing::warn!(%scope, ?timeout, "[Lock] acquisition timed out");
                    return Err(LockError::Timeout {
                        scope,
                        waited: timeout,
                    });
                }
            }
        }

        Ok(guard)
    }

    /// Drop registry entries that no task holds or waits on
    pub fn prune_idle(&self) -> usize {
        let mut slots = self.registry();
        let before = slots.len();
        slots.retain(|_, slot| Arc::strong_count(slot) > 1);
        before - slots.len()
    }

    /// Number of scopes currently tracked
    pub fn tracked(&self) -> usize {
        self.registry().len()
    }

    /// Whether some task currently holds `scope`
    pub fn is_locked(&self, scope: ScopeId) -> bool {
        self.registry()
            .get(&scope)
            .is_some_and(|slot| slot.try_lock().is_err())
    }

    fn slot(&self, scope: ScopeId) -> Slot {
        self.registry().entry(scope).or_default().clone()
    }

    fn registry(&self) -> MutexGuard<'_, HashMap<ScopeId, Slot>> {
        // The map stays consistent even if a holder panicked mid-insert.
        self.slots.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
