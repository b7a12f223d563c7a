//! The process-wide vault session.
//!
//! Exactly one session may be open per process.  The open flag lives in
//! a process-global mutex, so two concurrent `open` calls always yield
//! one session and one `AlreadyInitialized`.  Every session also gets a
//! fresh generation number; cipher handles remember the generation they
//! were created under and are rejected by any later session.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use crate::crypto::keystream::HASH_LEN;
use crate::errors::{Result, StrongPassError};

use super::backend::Backend;
use super::store::NamedSecretStore;

/// Smallest maximum length a session will accept.  Requests below it are
/// raised to it.
pub const MIN_LENGTH: usize = HASH_LEN;

static SESSION_OPEN: Mutex<bool> = Mutex::new(false);
static GENERATION: AtomicU64 = AtomicU64::new(0);

/// An open (or closed) vault session.
///
/// Created only through [`VaultSession::open`].  Dropping an open session
/// closes it.
pub struct VaultSession {
    capacity: usize,
    max_length: usize,
    open: bool,
    generation: u64,
    pub(crate) backend: Backend,
    pub(crate) store: NamedSecretStore,
}

impl VaultSession {
    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Open the process's vault session.
    ///
    /// `capacity` is the number of named secrets the session can hold.
    /// `max_length` bounds both stored secrets and generated passwords.
    pub fn open(capacity: usize, max_length: usize) -> Result<Self> {
        let mut flag = SESSION_OPEN.lock().unwrap_or_else(PoisonError::into_inner);
        if *flag {
            tracing::warn!("refusing to open a second vault session");
            return Err(StrongPassError::AlreadyInitialized);
        }
        if capacity == 0 {
            return Err(StrongPassError::SizeIsZero);
        }
        *flag = true;
        drop(flag);

        let generation = GENERATION.fetch_add(1, Ordering::SeqCst) + 1;
        let max_length = max_length.max(MIN_LENGTH);
        tracing::info!(capacity, max_length, generation, "vault session opened");

        Ok(Self {
            capacity,
            max_length,
            open: true,
            generation,
            backend: Backend::new(generation),
            store: NamedSecretStore::new(),
        })
    }

    /// Close the session, destroying every stored secret and the session
    /// key.  Closing an already-closed session succeeds.
    pub fn close(&mut self) -> Result<()> {
        if !self.open {
            return Ok(());
        }

        let destroyed = self.store.len();
        self.store.clear();
        self.backend.destroy();
        self.open = false;

        let mut flag = SESSION_OPEN.lock().unwrap_or_else(PoisonError::into_inner);
        *flag = false;

        tracing::info!(generation = self.generation, destroyed, "vault session closed");
        Ok(())
    }

    /// Change the bounds of an open session.  Stored secrets survive.
    pub fn reopen(&mut self, capacity: usize, max_length: usize) -> Result<()> {
        self.ensure_open()?;
        if capacity == 0 {
            return Err(StrongPassError::SizeIsZero);
        }
        if capacity < self.store.len() {
            return Err(StrongPassError::CapacityExceeded(capacity));
        }

        self.capacity = capacity;
        self.max_length = max_length.max(MIN_LENGTH);
        tracing::debug!(capacity, max_length = self.max_length, "vault session resized");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// The smallest `max_length` any session reports.
    pub fn min_length() -> usize {
        MIN_LENGTH
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_closed(&self) -> bool {
        !self.open
    }

    /// Number of named secrets currently stored.
    pub fn secret_count(&self) -> usize {
        self.store.len()
    }

    pub(crate) fn generation(&self) -> u64 {
        self.generation
    }

    pub(crate) fn ensure_open(&self) -> Result<()> {
        if self.open {
            Ok(())
        } else {
            Err(StrongPassError::NotInitialized)
        }
    }
}

impl Drop for VaultSession {
    fn drop(&mut self) {
        let _ = self.close();
    }
}

impl std::fmt::Debug for VaultSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultSession")
            .field("capacity", &self.capacity)
            .field("max_length", &self.max_length)
            .field("open", &self.open)
            .field("secrets", &self.store.len())
            .finish_non_exhaustive()
    }
}

/// Serializes tests that open the process-wide session.
#[cfg(test)]
pub(crate) fn test_lock() -> std::sync::MutexGuard<'static, ()> {
    static LOCK: Mutex<()> = Mutex::new(());
    LOCK.lock().unwrap_or_else(PoisonError::into_inner)
}
