//! The cryptographic backend behind a vault session.
//!
//! The backend owns the session's wrapping key and the registry of live
//! cipher handles.  A cipher handle's own key material (16 random bytes)
//! never leaves the backend in the clear: it is sealed under the session
//! key and handed to the `CipherHandle` as an opaque blob.  Unwrapping
//! requires the handle to still be registered and the session key to
//! still be alive, so closing the session invalidates every handle at
//! once.

use std::collections::HashSet;

use zeroize::Zeroizing;

use crate::crypto::encryption::{open, seal};
use crate::crypto::keys::{random_bytes, SessionKey, CIPHER_SECRET_LEN};
use crate::errors::{Result, StrongPassError};

pub(crate) struct Backend {
    generation: u64,
    key: SessionKey,
    live: HashSet<u64>,
    next_handle: u64,
}

impl Backend {
    pub(crate) fn new(generation: u64) -> Self {
        Self {
            generation,
            key: SessionKey::generate(),
            live: HashSet::new(),
            next_handle: 1,
        }
    }

    /// Register a new handle id.  This is the "prepared" step.
    pub(crate) fn register(&mut self) -> Result<u64> {
        if self.key.is_destroyed() {
            return Err(StrongPassError::NotInitialized);
        }
        let handle = self.next_handle;
        self.next_handle += 1;
        self.live.insert(handle);
        Ok(handle)
    }

    /// Generate the handle's key material and return it wrapped.
    pub(crate) fn wrap_new_key(&self, handle: u64) -> Result<Vec<u8>> {
        if !self.live.contains(&handle) {
            return Err(StrongPassError::CipherNotReady);
        }
        let session_key = self.key.as_bytes().ok_or(StrongPassError::NotInitialized)?;
        let material = random_bytes(CIPHER_SECRET_LEN);
        seal(session_key, &material, &self.context(handle))
    }

    /// Recover a handle's key material from its wrapped blob.
    pub(crate) fn unwrap_key(
        &self,
        generation: u64,
        handle: u64,
        wrapped: &[u8],
    ) -> Result<Zeroizing<Vec<u8>>> {
        if generation != self.generation || !self.live.contains(&handle) {
            return Err(StrongPassError::CipherNotReady);
        }
        let session_key = self.key.as_bytes().ok_or(StrongPassError::CipherNotReady)?;
        open(session_key, wrapped, &self.context(handle))
            .map_err(|_| StrongPassError::CipherNotReady)
    }

    /// Forget a handle.  Its wrapped blob becomes permanently unusable.
    pub(crate) fn zero_handle(&mut self, generation: u64, handle: u64) -> bool {
        generation == self.generation && self.live.remove(&handle)
    }

    pub(crate) fn live_handles(&self) -> usize {
        self.live.len()
    }

    /// Wipe the session key and drop every handle.
    pub(crate) fn destroy(&mut self) {
        self.live.clear();
        self.key.destroy();
    }

    fn context(&self, handle: u64) -> Vec<u8> {
        format!("strongpass-cipher:{}:{handle}", self.generation).into_bytes()
    }
}
