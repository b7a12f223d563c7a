//! Cipher handles: the key that protects a stored master secret.

use zeroize::{Zeroize, Zeroizing};

use crate::crypto::encryption::seal;
use crate::crypto::keys::{derive_secret_key, KEY_LEN};
use crate::errors::{Result, StrongPassError};

use super::session::VaultSession;

/// Lifecycle of a [`CipherHandle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CipherState {
    /// No handle registered yet.
    Empty,
    /// Registered with the backend, no key material yet.
    Prepared,
    /// Holds wrapped key material and can encrypt and decrypt.
    Completed,
    /// Key wiped and handle forgotten.  Terminal.
    Destroyed,
}

/// Opaque key handle.  The key material is held wrapped under the
/// session key and is wiped on [`destroy`](CipherHandle::destroy) or drop.
pub struct CipherHandle {
    generation: u64,
    handle: Option<u64>,
    key: Option<Zeroizing<Vec<u8>>>,
    zeroed: bool,
}

impl CipherHandle {
    /// Create and complete a cipher under the open session.
    pub fn create(session: &mut VaultSession) -> Result<Self> {
        session.ensure_open()?;

        let mut cipher = Self {
            generation: session.generation(),
            handle: None,
            key: None,
            zeroed: false,
        };

        let handle = session.backend.register()?;
        cipher.handle = Some(handle);

        match session.backend.wrap_new_key(handle) {
            Ok(wrapped) => cipher.key = Some(Zeroizing::new(wrapped)),
            Err(e) => {
                session.backend.zero_handle(cipher.generation, handle);
                cipher.handle = None;
                return Err(e);
            }
        }

        tracing::debug!(handle, "cipher created");
        Ok(cipher)
    }

    pub fn state(&self) -> CipherState {
        match (self.handle, &self.key) {
            _ if self.zeroed => CipherState::Destroyed,
            (Some(_), Some(_)) => CipherState::Completed,
            (Some(_), None) => CipherState::Prepared,
            _ => CipherState::Empty,
        }
    }

    pub fn completed(&self) -> bool {
        self.state() == CipherState::Completed
    }

    /// `true` once the key is gone and the backend has forgotten the handle.
    pub fn destroyed(&self) -> bool {
        self.zeroed && self.key.is_none() && self.handle.is_none()
    }

    /// Forget the handle and wipe its key.  Repeated calls succeed, and so
    /// does destroying a handle whose session has already closed.
    pub fn destroy(&mut self, session: &mut VaultSession) -> Result<()> {
        if let Some(handle) = self.handle.take() {
            let forgotten = session.backend.zero_handle(self.generation, handle);
            tracing::debug!(handle, forgotten, "cipher destroyed");
        }
        self.wipe();
        Ok(())
    }

    /// Swap the key material for fresh random material and re-seal every
    /// secret stored under this cipher.
    ///
    /// Run after each use of a stored secret so one key never protects it
    /// for long.  Nothing changes unless every secret re-seals.
    pub fn rekey(&mut self, session: &mut VaultSession) -> Result<()> {
        session.ensure_open()?;
        let handle = self.handle_id().ok_or(StrongPassError::CipherNotReady)?;
        if self.key.is_none() {
            return Err(StrongPassError::CipherNotReady);
        }

        let names = session.store.sealed_by(handle);
        let mut secrets = Vec::with_capacity(names.len());
        for name in &names {
            secrets.push((name.as_str(), session.dispense_secret(name, self)?));
        }

        let wrapped = Zeroizing::new(session.backend.wrap_new_key(handle)?);
        let material = session.backend.unwrap_key(self.generation, handle, &wrapped)?;
        let mut resealed = Vec::with_capacity(secrets.len());
        for (name, secret) in &secrets {
            let key = derive_secret_key(&material, name)?;
            resealed.push((*name, seal(&key[..], secret.as_bytes(), name.as_bytes())?));
        }

        for (name, ciphertext) in resealed {
            session.store.reseal(name, ciphertext);
        }
        // The previous blob is wiped as it drops.
        self.key = Some(wrapped);

        tracing::debug!(handle, resealed = names.len(), "cipher rekeyed");
        Ok(())
    }

    /// The backend handle id, while the cipher is usable.
    pub(crate) fn handle_id(&self) -> Option<u64> {
        if self.zeroed {
            None
        } else {
            self.handle
        }
    }

    #[cfg(test)]
    pub(crate) fn wrapped_key(&self) -> Option<Vec<u8>> {
        self.key.as_ref().map(|key| key.to_vec())
    }

    /// The AES key for the secret stored under `name`.
    pub(crate) fn secret_key(
        &self,
        session: &VaultSession,
        name: &str,
    ) -> Result<Zeroizing<[u8; KEY_LEN]>> {
        let (Some(handle), Some(wrapped)) = (self.handle, self.key.as_ref()) else {
            return Err(StrongPassError::CipherNotReady);
        };
        if self.zeroed {
            return Err(StrongPassError::CipherNotReady);
        }
        let material = session.backend.unwrap_key(self.generation, handle, wrapped)?;
        derive_secret_key(&material, name)
    }

    fn wipe(&mut self) {
        if let Some(mut key) = self.key.take() {
            key.zeroize();
        }
        self.zeroed = true;
    }
}

impl Drop for CipherHandle {
    fn drop(&mut self) {
        self.wipe();
    }
}

impl std::fmt::Debug for CipherHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CipherHandle")
            .field("handle", &self.handle)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}
