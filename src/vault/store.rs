//! Named-secret storage on top of a [`VaultSession`].
//!
//! Secrets are sealed with AES-256-GCM under a key derived from the
//! storing cipher and the secret's name.  Only ciphertext is retained;
//! plaintext leaves the store exclusively inside a [`SecretBuffer`].

use std::collections::HashMap;

use zeroize::Zeroizing;

use crate::crypto::encryption::{open, seal};
use crate::crypto::secret::SecretBuffer;
use crate::errors::{Result, StrongPassError};
use crate::surface::{SecretDisplay, ShowKind, ShowResponse};

use super::cipher::CipherHandle;
use super::session::VaultSession;

/// A single sealed secret.
pub(crate) struct NamedSecret {
    /// The name the secret is stored under (e.g. "main").
    name: String,

    /// Nonce followed by AES-GCM ciphertext and tag.  Wiped on drop.
    ciphertext: Zeroizing<Vec<u8>>,

    /// Length of the plaintext.  Zero means absent.
    plaintext_length: usize,

    /// Backend handle of the cipher that sealed it.
    sealed_by: u64,
}

impl std::fmt::Debug for NamedSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NamedSecret")
            .field("name", &self.name)
            .field("plaintext_length", &self.plaintext_length)
            .finish_non_exhaustive()
    }
}

/// Name-keyed collection of sealed secrets.
#[derive(Debug, Default)]
pub(crate) struct NamedSecretStore {
    entries: HashMap<String, NamedSecret>,
}

impl NamedSecretStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Plaintext length of the secret, 0 if absent.
    pub(crate) fn size(&self, name: &str) -> usize {
        self.entries.get(name).map_or(0, |s| s.plaintext_length)
    }

    /// Names of the secrets sealed by the cipher with backend `handle`.
    pub(crate) fn sealed_by(&self, handle: u64) -> Vec<String> {
        self.entries
            .values()
            .filter(|secret| secret.sealed_by == handle)
            .map(|secret| secret.name.clone())
            .collect()
    }

    /// Swap in a new ciphertext for `name`.  The old one is wiped.
    pub(crate) fn reseal(&mut self, name: &str, ciphertext: Vec<u8>) {
        if let Some(secret) = self.entries.get_mut(name) {
            secret.ciphertext = Zeroizing::new(ciphertext);
        }
    }

    fn get(&self, name: &str) -> Option<&NamedSecret> {
        self.entries
            .get(name)
            .filter(|secret| secret.plaintext_length > 0)
    }

    fn insert(&mut self, secret: NamedSecret) {
        // A replaced entry is dropped here, wiping its ciphertext.
        self.entries.insert(secret.name.clone(), secret);
    }

    fn remove(&mut self, name: &str) -> bool {
        self.entries.remove(name).is_some()
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }
}

impl VaultSession {
    // ------------------------------------------------------------------
    // Secret operations
    // ------------------------------------------------------------------

    /// Seal `secret` under `cipher` and keep it as `name`, replacing any
    /// previous entry.
    ///
    /// `secret` is wiped and emptied whether or not the store succeeds.
    pub fn store_secret(
        &mut self,
        name: &str,
        cipher: &CipherHandle,
        secret: &mut SecretBuffer,
    ) -> Result<()> {
        let result = self.seal_into_store(name, cipher, secret.as_bytes());
        secret.clear();
        result
    }

    fn seal_into_store(
        &mut self,
        name: &str,
        cipher: &CipherHandle,
        plaintext: &[u8],
    ) -> Result<()> {
        self.ensure_open()?;
        validate_secret_name(name)?;

        if plaintext.is_empty() {
            return Err(StrongPassError::SizeIsZero);
        }
        if plaintext.len() > self.max_length() {
            return Err(StrongPassError::SecretTooLarge {
                name: name.to_string(),
                size: plaintext.len(),
                max: self.max_length(),
            });
        }
        if !self.store.contains(name) && self.store.len() >= self.capacity() {
            return Err(StrongPassError::CapacityExceeded(self.capacity()));
        }

        let handle = cipher.handle_id().ok_or(StrongPassError::CipherNotReady)?;
        let key = cipher.secret_key(self, name)?;
        let ciphertext = seal(&key[..], plaintext, name.as_bytes())?;

        self.store.insert(NamedSecret {
            name: name.to_string(),
            ciphertext: Zeroizing::new(ciphertext),
            plaintext_length: plaintext.len(),
            sealed_by: handle,
        });

        tracing::debug!(name, length = plaintext.len(), "secret stored");
        Ok(())
    }

    /// Decrypt the secret stored as `name` into a fresh buffer.
    pub fn dispense_secret(&self, name: &str, cipher: &CipherHandle) -> Result<SecretBuffer> {
        self.ensure_open()?;
        let entry = self
            .store
            .get(name)
            .ok_or_else(|| StrongPassError::NoSecretStored(name.to_string()))?;

        let key = cipher.secret_key(self, name)?;
        let plaintext = open(&key[..], &entry.ciphertext, name.as_bytes())?;
        if plaintext.len() != entry.plaintext_length {
            return Err(StrongPassError::DecryptionFailed);
        }

        Ok(SecretBuffer::copy_from(&plaintext))
    }

    /// Remove and wipe the secret stored as `name`.  Removing a name that
    /// holds nothing succeeds.
    pub fn destroy_secret(&mut self, name: &str) -> Result<()> {
        self.ensure_open()?;
        let removed = self.store.remove(name);
        tracing::debug!(name, removed, "secret destroyed");
        Ok(())
    }

    /// Plaintext length of the secret stored as `name`, 0 if absent.
    pub fn secret_size(&self, name: &str) -> usize {
        self.store.size(name)
    }

    /// Dispense the secret and hand it to `display`.  The cipher is
    /// rekeyed before the secret is shown.
    pub fn show_secret(
        &mut self,
        name: &str,
        cipher: &mut CipherHandle,
        width: usize,
        title: &str,
        kind: ShowKind,
        display: &mut dyn SecretDisplay,
    ) -> Result<ShowResponse> {
        self.ensure_open()?;
        if self.secret_size(name) == 0 {
            return Err(StrongPassError::DataNotFound(name.to_string()));
        }

        let secret = self.dispense_secret(name, cipher)?;
        cipher.rekey(self)?;
        let text = Zeroizing::new(String::from_utf8_lossy(secret.as_bytes()).into_owned());
        display.show(&text, width, title, kind)
    }
}

/// Validate that a secret name is safe.
///
/// Allowed: ASCII letters, digits, underscores, hyphens, periods.
/// Must be non-empty and at most 256 characters.
fn validate_secret_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(StrongPassError::InvalidName("secret name cannot be empty".into()));
    }
    if name.len() > 256 {
        return Err(StrongPassError::InvalidName(
            "secret name cannot exceed 256 characters".into(),
        ));
    }
    if !name
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-' || b == b'.')
    {
        return Err(StrongPassError::InvalidName(format!(
            "'{name}' may only contain ASCII letters, digits, underscores, hyphens and periods"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vault::session::test_lock;

    struct Recorder(Vec<String>);

    impl SecretDisplay for Recorder {
        fn show(&mut self, text: &str, _: usize, _: &str, kind: ShowKind) -> Result<ShowResponse> {
            self.0.push(text.to_string());
            Ok(kind.default_response())
        }
    }

    #[test]
    fn store_then_dispense() {
        let _guard = test_lock();
        let mut session = VaultSession::open(1, 64).unwrap();
        let cipher = CipherHandle::create(&mut session).unwrap();

        let mut secret = SecretBuffer::copy_from(b"correct horse");
        session.store_secret("main", &cipher, &mut secret).unwrap();
        assert_eq!(secret.len(), 0);
        assert_eq!(session.secret_size("main"), 13);

        let back = session.dispense_secret("main", &cipher).unwrap();
        assert_eq!(back.as_bytes(), b"correct horse");
    }

    #[test]
    fn failed_store_still_wipes_source() {
        let _guard = test_lock();
        let mut session = VaultSession::open(1, 64).unwrap();
        let cipher = CipherHandle::create(&mut session).unwrap();

        let mut secret = SecretBuffer::copy_from(&[b'x'; 65]);
        let err = session.store_secret("main", &cipher, &mut secret).unwrap_err();
        assert!(matches!(err, StrongPassError::SecretTooLarge { size: 65, .. }));
        assert!(secret.is_empty());
        assert_eq!(session.secret_size("main"), 0);
    }

    #[test]
    fn capacity_counts_distinct_names() {
        let _guard = test_lock();
        let mut session = VaultSession::open(1, 64).unwrap();
        let cipher = CipherHandle::create(&mut session).unwrap();

        session
            .store_secret("main", &cipher, &mut SecretBuffer::copy_from(b"one"))
            .unwrap();
        session
            .store_secret("main", &cipher, &mut SecretBuffer::copy_from(b"three"))
            .unwrap();
        assert_eq!(session.secret_size("main"), 5);

        let err = session
            .store_secret("other", &cipher, &mut SecretBuffer::copy_from(b"two"))
            .unwrap_err();
        assert!(matches!(err, StrongPassError::CapacityExceeded(1)));
    }

    #[test]
    fn dispense_requires_the_storing_cipher() {
        let _guard = test_lock();
        let mut session = VaultSession::open(1, 64).unwrap();
        let cipher = CipherHandle::create(&mut session).unwrap();
        let other = CipherHandle::create(&mut session).unwrap();

        session
            .store_secret("main", &cipher, &mut SecretBuffer::copy_from(b"secret"))
            .unwrap();
        assert!(session.dispense_secret("main", &other).is_err());
    }

    #[test]
    fn destroy_absent_secret_is_benign() {
        let _guard = test_lock();
        let mut session = VaultSession::open(1, 64).unwrap();
        session.destroy_secret("nothing").unwrap();
    }

    #[test]
    fn invalid_names_are_rejected() {
        let _guard = test_lock();
        let mut session = VaultSession::open(1, 64).unwrap();
        let cipher = CipherHandle::create(&mut session).unwrap();
        let mut secret = SecretBuffer::copy_from(b"x");
        assert!(matches!(
            session.store_secret("bad name", &cipher, &mut secret),
            Err(StrongPassError::InvalidName(_))
        ));
    }

    #[test]
    fn show_secret_passes_plaintext_to_display() {
        let _guard = test_lock();
        let mut session = VaultSession::open(1, 64).unwrap();
        let mut cipher = CipherHandle::create(&mut session).unwrap();
        session
            .store_secret("main", &cipher, &mut SecretBuffer::copy_from(b"hunter2"))
            .unwrap();

        let mut display = Recorder(Vec::new());
        let response = session
            .show_secret("main", &mut cipher, 40, "Strong password", ShowKind::YesNo, &mut display)
            .unwrap();
        assert_eq!(response, ShowResponse::Yes);
        assert_eq!(display.0, vec!["hunter2".to_string()]);

        assert!(matches!(
            session.show_secret("none", &mut cipher, 40, "", ShowKind::Ok, &mut display),
            Err(StrongPassError::DataNotFound(_))
        ));
    }

    #[test]
    fn show_secret_rekeys_the_cipher() {
        let _guard = test_lock();
        let mut session = VaultSession::open(1, 64).unwrap();
        let mut cipher = CipherHandle::create(&mut session).unwrap();
        session
            .store_secret("main", &cipher, &mut SecretBuffer::copy_from(b"hunter2"))
            .unwrap();

        let before = cipher.wrapped_key().unwrap();
        let mut display = Recorder(Vec::new());
        session
            .show_secret("main", &mut cipher, 40, "", ShowKind::Ok, &mut display)
            .unwrap();
        assert_ne!(cipher.wrapped_key().unwrap(), before);
        assert_eq!(session.dispense_secret("main", &cipher).unwrap().as_bytes(), b"hunter2");
    }
}
