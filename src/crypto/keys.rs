//! Key material helpers.
//!
//! The session holds one random [`SessionKey`] that wraps the key
//! material of every cipher handle.  From an unwrapped handle key we
//! derive, with HKDF-SHA256, a separate AES key per secret name, so a
//! stored secret can only be opened through the handle that stored it
//! and under the name it was stored as.

use hkdf::Hkdf;
use rand::RngCore;
use sha2::Sha256;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::errors::{Result, StrongPassError};

/// Length of AES-256 keys (256 bits).
pub const KEY_LEN: usize = 32;

/// Length of the random secret behind each cipher handle.
pub const CIPHER_SECRET_LEN: usize = 16;

/// Derive the AES key that seals the secret stored under `secret_name`.
///
/// `info` is `"strongpass-secret:<secret_name>"`.
pub fn derive_secret_key(
    cipher_secret: &[u8],
    secret_name: &str,
) -> Result<Zeroizing<[u8; KEY_LEN]>> {
    let info = format!("strongpass-secret:{secret_name}");
    hkdf_derive(cipher_secret, info.as_bytes())
}

fn hkdf_derive(ikm: &[u8], info: &[u8]) -> Result<Zeroizing<[u8; KEY_LEN]>> {
    let hk = Hkdf::<Sha256>::new(None, ikm);

    let mut okm = Zeroizing::new([0u8; KEY_LEN]);
    hk.expand(info, &mut okm[..])
        .map_err(|e| StrongPassError::KeyDerivationFailed(format!("HKDF expand failed: {e}")))?;

    Ok(okm)
}

/// Fill a fresh zeroizing buffer with `len` random bytes.
pub fn random_bytes(len: usize) -> Zeroizing<Vec<u8>> {
    let mut bytes = Zeroizing::new(vec![0u8; len]);
    rand::rng().fill_bytes(&mut bytes[..]);
    bytes
}

/// The session's wrapping key; wiped when dropped or destroyed.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SessionKey {
    bytes: [u8; KEY_LEN],
    live: bool,
}

impl SessionKey {
    /// Generate a new random key.
    pub fn generate() -> Self {
        let mut bytes = [0u8; KEY_LEN];
        rand::rng().fill_bytes(&mut bytes);
        Self { bytes, live: true }
    }

    /// Access the raw key bytes, if the key has not been destroyed.
    pub fn as_bytes(&self) -> Option<&[u8; KEY_LEN]> {
        self.live.then_some(&self.bytes)
    }

    /// Irreversibly wipe the key.
    pub fn destroy(&mut self) {
        self.zeroize();
    }

    pub fn is_destroyed(&self) -> bool {
        !self.live && self.bytes.iter().all(|b| *b == 0)
    }
}
