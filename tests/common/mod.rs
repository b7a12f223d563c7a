//! Helpers shared by the integration tests.

#![allow(dead_code)]

use std::sync::{Mutex, MutexGuard, PoisonError};

use strongpass::crypto::SecretBuffer;
use strongpass::vault::{CipherHandle, VaultSession};

/// Few rounds keep the tests fast; results stay deterministic.
pub const TEST_ROUNDS: u32 = 16;

/// Only one session may be open per process, so tests that open one
/// take this lock first.
pub fn serial() -> MutexGuard<'static, ()> {
    static LOCK: Mutex<()> = Mutex::new(());
    LOCK.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Open a session and store `secret` as "main".
pub fn session_with_secret(secret: &[u8]) -> (VaultSession, CipherHandle) {
    let mut session = VaultSession::open(1, 64).expect("open session");
    let cipher = CipherHandle::create(&mut session).expect("create cipher");
    let mut buffer = SecretBuffer::copy_from(secret);
    session
        .store_secret("main", &cipher, &mut buffer)
        .expect("store secret");
    (session, cipher)
}
