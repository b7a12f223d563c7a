//! Integration tests for the vault session and cipher lifecycle.

mod common;

use strongpass::errors::{ErrorType, StrongPassError};
use strongpass::vault::{CipherHandle, CipherState, VaultSession, MIN_LENGTH};

use common::serial;

// ---------------------------------------------------------------------------
// Session singleton
// ---------------------------------------------------------------------------

#[test]
fn only_one_session_at_a_time() {
    let _guard = serial();
    let session = VaultSession::open(2, 100).unwrap();

    let err = VaultSession::open(1, 64).unwrap_err();
    assert!(matches!(err, StrongPassError::AlreadyInitialized));
    assert_eq!(err.error_type(), ErrorType::Api);
    assert_eq!(err.code(), 0x02);

    // The first session is unaffected.
    assert_eq!(session.capacity(), 2);
    assert_eq!(session.max_length(), 100);
    assert!(!session.is_closed());
}

#[test]
fn close_and_reopen_with_new_bounds() {
    let _guard = serial();
    let mut session = VaultSession::open(1, 64).unwrap();
    session.close().unwrap();
    assert!(session.is_closed());

    let session = VaultSession::open(1, 256).unwrap();
    assert_eq!(session.max_length(), 256);
}

#[test]
fn reopen_keeps_secrets_and_checks_capacity() {
    let _guard = serial();
    let (mut session, cipher) = common::session_with_secret(b"strong");

    session.reopen(3, 128).unwrap();
    assert_eq!(session.capacity(), 3);
    assert_eq!(session.secret_size("main"), 6);

    let stored = session.dispense_secret("main", &cipher).unwrap();
    assert_eq!(stored.as_bytes(), b"strong");

    session.reopen(1, 128).unwrap();
}

#[test]
fn reopen_below_stored_count_fails() {
    let _guard = serial();
    let mut session = VaultSession::open(2, 64).unwrap();
    let cipher = CipherHandle::create(&mut session).unwrap();
    for name in ["a", "b"] {
        let mut buffer = strongpass::crypto::SecretBuffer::copy_from(b"x");
        session.store_secret(name, &cipher, &mut buffer).unwrap();
    }

    assert!(matches!(
        session.reopen(1, 64),
        Err(StrongPassError::CapacityExceeded(1))
    ));
}

#[test]
fn operations_on_closed_session_fail() {
    let _guard = serial();
    let (mut session, cipher) = common::session_with_secret(b"strong");
    session.close().unwrap();

    assert!(matches!(
        session.dispense_secret("main", &cipher),
        Err(StrongPassError::NotInitialized)
    ));
    assert!(matches!(
        session.destroy_secret("main"),
        Err(StrongPassError::NotInitialized)
    ));
    assert_eq!(session.secret_size("main"), 0);
}

#[test]
fn min_length_is_the_digest_size() {
    assert_eq!(VaultSession::min_length(), MIN_LENGTH);
    assert_eq!(MIN_LENGTH, 64);
}

// ---------------------------------------------------------------------------
// Cipher handles
// ---------------------------------------------------------------------------

#[test]
fn cipher_lifecycle() {
    let _guard = serial();
    let mut session = VaultSession::open(1, 64).unwrap();
    let mut cipher = CipherHandle::create(&mut session).unwrap();
    assert_eq!(cipher.state(), CipherState::Completed);
    assert!(cipher.completed());

    cipher.destroy(&mut session).unwrap();
    cipher.destroy(&mut session).unwrap();
    assert!(!cipher.completed());
    assert!(cipher.destroyed());
}

#[test]
fn destroyed_cipher_cannot_dispense() {
    let _guard = serial();
    let (mut session, mut cipher) = common::session_with_secret(b"strong");
    cipher.destroy(&mut session).unwrap();

    let err = session.dispense_secret("main", &cipher).unwrap_err();
    assert!(matches!(err, StrongPassError::CipherNotReady));
    assert_eq!(err.code(), 0x0D);
}

#[test]
fn cipher_outlives_its_session_safely() {
    let _guard = serial();
    let (mut session, mut cipher) = common::session_with_secret(b"strong");
    session.close().unwrap();

    cipher.destroy(&mut session).unwrap();
    assert!(cipher.destroyed());
}
