//! Integration tests for storing, dispensing and destroying secrets.

mod common;

use strongpass::crypto::SecretBuffer;
use strongpass::errors::{ErrorType, StrongPassError};
use strongpass::vault::{CipherHandle, VaultSession};

use common::serial;

#[test]
fn store_dispense_round_trip() {
    let _guard = serial();
    let mut session = VaultSession::open(1, 64).unwrap();
    let cipher = CipherHandle::create(&mut session).unwrap();

    let mut secret = SecretBuffer::copy_from(b"correct horse battery staple");
    session.store_secret("main", &cipher, &mut secret).unwrap();

    // The source buffer is emptied by the store.
    assert_eq!(secret.len(), 0);
    assert_eq!(session.secret_size("main"), 28);

    let dispensed = session.dispense_secret("main", &cipher).unwrap();
    assert_eq!(dispensed.as_bytes(), b"correct horse battery staple");
}

#[test]
fn dispense_absent_secret_fails() {
    let _guard = serial();
    let mut session = VaultSession::open(1, 64).unwrap();
    let cipher = CipherHandle::create(&mut session).unwrap();

    let err = session.dispense_secret("main", &cipher).unwrap_err();
    assert!(matches!(err, StrongPassError::NoSecretStored(_)));
    assert_eq!(err.error_type(), ErrorType::Api);
    assert_eq!(err.code(), 0x0C);
}

#[test]
fn destroy_removes_the_secret() {
    let _guard = serial();
    let (mut session, cipher) = common::session_with_secret(b"strong");

    session.destroy_secret("main").unwrap();
    assert_eq!(session.secret_size("main"), 0);
    assert!(session.dispense_secret("main", &cipher).is_err());

    // A second destroy is harmless.
    session.destroy_secret("main").unwrap();
}

#[test]
fn empty_secret_is_rejected() {
    let _guard = serial();
    let mut session = VaultSession::open(1, 64).unwrap();
    let cipher = CipherHandle::create(&mut session).unwrap();

    let mut secret = SecretBuffer::with_capacity(8);
    assert!(matches!(
        session.store_secret("main", &cipher, &mut secret),
        Err(StrongPassError::SizeIsZero)
    ));
}

#[test]
fn oversized_secret_is_rejected_and_wiped() {
    let _guard = serial();
    let mut session = VaultSession::open(1, 64).unwrap();
    let cipher = CipherHandle::create(&mut session).unwrap();

    let mut secret = SecretBuffer::copy_from(&[b'a'; 100]);
    let err = session.store_secret("main", &cipher, &mut secret).unwrap_err();
    assert_eq!(err.code(), 0x0B);
    assert!(secret.is_empty());
}

#[test]
fn closing_destroys_stored_secrets() {
    let _guard = serial();
    let (mut session, _cipher) = common::session_with_secret(b"strong");
    assert_eq!(session.secret_count(), 1);

    session.close().unwrap();
    assert_eq!(session.secret_count(), 0);
}
