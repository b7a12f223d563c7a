//! Cryptographic primitives for StrongPass.
//!
//! This module provides:
//! - AES-256-GCM sealing with associated data (`encryption`)
//! - The session key and HKDF per-secret key derivation (`keys`)
//! - The zero-on-drop `SecretBuffer` (`secret`)
//! - The deterministic derivation keystream (`keystream`)

pub mod encryption;
pub mod keys;
pub mod keystream;
pub mod secret;

pub use encryption::{open, seal};
pub use keys::{derive_secret_key, SessionKey};
pub use keystream::Keystream;
pub use secret::SecretBuffer;
