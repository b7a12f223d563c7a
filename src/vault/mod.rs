//! Vault module: the in-memory session that guards the strong password.
//!
//! This module provides:
//! - `VaultSession`, the process-wide session singleton (`session`)
//! - `CipherHandle`, the key protecting stored secrets (`cipher`)
//! - Named-secret store, dispense and destroy operations (`store`)
//! - The backend holding the session key and handle registry (`backend`)

mod backend;
pub mod cipher;
pub mod session;
pub mod store;

// Re-export the most commonly used items.
pub use cipher::{CipherHandle, CipherState};
pub use session::{VaultSession, MIN_LENGTH};
