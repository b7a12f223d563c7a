//! Staged entry of the strong password.
//!
//! A [`MasterSecretInput`] accumulates the strong password one byte at a
//! time and, when finished, stores it in the session under a name.  The
//! buffer is wiped on every exit path: finish (success or failure),
//! abort and drop.
//!
//! State machine:
//!
//! ```text
//!  NotStarted ─┐
//!  Finished   ─┼─ start_input ──▶ Started ── finish_input ──▶ Finished
//!  Aborted    ─┘                   │  ▲            │ (empty, or store failed)
//!                                  │  └─ put/pop   └──────────▶ Aborted
//!                                  └── abort_input ───────────▶ Aborted
//! ```

pub mod keypress;

pub use keypress::{key_press, KeyOutcome};

use crate::crypto::secret::SecretBuffer;
use crate::errors::{Result, StrongPassError};
use crate::vault::{CipherHandle, VaultSession};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputState {
    NotStarted,
    Started,
    Finished,
    Aborted,
}

#[derive(Debug)]
pub struct MasterSecretInput {
    state: InputState,
    target_length: usize,
    buffer: SecretBuffer,
}

impl Default for MasterSecretInput {
    fn default() -> Self {
        Self::new()
    }
}

impl MasterSecretInput {
    pub fn new() -> Self {
        Self {
            state: InputState::NotStarted,
            target_length: 0,
            buffer: SecretBuffer::with_capacity(0),
        }
    }

    pub fn state(&self) -> InputState {
        self.state
    }

    /// Maximum number of bytes the current entry accepts.
    pub fn target_length(&self) -> usize {
        self.target_length
    }

    /// Bytes entered so far.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Begin a new entry of at most `length` bytes.
    pub fn start_input(&mut self, session: &VaultSession, length: usize) -> Result<()> {
        session.ensure_open()?;
        if self.state == InputState::Started {
            return Err(StrongPassError::EntryAlreadyStarted);
        }
        if length == 0 {
            return Err(StrongPassError::SizeIsZero);
        }
        if length > session.max_length() {
            return Err(StrongPassError::LengthExceedsSupported {
                length,
                max: session.max_length(),
            });
        }

        self.buffer = SecretBuffer::with_capacity(length);
        self.target_length = length;
        self.state = InputState::Started;
        tracing::debug!(length, "strong password entry started");
        Ok(())
    }

    /// Append one byte.  A full entry stays started.
    pub fn put(&mut self, byte: u8) -> Result<()> {
        if self.state != InputState::Started {
            return Err(StrongPassError::EntryNotStarted);
        }
        self.buffer.push(byte)
    }

    /// Remove the last byte.  Returns `false` when there is nothing to remove.
    pub fn pop(&mut self) -> Result<bool> {
        if self.state != InputState::Started {
            return Err(StrongPassError::EntryNotStarted);
        }
        Ok(self.buffer.pop())
    }

    /// Store the entry as `name`, sealed under `cipher`.
    ///
    /// The buffer is wiped either way.  If storing fails the entry is
    /// aborted and must be restarted.
    pub fn finish_input(
        &mut self,
        session: &mut VaultSession,
        name: &str,
        cipher: &CipherHandle,
    ) -> Result<()> {
        if self.state != InputState::Started {
            return Err(StrongPassError::EntryNotStarted);
        }
        if self.buffer.is_empty() {
            self.abort_input();
            tracing::warn!(name, "empty strong password entry aborted");
            return Err(StrongPassError::SizeIsZero);
        }

        match session.store_secret(name, cipher, &mut self.buffer) {
            Ok(()) => {
                self.state = InputState::Finished;
                tracing::debug!(name, "strong password entry finished");
                Ok(())
            }
            Err(e) => {
                self.buffer.clear();
                self.state = InputState::Aborted;
                tracing::warn!(name, error = %e, "strong password entry aborted");
                Err(e)
            }
        }
    }

    /// Discard the entry.  Never fails.
    pub fn abort_input(&mut self) {
        self.buffer.clear();
        self.state = InputState::Aborted;
    }
}
