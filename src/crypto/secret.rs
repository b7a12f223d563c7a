//! `SecretBuffer`: the only container plaintext secrets travel in.
//!
//! The buffer is allocated once at its full capacity and never grows, so
//! no stale copy of the plaintext is left behind by a reallocation.  Its
//! bytes are wiped on every exit path: explicitly via [`SecretBuffer::clear`]
//! and implicitly when the buffer is dropped.

use std::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::errors::{Result, StrongPassError};

/// A fixed-capacity, zero-on-drop byte buffer.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SecretBuffer {
    bytes: Vec<u8>,
    capacity: usize,
}

impl SecretBuffer {
    /// An empty buffer that can hold up to `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Copy `bytes` into a new buffer.  The source is left untouched, so
    /// callers holding the original must wipe it themselves.
    pub fn copy_from(bytes: &[u8]) -> Self {
        let mut buffer = Self::with_capacity(bytes.len());
        buffer.bytes.extend_from_slice(bytes);
        buffer
    }

    /// Append one byte.  Fails when the buffer is full.
    pub fn push(&mut self, byte: u8) -> Result<()> {
        if self.is_full() {
            return Err(StrongPassError::EntryFull(self.capacity));
        }
        self.bytes.push(byte);
        Ok(())
    }

    /// Remove the last byte, wiping its slot.  Returns `false` when empty.
    pub fn pop(&mut self) -> bool {
        let Some(last) = self.bytes.last_mut() else {
            return false;
        };
        *last = 0;
        self.bytes.pop();
        true
    }

    /// Wipe every byte and reset the length to zero.  The allocation is
    /// kept so the buffer can be reused for the next entry.
    pub fn clear(&mut self) {
        // Vec::zeroize wipes the spare capacity as well and truncates.
        self.bytes.zeroize();
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.bytes.len() >= self.capacity
    }
}

impl fmt::Debug for SecretBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretBuffer")
            .field("len", &self.bytes.len())
            .field("capacity", &self.capacity)
            .finish_non_exhaustive()
    }
}
