//! Maps single key presses onto a [`MasterSecretInput`].

use crate::errors::Result;
use crate::vault::VaultSession;

use super::{InputState, MasterSecretInput};

/// Backspace as delivered by terminals and key events.
pub const BACKSPACE: char = '\u{8}';

/// What a key press did to the entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// The key was added to the entry.
    Consumed,
    /// The caller should remove the last character.
    Backspace,
    /// The key is not part of a strong password.
    Ignored,
}

impl KeyOutcome {
    pub fn as_i32(self) -> i32 {
        match self {
            Self::Consumed => 1,
            Self::Backspace => -1,
            Self::Ignored => 0,
        }
    }
}

/// Feed one key to `input`, starting a session-length entry if needed.
///
/// Printable ASCII (letters, digits, symbols, punctuation and space) is
/// appended.  Backspace is reported, not applied.
pub fn key_press(
    input: &mut MasterSecretInput,
    session: &VaultSession,
    key: char,
) -> Result<KeyOutcome> {
    if key == BACKSPACE {
        return Ok(KeyOutcome::Backspace);
    }
    if !(key == ' ' || key.is_ascii_graphic()) {
        return Ok(KeyOutcome::Ignored);
    }

    if input.state() != InputState::Started {
        input.start_input(session, session.max_length())?;
    }
    input.put(key as u8)?;
    Ok(KeyOutcome::Consumed)
}
