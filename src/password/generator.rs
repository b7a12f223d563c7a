//! Deterministic, recipe-constrained password derivation.
//!
//! A password is a pure function of the stored strong password, the
//! secret's name, the mnemonic, the requested length and the recipe.
//! Nothing about a derived password is stored.

use zeroize::Zeroizing;

use crate::crypto::keystream::{Keystream, DEFAULT_ROUNDS};
use crate::errors::{Result, StrongPassError};
use crate::surface::{ClipboardSink, SecretDisplay, ShowKind, ShowResponse};
use crate::vault::{CipherHandle, VaultSession};

use super::recipe::{CharClass, Recipe};
use super::Password;

/// Derives passwords from the strong password stored in a session.
#[derive(Debug, Clone, Copy)]
pub struct PasswordGenerator {
    rounds: u32,
}

impl Default for PasswordGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_ROUNDS)
    }
}

impl PasswordGenerator {
    /// A generator strengthening each seed with `rounds` hash rounds.
    ///
    /// Passwords depend on the round count, so it must stay the same for
    /// the same passwords to come back.
    pub fn new(rounds: u32) -> Self {
        Self { rounds }
    }

    pub fn rounds(&self) -> u32 {
        self.rounds
    }

    /// Derive the password for `mnemonic` from the strong password stored
    /// as `name`.  The cipher is rekeyed once the strong password has been
    /// read.
    pub fn generate(
        &self,
        session: &mut VaultSession,
        name: &str,
        mnemonic: &str,
        cipher: &mut CipherHandle,
        length: usize,
        recipe: &Recipe,
    ) -> Result<Password> {
        session.ensure_open()?;
        if length == 0 {
            return Err(StrongPassError::SizeIsZero);
        }
        if length > session.max_length() {
            return Err(StrongPassError::LengthExceedsSupported {
                length,
                max: session.max_length(),
            });
        }
        recipe.validate()?;
        if recipe.required.len() > length {
            return Err(StrongPassError::UnmetRequirements(format!(
                "{} character classes are required but the password is only {length} long",
                recipe.required.len()
            )));
        }

        let alphabet = recipe.alphabet();
        if alphabet.is_empty() {
            return Err(StrongPassError::InvalidRecipe("no characters are allowed".into()));
        }

        let mut stream = {
            let secret = session.dispense_secret(name, cipher)?;
            Keystream::derive(name, mnemonic, secret.as_bytes(), self.rounds)
        };
        cipher.rekey(session)?;

        let mut chars: Zeroizing<Vec<char>> = Zeroizing::new(
            (0..length)
                .map(|_| alphabet[stream.next_below(alphabet.len())])
                .collect(),
        );
        meet_requirements(&mut chars, recipe, &mut stream)?;

        tracing::info!(
            name,
            length,
            mnemonic_length = mnemonic.len(),
            "password derived"
        );
        Ok(Password::new(chars.iter().collect(), recipe.effective_separator()))
    }

    /// Derive a password and copy it to `clipboard`.
    #[allow(clippy::too_many_arguments)]
    pub fn password_to_clipboard(
        &self,
        session: &mut VaultSession,
        name: &str,
        mnemonic: &str,
        cipher: &mut CipherHandle,
        length: usize,
        recipe: &Recipe,
        clipboard: &mut dyn ClipboardSink,
    ) -> Result<()> {
        let password = self.generate(session, name, mnemonic, cipher, length, recipe)?;
        clipboard.copy(password.as_str())
    }

    /// Derive a password and show it, grouped, on `display`.
    #[allow(clippy::too_many_arguments)]
    pub fn show_password(
        &self,
        session: &mut VaultSession,
        name: &str,
        mnemonic: &str,
        cipher: &mut CipherHandle,
        length: usize,
        recipe: &Recipe,
        width: usize,
        title: &str,
        kind: ShowKind,
        display: &mut dyn SecretDisplay,
    ) -> Result<ShowResponse> {
        let password = self.generate(session, name, mnemonic, cipher, length, recipe)?;
        let text = password.grouped(width);
        display.show(&text, width, title, kind)
    }
}

/// Make sure every required class appears at least once.
///
/// For each missing class a character is taken from the most common
/// class that can spare one (not required, or present more than once)
/// and replaced by a character of the missing class.  Positions and
/// replacements come from the keystream, so the result stays
/// deterministic.
fn meet_requirements(chars: &mut [char], recipe: &Recipe, stream: &mut Keystream) -> Result<()> {
    for &missing in &recipe.required {
        if chars.iter().any(|c| CharClass::of(*c) == Some(missing)) {
            continue;
        }

        let donor = donor_class(chars, recipe).ok_or_else(|| {
            StrongPassError::UnmetRequirements(format!("no room left for a {missing} character"))
        })?;
        let positions: Vec<usize> = chars
            .iter()
            .enumerate()
            .filter(|(_, c)| CharClass::of(**c) == Some(donor))
            .map(|(i, _)| i)
            .collect();
        let pos = positions[stream.next_below(positions.len())];

        let pool = recipe.class_alphabet(missing);
        if pool.is_empty() {
            return Err(StrongPassError::UnmetRequirements(format!(
                "the recipe has no {missing} characters"
            )));
        }
        chars[pos] = pool[stream.next_below(pool.len())];
    }
    Ok(())
}

/// The most represented class that can give up a character.  Ties go to
/// the class that sorts first.
fn donor_class(chars: &[char], recipe: &Recipe) -> Option<CharClass> {
    let mut counts: std::collections::BTreeMap<CharClass, usize> = Default::default();
    for class in chars.iter().filter_map(|c| CharClass::of(*c)) {
        *counts.entry(class).or_default() += 1;
    }

    let mut best: Option<(CharClass, usize)> = None;
    for (class, count) in counts {
        let can_spare = !recipe.required.contains(&class) || count > 1;
        if can_spare && best.map_or(true, |(_, n)| count > n) {
            best = Some((class, count));
        }
    }
    best.map(|(class, _)| class)
}
