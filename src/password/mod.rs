//! Password derivation: recipes, the generator and grouping.

pub mod generator;
pub mod grouping;
pub mod recipe;

pub use generator::PasswordGenerator;
pub use recipe::{CharClass, Recipe, RecipePreset, ALL_SUPPORTED_SPECIALS};

use std::fmt;

use zeroize::Zeroizing;

/// A derived password.  Wiped on drop and redacted in `Debug`.
pub struct Password {
    chars: Zeroizing<String>,
    separator: Option<char>,
}

impl Password {
    pub(crate) fn new(chars: String, separator: Option<char>) -> Self {
        Self {
            chars: Zeroizing::new(chars),
            separator,
        }
    }

    /// The password characters, without separators.
    pub fn as_str(&self) -> &str {
        &self.chars
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn separator(&self) -> Option<char> {
        self.separator
    }

    /// The password split into blocks by the separator, wrapping at
    /// `width` (0 for no wrapping).  Without a separator the password is
    /// returned as is.
    pub fn grouped(&self, width: usize) -> Zeroizing<String> {
        match self.separator {
            Some(sep) => grouping::group(&self.chars, sep, width),
            None => self.chars.clone(),
        }
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Password")
            .field("len", &self.chars.len())
            .field("separator", &self.separator)
            .finish_non_exhaustive()
    }
}
