//! Character-composition recipes for generated passwords.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::errors::{Result, StrongPassError};

/// Every special character a recipe may draw from.
pub const ALL_SUPPORTED_SPECIALS: &str = "!@#$%^&*()_-+=[]{};:,.<>/?`~\\'\"";

/// A class of password characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CharClass {
    Numeric,
    Lower,
    Upper,
    Space,
    Special,
}

impl CharClass {
    /// Classify an ASCII character.  `None` for characters no recipe uses.
    pub fn of(c: char) -> Option<Self> {
        match c {
            '0'..='9' => Some(Self::Numeric),
            'a'..='z' => Some(Self::Lower),
            'A'..='Z' => Some(Self::Upper),
            ' ' => Some(Self::Space),
            _ if ALL_SUPPORTED_SPECIALS.contains(c) => Some(Self::Special),
            _ => None,
        }
    }

    fn members(self) -> &'static str {
        match self {
            Self::Numeric => "0123456789",
            Self::Lower => "abcdefghijklmnopqrstuvwxyz",
            Self::Upper => "ABCDEFGHIJKLMNOPQRSTUVWXYZ",
            Self::Space => " ",
            Self::Special => "",
        }
    }
}

impl fmt::Display for CharClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Numeric => "numeric",
            Self::Lower => "lowercase",
            Self::Upper => "uppercase",
            Self::Space => "space",
            Self::Special => "special",
        };
        f.write_str(name)
    }
}

/// Which characters a password may and must contain.
///
/// `allowed` holds the letter, digit and space classes; special
/// characters are allowed exactly when `specials` is non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Recipe {
    pub allowed: BTreeSet<CharClass>,
    pub required: BTreeSet<CharClass>,
    pub specials: String,
    pub separator: Option<char>,
}

impl Recipe {
    pub fn new(allowed: &[CharClass], required: &[CharClass], specials: &str) -> Self {
        Self {
            allowed: allowed.iter().copied().collect(),
            required: required.iter().copied().collect(),
            specials: specials.to_string(),
            separator: None,
        }
    }

    pub fn with_separator(mut self, separator: char) -> Self {
        self.separator = Some(separator);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.allowed.contains(&CharClass::Special) {
            return Err(StrongPassError::InvalidRecipe(
                "special characters are allowed through the specials list".into(),
            ));
        }
        if let Some(c) = self.specials.chars().find(|c| !ALL_SUPPORTED_SPECIALS.contains(*c)) {
            return Err(StrongPassError::InvalidRecipe(format!(
                "'{c}' is not a supported special character"
            )));
        }
        for class in &self.required {
            let ok = match class {
                CharClass::Special => !self.specials.is_empty(),
                CharClass::Space => false,
                other => self.allowed.contains(other),
            };
            if !ok {
                return Err(StrongPassError::InvalidRecipe(format!(
                    "{class} characters are required but not allowed"
                )));
            }
        }
        if self.allowed.is_empty() && self.specials.is_empty() {
            return Err(StrongPassError::InvalidRecipe("no characters are allowed".into()));
        }
        Ok(())
    }

    /// The characters of one class this recipe may use.
    pub fn class_alphabet(&self, class: CharClass) -> Vec<char> {
        match class {
            CharClass::Special => {
                let mut out: Vec<char> = Vec::new();
                for c in self.specials.chars() {
                    if !out.contains(&c) {
                        out.push(c);
                    }
                }
                out
            }
            other if self.allowed.contains(&other) => other.members().chars().collect(),
            _ => Vec::new(),
        }
    }

    /// Every character the recipe may use, in a fixed order: digits,
    /// lowercase, uppercase, space, then specials.
    pub fn alphabet(&self) -> Vec<char> {
        [
            CharClass::Numeric,
            CharClass::Lower,
            CharClass::Upper,
            CharClass::Space,
            CharClass::Special,
        ]
        .into_iter()
        .flat_map(|class| self.class_alphabet(class))
        .collect()
    }

    /// The separator to group with, unless it would be ambiguous because
    /// it can also appear in the password itself.
    pub fn effective_separator(&self) -> Option<char> {
        self.separator
            .filter(|sep| !self.alphabet().contains(sep))
    }
}

/// The built-in recipes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum RecipePreset {
    /// Letters, digits and all specials, grouped with spaces.
    Default,
    /// Letters, digits, spaces and all specials.
    DefaultWithSpaces,
    /// Like `default`, with at least one digit, lower, upper and special.
    AllRequired,
    /// Letters and digits.
    Alphanumeric,
    /// Letters, digits and spaces.
    AlphanumericWithSpaces,
    /// Digits only.
    Pin,
}

impl RecipePreset {
    pub const ALL: [RecipePreset; 6] = [
        Self::Default,
        Self::DefaultWithSpaces,
        Self::AllRequired,
        Self::Alphanumeric,
        Self::AlphanumericWithSpaces,
        Self::Pin,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::DefaultWithSpaces => "default-with-spaces",
            Self::AllRequired => "all-required",
            Self::Alphanumeric => "alphanumeric",
            Self::AlphanumericWithSpaces => "alphanumeric-with-spaces",
            Self::Pin => "pin",
        }
    }

    pub fn recipe(self) -> Recipe {
        use CharClass::{Lower, Numeric, Space, Special, Upper};
        let alnum = [Numeric, Lower, Upper];
        match self {
            Self::Default => Recipe::new(&alnum, &[], ALL_SUPPORTED_SPECIALS).with_separator(' '),
            Self::DefaultWithSpaces => {
                Recipe::new(&[Numeric, Lower, Upper, Space], &[], ALL_SUPPORTED_SPECIALS)
            }
            Self::AllRequired => {
                Recipe::new(&alnum, &[Numeric, Lower, Upper, Special], ALL_SUPPORTED_SPECIALS)
                    .with_separator(' ')
            }
            Self::Alphanumeric => Recipe::new(&alnum, &[], ""),
            Self::AlphanumericWithSpaces => {
                Recipe::new(&[Numeric, Lower, Upper, Space], &[], "").with_separator(' ')
            }
            Self::Pin => Recipe::new(&[Numeric], &[], ""),
        }
    }
}

impl fmt::Display for RecipePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RecipePreset {
    type Err = StrongPassError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|preset| preset.name() == s)
            .ok_or_else(|| StrongPassError::InvalidRecipe(format!("unknown recipe '{s}'")))
    }
}
