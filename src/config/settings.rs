use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::crypto::keystream::DEFAULT_ROUNDS;
use crate::errors::{Result, StrongPassError};
use crate::password::RecipePreset;

/// Per-directory configuration, loaded from `.strongpass.toml`.
///
/// Every field has a sensible default so StrongPass works out-of-the-box
/// without any config file at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Name the strong password is stored under (default: "main").
    #[serde(default = "default_secret_name")]
    pub secret_name: String,

    /// Number of named secrets the session can hold (default: 1).
    #[serde(default = "default_capacity")]
    pub capacity: usize,

    /// Longest strong password or derived password (default: 64).
    #[serde(default = "default_max_length")]
    pub max_length: usize,

    /// Password length when none is given (default: 16).
    #[serde(default = "default_length")]
    pub default_length: usize,

    /// Preset recipe name (default: "default").
    #[serde(default = "default_recipe")]
    pub recipe: String,

    /// Seed strengthening rounds (default: 10000).  Changing this changes
    /// every derived password.
    #[serde(default = "default_derivation_rounds")]
    pub derivation_rounds: u32,

    /// Line width for showing passwords (default: 40).
    #[serde(default = "default_show_width")]
    pub show_width: usize,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_secret_name() -> String {
    "main".to_string()
}

fn default_capacity() -> usize {
    1
}

fn default_max_length() -> usize {
    64
}

fn default_length() -> usize {
    16
}

fn default_recipe() -> String {
    RecipePreset::Default.name().to_string()
}

fn default_derivation_rounds() -> u32 {
    DEFAULT_ROUNDS
}

fn default_show_width() -> usize {
    40
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            secret_name: default_secret_name(),
            capacity: default_capacity(),
            max_length: default_max_length(),
            default_length: default_length(),
            recipe: default_recipe(),
            derivation_rounds: default_derivation_rounds(),
            show_width: default_show_width(),
        }
    }
}

impl Settings {
    /// Name of the config file we look for in the working directory.
    pub const FILE_NAME: &'static str = ".strongpass.toml";

    /// Load settings from `<dir>/.strongpass.toml`.
    ///
    /// If the file does not exist, defaults are returned.  If it exists
    /// but cannot be parsed or holds invalid values, an error is returned.
    pub fn load(dir: &Path) -> Result<Self> {
        let config_path = dir.join(Self::FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            StrongPassError::ConfigError(format!("Failed to parse {}: {e}", config_path.display()))
        })?;

        settings.validate()?;
        tracing::debug!(path = %config_path.display(), "loaded settings");
        Ok(settings)
    }

    /// Reject values that would make every operation fail.
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(StrongPassError::ConfigError("capacity must be at least 1".into()));
        }
        if self.default_length == 0 {
            return Err(StrongPassError::ConfigError(
                "default_length must be at least 1".into(),
            ));
        }
        if self.derivation_rounds == 0 {
            return Err(StrongPassError::ConfigError(
                "derivation_rounds must be at least 1".into(),
            ));
        }
        self.recipe_preset().map_err(|_| {
            StrongPassError::ConfigError(format!("unknown recipe '{}'", self.recipe))
        })?;
        Ok(())
    }

    /// The configured preset.
    pub fn recipe_preset(&self) -> Result<RecipePreset> {
        self.recipe.parse()
    }
}

// ── Tests ────────────────────────────────────────────────────────────
