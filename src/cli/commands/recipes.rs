//! `strongpass recipes`: list the built-in recipes.

use crate::cli::output;
use crate::errors::Result;
use crate::password::RecipePreset;

/// Execute the `recipes` command.
pub fn execute() -> Result<()> {
    output::print_recipes_table(&RecipePreset::ALL);
    output::tip("Pick one with `strongpass generate <MNEMONIC> --recipe <NAME>`.");
    Ok(())
}
