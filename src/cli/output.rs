//! Colored terminal output helpers.
//!
//! All user-facing output goes through these functions so we get
//! consistent styling across every command.

use comfy_table::{ContentArrangement, Table};
use console::style;

use crate::password::{CharClass, Recipe, RecipePreset};

/// Print a green success message: "check_mark {msg}"
pub fn success(msg: &str) {
    println!("{} {}", style("\u{2713}").green().bold(), msg);
}

/// Print a red error message: "x_mark {msg}"
pub fn error(msg: &str) {
    eprintln!("{} {}", style("\u{2717}").red().bold(), msg);
}

/// Print a yellow warning: "warning_sign {msg}"
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("\u{26a0}").yellow().bold(), msg);
}

/// Print a blue info message: "info_sign {msg}"
pub fn info(msg: &str) {
    println!("{} {}", style("\u{2139}").blue().bold(), msg);
}

/// Print a dim tip/hint: "arrow {msg}"
pub fn tip(msg: &str) {
    println!("{} {}", style("\u{2192}").dim(), style(msg).dim());
}

/// Print a table of the built-in recipes.
pub fn print_recipes_table(presets: &[RecipePreset]) {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Name", "Allowed", "Required", "Separator"]);

    for preset in presets {
        let recipe = preset.recipe();
        table.add_row(vec![
            preset.name().to_string(),
            allowed_summary(&recipe),
            join_classes(recipe.required.iter()),
            match recipe.effective_separator() {
                Some(' ') => "space".to_string(),
                Some(c) => c.to_string(),
                None => "-".to_string(),
            },
        ]);
    }

    println!("{table}");
}

fn allowed_summary(recipe: &Recipe) -> String {
    let mut parts = join_classes(recipe.allowed.iter());
    if !recipe.specials.is_empty() {
        if parts != "-" {
            parts.push_str(", ");
        } else {
            parts.clear();
        }
        parts.push_str("special");
    }
    parts
}

fn join_classes<'a>(classes: impl Iterator<Item = &'a CharClass>) -> String {
    let names: Vec<String> = classes.map(ToString::to_string).collect();
    if names.is_empty() {
        "-".to_string()
    } else {
        names.join(", ")
    }
}
