//! `strongpass generate`: derive passwords from the strong password.
//!
//! Opens a session, takes the strong password once, then derives one
//! password per mnemonic.  Without a mnemonic on the command line it keeps
//! prompting for mnemonics until the user stops.

use std::io::IsTerminal;

use console::Term;
use dialoguer::{Confirm, Input};

use crate::cli::display::TerminalDisplay;
use crate::cli::{load_settings, output, read_strong_password, Cli, GenerateArgs};
use crate::config::Settings;
use crate::errors::{Result, StrongPassError};
use crate::password::{PasswordGenerator, Recipe, RecipePreset};
use crate::surface::{ClipboardSink, ShowKind, ShowResponse, SystemClipboard};
use crate::vault::{CipherHandle, VaultSession};

/// What to do with each derived password.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Delivery {
    show: bool,
    clipboard: bool,
}

impl Delivery {
    fn from_args(args: &GenerateArgs) -> Self {
        Self {
            show: args.show,
            // The clipboard is the default when nothing else is asked for.
            clipboard: args.clipboard || !args.show,
        }
    }
}

/// Execute the `generate` command.
pub fn execute(cli: &Cli, args: &GenerateArgs) -> Result<()> {
    let settings = load_settings(cli)?;

    let mut session = VaultSession::open(settings.capacity, settings.max_length)?;
    let mut cipher = CipherHandle::create(&mut session)?;

    let result = run(&mut session, &mut cipher, &settings, args);

    // Always release the key and the session, even after a failure.
    cipher.destroy(&mut session)?;
    session.close()?;
    result
}

fn run(
    session: &mut VaultSession,
    cipher: &mut CipherHandle,
    settings: &Settings,
    args: &GenerateArgs,
) -> Result<()> {
    let name = settings.secret_name.as_str();
    read_strong_password(session, cipher, name)?;

    if args.verify {
        let response = session.show_secret(
            name,
            cipher,
            settings.show_width,
            "Strong password",
            ShowKind::YesNo,
            &mut TerminalDisplay::new(),
        )?;
        if response == ShowResponse::No {
            return Err(StrongPassError::UserCancelled);
        }
    }

    let generator = PasswordGenerator::new(settings.derivation_rounds);
    let recipe = resolve_recipe(settings, args)?;
    let length = args.length.unwrap_or(settings.default_length);
    let delivery = Delivery::from_args(args);

    let interactive = std::io::stdin().is_terminal();
    let repeat = args.mnemonic.is_none();
    let mut mnemonic = args.mnemonic.clone();

    loop {
        let current = match mnemonic.take() {
            Some(m) => m,
            None => prompt_mnemonic()?,
        };

        if delivery.show {
            generator.show_password(
                session,
                name,
                &current,
                cipher,
                length,
                &recipe,
                settings.show_width,
                &format!("Password for {current}"),
                ShowKind::Ok,
                &mut TerminalDisplay::new(),
            )?;
        }

        if delivery.clipboard {
            let mut clipboard = SystemClipboard::open()?;
            generator.password_to_clipboard(
                session,
                name,
                &current,
                cipher,
                length,
                &recipe,
                &mut clipboard,
            )?;
            if interactive {
                output::info("Password copied to clipboard, press a key to clear...");
                Term::stderr().read_key()?;
                clipboard.clear()?;
                output::success("Clipboard cleared");
            } else {
                output::warning("Password copied to clipboard; clear it when you are done");
            }
        }

        if !repeat || !prompt_continue()? {
            break;
        }
    }

    Ok(())
}

/// Pick the recipe: `-r`, then `--recipe`, then the configured preset.
/// `--separator` overrides the preset's separator.
fn resolve_recipe(settings: &Settings, args: &GenerateArgs) -> Result<Recipe> {
    let preset = if args.require_all {
        RecipePreset::AllRequired
    } else {
        match args.recipe {
            Some(preset) => preset,
            None => settings.recipe_preset()?,
        }
    };

    let mut recipe = preset.recipe();
    if let Some(separator) = args.separator {
        recipe.separator = Some(separator);
    }
    Ok(recipe)
}

fn prompt_mnemonic() -> Result<String> {
    Input::<String>::new()
        .with_prompt("Mnemonic")
        .interact_text()
        .map_err(|e| StrongPassError::CommandFailed(format!("mnemonic prompt: {e}")))
}

fn prompt_continue() -> Result<bool> {
    Confirm::new()
        .with_prompt("Continue?")
        .default(false)
        .interact()
        .map_err(|e| StrongPassError::CommandFailed(format!("continue prompt: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clipboard_is_the_default_delivery() {
        let args = GenerateArgs::default();
        assert_eq!(
            Delivery::from_args(&args),
            Delivery {
                show: false,
                clipboard: true
            }
        );
    }

    #[test]
    fn show_alone_skips_clipboard() {
        let args = GenerateArgs {
            show: true,
            ..GenerateArgs::default()
        };
        assert!(!Delivery::from_args(&args).clipboard);

        let args = GenerateArgs {
            show: true,
            clipboard: true,
            ..GenerateArgs::default()
        };
        assert!(Delivery::from_args(&args).clipboard);
    }

    #[test]
    fn require_all_wins_over_config() {
        let settings = Settings {
            recipe: "pin".into(),
            ..Settings::default()
        };
        let args = GenerateArgs {
            require_all: true,
            ..GenerateArgs::default()
        };
        let recipe = resolve_recipe(&settings, &args).unwrap();
        assert_eq!(recipe, RecipePreset::AllRequired.recipe());
    }

    #[test]
    fn separator_override_applies() {
        let args = GenerateArgs {
            separator: Some('-'),
            ..GenerateArgs::default()
        };
        let recipe = resolve_recipe(&Settings::default(), &args).unwrap();
        assert_eq!(recipe.effective_separator(), Some('-'));
    }
}
