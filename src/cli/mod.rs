//! CLI module: Clap argument parser, output helpers, and command implementations.

pub mod commands;
pub mod display;
pub mod output;

use std::io::{BufRead, IsTerminal};
use std::path::PathBuf;

use clap::Parser;
use console::{Key, Term};
use zeroize::Zeroizing;

use crate::config::Settings;
use crate::crypto::SecretBuffer;
use crate::errors::{Result, StrongPassError};
use crate::input::keypress::BACKSPACE;
use crate::input::{key_press, KeyOutcome, MasterSecretInput};
use crate::password::RecipePreset;
use crate::vault::{CipherHandle, VaultSession};

/// Environment variable that supplies the strong password (CI/scripts).
pub const PASSWORD_ENV: &str = "STRONGPASS_PASSWORD";

/// StrongPass CLI: one strong password, a derived password for every site.
#[derive(Parser)]
#[command(
    name = "strongpass",
    about = "One strong password, a derived password for every site",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Directory holding .strongpass.toml (default: current directory)
    #[arg(long, global = true)]
    pub config_dir: Option<String>,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Derive a password for a mnemonic (e.g. a site name)
    Generate(GenerateArgs),

    /// List the built-in recipes
    Recipes,

    /// Show version
    Version,

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Arguments of `strongpass generate`.
#[derive(clap::Args, Debug, Default)]
pub struct GenerateArgs {
    /// Mnemonic to derive from (prompts repeatedly when omitted)
    pub mnemonic: Option<String>,

    /// Copy the password to the clipboard (default)
    #[arg(short = 'c', long)]
    pub clipboard: bool,

    /// Show the password
    #[arg(short = 's', long)]
    pub show: bool,

    /// Show the strong password for confirmation after entering it
    #[arg(short = 'v', long)]
    pub verify: bool,

    /// Require numeric, lowercase, uppercase and special characters
    #[arg(short = 'r', long, conflicts_with = "recipe")]
    pub require_all: bool,

    /// Password length (default from config)
    #[arg(short = 'l', long)]
    pub length: Option<usize>,

    /// Recipe preset (default from config)
    #[arg(long, value_enum)]
    pub recipe: Option<RecipePreset>,

    /// Character placed between blocks when showing the password
    #[arg(long)]
    pub separator: Option<char>,
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Directory the config file is read from.
pub fn config_dir(cli: &Cli) -> Result<PathBuf> {
    match &cli.config_dir {
        Some(dir) => Ok(PathBuf::from(dir)),
        None => Ok(std::env::current_dir()?),
    }
}

/// Load settings for this invocation.
pub fn load_settings(cli: &Cli) -> Result<Settings> {
    Settings::load(&config_dir(cli)?)
}

/// Read the strong password and store it in `session` as `name`.
///
/// Tried in order:
/// 1. `STRONGPASS_PASSWORD` env var (CI/scripts)
/// 2. One line of piped stdin
/// 3. Masked key-by-key entry on the terminal
pub fn read_strong_password(
    session: &mut VaultSession,
    cipher: &CipherHandle,
    name: &str,
) -> Result<()> {
    // 1. Check the environment variable first.
    if let Ok(pw) = std::env::var(PASSWORD_ENV) {
        let pw = Zeroizing::new(pw);
        if !pw.is_empty() {
            let mut secret = SecretBuffer::copy_from(pw.as_bytes());
            return session.store_secret(name, cipher, &mut secret);
        }
    }

    // 2. Piped input.
    let stdin = std::io::stdin();
    if !stdin.is_terminal() {
        let mut line = Zeroizing::new(String::new());
        stdin.lock().read_line(&mut line)?;
        let trimmed = line.trim_end_matches(['\r', '\n']);
        if trimmed.is_empty() {
            return Err(StrongPassError::SizeIsZero);
        }
        let mut secret = SecretBuffer::copy_from(trimmed.as_bytes());
        return session.store_secret(name, cipher, &mut secret);
    }

    // 3. Interactive entry.
    prompt_strong_password(session, cipher, name)
}

/// Masked entry through the key-press adapter.
fn prompt_strong_password(
    session: &mut VaultSession,
    cipher: &CipherHandle,
    name: &str,
) -> Result<()> {
    let term = Term::stderr();
    term.write_str("Strong password: ")?;

    let mut input = MasterSecretInput::new();
    loop {
        let key = match term.read_key()? {
            Key::Enter => break,
            Key::Escape => {
                input.abort_input();
                term.write_line("")?;
                return Err(StrongPassError::UserCancelled);
            }
            Key::Backspace => BACKSPACE,
            Key::Char(c) => c,
            _ => continue,
        };

        match key_press(&mut input, session, key) {
            Ok(KeyOutcome::Consumed) => term.write_str("*")?,
            Ok(KeyOutcome::Backspace) => {
                if input.pop().unwrap_or(false) {
                    term.clear_chars(1)?;
                }
            }
            Ok(KeyOutcome::Ignored) => {}
            Err(StrongPassError::EntryFull(max)) => {
                tracing::debug!(max, "strong password entry is full");
            }
            Err(e) => {
                input.abort_input();
                return Err(e);
            }
        }
    }
    term.write_line("")?;

    input.finish_input(session, name, cipher)
}
