//! `strongpass completions`: print a completion script for a shell.
//!
//! The shell is a clap value, so an unknown name is rejected while the
//! arguments are parsed.  Typical setup:
//!
//!   strongpass completions bash > ~/.local/share/bash-completion/completions/strongpass
//!   strongpass completions zsh > "${fpath[1]}/_strongpass"

use std::io::{self, Write};

use clap::CommandFactory;
use clap_complete::{generate, Shell};

use crate::cli::Cli;
use crate::errors::Result;

/// Binary name the scripts complete for.
const BIN_NAME: &str = "strongpass";

/// Execute the `completions` command.
pub fn execute(shell: Shell) -> Result<()> {
    let mut stdout = io::stdout().lock();
    write_completions(shell, &mut stdout)?;
    stdout.flush()?;
    Ok(())
}

/// Write the completion script for `shell` to `out`.
fn write_completions(shell: Shell, out: &mut dyn Write) -> Result<()> {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, BIN_NAME, out);
    tracing::debug!(%shell, "completion script written");
    Ok(())
}
