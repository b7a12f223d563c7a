//! Terminal implementation of [`SecretDisplay`].
//!
//! The secret is printed to stdout under a bold title.  Kinds that ask a
//! question prompt with `dialoguer` when stdin is a terminal; otherwise
//! the kind's default answer is returned.

use std::io::IsTerminal;

use console::style;
use dialoguer::{Confirm, Select};

use crate::errors::{Result, StrongPassError};
use crate::surface::{SecretDisplay, ShowKind, ShowResponse};

/// Shows secrets on the terminal.
#[derive(Debug, Default)]
pub struct TerminalDisplay {
    interactive: bool,
}

impl TerminalDisplay {
    pub fn new() -> Self {
        Self {
            interactive: std::io::stdin().is_terminal(),
        }
    }
}

impl SecretDisplay for TerminalDisplay {
    fn show(
        &mut self,
        text: &str,
        _width: usize,
        title: &str,
        kind: ShowKind,
    ) -> Result<ShowResponse> {
        if !title.is_empty() {
            println!("{}", style(title).bold());
        }
        for line in text.lines() {
            println!("  {line}");
        }

        if !self.interactive || kind == ShowKind::Ok {
            return Ok(kind.default_response());
        }

        match kind {
            ShowKind::YesNo => {
                let yes = Confirm::new()
                    .with_prompt("Is this correct?")
                    .default(true)
                    .interact()
                    .map_err(|e| StrongPassError::Display(format!("prompt failed: {e}")))?;
                Ok(if yes { ShowResponse::Yes } else { ShowResponse::No })
            }
            _ => {
                let choices = choices(kind);
                let labels: Vec<&str> = choices.iter().map(|(label, _)| *label).collect();
                let picked = Select::new()
                    .items(&labels)
                    .default(0)
                    .interact()
                    .map_err(|e| StrongPassError::Display(format!("prompt failed: {e}")))?;
                Ok(choices[picked].1)
            }
        }
    }
}

fn choices(kind: ShowKind) -> &'static [(&'static str, ShowResponse)] {
    match kind {
        ShowKind::Ok => &[("OK", ShowResponse::Ok)],
        ShowKind::OkCancel => &[("OK", ShowResponse::Ok), ("Cancel", ShowResponse::Cancel)],
        ShowKind::AbortRetryIgnore => &[
            ("Abort", ShowResponse::Abort),
            ("Retry", ShowResponse::Retry),
            ("Ignore", ShowResponse::Ignore),
        ],
        ShowKind::YesNoCancel => &[
            ("Yes", ShowResponse::Yes),
            ("No", ShowResponse::No),
            ("Cancel", ShowResponse::Cancel),
        ],
        ShowKind::YesNo => &[("Yes", ShowResponse::Yes), ("No", ShowResponse::No)],
        ShowKind::RetryCancel => &[
            ("Retry", ShowResponse::Retry),
            ("Cancel", ShowResponse::Cancel),
        ],
        ShowKind::CancelTryContinue => &[
            ("Cancel", ShowResponse::Cancel),
            ("Try again", ShowResponse::Retry),
            ("Continue", ShowResponse::Ok),
        ],
    }
}
