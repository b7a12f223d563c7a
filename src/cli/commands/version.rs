//! `strongpass version`: display the version.

use console::style;

use crate::crypto::keystream::DEFAULT_ROUNDS;
use crate::errors::Result;

/// Execute the `version` command.
pub fn execute() -> Result<()> {
    let current = env!("CARGO_PKG_VERSION");
    println!("strongpass {current}");
    println!(
        "{}",
        style(format!("keystream v1, {DEFAULT_ROUNDS} default rounds")).dim()
    );
    Ok(())
}
