//! Command implementations, one module per subcommand.

pub mod completions;
pub mod generate;
pub mod recipes;
pub mod version;
