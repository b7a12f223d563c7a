use clap::Parser;
use strongpass::cli::{Cli, Commands};
use strongpass::errors::Status;
use tracing_subscriber::EnvFilter;

fn main() {
    init_logging();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Generate(ref args) => strongpass::cli::commands::generate::execute(&cli, args),
        Commands::Recipes => strongpass::cli::commands::recipes::execute(),
        Commands::Version => strongpass::cli::commands::version::execute(),
        Commands::Completions { shell } => strongpass::cli::commands::completions::execute(shell),
    };

    if let Err(e) = result {
        let status = Status::from(&e);
        strongpass::cli::output::error(&e.to_string());
        eprintln!(
            "{}",
            console::style(format!("code {:#04x}, type {:?}", status.code, status.error_type)).dim()
        );
        std::process::exit(1);
    }
}

/// Log to stderr, filtered by `STRONGPASS_LOG` (default: warn).
fn init_logging() {
    let filter =
        EnvFilter::try_from_env("STRONGPASS_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
