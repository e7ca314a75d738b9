use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use colored::Colorize;
use sitewatch::config::Config;
use sitewatch::Result;
use std::io;

#[derive(Parser)]
#[command(name = "sitewatch")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Website change monitor with Discord notifications", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the target page and compare it against the stored fingerprint
    Check,

    /// Show the persisted monitor state
    Status {
        /// Output in JSON format
        #[arg(short, long)]
        json: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell type (bash, zsh, fish, powershell)
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{}", format!("Error: {:#}", e).red());
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        // No subcommand runs the check, so a bare `sitewatch` invocation
        // works from a scheduler entry.
        None | Some(Commands::Check) => {
            let config = Config::from_env()?;
            sitewatch::run_check(&config)?;
            Ok(())
        }
        Some(Commands::Status { json }) => sitewatch::cli::status::run(json),
        Some(Commands::Completions { shell }) => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "sitewatch", &mut io::stdout());
            Ok(())
        }
    }
}
