//! Command-line interface: argument types, commands and terminal output.

pub mod commands;
pub mod output;
pub mod types;

pub use types::{CheckArgs, Cli, Commands, FetchArgs};

use crate::domain::models::Config;

/// Run the parsed command against the loaded configuration
pub async fn dispatch(cli: Cli, config: &Config) -> anyhow::Result<()> {
    match cli.command {
        Commands::Fetch(args) => commands::fetch::execute(args, config, cli.json).await,
        Commands::Sites => commands::sites::execute(config, cli.json),
        Commands::Check(args) => commands::check::execute(args, config, cli.json),
    }
}

/// Print an error chain and exit with status 1
pub fn handle_error(err: anyhow::Error, json_mode: bool) -> ! {
    tracing::error!(error = %format!("{err:#}"), "command failed");

    if json_mode {
        let chain: Vec<String> = err.chain().map(ToString::to_string).collect();
        let body = serde_json::json!({ "error": err.to_string(), "causes": &chain[1..] });
        println!("{}", serde_json::to_string_pretty(&body).unwrap_or_default());
    } else {
        eprintln!("{} {err}", console::style("Error:").red().bold());
        for cause in err.chain().skip(1) {
            eprintln!("  caused by: {cause}");
        }
    }

    std::process::exit(1);
}
