//! Ledgerpack CLI - accounting-policy configuration compiler
//!
//! Usage: ledgerpack <COMMAND>
//!
//! Commands:
//!   check        Validate a configuration set and report every error
//!   compile      Compile a configuration set and summarise the pack
//!   fingerprint  Print the canonical fingerprint of a set
//!   pin          Write or remove the APPROVED_FINGERPRINT pin
//!   diff         Semantic diff between two sets
//!   select       Dispatch an event against one set
//!   active       Load the set governing a legal entity on a date

mod cli;
mod commands;
mod ui;

use anyhow::Result;
use clap::Parser;
use ledgerpack::config::{Config, LoadedConfig};

use cli::{Cli, Commands};
use ledgerpack::ScopeQuery;

fn main() {
    let cli = Cli::parse();
    let json = cli.json;

    if let Err(err) = run(cli) {
        ui::error::print_error(&err, json);
        std::process::exit(ui::error::exit_code(&err));
    }
}

fn run(cli: Cli) -> Result<()> {
    let project_root = std::env::current_dir()?;
    let LoadedConfig {
        config,
        source,
        warnings,
    } = Config::discover(&project_root).map_err(ledgerpack::LedgerPackError::from)?;

    ui::logging::init(&config.logging, cli.verbose);
    match &source {
        Some(path) => tracing::debug!(config = %path.display(), "loaded configuration"),
        None => tracing::debug!("using built-in configuration defaults"),
    }
    for warning in &warnings {
        if cli.json {
            let _ = ui::json::emit(serde_json::json!({
                "event": "config_warning",
                "message": warning.to_string(),
            }));
        } else {
            eprintln!("[WARN] {}", warning);
        }
    }

    let json = cli.json;
    match cli.command {
        Commands::Check { dir } => commands::cmd_check(&dir, &config, json),
        Commands::Compile { dir, trace } => commands::cmd_compile(&dir, trace, &config, json),
        Commands::Fingerprint { dir, canonical } => {
            commands::cmd_fingerprint(&dir, canonical, &config, json)
        }
        Commands::Pin { dir, remove } => commands::cmd_pin(&dir, remove, &config, json),
        Commands::Diff { old, new } => commands::cmd_diff(&old, &new, &config, json),
        Commands::Select {
            dir,
            event_type,
            as_of,
            legal_entity,
            jurisdiction,
            regime,
            attrs,
        } => {
            let scope = ScopeQuery {
                legal_entity,
                jurisdiction,
                regulatory_regime: regime,
            };
            commands::cmd_select(
                commands::SelectArgs {
                    dir: &dir,
                    event_type: &event_type,
                    as_of,
                    scope,
                    attrs,
                },
                &config,
                json,
            )
        }
        Commands::Active {
            legal_entity,
            as_of,
            root,
            allow_drafts,
        } => commands::cmd_active(&legal_entity, as_of, root, allow_drafts, &config, json),
    }
}
