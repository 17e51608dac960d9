use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use ledgerpack::domain::value_objects::{parse_date, AttrValue, Number};

/// Ledgerpack - accounting-policy configuration compiler
#[derive(Parser, Debug)]
#[command(name = "ledgerpack")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output format for CI
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate a configuration set and report every error
    Check {
        /// Configuration set directory
        dir: PathBuf,
    },

    /// Compile a configuration set and summarise the pack
    Compile {
        /// Configuration set directory
        dir: PathBuf,

        /// Print the build-time decision trace
        #[arg(long)]
        trace: bool,
    },

    /// Print the canonical fingerprint of a configuration set
    Fingerprint {
        /// Configuration set directory
        dir: PathBuf,

        /// Print the canonical form the fingerprint is computed over
        #[arg(long)]
        canonical: bool,
    },

    /// Write (or remove) the APPROVED_FINGERPRINT pin of a set
    Pin {
        /// Configuration set directory
        dir: PathBuf,

        /// Remove the pin, returning the set to draft mode
        #[arg(long)]
        remove: bool,
    },

    /// Semantic diff between two configuration sets
    Diff {
        /// Baseline set directory
        old: PathBuf,

        /// Changed set directory
        new: PathBuf,
    },

    /// Dispatch an event against one configuration set
    Select {
        /// Configuration set directory
        dir: PathBuf,

        /// Event type, e.g. budget.entry
        event_type: String,

        /// Effective date (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date_arg)]
        as_of: NaiveDate,

        #[arg(long)]
        legal_entity: String,

        #[arg(long)]
        jurisdiction: Option<String>,

        #[arg(long)]
        regime: Option<String>,

        /// Event attribute for guard evaluation (name=value, repeatable)
        #[arg(long = "attr", value_parser = parse_attr_arg)]
        attrs: Vec<(String, AttrValue)>,
    },

    /// Load the set governing a legal entity on a date
    Active {
        legal_entity: String,

        /// Effective date (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date_arg)]
        as_of: NaiveDate,

        /// Directory holding the configuration sets (overrides sets.root)
        #[arg(long)]
        root: Option<PathBuf>,

        /// Allow DRAFT sets to be selected
        #[arg(long)]
        allow_drafts: bool,
    },
}

fn parse_date_arg(raw: &str) -> Result<NaiveDate, String> {
    parse_date(raw).ok_or_else(|| format!("'{}' is not a YYYY-MM-DD date", raw))
}

/// `name=value`; the value is read as a boolean, null, number or text.
fn parse_attr_arg(raw: &str) -> Result<(String, AttrValue), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got '{}'", raw))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("attribute name is empty in '{}'", raw));
    }
    let value = value.trim();
    let value = match value {
        "true" => AttrValue::Bool(true),
        "false" => AttrValue::Bool(false),
        "null" => AttrValue::Null,
        _ => match value.parse::<Number>() {
            Ok(number) => AttrValue::Number(number),
            Err(_) => AttrValue::from(value.trim_matches(|c| c == '\'' || c == '"')),
        },
    };
    Ok((name.to_string(), value))
}
