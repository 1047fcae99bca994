//! Configuration management for the `fieldcheck` command.
//!
//! Handles:
//! - Command-line argument parsing
//! - Engine option overrides on top of the schema file's `[options]`

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use crate::validation::{UnknownFieldPolicy, ValidatorOptions};

/// Command-line arguments for `fieldcheck`
#[derive(Debug, Parser)]
#[command(name = "fieldcheck")]
#[command(about = "Validate JSON records against a TOML field schema")]
#[command(version)]
pub struct Args {
    /// Schema file to validate against
    #[arg(help = "Path to the TOML schema file")]
    pub schema: PathBuf,

    /// File holding one or more JSON records
    #[arg(long, help = "Read records from this file instead of stdin")]
    pub input: Option<PathBuf>,

    /// Restrict validation to these fields
    #[arg(long, value_delimiter = ',', help = "Comma-separated fields to validate")]
    pub fields: Option<Vec<String>>,

    /// Skip unknown fields with a warning instead of failing
    #[arg(long)]
    pub ignore_unknown: bool,

    /// Reject fields that declare no rules
    #[arg(long)]
    pub strict: bool,

    /// Print the required fields and exit
    #[arg(long)]
    pub required: bool,

    /// Log level for the validator
    #[arg(
        long,
        default_value = "warn",
        help = "Log level (trace, debug, info, warn, error)"
    )]
    pub log_level: String,
}

/// Combined configuration from all sources
#[derive(Debug, Clone)]
pub struct Config {
    pub schema_path: PathBuf,
    /// `None` means stdin
    pub input_path: Option<PathBuf>,
    pub fields: Option<Vec<String>>,
    pub ignore_unknown: bool,
    pub strict: bool,
    pub list_required: bool,
    pub log_level: String,
}

impl Config {
    /// Create configuration from command-line arguments
    pub fn from_args_and_env() -> Result<Self> {
        Self::from_args(Args::parse())
    }

    /// Create configuration from explicit arguments (useful for testing)
    pub fn from_args(args: Args) -> Result<Self> {
        // An empty `--fields=` means "all fields"
        let fields = args
            .fields
            .map(|fields| fields.into_iter().filter(|f| !f.is_empty()).collect::<Vec<_>>())
            .filter(|fields| !fields.is_empty());

        Ok(Config {
            schema_path: args.schema,
            input_path: args.input,
            fields,
            ignore_unknown: args.ignore_unknown,
            strict: args.strict,
            list_required: args.required,
            log_level: args.log_level,
        })
    }

    /// Apply command-line overrides to the schema file's options
    pub fn validator_options(&self, base: ValidatorOptions) -> ValidatorOptions {
        let mut options = base;
        if self.ignore_unknown {
            options.unknown_fields = UnknownFieldPolicy::Ignore;
        }
        if self.strict {
            options.strict_rules = true;
        }
        options
    }
}
