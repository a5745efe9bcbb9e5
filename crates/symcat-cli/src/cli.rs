//! CLI argument definitions for symcat.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `markets` | Market dropdown options |
//! | `submarkets` | Submarket options for a market |
//! | `symbols` | Symbol options for a submarket |
//! | `automation` | Flat symbol list for automated strategies |
//! | `list` | Every symbol with its market and submarket |
//! | `catalog` | Full market/submarket/symbol tree |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--input` | required | Active symbols JSON file |
//! | `--config` | env | Disabled-entry configuration JSON file |
//! | `--close` | none | Mark a symbol closed before projecting (repeatable) |
//! | `--format` | `json` | Output format (json, table) |
//! | `--pretty` | `false` | Pretty-print JSON output |
//!
//! # Examples
//!
//! ```bash
//! symcat --input active_symbols.json markets
//! symcat --input active_symbols.json symbols random_index --format table
//! symcat --input active_symbols.json --close frxEURUSD markets --pretty
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Symbol catalog inspector.
///
/// Builds the market/submarket/symbol catalog from an active-symbols
/// document and prints the option lists a trading front end would show.
#[derive(Debug, Parser)]
#[command(name = "symcat", author, version, about = "Symbol catalog inspector")]
pub struct Cli {
    /// Active symbols JSON: an array of instruments or an object with an
    /// `active_symbols` array.
    #[arg(long, global = true)]
    pub input: Option<PathBuf>,

    /// Disabled-entry configuration JSON. When omitted, the SYMCAT_*
    /// environment variables are read.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Symbol code to mark closed before projecting.
    #[arg(long = "close", global = true, value_name = "CODE")]
    pub closed: Vec<String>,

    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Aligned columns for terminal display.
    Table,
    /// Single JSON object output.
    Json,
}

/// Available CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Market dropdown options.
    Markets,

    /// Submarket dropdown options for one market.
    ///
    /// # Examples
    ///
    ///   symcat --input symbols.json submarkets synthetic_index
    Submarkets(SubmarketsArgs),

    /// Symbol dropdown options for one submarket.
    ///
    /// # Examples
    ///
    ///   symcat --input symbols.json symbols random_index
    Symbols(SymbolsArgs),

    /// Symbols offered to automated strategies.
    Automation,

    /// Every symbol with its market and submarket.
    List(ListArgs),

    /// Full catalog tree with counts.
    Catalog,
}

/// Arguments for the `submarkets` command.
#[derive(Debug, Args)]
pub struct SubmarketsArgs {
    /// Market id (e.g. synthetic_index, forex).
    pub market: String,
}

/// Arguments for the `symbols` command.
#[derive(Debug, Args)]
pub struct SymbolsArgs {
    /// Submarket id (e.g. random_index, major_pairs).
    pub submarket: String,
}

/// Arguments for the `list` command.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Skip markets whose every symbol is closed.
    #[arg(long, default_value_t = false)]
    pub open_only: bool,
}
