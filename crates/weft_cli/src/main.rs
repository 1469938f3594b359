//! weft: translate flattened BLIF netlists into structural Verilog or
//! Trivial Graph Format.
//!
//! `weft translate` reads, validates and emits a netlist; `weft check` only
//! reads and validates it and prints a summary.

#![warn(missing_docs)]

mod check;
mod pipeline;
mod translate;

use std::io::IsTerminal;
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};

/// weft: a BLIF netlist translator.
#[derive(Parser, Debug)]
#[command(name = "weft", version, about = "BLIF netlist translator")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Print extra detail about the translated circuit.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Control colored output.
    #[arg(long, global = true, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Path to a `weft.toml` configuration file.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Format used to report diagnostics.
    #[arg(long, global = true, value_enum, default_value_t = ReportFormat::Text)]
    pub message_format: ReportFormat,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Translate a netlist into another format.
    Translate(TranslateArgs),
    /// Read and validate a netlist without emitting anything.
    Check(CheckArgs),
}

/// Arguments for `weft translate`.
#[derive(Parser, Debug)]
pub struct TranslateArgs {
    /// The BLIF file to read.
    pub input: PathBuf,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Verilog)]
    pub format: OutputFormat,

    /// Output file; standard output if omitted.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Keep `name[i]` ports as separate 1-bit ports.
    #[arg(long)]
    pub no_merge_vectors: bool,

    /// Override the Verilog module name.
    #[arg(long)]
    pub module_name: Option<String>,
}

/// Arguments for `weft check`.
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// The BLIF file to read.
    pub input: PathBuf,

    /// Keep `name[i]` ports as separate 1-bit ports.
    #[arg(long)]
    pub no_merge_vectors: bool,
}

/// Translation target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Structural Verilog.
    Verilog,
    /// Trivial Graph Format.
    Tgf,
}

/// Controls whether colored output is produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Color when stderr is a terminal.
    Auto,
    /// Always produce colored output.
    Always,
    /// Never produce colored output.
    Never,
}

/// Diagnostic output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable terminal output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print extra detail.
    pub verbose: bool,
    /// Whether to use colored output.
    pub color: bool,
    /// Optional path to a config file.
    pub config: Option<PathBuf>,
    /// How diagnostics are reported.
    pub message_format: ReportFormat,
}

fn main() {
    let cli = Cli::parse();

    let color = match cli.color {
        ColorChoice::Auto => std::io::stderr().is_terminal(),
        ColorChoice::Always => true,
        ColorChoice::Never => false,
    };

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        color,
        config: cli.config,
        message_format: cli.message_format,
    };

    let result = match cli.command {
        Command::Translate(ref args) => translate::run(args, &global),
        Command::Check(ref args) => check::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}
