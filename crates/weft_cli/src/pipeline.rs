//! Steps shared by the `translate` and `check` commands: configuration
//! discovery, reading the netlist, and reporting diagnostics.

use std::error::Error;
use std::path::Path;

use weft_blif::{read_netlist, BlifOptions, NetlistOutput};
use weft_config::{load_config, WeftConfig, CONFIG_FILE_NAME};
use weft_diagnostics::{Diagnostic, DiagnosticRenderer, DiagnosticSink, Severity, TerminalRenderer};
use weft_source::SourceDb;

use crate::{GlobalArgs, ReportFormat};

/// Loads the configuration named by `--config`, else `./weft.toml` if
/// present, else the defaults.
pub fn load_settings(global: &GlobalArgs) -> Result<WeftConfig, Box<dyn Error>> {
    if let Some(path) = &global.config {
        return Ok(load_config(path)?);
    }
    let local = Path::new(CONFIG_FILE_NAME);
    if local.is_file() {
        return Ok(load_config(local)?);
    }
    Ok(WeftConfig::default())
}

/// Builds reader options from the configuration and command-line overrides.
pub fn blif_options(config: &WeftConfig, no_merge_vectors: bool) -> BlifOptions {
    BlifOptions {
        merge_io_vectors: config.netlist.merge_io_vectors && !no_merge_vectors,
        clock_name: config.netlist.clock.clone(),
    }
}

/// Reads and validates the netlist at `path`, reporting every diagnostic.
///
/// Returns `Ok(None)` when the netlist was rejected; the reason has already
/// been reported. I/O failures are returned as errors.
pub fn read_input(
    path: &Path,
    options: &BlifOptions,
    global: &GlobalArgs,
) -> Result<Option<(SourceDb, NetlistOutput)>, Box<dyn Error>> {
    let mut source_db = SourceDb::new();
    let file = source_db
        .load_file(path)
        .map_err(|e| format!("cannot read `{}`: {e}", path.display()))?;

    if !global.quiet {
        eprintln!("     Reading {}", path.display());
    }

    let sink = DiagnosticSink::new();
    let result = read_netlist(file, &source_db, options, &sink);
    let mut diagnostics = sink.take_all();
    let netlist = match result {
        Ok(netlist) => Some(netlist),
        Err(e) => {
            diagnostics.push(e.to_diagnostic());
            None
        }
    };

    report(&diagnostics, &source_db, global)?;
    Ok(netlist.map(|n| (source_db, n)))
}

/// Prints diagnostics to stderr in the selected format.
///
/// With `--quiet` only errors are shown.
pub fn report(
    diagnostics: &[Diagnostic],
    source_db: &SourceDb,
    global: &GlobalArgs,
) -> Result<(), Box<dyn Error>> {
    let shown: Vec<&Diagnostic> = diagnostics
        .iter()
        .filter(|d| !global.quiet || d.severity.is_error())
        .collect();

    match global.message_format {
        ReportFormat::Text => {
            let renderer = TerminalRenderer::new(global.color);
            for diag in &shown {
                eprint!("{}", renderer.render(diag, source_db));
            }
            if !global.quiet && !diagnostics.is_empty() {
                eprintln!(
                    "      Result: {} error(s), {} warning(s)",
                    count(diagnostics, Severity::Error),
                    count(diagnostics, Severity::Warning)
                );
            }
        }
        ReportFormat::Json => {
            eprintln!("{}", serde_json::to_string_pretty(&shown)?);
        }
    }
    Ok(())
}

fn count(diagnostics: &[Diagnostic], severity: Severity) -> usize {
    diagnostics.iter().filter(|d| d.severity == severity).count()
}
