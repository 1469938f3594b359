//! Conformance test helpers for the weft netlist translator.
//!
//! Provides shared pipeline functions that run BLIF source text through the
//! full pipeline (parse → lower → validate → emit) and return structured
//! results for assertion in integration tests.

#![warn(missing_docs)]

use weft_blif::{read_netlist, BlifOptions, NetlistError, NetlistOutput};
use weft_config::WeftConfig;
use weft_diagnostics::{Diagnostic, DiagnosticRenderer, DiagnosticSink, Severity, TerminalRenderer};
use weft_emit::{emit_tgf, emit_verilog, EmitError, GraphOptions, VerilogOptions};
use weft_ir::Circuit;
use weft_source::SourceDb;

/// Output format of [`emit`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Backend {
    /// Structural Verilog.
    Verilog,
    /// Trivial Graph Format.
    Tgf,
}

/// Result of reading a netlist through the full front end.
pub struct PipelineResult {
    /// The validated netlist, if reading succeeded.
    pub netlist: Option<NetlistOutput>,
    /// The fatal error, if reading failed.
    pub error: Option<NetlistError>,
    /// All diagnostics, with the fatal error (if any) last.
    pub diagnostics: Vec<Diagnostic>,
    /// Whether any errors were emitted.
    pub has_errors: bool,
    /// Number of error-severity diagnostics.
    pub error_count: usize,
    /// Number of warning-severity diagnostics.
    pub warning_count: usize,
    /// The database holding the source text, for rendering.
    pub source_db: SourceDb,
}

impl PipelineResult {
    /// The circuit that was read. Panics if reading failed.
    pub fn circuit(&self) -> &Circuit {
        match &self.netlist {
            Some(netlist) => &netlist.circuit,
            None => panic!("netlist was rejected: {:?}", self.error),
        }
    }

    /// Renders every diagnostic as uncolored terminal text.
    pub fn render(&self) -> String {
        let renderer = TerminalRenderer::new(false);
        self.diagnostics
            .iter()
            .map(|d| renderer.render(d, &self.source_db))
            .collect()
    }

    /// Codes of all diagnostics, in emission order.
    pub fn codes(&self) -> Vec<String> {
        self.diagnostics.iter().map(|d| d.code.to_string()).collect()
    }
}

/// Creates a `WeftConfig` from TOML text.
pub fn make_config(toml_str: &str) -> WeftConfig {
    toml::from_str(toml_str).unwrap()
}

/// Reads BLIF source with the default configuration.
pub fn read_blif(source: &str) -> PipelineResult {
    read_blif_with_config(source, &WeftConfig::default())
}

/// Reads BLIF source with the netlist settings of `config`.
pub fn read_blif_with_config(source: &str, config: &WeftConfig) -> PipelineResult {
    let mut source_db = SourceDb::new();
    let file = source_db.add_source("test.blif", source.to_string());
    let options = BlifOptions {
        merge_io_vectors: config.netlist.merge_io_vectors,
        clock_name: config.netlist.clock.clone(),
    };

    let sink = DiagnosticSink::new();
    let result = read_netlist(file, &source_db, &options, &sink);
    let mut diagnostics = sink.take_all();
    let (netlist, error) = match result {
        Ok(netlist) => (Some(netlist), None),
        Err(e) => {
            diagnostics.push(e.to_diagnostic());
            (None, Some(e))
        }
    };

    let error_count = count(&diagnostics, Severity::Error);
    let warning_count = count(&diagnostics, Severity::Warning);
    PipelineResult {
        netlist,
        error,
        diagnostics,
        has_errors: error_count > 0,
        error_count,
        warning_count,
        source_db,
    }
}

/// Emits the circuit of a successful read with the backend settings of
/// `config`.
pub fn emit(
    result: &PipelineResult,
    config: &WeftConfig,
    backend: Backend,
) -> Result<String, EmitError> {
    let circuit = result.circuit();
    let mut out = Vec::new();
    match backend {
        Backend::Verilog => {
            let options = VerilogOptions {
                module_name: config.verilog.module_name.clone(),
                clock_port: config.verilog.clock_port.clone(),
            };
            emit_verilog(circuit, &options, &mut out)?;
        }
        Backend::Tgf => {
            let options = GraphOptions {
                placeholder: config.graph.placeholder.clone(),
            };
            emit_tgf(circuit, &options, &mut out)?;
        }
    }
    Ok(String::from_utf8(out).unwrap())
}

/// Translates BLIF source with `config`, panicking on any failure.
pub fn translate_with_config(source: &str, config: &WeftConfig, backend: Backend) -> String {
    let result = read_blif_with_config(source, config);
    if result.has_errors {
        panic!("netlist was rejected:\n{}", result.render());
    }
    emit(&result, config, backend).unwrap()
}

/// Translates BLIF source to Verilog with the default configuration.
pub fn to_verilog(source: &str) -> String {
    translate_with_config(source, &WeftConfig::default(), Backend::Verilog)
}

/// Translates BLIF source to TGF with the default configuration.
pub fn to_tgf(source: &str) -> String {
    translate_with_config(source, &WeftConfig::default(), Backend::Tgf)
}

fn count(diagnostics: &[Diagnostic], severity: Severity) -> usize {
    diagnostics.iter().filter(|d| d.severity == severity).count()
}
