//! The `weft translate` command.

use std::error::Error;
use std::fs;
use std::io::{self, Write};

use weft_diagnostics::{Category, Diagnostic, DiagnosticCode};
use weft_emit::{emit_tgf, emit_verilog, GraphOptions, VerilogOptions};
use weft_source::Span;

use crate::pipeline::{blif_options, load_settings, read_input, report};
use crate::{GlobalArgs, OutputFormat, TranslateArgs};

/// Emission failed after the netlist was read successfully.
const EMIT_FAILED: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 201,
};

/// Reads the input netlist and writes it in the requested format.
///
/// The output file is only created once emission has succeeded.
pub fn run(args: &TranslateArgs, global: &GlobalArgs) -> Result<i32, Box<dyn Error>> {
    let config = load_settings(global)?;
    let options = blif_options(&config, args.no_merge_vectors);

    let Some((source_db, netlist)) = read_input(&args.input, &options, global)? else {
        return Ok(1);
    };
    let circuit = &netlist.circuit;

    if global.verbose {
        eprintln!(
            "      Parsed {} wire(s), {} node(s)",
            circuit.wire_count(),
            circuit.node_count()
        );
        if !netlist.clocks.is_empty() {
            let clocks: Vec<&str> = netlist.clocks.iter().map(String::as_str).collect();
            eprintln!("      Clocks {}", clocks.join(", "));
        }
    }

    let mut text = Vec::new();
    let emitted = match args.format {
        OutputFormat::Verilog => {
            let options = VerilogOptions {
                module_name: args
                    .module_name
                    .clone()
                    .or_else(|| config.verilog.module_name.clone()),
                clock_port: config.verilog.clock_port.clone(),
            };
            emit_verilog(circuit, &options, &mut text)
        }
        OutputFormat::Tgf => {
            let options = GraphOptions {
                placeholder: config.graph.placeholder.clone(),
            };
            emit_tgf(circuit, &options, &mut text)
        }
    };

    if let Err(e) = emitted {
        let diag = Diagnostic::error(EMIT_FAILED, e.to_string(), Span::DUMMY);
        report(&[diag], &source_db, global)?;
        return Ok(1);
    }

    match &args.output {
        Some(path) => {
            fs::write(path, &text)
                .map_err(|e| format!("cannot write `{}`: {e}", path.display()))?;
            if !global.quiet {
                eprintln!("       Wrote {}", path.display());
            }
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(&text)?;
            stdout.flush()?;
        }
    }
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::tests::quiet_global;
    use std::path::Path;

    const AND: &str = ".model top\n.inputs a b\n.outputs c\n.names a b c\n11 1\n.end\n";

    fn args(input: &Path, output: &Path, format: OutputFormat) -> TranslateArgs {
        TranslateArgs {
            input: input.to_path_buf(),
            format,
            output: Some(output.to_path_buf()),
            no_merge_vectors: false,
            module_name: None,
        }
    }

    #[test]
    fn writes_verilog_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("and.blif");
        let output = dir.path().join("and.v");
        fs::write(&input, AND).unwrap();

        let code = run(&args(&input, &output, OutputFormat::Verilog), &quiet_global(None)).unwrap();
        assert_eq!(code, 0);
        let text = fs::read_to_string(&output).unwrap();
        assert!(text.starts_with("module top(a, b, c, clk);\n"));
        assert!(text.contains("    assign c = a & b;\n"));
        assert!(text.ends_with("endmodule\n"));
    }

    #[test]
    fn writes_tgf_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("and.blif");
        let output = dir.path().join("and.tgf");
        fs::write(&input, AND).unwrap();

        let code = run(&args(&input, &output, OutputFormat::Tgf), &quiet_global(None)).unwrap();
        assert_eq!(code, 0);
        assert_eq!(
            fs::read_to_string(&output).unwrap(),
            "1 and\n2 a\n3 b\n4 c\n#\n1 4 \n2 1 a\n3 1 b\n"
        );
    }

    #[test]
    fn module_name_flag_overrides_config() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("and.blif");
        let output = dir.path().join("and.v");
        let config = dir.path().join("weft.toml");
        fs::write(&input, AND).unwrap();
        fs::write(&config, "[verilog]\nmodule_name = \"from_config\"\n").unwrap();

        let global = quiet_global(Some(&config));
        run(&args(&input, &output, OutputFormat::Verilog), &global).unwrap();
        assert!(fs::read_to_string(&output)
            .unwrap()
            .starts_with("module from_config("));

        let mut with_flag = args(&input, &output, OutputFormat::Verilog);
        with_flag.module_name = Some("from_flag".to_string());
        run(&with_flag, &global).unwrap();
        assert!(fs::read_to_string(&output)
            .unwrap()
            .starts_with("module from_flag("));
    }

    #[test]
    fn rejected_netlist_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("bad.blif");
        let output = dir.path().join("bad.v");
        fs::write(
            &input,
            ".model top\n.inputs a b\n.outputs y\n.names a b y\n00 1\n.end\n",
        )
        .unwrap();

        let code = run(&args(&input, &output, OutputFormat::Verilog), &quiet_global(None)).unwrap();
        assert_eq!(code, 1);
        assert!(!output.exists());
    }

    #[test]
    fn clock_port_clash_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("clash.blif");
        let output = dir.path().join("clash.v");
        let config = dir.path().join("weft.toml");
        fs::write(&input, AND).unwrap();
        fs::write(&config, "[verilog]\nclock_port = \"a\"\n").unwrap();

        let global = quiet_global(Some(&config));
        let code = run(&args(&input, &output, OutputFormat::Verilog), &global).unwrap();
        assert_eq!(code, 1);
        assert!(!output.exists());
    }
}
