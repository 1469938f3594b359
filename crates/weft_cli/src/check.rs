//! The `weft check` command.

use std::error::Error;

use weft_blif::NetlistOutput;
use weft_ir::WireKind;

use crate::pipeline::{blif_options, load_settings, read_input};
use crate::{CheckArgs, GlobalArgs};

/// Reads and validates the input netlist, then prints a summary of the
/// resulting circuit to stdout.
pub fn run(args: &CheckArgs, global: &GlobalArgs) -> Result<i32, Box<dyn Error>> {
    let config = load_settings(global)?;
    let options = blif_options(&config, args.no_merge_vectors);

    let Some((_, netlist)) = read_input(&args.input, &options, global)? else {
        return Ok(1);
    };

    if !global.quiet {
        print!("{}", summary(&netlist, global.verbose));
    }
    Ok(0)
}

/// Formats a short description of the circuit.
fn summary(netlist: &NetlistOutput, verbose: bool) -> String {
    let circuit = &netlist.circuit;
    let count = |kind| circuit.wires_of_kind(kind).len();

    let mut out = format!(
        "model {}: {} input(s), {} output(s), {} register(s), {} node(s)\n",
        circuit.name().unwrap_or("toplevel"),
        count(WireKind::Input),
        count(WireKind::Output),
        count(WireKind::Register),
        circuit.node_count()
    );

    if verbose {
        for (label, kind) in [("inputs", WireKind::Input), ("outputs", WireKind::Output)] {
            let ports: Vec<String> = circuit
                .wires_of_kind(kind)
                .into_iter()
                .map(|id| format!("{}[{}]", circuit.display_name(id), circuit.wire(id).width))
                .collect();
            out.push_str(&format!("  {label}: {}\n", ports.join(" ")));
        }
        let clocks: Vec<&str> = netlist.clocks.iter().map(String::as_str).collect();
        out.push_str(&format!("  clocks: {}\n", clocks.join(" ")));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::tests::quiet_global;
    use std::fs;
    use weft_blif::{read_netlist, BlifOptions};
    use weft_diagnostics::DiagnosticSink;
    use weft_source::SourceDb;

    const COUNTER: &str = "\
.model counter
.inputs clk en
.outputs q[0] q[1]
.names q[0] en d[0]
10 1
01 1
.names q[0] en c
11 1
.names q[1] c d[1]
10 1
01 1
.subckt $_DFF_P_ C=clk D=d[0] Q=q[0]
.subckt $_DFF_P_ C=clk D=d[1] Q=q[1]
.end
";

    fn netlist(src: &str) -> NetlistOutput {
        let mut db = SourceDb::new();
        let file = db.add_source("t.blif", src.to_string());
        read_netlist(file, &db, &BlifOptions::default(), &DiagnosticSink::new()).unwrap()
    }

    #[test]
    fn summary_counts_wire_kinds() {
        let text = summary(&netlist(COUNTER), false);
        assert!(text.starts_with("model counter: 1 input(s), 1 output(s), 2 register(s), "));
    }

    #[test]
    fn verbose_summary_lists_ports() {
        let text = summary(&netlist(COUNTER), true);
        assert!(text.contains("  inputs: en[1]\n"));
        assert!(text.contains("  outputs: q[2]\n"));
        assert!(text.contains("  clocks: clk\n"));
    }

    #[test]
    fn run_reports_success_and_failure() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("counter.blif");
        let bad = dir.path().join("bad.blif");
        fs::write(&good, COUNTER).unwrap();
        fs::write(&bad, ".model a\n.end\n.model b\n.end\n").unwrap();

        let global = quiet_global(None);
        let check = |input: &std::path::Path| CheckArgs {
            input: input.to_path_buf(),
            no_merge_vectors: false,
        };
        assert_eq!(run(&check(&good), &global).unwrap(), 0);
        assert_eq!(run(&check(&bad), &global).unwrap(), 1);
    }
}
