//! Lowering of a parsed [`BlifModel`] into a [`Circuit`].

use crate::ast::{BlifModel, Command, NamesDef, Net, SubcktDef};
use crate::cover::{decode_cover, Gate};
use crate::error::{NetlistError, RESET_IGNORED, VECTOR_NOT_MERGED};
use std::collections::BTreeSet;
use weft_diagnostics::{Diagnostic, DiagnosticSink};
use weft_ir::{Circuit, IrError, Op, WireId, WireKind};
use weft_source::Span;

/// Options controlling how a netlist is lowered.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlifOptions {
    /// Reassemble `name[i]` port bits into multi-bit ports.
    pub merge_io_vectors: bool,
    /// Input name treated as the global clock.
    pub clock_name: String,
}

impl Default for BlifOptions {
    fn default() -> Self {
        Self {
            merge_io_vectors: true,
            clock_name: "clk".to_string(),
        }
    }
}

/// The result of reading a netlist.
#[derive(Debug)]
pub struct NetlistOutput {
    /// The validated circuit.
    pub circuit: Circuit,
    /// The clock input plus every net that merely buffers a clock.
    pub clocks: BTreeSet<String>,
    /// Nets used as flip-flop clocks.
    pub ff_clocks: BTreeSet<String>,
}

/// Builds and validates a circuit from a parsed model.
pub fn lower(
    model: &BlifModel,
    options: &BlifOptions,
    sink: &DiagnosticSink,
) -> Result<NetlistOutput, NetlistError> {
    let mut cx = LowerContext {
        circuit: Circuit::new(Some(&model.name.name)),
        options,
        sink,
        clocks: BTreeSet::new(),
        ff_clocks: BTreeSet::new(),
        seen_resets: BTreeSet::new(),
    };

    for group in group_ports(&model.inputs)? {
        cx.lower_input(&group)?;
    }
    for group in group_ports(&model.outputs)? {
        cx.lower_output(&group)?;
    }
    for command in &model.commands {
        match command {
            Command::Names(def) => cx.lower_names(def)?,
            Command::Subckt(def) => cx.lower_subckt(def)?,
            Command::Latch(def) => {
                cx.lower_flop(&def.d, &def.q, &def.clock)?;
            }
        }
    }

    cx.circuit.validate().map_err(|source| NetlistError::Ir {
        source,
        span: model.span,
    })?;

    Ok(NetlistOutput {
        circuit: cx.circuit,
        clocks: cx.clocks,
        ff_clocks: cx.ff_clocks,
    })
}

/// Port names sharing a base name once a trailing `[<digits>]` is removed.
struct PortGroup<'m> {
    base: &'m str,
    /// Members with their bit index, in declaration order. `None` for a bare name.
    members: Vec<(Option<u32>, &'m Net)>,
}

impl<'m> PortGroup<'m> {
    /// Members sorted by index if the indices are exactly `0..len`.
    fn dense_bits(&self) -> Option<Vec<&'m Net>> {
        let mut bits: Vec<(u32, &'m Net)> = self
            .members
            .iter()
            .map(|&(index, net)| index.map(|i| (i, net)))
            .collect::<Option<_>>()?;
        bits.sort_by_key(|&(i, _)| i);
        let dense = bits
            .iter()
            .enumerate()
            .all(|(pos, &(i, _))| i as usize == pos);
        dense.then(|| bits.into_iter().map(|(_, net)| net).collect())
    }
}

/// Splits `name[12]` into `("name", Some(12))`; other names are returned whole.
fn split_index(name: &str) -> (&str, Option<u32>) {
    let Some(inner) = name.strip_suffix(']') else {
        return (name, None);
    };
    let Some(open) = inner.rfind('[') else {
        return (name, None);
    };
    let digits = &inner[open + 1..];
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return (name, None);
    }
    match digits.parse() {
        Ok(index) => (&name[..open], Some(index)),
        Err(_) => (name, None),
    }
}

fn group_ports(nets: &[Net]) -> Result<Vec<PortGroup<'_>>, NetlistError> {
    let mut groups: Vec<PortGroup<'_>> = Vec::new();
    for net in nets {
        let (base, index) = split_index(&net.name);
        match groups.iter_mut().find(|g| g.base == base) {
            Some(group) => group.members.push((index, net)),
            None => groups.push(PortGroup {
                base,
                members: vec![(index, net)],
            }),
        }
    }
    for group in &groups {
        let bare = group.members.iter().filter(|(i, _)| i.is_none()).count();
        if bare > 0 && group.members.len() > 1 {
            let (_, net) = group.members[1];
            return Err(NetlistError::Ir {
                source: IrError::DuplicateName {
                    name: group.base.to_string(),
                },
                span: net.span,
            });
        }
    }
    Ok(groups)
}

/// Parse-time state threaded through lowering.
struct LowerContext<'a> {
    circuit: Circuit,
    options: &'a BlifOptions,
    sink: &'a DiagnosticSink,
    clocks: BTreeSet<String>,
    ff_clocks: BTreeSet<String>,
    seen_resets: BTreeSet<String>,
}

impl LowerContext<'_> {
    fn declare(&mut self, name: &str, width: u32, kind: WireKind, span: Span) -> Result<WireId, NetlistError> {
        self.circuit
            .declare_wire(Some(name), width, kind)
            .map_err(|source| NetlistError::Ir { source, span })
    }

    fn connect(&mut self, op: Op, args: Vec<WireId>, dest: WireId, span: Span) -> Result<(), NetlistError> {
        self.circuit
            .add_node(op, args, vec![dest])
            .map(|_| ())
            .map_err(|source| NetlistError::Ir { source, span })
    }

    /// The wire for a referenced net, created on first use.
    fn net(&mut self, net: &Net) -> WireId {
        self.circuit.declare_implicit(&net.name)
    }

    /// Bits of a group to merge into one vector, or `None` to keep them apart.
    fn vector_bits<'m>(&self, group: &PortGroup<'m>) -> Option<Vec<&'m Net>> {
        if !self.options.merge_io_vectors || group.members.len() < 2 {
            return None;
        }
        let bits = group.dense_bits();
        if bits.is_none() {
            self.sink.emit(
                Diagnostic::warning(
                    VECTOR_NOT_MERGED,
                    format!(
                        "bits of port `{}` do not form a contiguous range from 0",
                        group.base
                    ),
                    group.members[0].1.span,
                )
                .with_note("each bit is kept as a separate 1-bit port"),
            );
        }
        bits
    }

    fn lower_input(&mut self, group: &PortGroup<'_>) -> Result<(), NetlistError> {
        if let [(None, net)] = group.members.as_slice() {
            if net.name == self.options.clock_name {
                self.clocks.insert(net.name.clone());
                return Ok(());
            }
        }
        let Some(bits) = self.vector_bits(group) else {
            for (_, net) in &group.members {
                self.declare(&net.name, 1, WireKind::Input, net.span)?;
            }
            return Ok(());
        };

        let span = bits[0].span;
        let vector = self.declare(group.base, bits.len() as u32, WireKind::Input, span)?;
        for (i, net) in bits.iter().enumerate() {
            let bit = self.declare(&net.name, 1, WireKind::Internal, net.span)?;
            self.connect(Op::Select(vec![i as u32]), vec![vector], bit, net.span)?;
        }
        Ok(())
    }

    fn lower_output(&mut self, group: &PortGroup<'_>) -> Result<(), NetlistError> {
        let Some(bits) = self.vector_bits(group) else {
            for (_, net) in &group.members {
                self.declare(&net.name, 1, WireKind::Output, net.span)?;
            }
            return Ok(());
        };

        let span = bits[0].span;
        let vector = self.declare(group.base, bits.len() as u32, WireKind::Output, span)?;
        let mut parts = Vec::with_capacity(bits.len());
        for net in &bits {
            parts.push(self.declare(&net.name, 1, WireKind::Internal, net.span)?);
        }
        // Bits are concatenated in index order, `y[0]` first.
        self.connect(Op::Concat, parts, vector, span)
    }

    fn lower_names(&mut self, def: &NamesDef) -> Result<(), NetlistError> {
        let operands = def.inputs();
        let Some(gate) = decode_cover(operands.len(), &def.rows) else {
            let signals: Vec<&str> = def.signals.iter().map(|n| n.name.as_str()).collect();
            let rows: Vec<String> = def.rows.iter().map(ToString::to_string).collect();
            return Err(NetlistError::UnsupportedCoverPattern {
                signals: signals.join(" "),
                rows: rows.join(", "),
                span: def.span,
            });
        };

        if gate == Gate::Buf && self.clocks.contains(&operands[0].name) {
            self.clocks.insert(def.output().name.clone());
            return Ok(());
        }

        let op = match gate {
            Gate::Const(value) => {
                let constant = self
                    .circuit
                    .declare_wire(None, 1, WireKind::Const(u64::from(value)))
                    .map_err(|source| NetlistError::Ir {
                        source,
                        span: def.span,
                    })?;
                let dest = self.net(def.output());
                return self.connect(Op::Buf, vec![constant], dest, def.span);
            }
            Gate::Buf => Op::Buf,
            Gate::Not => Op::Not,
            Gate::And => Op::And,
            Gate::Or => Op::Or,
            Gate::Xor => Op::Xor,
            Gate::Mux => Op::Mux,
        };
        let args: Vec<WireId> = operands.iter().map(|n| self.net(n)).collect();
        let dest = self.net(def.output());
        self.connect(op, args, dest, def.span)
    }

    fn lower_subckt(&mut self, def: &SubcktDef) -> Result<(), NetlistError> {
        if let Some(reset) = &def.reset {
            if self.seen_resets.insert(reset.name.clone()) {
                self.sink.emit(
                    Diagnostic::warning(
                        RESET_IGNORED,
                        format!("reset net `{}` of `{}` is ignored", reset.name, def.cell.name()),
                        reset.span,
                    )
                    .with_note("asynchronous reset behavior is not modeled"),
                );
            }
        }
        self.lower_flop(&def.d, &def.q, &def.clock)
    }

    /// `<q>_reg` holds the state; `d` feeds it and `q` reads it.
    fn lower_flop(&mut self, d: &Net, q: &Net, clock: &Net) -> Result<(), NetlistError> {
        self.ff_clocks.insert(clock.name.clone());
        let reg = self.declare(&format!("{}_reg", q.name), 1, WireKind::Register, q.span)?;
        let d_wire = self.net(d);
        let q_wire = self.net(q);
        self.connect(Op::Register, vec![d_wire], reg, d.span)?;
        self.connect(Op::Buf, vec![reg], q_wire, q.span)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::lex;
    use crate::parser::Parser;
    use weft_diagnostics::Severity;
    use weft_ir::Node;
    use weft_source::FileId;

    fn lower_with(
        source: &str,
        options: &BlifOptions,
        sink: &DiagnosticSink,
    ) -> Result<NetlistOutput, NetlistError> {
        let tokens = lex(source, FileId::from_raw(0));
        let model = Parser::new(tokens, source, sink).parse_model()?;
        lower(&model, options, sink)
    }

    fn lower_str(source: &str) -> Result<NetlistOutput, NetlistError> {
        lower_with(source, &BlifOptions::default(), &DiagnosticSink::new())
    }

    fn nodes(circuit: &Circuit) -> Vec<&Node> {
        circuit.all_nodes().collect()
    }

    fn id(circuit: &Circuit, name: &str) -> WireId {
        circuit
            .lookup(name)
            .unwrap_or_else(|| panic!("no wire `{name}`"))
    }

    #[test]
    fn split_index_variants() {
        assert_eq!(split_index("y[3]"), ("y", Some(3)));
        assert_eq!(split_index("a[1][2]"), ("a[1]", Some(2)));
        assert_eq!(split_index("y"), ("y", None));
        assert_eq!(split_index("y[]"), ("y[]", None));
        assert_eq!(split_index("y[x]"), ("y[x]", None));
        assert_eq!(split_index("y]"), ("y]", None));
    }

    #[test]
    fn mux_cover_argument_order() {
        let out = lower_str(
            ".model m\n.inputs s0 s1 sel\n.outputs out\n.names s0 s1 sel out\n1-0 1\n-11 1\n.end\n",
        )
        .unwrap();
        let c = &out.circuit;
        let nodes = nodes(c);
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].op, Op::Mux);
        assert_eq!(nodes[0].args, vec![id(c, "s0"), id(c, "s1"), id(c, "sel")]);
        assert_eq!(nodes[0].dests, vec![id(c, "out")]);
    }

    #[test]
    fn unsupported_cover_reports_rows() {
        let err = lower_str(".model m\n.inputs a b\n.outputs y\n.names a b y\n00 1\n.end\n")
            .unwrap_err();
        match err {
            NetlistError::UnsupportedCoverPattern { signals, rows, .. } => {
                assert_eq!(signals, "a b y");
                assert_eq!(rows, "00 1");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn output_vector_merged() {
        let out = lower_str(
            ".model m\n.inputs a\n.outputs y[0] y[1] y[2]\n\
             .names a y[0]\n1 1\n.names a y[1]\n0 1\n.names a y[2]\n1 1\n.end\n",
        )
        .unwrap();
        let c = &out.circuit;
        let y = id(c, "y");
        assert_eq!(c.wire(y).width, 3);
        assert_eq!(c.wire(y).kind, WireKind::Output);
        assert_eq!(c.wires_of_kind(WireKind::Output), vec![y]);
        for i in 0..3 {
            let bit = c.wire(id(c, &format!("y[{i}]")));
            assert_eq!(bit.width, 1);
            assert_eq!(bit.kind, WireKind::Internal);
        }
        let concat = nodes(c).into_iter().find(|n| n.op == Op::Concat).unwrap();
        assert_eq!(
            concat.args,
            vec![id(c, "y[0]"), id(c, "y[1]"), id(c, "y[2]")]
        );
        assert_eq!(concat.dests, vec![y]);
    }

    #[test]
    fn output_vector_unmerged() {
        let options = BlifOptions {
            merge_io_vectors: false,
            ..BlifOptions::default()
        };
        let out = lower_with(
            ".model m\n.inputs a\n.outputs y[0] y[1] y[2]\n\
             .names a y[0]\n1 1\n.names a y[1]\n0 1\n.names a y[2]\n1 1\n.end\n",
            &options,
            &DiagnosticSink::new(),
        )
        .unwrap();
        let c = &out.circuit;
        assert_eq!(c.wires_of_kind(WireKind::Output).len(), 3);
        assert!(c.lookup("y").is_none());
        assert!(nodes(c).iter().all(|n| n.op != Op::Concat));
    }

    #[test]
    fn input_vector_split_by_select() {
        let out = lower_str(
            ".model m\n.inputs d[1] d[0]\n.outputs y\n.names d[0] d[1] y\n11 1\n.end\n",
        )
        .unwrap();
        let c = &out.circuit;
        let d = id(c, "d");
        assert_eq!(c.wire(d).width, 2);
        assert_eq!(c.wire(d).kind, WireKind::Input);
        let selects: Vec<_> = nodes(c)
            .into_iter()
            .filter(|n| matches!(n.op, Op::Select(_)))
            .collect();
        assert_eq!(selects.len(), 2);
        assert_eq!(selects[0].op, Op::Select(vec![0]));
        assert_eq!(selects[0].dests, vec![id(c, "d[0]")]);
        assert_eq!(selects[1].op, Op::Select(vec![1]));
        assert!(c.validate().is_ok());
    }

    #[test]
    fn sparse_vector_left_unmerged_with_warning() {
        let sink = DiagnosticSink::new();
        let out = lower_with(
            ".model m\n.inputs a\n.outputs y[0] y[2]\n.names a y[0]\n1 1\n.names a y[2]\n1 1\n.end\n",
            &BlifOptions::default(),
            &sink,
        )
        .unwrap();
        assert_eq!(out.circuit.wires_of_kind(WireKind::Output).len(), 2);
        let diags = sink.take_all();
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].code, VECTOR_NOT_MERGED);
        assert_eq!(diags[0].severity, Severity::Warning);
    }

    #[test]
    fn bare_and_indexed_port_clash() {
        let err = lower_str(".model m\n.inputs a a[0]\n.outputs y\n.names a y\n1 1\n.end\n")
            .unwrap_err();
        assert!(matches!(
            err,
            NetlistError::Ir {
                source: IrError::DuplicateName { ref name },
                ..
            } if name == "a"
        ));
    }

    #[test]
    fn latch_becomes_register() {
        let out = lower_str(".model m\n.inputs d clk\n.outputs q\n.latch d q re clk\n.end\n")
            .unwrap();
        let c = &out.circuit;
        let reg = id(c, "q_reg");
        assert_eq!(c.wire(reg).kind, WireKind::Register);
        assert_ne!(reg, id(c, "q"));
        assert!(c.lookup("clk").is_none());
        assert!(out.clocks.contains("clk"));
        assert!(out.ff_clocks.contains("clk"));

        let nodes = nodes(c);
        assert_eq!(nodes[0].op, Op::Register);
        assert_eq!(nodes[0].args, vec![id(c, "d")]);
        assert_eq!(nodes[0].dests, vec![reg]);
        assert_eq!(nodes[1].op, Op::Buf);
        assert_eq!(nodes[1].args, vec![reg]);
        assert_eq!(nodes[1].dests, vec![id(c, "q")]);
    }

    #[test]
    fn reset_warned_once_per_net() {
        let sink = DiagnosticSink::new();
        let out = lower_with(
            ".model m\n.inputs a b clk rst\n.outputs x y\n\
             .subckt $_DFF_PN0_ C=clk R=rst D=a Q=x\n\
             .subckt $_DFF_PP1_ C=clk R=rst D=b Q=y\n.end\n",
            &BlifOptions::default(),
            &sink,
        )
        .unwrap();
        let resets: Vec<_> = sink
            .take_all()
            .into_iter()
            .filter(|d| d.code == RESET_IGNORED)
            .collect();
        assert_eq!(resets.len(), 1);
        assert!(resets[0].message.contains("`rst`"));
        assert_eq!(out.circuit.wires_of_kind(WireKind::Register).len(), 2);
    }

    #[test]
    fn clock_alias_is_not_a_gate() {
        let out = lower_str(
            ".model m\n.inputs d clk\n.outputs q\n.names clk gclk\n1 1\n.latch d q re gclk\n.end\n",
        )
        .unwrap();
        assert!(out.clocks.contains("gclk"));
        assert!(out.ff_clocks.contains("gclk"));
        assert!(out.circuit.lookup("gclk").is_none());
        assert_eq!(out.circuit.node_count(), 2);
    }

    #[test]
    fn configured_clock_name() {
        let options = BlifOptions {
            clock_name: "sysclk".to_string(),
            ..BlifOptions::default()
        };
        let out = lower_with(
            ".model m\n.inputs d sysclk\n.outputs q\n.latch d q re sysclk\n.end\n",
            &options,
            &DiagnosticSink::new(),
        )
        .unwrap();
        assert!(out.clocks.contains("sysclk"));
        assert!(out.circuit.lookup("sysclk").is_none());
    }

    #[test]
    fn constants_become_const_wires() {
        let out = lower_str(".model m\n.inputs a\n.outputs one zero\n.names one\n1\n.names zero\n.end\n")
            .unwrap();
        let c = &out.circuit;
        let consts = c.subset(|w| matches!(w.kind, WireKind::Const(_)));
        assert_eq!(consts.len(), 2);
        assert_eq!(c.wire(consts[0]).kind, WireKind::Const(1));
        assert_eq!(c.wire(consts[1]).kind, WireKind::Const(0));
        assert!(c.wire_name(consts[0]).is_none());
        let nodes = nodes(c);
        assert_eq!(nodes[0].args, vec![consts[0]]);
        assert_eq!(nodes[0].dests, vec![id(c, "one")]);
    }

    #[test]
    fn forward_references_are_resolved() {
        let out = lower_str(
            ".model m\n.inputs a b\n.outputs y\n.names n1 y\n0 1\n.names a b n1\n11 1\n.end\n",
        )
        .unwrap();
        let c = &out.circuit;
        assert!(c.wire(id(c, "n1")).implicit);
        assert_eq!(c.node_count(), 2);
    }

    #[test]
    fn undriven_net_fails_validation() {
        let err = lower_str(".model m\n.inputs a\n.outputs y\n.names a ghost y\n11 1\n.end\n")
            .unwrap_err();
        assert!(matches!(
            err,
            NetlistError::Ir {
                source: IrError::DanglingReference { ref wire },
                ..
            } if wire == "ghost"
        ));
    }

    #[test]
    fn second_driver_fails_validation() {
        let err = lower_str(
            ".model m\n.inputs a b\n.outputs y\n.names a y\n1 1\n.names b y\n1 1\n.end\n",
        )
        .unwrap_err();
        assert!(matches!(
            err,
            NetlistError::Ir {
                source: IrError::MultipleDrivers { .. },
                ..
            }
        ));
    }

    #[test]
    fn combinational_loop_fails_validation() {
        let err = lower_str(
            ".model m\n.inputs a\n.outputs y\n.names a n2 n1\n11 1\n.names n1 n2\n0 1\n.names n2 y\n1 1\n.end\n",
        )
        .unwrap_err();
        assert!(matches!(
            err,
            NetlistError::Ir {
                source: IrError::CombinationalCycle { .. },
                ..
            }
        ));
    }

    #[test]
    fn driving_an_input_is_rejected() {
        let err = lower_str(".model m\n.inputs a b\n.outputs y\n.names b a\n1 1\n.names a y\n1 1\n.end\n")
            .unwrap_err();
        assert!(matches!(
            err,
            NetlistError::Ir {
                source: IrError::IllegalDriver { .. },
                ..
            }
        ));
    }
}
