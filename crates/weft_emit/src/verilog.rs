//! Structural Verilog backend.
//!
//! The generated module has one port per circuit input and output plus a
//! clock port, continuous assignments for all combinational nodes, and a
//! single `always @( posedge <clock> )` block updating every register.

use crate::error::EmitError;
use crate::names::{verilog_identifier, NameTable};
use std::io::Write;
use weft_common::InternalError;
use weft_ir::{Circuit, Node, Op, WireId, WireKind};

/// Settings for [`emit_verilog`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerilogOptions {
    /// Module name; defaults to the circuit name, then `toplevel`.
    pub module_name: Option<String>,
    /// Name of the clock port.
    pub clock_port: String,
}

impl Default for VerilogOptions {
    fn default() -> Self {
        Self {
            module_name: None,
            clock_port: "clk".to_string(),
        }
    }
}

/// Writes `circuit` as a Verilog module.
///
/// The circuit is expected to have passed [`Circuit::validate`]. Fails with
/// [`EmitError::UnsupportedOperation`] on memories; in that case nothing is
/// written to `out`.
pub fn emit_verilog(
    circuit: &Circuit,
    options: &VerilogOptions,
    out: &mut impl Write,
) -> Result<(), EmitError> {
    let mut buf = Vec::new();
    VerilogWriter::new(circuit, options)?.write(&mut buf)?;
    out.write_all(&buf)?;
    out.flush()?;
    Ok(())
}

struct VerilogWriter<'a> {
    circuit: &'a Circuit,
    options: &'a VerilogOptions,
    names: Vec<String>,
}

impl<'a> VerilogWriter<'a> {
    fn new(circuit: &'a Circuit, options: &'a VerilogOptions) -> Result<Self, EmitError> {
        if circuit.lookup(&options.clock_port).is_some() {
            return Err(EmitError::PortNameClash {
                name: options.clock_port.clone(),
            });
        }
        let table = NameTable::build(circuit);
        let names = circuit
            .wires()
            .map(|w| verilog_identifier(table.get(w.id)))
            .collect();
        Ok(Self {
            circuit,
            options,
            names,
        })
    }

    fn name(&self, id: WireId) -> &str {
        &self.names[id.as_raw() as usize]
    }

    fn write(&self, w: &mut impl Write) -> Result<(), EmitError> {
        self.write_header(w)?;
        self.write_combinational(w)?;
        self.write_sequential(w)?;
        writeln!(w, "endmodule")?;
        Ok(())
    }

    fn write_header(&self, w: &mut impl Write) -> Result<(), EmitError> {
        let module = self
            .options
            .module_name
            .as_deref()
            .or(self.circuit.name())
            .unwrap_or("toplevel");
        let inputs = self.circuit.wires_of_kind(WireKind::Input);
        let outputs = self.circuit.wires_of_kind(WireKind::Output);
        let clock = verilog_identifier(&self.options.clock_port);

        let mut ports: Vec<&str> = inputs
            .iter()
            .chain(&outputs)
            .map(|&id| self.name(id))
            .collect();
        ports.push(&clock);
        writeln!(w, "module {}({});", verilog_identifier(module), ports.join(", "))?;

        for &id in &inputs {
            self.declare(w, "input", id)?;
        }
        writeln!(w, "    input {clock};")?;
        for &id in &outputs {
            self.declare(w, "output", id)?;
        }
        writeln!(w)?;

        for id in self.circuit.wires_of_kind(WireKind::Register) {
            self.declare(w, "reg", id)?;
        }
        let others = self.circuit.subset(|wire| {
            !matches!(
                wire.kind,
                WireKind::Input | WireKind::Output | WireKind::Register
            )
        });
        for id in others {
            self.declare(w, "wire", id)?;
        }
        writeln!(w)?;
        Ok(())
    }

    fn declare(&self, w: &mut impl Write, keyword: &str, id: WireId) -> Result<(), EmitError> {
        let width = self.circuit.wire(id).width;
        if width == 1 {
            writeln!(w, "    {keyword} {};", self.name(id))?;
        } else {
            writeln!(w, "    {keyword} [{}:0] {};", width - 1, self.name(id))?;
        }
        Ok(())
    }

    fn write_combinational(&self, w: &mut impl Write) -> Result<(), EmitError> {
        for wire in self.circuit.wires() {
            if let WireKind::Const(value) = wire.kind {
                writeln!(
                    w,
                    "    assign {} = {}'d{value};",
                    self.name(wire.id),
                    wire.width
                )?;
            }
        }
        for node in self.circuit.all_nodes() {
            if let Some(expr) = self.expression(node)? {
                writeln!(w, "    assign {} = {expr};", self.name(dest(node)?))?;
            }
        }
        writeln!(w)?;
        Ok(())
    }

    /// The right-hand side for a combinational node; `None` for registers.
    fn expression(&self, node: &Node) -> Result<Option<String>, EmitError> {
        let arg = |i: usize| -> Result<&str, EmitError> {
            node.args.get(i).map(|&id| self.name(id)).ok_or_else(|| {
                InternalError::new(format!(
                    "`{}` node {} is missing operand {i}",
                    node.op,
                    node.id.as_raw()
                ))
                .into()
            })
        };
        let expr = match &node.op {
            Op::Buf => arg(0)?.to_string(),
            Op::Not => format!("~{}", arg(0)?),
            Op::And | Op::Or | Op::Xor | Op::Add | Op::Sub | Op::Mul | Op::Lt | Op::Gt => {
                format!("{} {} {}", arg(0)?, binary_operator(&node.op)?, arg(1)?)
            }
            Op::Eq => format!("({} == {})", arg(0)?, arg(1)?),
            Op::Mux => format!("{} ? {} : {}", arg(2)?, arg(1)?, arg(0)?),
            Op::Concat => {
                let parts: Vec<&str> = node.args.iter().map(|&id| self.name(id)).collect();
                format!("{{{}}}", parts.join(", "))
            }
            Op::Select(indices) => {
                let source = arg(0)?;
                let parts: Vec<String> = indices.iter().map(|i| format!("{source}[{i}]")).collect();
                format!("{{{}}}", parts.join(", "))
            }
            Op::Register => return Ok(None),
            Op::Memory { .. } => {
                return Err(EmitError::UnsupportedOperation {
                    op: node.op.to_string(),
                    backend: "Verilog",
                })
            }
        };
        Ok(Some(expr))
    }

    fn write_sequential(&self, w: &mut impl Write) -> Result<(), EmitError> {
        writeln!(
            w,
            "    always @( posedge {} )",
            verilog_identifier(&self.options.clock_port)
        )?;
        writeln!(w, "    begin")?;
        for node in self.circuit.all_nodes().filter(|n| n.op == Op::Register) {
            let next = node.args.first().copied().ok_or_else(|| {
                InternalError::new(format!("register node {} has no input", node.id.as_raw()))
            })?;
            writeln!(w, "        {} <= {};", self.name(dest(node)?), self.name(next))?;
        }
        writeln!(w, "    end")?;
        Ok(())
    }
}

fn dest(node: &Node) -> Result<WireId, InternalError> {
    node.dest().ok_or_else(|| {
        InternalError::new(format!(
            "`{}` node {} has no destination",
            node.op,
            node.id.as_raw()
        ))
    })
}

/// The infix operator for a two-operand node.
fn binary_operator(op: &Op) -> Result<&'static str, InternalError> {
    let symbol = match op {
        Op::And => "&",
        Op::Or => "|",
        Op::Xor => "^",
        Op::Add => "+",
        Op::Sub => "-",
        Op::Mul => "*",
        Op::Lt => "<",
        Op::Gt => ">",
        Op::Buf
        | Op::Not
        | Op::Eq
        | Op::Mux
        | Op::Concat
        | Op::Select(_)
        | Op::Register
        | Op::Memory { .. } => {
            return Err(InternalError::new(format!(
                "`{op}` is not an infix operator"
            )))
        }
    };
    Ok(symbol)
}
