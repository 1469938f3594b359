//! Output names for wires, including generated names for anonymous ones.

use std::collections::HashSet;
use weft_ir::{Circuit, WireId};

/// Verilog-2005 reserved words that can not be used as plain identifiers.
const KEYWORDS: &[&str] = &[
    "always", "and", "assign", "automatic", "begin", "buf", "bufif0", "bufif1", "case", "casex",
    "casez", "cell", "cmos", "config", "deassign", "default", "defparam", "design", "disable",
    "edge", "else", "end", "endcase", "endconfig", "endfunction", "endgenerate", "endmodule",
    "endprimitive", "endspecify", "endtable", "endtask", "event", "for", "force", "forever",
    "fork", "function", "generate", "genvar", "highz0", "highz1", "if", "ifnone", "incdir",
    "include", "initial", "inout", "input", "instance", "integer", "join", "large", "liblist",
    "library", "localparam", "macromodule", "medium", "module", "nand", "negedge", "nmos", "nor",
    "noshowcancelled", "not", "notif0", "notif1", "or", "output", "parameter", "pmos", "posedge",
    "primitive", "pull0", "pull1", "pulldown", "pullup", "pulsestyle_ondetect",
    "pulsestyle_onevent", "rcmos", "real", "realtime", "reg", "release", "repeat", "rnmos",
    "rpmos", "rtran", "rtranif0", "rtranif1", "scalared", "showcancelled", "signed", "small",
    "specify", "specparam", "strong0", "strong1", "supply0", "supply1", "table", "task", "time",
    "tran", "tranif0", "tranif1", "tri", "tri0", "tri1", "triand", "trior", "trireg", "unsigned",
    "use", "uwire", "vectored", "wait", "wand", "weak0", "weak1", "while", "wire", "wor", "xnor",
    "xor",
];

/// A name for every wire, indexed by raw [`WireId`].
pub(crate) struct NameTable {
    names: Vec<String>,
}

impl NameTable {
    /// User names are kept; anonymous wires get `tmp<N>`, skipping numbers
    /// whose name is already taken.
    pub(crate) fn build(circuit: &Circuit) -> Self {
        let taken: HashSet<&str> = circuit
            .wires()
            .filter_map(|w| circuit.wire_name(w.id))
            .collect();
        let mut counter = 0u32;
        let names = circuit
            .wires()
            .map(|w| match circuit.wire_name(w.id) {
                Some(name) => name.to_string(),
                None => loop {
                    let candidate = format!("tmp{counter}");
                    counter += 1;
                    if !taken.contains(candidate.as_str()) {
                        break candidate;
                    }
                },
            })
            .collect();
        Self { names }
    }

    pub(crate) fn get(&self, id: WireId) -> &str {
        &self.names[id.as_raw() as usize]
    }
}

/// Whether `name` may appear unescaped in Verilog source.
pub(crate) fn is_simple_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let starts_well = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_');
    starts_well
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
        && !KEYWORDS.contains(&name)
}

/// Writes `name` as a Verilog identifier, escaping it (`\name `) when needed.
pub(crate) fn verilog_identifier(name: &str) -> String {
    if is_simple_identifier(name) {
        name.to_string()
    } else {
        format!("\\{name} ")
    }
}
