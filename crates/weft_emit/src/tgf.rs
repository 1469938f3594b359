//! Trivial Graph Format backend.
//!
//! Every operation node and every input, output and constant wire becomes a
//! graph vertex. Internal wires are not vertices: an edge into or out of one
//! is redirected to the node that drives or reads it. The output is a list of
//! `<id> <label>` lines, a `#` line, then `<from> <to> <label>` edge lines,
//! where the label is empty for edges that carry no wire name.

use crate::error::EmitError;
use std::collections::{BTreeMap, HashMap};
use std::io::Write;
use weft_ir::{Circuit, ConnectivityIndex, NodeId, WireId, WireKind};

/// Settings for [`emit_tgf`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GraphOptions {
    /// Label of vertices created for wires with no producer or consumer.
    pub placeholder: String,
}

impl Default for GraphOptions {
    fn default() -> Self {
        Self {
            placeholder: "???".to_string(),
        }
    }
}

/// Writes `circuit` as a TGF graph.
pub fn emit_tgf(
    circuit: &Circuit,
    options: &GraphOptions,
    out: &mut impl Write,
) -> Result<(), EmitError> {
    let graph = GraphBuilder::new(circuit, options).build();
    let mut buf = Vec::new();
    for (id, label) in &graph.vertices {
        writeln!(buf, "{id} {label}")?;
    }
    writeln!(buf, "#")?;
    for ((from, to), label) in &graph.edges {
        writeln!(buf, "{from} {to} {}", label.as_deref().unwrap_or(""))?;
    }
    out.write_all(&buf)?;
    out.flush()?;
    Ok(())
}

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
enum Endpoint {
    Node(NodeId),
    Wire(WireId),
}

#[derive(Default)]
struct Graph {
    /// Vertex id to label.
    vertices: BTreeMap<u32, String>,
    /// Edge to its label, if any.
    edges: BTreeMap<(u32, u32), Option<String>>,
}

struct GraphBuilder<'a> {
    circuit: &'a Circuit,
    options: &'a GraphOptions,
    index: ConnectivityIndex,
    ids: HashMap<Endpoint, u32>,
    graph: Graph,
}

impl<'a> GraphBuilder<'a> {
    fn new(circuit: &'a Circuit, options: &'a GraphOptions) -> Self {
        Self {
            circuit,
            options,
            index: ConnectivityIndex::build(circuit),
            ids: HashMap::new(),
            graph: Graph::default(),
        }
    }

    fn add_vertex(&mut self, endpoint: Endpoint, label: String) -> u32 {
        let id = self.ids.len() as u32 + 1;
        self.ids.insert(endpoint, id);
        self.graph.vertices.insert(id, label);
        id
    }

    fn build(mut self) -> Graph {
        let circuit = self.circuit;
        for node in circuit.all_nodes() {
            self.add_vertex(Endpoint::Node(node.id), node.op.to_string());
        }
        for id in circuit.wires_of_kind(WireKind::Input) {
            let label = circuit.wire_name(id).unwrap_or("in").to_string();
            self.add_vertex(Endpoint::Wire(id), label);
        }
        for id in circuit.wires_of_kind(WireKind::Output) {
            let label = circuit.wire_name(id).unwrap_or("out").to_string();
            self.add_vertex(Endpoint::Wire(id), label);
        }
        for wire in circuit.wires() {
            if let WireKind::Const(value) = wire.kind {
                self.add_vertex(Endpoint::Wire(wire.id), value.to_string());
            }
        }

        for node in circuit.all_nodes() {
            for &arg in &node.args {
                self.add_edge(Endpoint::Wire(arg), Endpoint::Node(node.id));
            }
            for &dest in &node.dests {
                self.add_edge(Endpoint::Node(node.id), Endpoint::Wire(dest));
            }
        }
        self.graph
    }

    fn add_edge(&mut self, from: Endpoint, to: Endpoint) {
        let label = match from {
            Endpoint::Wire(id) => self.circuit.wire_name(id).map(str::to_string),
            Endpoint::Node(_) => None,
        };
        let from = self.resolve(from, |index, wire| index.producer(wire));
        let to = self.resolve(to, |index, wire| index.first_consumer(wire));
        let entry = self.graph.edges.entry((from, to)).or_insert(None);
        if label.is_some() {
            *entry = label;
        }
    }

    /// The vertex id for an endpoint. A wire without a vertex of its own
    /// stands for the node found by `via`, or for a placeholder vertex.
    fn resolve(
        &mut self,
        endpoint: Endpoint,
        via: impl Fn(&ConnectivityIndex, WireId) -> Option<NodeId>,
    ) -> u32 {
        if let Some(&id) = self.ids.get(&endpoint) {
            return id;
        }
        let Endpoint::Wire(wire) = endpoint else {
            return self.add_vertex(endpoint, self.options.placeholder.clone());
        };
        let found = via(&self.index, wire)
            .and_then(|node| self.ids.get(&Endpoint::Node(node)).copied());
        match found {
            Some(id) => id,
            None => self.add_vertex(endpoint, self.options.placeholder.clone()),
        }
    }
}
