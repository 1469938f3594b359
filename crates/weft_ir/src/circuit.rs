//! The [`Circuit`] container and its structural invariants.

use crate::arena::Arena;
use crate::error::IrError;
use crate::ids::{NodeId, WireId};
use crate::node::Node;
use crate::op::Op;
use crate::wire::{Wire, WireKind};
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;
use weft_common::{Ident, Interner};

/// A flat circuit: wires, the nodes connecting them, and a name table.
///
/// Wires and nodes are only ever appended. Construction checks each node's
/// operand shape as it is added; whole-circuit properties (single driver,
/// no undriven reads, no combinational loop) are checked by
/// [`validate`](Self::validate).
#[derive(Debug, Default)]
pub struct Circuit {
    name: Option<Ident>,
    interner: Interner,
    wires: Arena<WireId, Wire>,
    nodes: Arena<NodeId, Node>,
    symbols: HashMap<Ident, WireId>,
}

impl Circuit {
    /// Creates an empty circuit, optionally carrying the model name.
    pub fn new(name: Option<&str>) -> Self {
        let mut circuit = Self::default();
        circuit.name = name.map(|n| circuit.interner.get_or_intern(n));
        circuit
    }

    /// The model name, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.map(|id| self.interner.resolve(id))
    }

    /// Sets the model name.
    pub fn set_name(&mut self, name: &str) {
        self.name = Some(self.interner.get_or_intern(name));
    }

    /// The interner holding every wire name.
    pub fn interner(&self) -> &Interner {
        &self.interner
    }

    /// Declares a wire.
    ///
    /// Anonymous wires (`name == None`) always get a fresh id. A named
    /// declaration fails with [`IrError::DuplicateName`] if the name was
    /// already declared, but takes over an implicit wire of the same name,
    /// replacing its width and kind.
    pub fn declare_wire(
        &mut self,
        name: Option<&str>,
        width: u32,
        kind: WireKind,
    ) -> Result<WireId, IrError> {
        if width == 0 {
            return Err(IrError::WidthMismatch {
                op: "declare".to_string(),
                detail: format!("`{}` has zero width", name.unwrap_or("<anonymous>")),
            });
        }
        let Some(name) = name else {
            return Ok(self.alloc_wire(None, width, kind, false));
        };
        let ident = self.interner.get_or_intern(name);
        if let Some(&id) = self.symbols.get(&ident) {
            if !self.wires[id].implicit {
                return Err(IrError::DuplicateName {
                    name: name.to_string(),
                });
            }
            self.reconcile(id, width, kind)?;
            return Ok(id);
        }
        let id = self.alloc_wire(Some(ident), width, kind, false);
        self.symbols.insert(ident, id);
        Ok(id)
    }

    /// Returns the wire called `name`, creating a 1-bit implicit internal
    /// wire if none exists yet.
    pub fn declare_implicit(&mut self, name: &str) -> WireId {
        let ident = self.interner.get_or_intern(name);
        if let Some(&id) = self.symbols.get(&ident) {
            return id;
        }
        let id = self.alloc_wire(Some(ident), 1, WireKind::Internal, true);
        self.symbols.insert(ident, id);
        id
    }

    /// Finds a wire by name.
    pub fn lookup(&self, name: &str) -> Option<WireId> {
        self.interner
            .get(name)
            .and_then(|ident| self.symbols.get(&ident).copied())
    }

    /// Adds an operation node after checking its operands.
    ///
    /// Fails with [`IrError::DanglingReference`] for ids this circuit never
    /// issued, [`IrError::IllegalDriver`] when a destination's kind forbids
    /// the operator, and [`IrError::WidthMismatch`] when operand count or
    /// widths do not fit.
    pub fn add_node(
        &mut self,
        op: Op,
        args: Vec<WireId>,
        dests: Vec<WireId>,
    ) -> Result<NodeId, IrError> {
        if let Some(&unknown) = args
            .iter()
            .chain(&dests)
            .find(|&&id| !self.wires.contains(id))
        {
            return Err(IrError::DanglingReference {
                wire: format!("%{}", unknown.as_raw()),
            });
        }
        for &dest in &dests {
            let kind = self.wires[dest].kind;
            if !may_drive(&op, kind) {
                return Err(self.illegal_driver(dest, &op));
            }
        }
        self.check_shape(&op, &args, &dests)?;

        let id = self.nodes.next_id();
        Ok(self.nodes.alloc(Node {
            id,
            op,
            args,
            dests,
        }))
    }

    /// Returns the wire for `id`.
    pub fn wire(&self, id: WireId) -> &Wire {
        &self.wires[id]
    }

    /// Returns the node for `id`.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    /// Number of wires.
    pub fn wire_count(&self) -> usize {
        self.wires.len()
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// All wires in creation order.
    pub fn wires(&self) -> impl Iterator<Item = &Wire> {
        self.wires.values()
    }

    /// All nodes in creation order.
    pub fn all_nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Ids of the wires accepted by `filter`, in creation order.
    pub fn subset(&self, filter: impl Fn(&Wire) -> bool) -> Vec<WireId> {
        self.wires
            .values()
            .filter(|w| filter(w))
            .map(|w| w.id)
            .collect()
    }

    /// Ids of all wires of exactly `kind`, in creation order.
    pub fn wires_of_kind(&self, kind: WireKind) -> Vec<WireId> {
        self.subset(|w| w.kind == kind)
    }

    /// The user-visible name of a wire.
    pub fn wire_name(&self, id: WireId) -> Option<&str> {
        self.wires[id].name.map(|ident| self.interner.resolve(ident))
    }

    /// The wire's name, or `%<id>` for anonymous wires.
    pub fn display_name(&self, id: WireId) -> String {
        match self.wire_name(id) {
            Some(name) => name.to_string(),
            None => format!("%{}", id.as_raw()),
        }
    }

    /// Checks the whole-circuit invariants.
    ///
    /// In order: no wire has two drivers, every wire that is read or is an
    /// output has a driver unless it is an input or constant, and the graph
    /// left after removing state elements is acyclic. The first violation
    /// found is returned.
    pub fn validate(&self) -> Result<(), IrError> {
        let mut drivers: HashMap<WireId, NodeId> = HashMap::new();
        for node in self.nodes.values() {
            for &dest in &node.dests {
                if drivers.insert(dest, node.id).is_some() {
                    return Err(IrError::MultipleDrivers {
                        wire: self.display_name(dest),
                    });
                }
            }
        }

        let mut read = vec![false; self.wires.len()];
        for node in self.nodes.values() {
            for &arg in &node.args {
                read[arg.as_raw() as usize] = true;
            }
        }
        for wire in self.wires.values() {
            let used = read[wire.id.as_raw() as usize] || wire.kind == WireKind::Output;
            if used && !wire.kind.is_source() && !drivers.contains_key(&wire.id) {
                return Err(IrError::DanglingReference {
                    wire: self.display_name(wire.id),
                });
            }
        }

        self.check_acyclic(&drivers)
    }

    fn check_acyclic(&self, drivers: &HashMap<WireId, NodeId>) -> Result<(), IrError> {
        let mut graph: DiGraph<NodeId, ()> = DiGraph::new();
        let mut index: HashMap<NodeId, NodeIndex> = HashMap::new();
        for node in self.nodes.values().filter(|n| n.op.is_combinational()) {
            index.insert(node.id, graph.add_node(node.id));
        }
        for node in self.nodes.values() {
            let Some(&to) = index.get(&node.id) else {
                continue;
            };
            for arg in &node.args {
                if let Some(&from) = drivers.get(arg).and_then(|p| index.get(p)) {
                    graph.add_edge(from, to, ());
                }
            }
        }

        toposort(&graph, None).map(|_| ()).map_err(|cycle| {
            let node = &self.nodes[graph[cycle.node_id()]];
            IrError::CombinationalCycle {
                wire: node
                    .dest()
                    .map(|d| self.display_name(d))
                    .unwrap_or_else(|| node.op.to_string()),
            }
        })
    }

    fn alloc_wire(&mut self, name: Option<Ident>, width: u32, kind: WireKind, implicit: bool) -> WireId {
        let id = self.wires.next_id();
        self.wires.alloc(Wire {
            id,
            name,
            width,
            kind,
            implicit,
        })
    }

    fn reconcile(&mut self, id: WireId, width: u32, kind: WireKind) -> Result<(), IrError> {
        let connected = self
            .nodes
            .values()
            .any(|n| n.args.contains(&id) || n.dests.contains(&id));
        if connected && width != 1 {
            return Err(IrError::WidthMismatch {
                op: "declare".to_string(),
                detail: format!(
                    "`{}` is already used as a 1-bit wire but declared {width} bits wide",
                    self.display_name(id)
                ),
            });
        }
        if let Some(node) = self
            .nodes
            .values()
            .find(|n| n.dests.contains(&id) && !may_drive(&n.op, kind))
        {
            return Err(IrError::IllegalDriver {
                wire: self.display_name(id),
                kind: kind.to_string(),
                op: node.op.to_string(),
            });
        }
        let wire = self.wires.get_mut(id);
        wire.width = width;
        wire.kind = kind;
        wire.implicit = false;
        Ok(())
    }

    fn illegal_driver(&self, dest: WireId, op: &Op) -> IrError {
        IrError::IllegalDriver {
            wire: self.display_name(dest),
            kind: self.wires[dest].kind.to_string(),
            op: op.to_string(),
        }
    }

    fn check_shape(&self, op: &Op, args: &[WireId], dests: &[WireId]) -> Result<(), IrError> {
        let mismatch = |detail: String| IrError::WidthMismatch {
            op: op.to_string(),
            detail,
        };
        let width = |id: WireId| self.wires[id].width;

        if let Op::Memory { .. } = op {
            if dests.is_empty() {
                return Err(mismatch("expected at least 1 destination".to_string()));
            }
            return Ok(());
        }
        if dests.len() != 1 {
            return Err(mismatch(format!(
                "expected 1 destination, found {}",
                dests.len()
            )));
        }

        let arity = match op {
            Op::Concat => None,
            Op::Buf | Op::Not | Op::Select(_) | Op::Register => Some(1),
            Op::Mux => Some(3),
            _ => Some(2),
        };
        match arity {
            Some(n) if args.len() != n => {
                return Err(mismatch(format!(
                    "expected {n} operands, found {}",
                    args.len()
                )));
            }
            None if args.is_empty() => {
                return Err(mismatch("expected at least 1 operand".to_string()));
            }
            _ => {}
        }

        let same = |a: WireId, b: WireId| {
            if width(a) == width(b) {
                Ok(width(a))
            } else {
                Err(mismatch(format!(
                    "operands are {} and {} bits",
                    width(a),
                    width(b)
                )))
            }
        };

        let expected = match op {
            Op::Buf | Op::Not | Op::Register => width(args[0]),
            Op::And | Op::Or | Op::Xor => same(args[0], args[1])?,
            Op::Add | Op::Sub => same(args[0], args[1])? + 1,
            Op::Mul => same(args[0], args[1])? * 2,
            Op::Lt | Op::Gt | Op::Eq => {
                same(args[0], args[1])?;
                1
            }
            Op::Mux => {
                if width(args[2]) != 1 {
                    return Err(mismatch(format!(
                        "select is {} bits, expected 1",
                        width(args[2])
                    )));
                }
                same(args[0], args[1])?
            }
            Op::Concat => args.iter().map(|&a| width(a)).sum(),
            Op::Select(indices) => {
                if indices.is_empty() {
                    return Err(mismatch("no bits selected".to_string()));
                }
                let source = width(args[0]);
                if let Some(bad) = indices.iter().find(|&&i| i >= source) {
                    return Err(mismatch(format!(
                        "bit {bad} is out of range for a {source}-bit operand"
                    )));
                }
                indices.len() as u32
            }
            Op::Memory { .. } => return Ok(()),
        };

        let actual = width(dests[0]);
        if actual != expected {
            return Err(mismatch(format!(
                "destination `{}` is {actual} bits, expected {expected}",
                self.display_name(dests[0])
            )));
        }
        Ok(())
    }
}

/// Whether `op` may drive a wire of `kind`.
fn may_drive(op: &Op, kind: WireKind) -> bool {
    match kind {
        WireKind::Input | WireKind::Const(_) => false,
        WireKind::Register => *op == Op::Register,
        WireKind::Output | WireKind::Internal => *op != Op::Register,
    }
}
