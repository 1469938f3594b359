//! Precomputed wire connectivity.

use crate::circuit::Circuit;
use crate::ids::{NodeId, WireId};
use std::collections::HashMap;

/// Producer and consumer lookup for every wire of a circuit.
///
/// Built once per emission; the circuit must not change while it is in use.
#[derive(Debug, Default)]
pub struct ConnectivityIndex {
    producer: HashMap<WireId, NodeId>,
    consumers: HashMap<WireId, Vec<NodeId>>,
}

impl ConnectivityIndex {
    /// Scans every node of `circuit` once.
    pub fn build(circuit: &Circuit) -> Self {
        let mut index = Self::default();
        for node in circuit.all_nodes() {
            for &dest in &node.dests {
                index.producer.entry(dest).or_insert(node.id);
            }
            for &arg in &node.args {
                let list = index.consumers.entry(arg).or_default();
                if !list.contains(&node.id) {
                    list.push(node.id);
                }
            }
        }
        index
    }

    /// The node driving `wire`, if any.
    pub fn producer(&self, wire: WireId) -> Option<NodeId> {
        self.producer.get(&wire).copied()
    }

    /// Nodes reading `wire`, in creation order.
    pub fn consumers(&self, wire: WireId) -> &[NodeId] {
        self.consumers.get(&wire).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The earliest node reading `wire`.
    pub fn first_consumer(&self, wire: WireId) -> Option<NodeId> {
        self.consumers(wire).first().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::op::Op;
    use crate::wire::WireKind;

    #[test]
    fn producer_and_consumers() {
        let mut c = Circuit::new(None);
        let a = c.declare_wire(Some("a"), 1, WireKind::Input).unwrap();
        let n = c.declare_implicit("n");
        let y = c.declare_wire(Some("y"), 1, WireKind::Output).unwrap();
        let z = c.declare_wire(Some("z"), 1, WireKind::Output).unwrap();
        let not = c.add_node(Op::Not, vec![a], vec![n]).unwrap();
        let and = c.add_node(Op::And, vec![n, n], vec![y]).unwrap();
        let buf = c.add_node(Op::Buf, vec![n], vec![z]).unwrap();

        let index = ConnectivityIndex::build(&c);
        assert_eq!(index.producer(n), Some(not));
        assert_eq!(index.producer(a), None);
        assert_eq!(index.consumers(n), &[and, buf]);
        assert_eq!(index.first_consumer(a), Some(not));
        assert_eq!(index.first_consumer(y), None);
        assert!(index.consumers(z).is_empty());
    }
}
