//! Operation nodes.

use crate::ids::{NodeId, WireId};
use crate::op::Op;
use serde::{Deserialize, Serialize};

/// One operation instance: reads `args`, drives `dests`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// This node's id.
    pub id: NodeId,
    /// The operation.
    pub op: Op,
    /// Operands, in operator order.
    pub args: Vec<WireId>,
    /// Driven wires, normally exactly one.
    pub dests: Vec<WireId>,
}

impl Node {
    /// The single destination of a non-memory node.
    pub fn dest(&self) -> Option<WireId> {
        self.dests.first().copied()
    }
}
