//! The closed set of operations a node can perform.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An operation. Operator parameters live in the variant.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Op {
    /// Identity.
    Buf,
    /// Bitwise inversion.
    Not,
    /// Bitwise and.
    And,
    /// Bitwise or.
    Or,
    /// Bitwise exclusive or.
    Xor,
    /// Addition; the result is one bit wider than the operands.
    Add,
    /// Subtraction; the result is one bit wider than the operands.
    Sub,
    /// Multiplication; the result is twice as wide as the operands.
    Mul,
    /// Unsigned less-than.
    Lt,
    /// Unsigned greater-than.
    Gt,
    /// Equality.
    Eq,
    /// Two-way multiplexer over `[false_case, true_case, select]`.
    Mux,
    /// Concatenation; the first argument is the most significant segment.
    Concat,
    /// Bit selection, listed most significant first.
    Select(Vec<u32>),
    /// State update: the argument becomes the register value on the next clock edge.
    Register,
    /// Memory block of the given geometry.
    Memory {
        /// Number of words.
        depth: u32,
        /// Bits per word.
        width: u32,
    },
}

impl Op {
    /// Short tag naming the operator.
    pub fn tag(&self) -> &'static str {
        match self {
            Op::Buf => "buf",
            Op::Not => "not",
            Op::And => "and",
            Op::Or => "or",
            Op::Xor => "xor",
            Op::Add => "add",
            Op::Sub => "sub",
            Op::Mul => "mul",
            Op::Lt => "lt",
            Op::Gt => "gt",
            Op::Eq => "eq",
            Op::Mux => "mux",
            Op::Concat => "concat",
            Op::Select(_) => "select",
            Op::Register => "reg",
            Op::Memory { .. } => "mem",
        }
    }

    /// Returns `false` for state-holding operations.
    pub fn is_combinational(&self) -> bool {
        !matches!(self, Op::Register | Op::Memory { .. })
    }
}

/// Displays the tag plus any parameter, e.g. `select(2,0)` or `mem(16x8)`.
impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Op::Select(indices) => {
                let list: Vec<String> = indices.iter().map(u32::to_string).collect();
                write!(f, "select({})", list.join(","))
            }
            Op::Memory { depth, width } => write!(f, "mem({depth}x{width})"),
            other => f.write_str(other.tag()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_include_parameters() {
        assert_eq!(Op::And.to_string(), "and");
        assert_eq!(Op::Select(vec![2, 0]).to_string(), "select(2,0)");
        assert_eq!(Op::Memory { depth: 16, width: 8 }.to_string(), "mem(16x8)");
        assert_eq!(Op::Register.to_string(), "reg");
    }

    #[test]
    fn state_ops_are_not_combinational() {
        assert!(Op::Mux.is_combinational());
        assert!(Op::Select(vec![0]).is_combinational());
        assert!(!Op::Register.is_combinational());
        assert!(!Op::Memory { depth: 4, width: 1 }.is_combinational());
    }

    #[test]
    fn serde_roundtrip() {
        for op in [Op::Concat, Op::Select(vec![3, 1]), Op::Memory { depth: 2, width: 4 }] {
            let json = serde_json::to_string(&op).unwrap();
            let back: Op = serde_json::from_str(&json).unwrap();
            assert_eq!(op, back);
        }
    }
}
