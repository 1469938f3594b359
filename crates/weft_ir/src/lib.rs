//! Circuit intermediate representation for the weft netlist translator.
//!
//! A [`Circuit`] is a flat graph of [`Wire`]s connected by operation
//! [`Node`]s. The BLIF reader builds one; the Verilog and graph emitters
//! consume one. All entities live in creation-ordered [`Arena`]s, so every
//! iteration over a circuit is deterministic.

#![warn(missing_docs)]

pub mod arena;
pub mod circuit;
pub mod error;
pub mod ids;
pub mod index;
pub mod node;
pub mod op;
pub mod wire;

pub use arena::{Arena, ArenaId};
pub use circuit::Circuit;
pub use error::IrError;
pub use ids::{NodeId, WireId};
pub use index::ConnectivityIndex;
pub use node::Node;
pub use op::Op;
pub use wire::{Wire, WireKind};
