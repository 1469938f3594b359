//! Configuration data types deserialized from `weft.toml`.

use serde::{Deserialize, Serialize};

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeftConfig {
    /// Netlist reader settings.
    pub netlist: NetlistConfig,
    /// Verilog backend settings.
    pub verilog: VerilogConfig,
    /// Graph backend settings.
    pub graph: GraphConfig,
}

/// Settings for reading BLIF netlists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetlistConfig {
    /// Reassemble `name[i]` port bits into multi-bit ports.
    pub merge_io_vectors: bool,
    /// Input name treated as the global clock.
    pub clock: String,
}

impl Default for NetlistConfig {
    fn default() -> Self {
        Self {
            merge_io_vectors: true,
            clock: "clk".to_string(),
        }
    }
}

/// Settings for the structural Verilog backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerilogConfig {
    /// Overrides the emitted module name.
    pub module_name: Option<String>,
    /// Name of the clock port in the emitted module.
    pub clock_port: String,
}

impl Default for VerilogConfig {
    fn default() -> Self {
        Self {
            module_name: None,
            clock_port: "clk".to_string(),
        }
    }
}

/// Settings for the Trivial Graph Format backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Label for endpoints that have neither a producer nor a consumer.
    pub placeholder: String,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            placeholder: "???".to_string(),
        }
    }
}
