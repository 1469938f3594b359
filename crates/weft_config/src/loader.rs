//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::WeftConfig;
use std::path::Path;

/// File name looked up in the working directory when no path is given.
pub const CONFIG_FILE_NAME: &str = "weft.toml";

/// Loads and validates a configuration file.
pub fn load_config(path: &Path) -> Result<WeftConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    load_config_from_str(&content)
}

/// Parses and validates a configuration from a string.
pub fn load_config_from_str(content: &str) -> Result<WeftConfig, ConfigError> {
    let config: WeftConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &WeftConfig) -> Result<(), ConfigError> {
    non_empty("netlist.clock", &config.netlist.clock)?;
    non_empty("verilog.clock_port", &config.verilog.clock_port)?;
    if let Some(name) = &config.verilog.module_name {
        non_empty("verilog.module_name", name)?;
    }
    non_empty("graph.placeholder", &config.graph.placeholder)?;
    Ok(())
}

fn non_empty(field: &str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::ValidationError(format!(
            "{field} must not be empty"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_is_default() {
        let config = load_config_from_str("").unwrap();
        assert_eq!(config, WeftConfig::default());
    }

    #[test]
    fn parse_full_config() {
        let toml = r#"
[netlist]
merge_io_vectors = false
clock = "sysclk"

[verilog]
module_name = "counter"
clock_port = "clock"

[graph]
placeholder = "?"
"#;
        let config = load_config_from_str(toml).unwrap();
        assert!(!config.netlist.merge_io_vectors);
        assert_eq!(config.netlist.clock, "sysclk");
        assert_eq!(config.verilog.module_name.as_deref(), Some("counter"));
        assert_eq!(config.verilog.clock_port, "clock");
        assert_eq!(config.graph.placeholder, "?");
    }

    #[test]
    fn empty_clock_rejected() {
        let err = load_config_from_str("[netlist]\nclock = \"\"\n").unwrap_err();
        match err {
            ConfigError::ValidationError(msg) => assert!(msg.contains("netlist.clock")),
            other => panic!("expected ValidationError, got {other:?}"),
        }
    }

    #[test]
    fn empty_module_name_rejected() {
        let err = load_config_from_str("[verilog]\nmodule_name = \" \"\n").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn bad_toml_is_parse_error() {
        let err = load_config_from_str("[netlist\nclock = ").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn wrong_type_is_parse_error() {
        let err = load_config_from_str("[netlist]\nmerge_io_vectors = \"yes\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_config(Path::new("/nonexistent/weft.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::IoError(_)));
    }
}
