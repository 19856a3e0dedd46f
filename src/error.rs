//! Error types for graph editing

use thiserror::Error;

use crate::nodes::{BlockId, PortDirection, PortRef, PortType, WireId};

/// Result type alias using GraphError
pub type Result<T> = std::result::Result<T, GraphError>;

/// Errors raised by graph mutations. None of them leave the graph modified.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GraphError {
    /// Connect attempted with swapped or same-direction endpoints
    #[error("Cannot connect {source_direction} port to {target_direction} port: wires run from an output to an input")]
    Direction {
        source_direction: PortDirection,
        target_direction: PortDirection,
    },

    /// Connect attempted across mismatched, non-`any` types
    #[error("Incompatible port types: {source_type} -> {target_type}")]
    IncompatibleType {
        source_type: PortType,
        target_type: PortType,
    },

    /// A variadic group adjustment would orphan a connected wire
    #[error("Port {port} of variadic group '{group}' still has an incoming wire; disconnect it first")]
    VariadicCompactionConflict { group: String, port: PortRef },

    #[error("Block {0} not found")]
    BlockNotFound(BlockId),

    #[error("Port {0} not found")]
    PortNotFound(PortRef),

    #[error("Port {0} is not part of a variadic group")]
    NotVariadic(PortRef),

    #[error("Wire {0} not found")]
    WireNotFound(WireId),

    /// The block's definition does not carry custom code
    #[error("Block {0} does not accept inline code")]
    InlineCodeUnsupported(BlockId),

    /// Literal rejected by the port (output port or value outside its options)
    #[error("Invalid literal for port {port}: {reason}")]
    InvalidLiteral { port: PortRef, reason: String },

    #[error("Unknown block definition '{0}'")]
    UnknownDefinition(String),
}

/// Malformed definition data found while loading a registry
#[derive(Debug, Error)]
pub enum DefinitionError {
    #[error("Failed to parse definitions: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Failed to read definitions: {0}")]
    Io(#[from] std::io::Error),

    #[error("Definition #{index} has an empty {field}")]
    MissingField { index: usize, field: &'static str },

    #[error("Definition '{0}' is registered twice")]
    Duplicate(String),

    #[error("Definition '{definition}' has an unnamed {direction} port at position {index}")]
    UnnamedPort {
        definition: String,
        direction: PortDirection,
        index: usize,
    },
}

/// Failure loading an editor configuration file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Failure producing or writing an export
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to serialize export: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to write export: {0}")]
    Io(#[from] std::io::Error),
}
