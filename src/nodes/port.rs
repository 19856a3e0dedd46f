//! Port types and functionality for block connections

use std::fmt;

use egui::{Pos2, Vec2};
use serde::{Deserialize, Serialize};

use super::block::BlockId;
use super::factory::PortType;
use super::graph::Graph;

/// Identifier of a port, unique within its block and never reused
pub type PortId = usize;

/// Direction of a port (input or output)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortDirection {
    Input,
    Output,
}

impl fmt::Display for PortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortDirection::Input => write!(f, "input"),
            PortDirection::Output => write!(f, "output"),
        }
    }
}

/// Graph-wide address of a port
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PortRef {
    pub block: BlockId,
    pub port: PortId,
}

impl PortRef {
    pub fn new(block: BlockId, port: PortId) -> Self {
        Self { block, port }
    }
}

impl fmt::Display for PortRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.block, self.port)
    }
}

/// Scalar held directly on an unconnected input port
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LiteralValue {
    Boolean(bool),
    Number(f64),
    String(String),
}

impl LiteralValue {
    /// The primitive port type this literal belongs to
    pub fn port_type(&self) -> PortType {
        match self {
            LiteralValue::Boolean(_) => PortType::Boolean,
            LiteralValue::Number(_) => PortType::Number,
            LiteralValue::String(_) => PortType::String,
        }
    }
}

impl fmt::Display for LiteralValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LiteralValue::Boolean(value) => write!(f, "{}", value),
            LiteralValue::Number(value) => write!(f, "{}", value),
            LiteralValue::String(value) => write!(f, "{}", value),
        }
    }
}

impl From<f64> for LiteralValue {
    fn from(value: f64) -> Self {
        LiteralValue::Number(value)
    }
}

impl From<bool> for LiteralValue {
    fn from(value: bool) -> Self {
        LiteralValue::Boolean(value)
    }
}

impl From<&str> for LiteralValue {
    fn from(value: &str) -> Self {
        LiteralValue::String(value.to_string())
    }
}

/// Represents a connection point on a block
#[derive(Debug, Clone)]
pub struct Port {
    pub id: PortId,
    /// Owning block; 0 until the block is added to a graph
    pub block: BlockId,
    pub name: String,
    pub port_type: PortType,
    pub direction: PortDirection,
    pub is_variadic: bool,
    /// Ordering index among siblings of the same direction
    pub slot_index: usize,
    pub literal_value: Option<LiteralValue>,
    /// Closed list of allowed literal values (dropdown inputs)
    pub options: Option<Vec<LiteralValue>>,
    /// Anchor relative to the block origin
    pub local_offset: Vec2,
    /// Resolved world-space anchor
    pub position: Pos2,
}

impl Port {
    /// Creates a new port
    pub fn new(
        id: PortId,
        name: impl Into<String>,
        port_type: PortType,
        direction: PortDirection,
    ) -> Self {
        Self {
            id,
            block: 0,
            name: name.into(),
            port_type,
            direction,
            is_variadic: false,
            slot_index: 0,
            literal_value: None,
            options: None,
            local_offset: Vec2::ZERO,
            position: Pos2::ZERO,
        }
    }

    /// Checks if this port is an input
    pub fn is_input(&self) -> bool {
        matches!(self.direction, PortDirection::Input)
    }

    /// Checks if this port is an output
    pub fn is_output(&self) -> bool {
        matches!(self.direction, PortDirection::Output)
    }

    pub fn port_ref(&self) -> PortRef {
        PortRef::new(self.block, self.id)
    }

    /// Whether any wire ends (input) or starts (output) at this port
    pub fn has_incoming_or_outgoing_wire(&self, graph: &Graph) -> bool {
        let this = self.port_ref();
        graph.wires().iter().any(|wire| match self.direction {
            PortDirection::Input => wire.target == this,
            PortDirection::Output => wire.source == this,
        })
    }

    /// True when a renderer should draw an editable literal field instead of
    /// requiring a wire
    pub fn can_show_literal_field(&self, graph: &Graph) -> bool {
        self.is_input() && self.port_type.is_primitive() && !self.has_incoming_or_outgoing_wire(graph)
    }

    /// Checks whether a literal may be stored on this port
    pub fn accepts_literal(&self, value: &LiteralValue) -> Result<(), String> {
        if !self.is_input() {
            return Err("literals are only stored on input ports".to_string());
        }
        if let LiteralValue::Number(number) = value {
            if !number.is_finite() {
                return Err(format!("'{}' is not a finite number", number));
            }
        }
        if let Some(options) = &self.options {
            if !options.contains(value) {
                return Err(format!("'{}' is not one of the allowed options", value));
            }
            return Ok(());
        }
        match self.port_type {
            PortType::Any => Ok(()),
            port_type if port_type == value.port_type() => Ok(()),
            port_type => Err(format!("expected a {} literal, got '{}'", port_type, value)),
        }
    }
}
