//! Block definitions, port types and the definition registry
//!
//! Every kind of block is plain data: a `BlockDefinition` names its category,
//! header color, ports and whether it carries custom code. The registry is an
//! ordinary value handed to whatever builds blocks or populates a toolbox.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use egui::{Color32, Pos2};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use super::block::Block;
use super::port::LiteralValue;
use crate::constants;
use crate::error::DefinitionError;

/// Data types that can flow through ports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortType {
    /// Execution flow
    Flow,
    String,
    Number,
    #[serde(alias = "bool")]
    Boolean,
    /// Any type (for generic ports)
    Any,
    Undefined,
    Object,
}

/// Pin glyph a renderer draws for a port type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinShape {
    Triangle,
    Circle,
    Square,
}

impl PortType {
    pub const ALL: [PortType; 7] = [
        PortType::Flow,
        PortType::String,
        PortType::Number,
        PortType::Boolean,
        PortType::Any,
        PortType::Undefined,
        PortType::Object,
    ];

    /// Two types are connectable iff they are equal or either is `any`
    pub fn compatible(a: PortType, b: PortType) -> bool {
        a == b || a == PortType::Any || b == PortType::Any
    }

    /// Check if this data type can connect to another
    pub fn can_connect_to(&self, other: &PortType) -> bool {
        Self::compatible(*self, *other)
    }

    /// Primitive kinds accept a literal value in place of a wire
    pub fn is_primitive(&self) -> bool {
        matches!(self, PortType::String | PortType::Number | PortType::Boolean)
    }

    pub fn name(&self) -> &'static str {
        match self {
            PortType::Flow => "flow",
            PortType::String => "string",
            PortType::Number => "number",
            PortType::Boolean => "boolean",
            PortType::Any => "any",
            PortType::Undefined => "undefined",
            PortType::Object => "object",
        }
    }

    /// Hover text for a port of this type
    pub fn tooltip(&self) -> &'static str {
        match self {
            PortType::Flow => "Execution Flow",
            other => other.name(),
        }
    }

    /// Get a color representing this data type
    pub fn color(&self) -> Color32 {
        match self {
            PortType::Flow => Color32::from_rgb(0xff, 0xff, 0xff),
            PortType::String => Color32::from_rgb(0xff, 0x00, 0xcc),
            PortType::Number => Color32::from_rgb(0x00, 0xcc, 0xff),
            PortType::Boolean => Color32::from_rgb(0xcc, 0x00, 0x00),
            PortType::Any => Color32::from_rgb(0xaa, 0xaa, 0xaa),
            PortType::Undefined => Color32::from_rgb(0xf1, 0x01, 0xf0),
            PortType::Object => Color32::from_rgb(0xa0, 0xf1, 0x01),
        }
    }

    pub fn shape(&self) -> PinShape {
        match self {
            PortType::Flow => PinShape::Triangle,
            PortType::String | PortType::Number | PortType::Boolean => PinShape::Circle,
            PortType::Any | PortType::Undefined | PortType::Object => PinShape::Square,
        }
    }
}

impl fmt::Display for PortType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Input port entry of a definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputDefinition {
    pub name: String,
    #[serde(rename = "type")]
    pub port_type: PortType,
    #[serde(default, rename = "isRest", skip_serializing_if = "std::ops::Not::not")]
    pub is_variadic: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<LiteralValue>>,
}

impl InputDefinition {
    pub fn new(name: &str, port_type: PortType) -> Self {
        Self {
            name: name.to_string(),
            port_type,
            is_variadic: false,
            options: None,
        }
    }

    /// Mark the input as an expanding "...params" group
    pub fn variadic(mut self) -> Self {
        self.is_variadic = true;
        self
    }

    pub fn with_options(mut self, options: Vec<LiteralValue>) -> Self {
        self.options = Some(options);
        self
    }
}

/// Output port entry of a definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputDefinition {
    pub name: String,
    #[serde(rename = "type")]
    pub port_type: PortType,
}

impl OutputDefinition {
    pub fn new(name: &str, port_type: PortType) -> Self {
        Self {
            name: name.to_string(),
            port_type,
        }
    }
}

/// Declarative description of one kind of block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockDefinition {
    pub category: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default)]
    pub inputs: Vec<InputDefinition>,
    #[serde(default)]
    pub outputs: Vec<OutputDefinition>,
    /// Blocks of this kind carry an editable code payload
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub custom_code: bool,
}

impl BlockDefinition {
    pub fn new(category: &str, name: &str) -> Self {
        Self {
            category: category.to_string(),
            name: name.to_string(),
            color: None,
            inputs: vec![],
            outputs: vec![],
            custom_code: false,
        }
    }

    pub fn with_color(mut self, color: &str) -> Self {
        self.color = Some(color.to_string());
        self
    }

    pub fn with_inputs(mut self, inputs: Vec<InputDefinition>) -> Self {
        self.inputs = inputs;
        self
    }

    pub fn with_outputs(mut self, outputs: Vec<OutputDefinition>) -> Self {
        self.outputs = outputs;
        self
    }

    pub fn with_custom_code(mut self) -> Self {
        self.custom_code = true;
        self
    }

    /// Header color, falling back to the default grey
    pub fn header_color(&self) -> Color32 {
        self.color
            .as_deref()
            .and_then(parse_hex_color)
            .or_else(|| parse_hex_color(constants::block::FALLBACK_COLOR))
            .unwrap_or(Color32::from_rgb(0x44, 0x44, 0x44))
    }

    fn validate(&self, index: usize) -> Result<(), DefinitionError> {
        if self.name.trim().is_empty() {
            return Err(DefinitionError::MissingField { index, field: "name" });
        }
        if self.category.trim().is_empty() {
            return Err(DefinitionError::MissingField { index, field: "category" });
        }
        if let Some(position) = self.inputs.iter().position(|p| p.name.trim().is_empty()) {
            return Err(DefinitionError::UnnamedPort {
                definition: self.name.clone(),
                direction: super::port::PortDirection::Input,
                index: position,
            });
        }
        if let Some(position) = self.outputs.iter().position(|p| p.name.trim().is_empty()) {
            return Err(DefinitionError::UnnamedPort {
                definition: self.name.clone(),
                direction: super::port::PortDirection::Output,
                index: position,
            });
        }
        Ok(())
    }
}

/// Parses `#rgb` or `#rrggbb`
fn parse_hex_color(text: &str) -> Option<Color32> {
    let hex = text.strip_prefix('#')?;
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        3 => {
            let mut digits = hex.chars().map(|c| c.to_digit(16).map(|d| (d * 17) as u8));
            let r = digits.next()??;
            let g = digits.next()??;
            let b = digits.next()??;
            Some(Color32::from_rgb(r, g, b))
        }
        6 => Some(Color32::from_rgb(
            channel(hex.get(0..2)?)?,
            channel(hex.get(2..4)?)?,
            channel(hex.get(4..6)?)?,
        )),
        _ => None,
    }
}

/// Registry for block definitions, in registration order
#[derive(Debug, Clone, Default)]
pub struct DefinitionRegistry {
    definitions: Vec<Arc<BlockDefinition>>,
}

impl DefinitionRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the stock toolbox
    pub fn builtin() -> Self {
        Self {
            definitions: super::builtin::definitions().into_iter().map(Arc::new).collect(),
        }
    }

    /// Validate and register a definition
    pub fn register(&mut self, definition: BlockDefinition) -> Result<Arc<BlockDefinition>, DefinitionError> {
        definition.validate(self.definitions.len())?;
        if self.get(&definition.name).is_some() {
            warn!("Rejecting duplicate block definition '{}'", definition.name);
            return Err(DefinitionError::Duplicate(definition.name));
        }
        debug!("Registered block definition '{}' ({})", definition.name, definition.category);
        let definition = Arc::new(definition);
        self.definitions.push(Arc::clone(&definition));
        Ok(definition)
    }

    pub fn from_definitions(definitions: Vec<BlockDefinition>) -> Result<Self, DefinitionError> {
        let mut registry = Self::new();
        for definition in definitions {
            registry.register(definition)?;
        }
        Ok(registry)
    }

    /// Parse a JSON array of definitions
    pub fn from_json_str(json: &str) -> Result<Self, DefinitionError> {
        let definitions: Vec<BlockDefinition> = serde_json::from_str(json)?;
        let registry = Self::from_definitions(definitions)?;
        info!("Loaded {} block definitions", registry.len());
        Ok(registry)
    }

    pub fn load(path: &Path) -> Result<Self, DefinitionError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn get(&self, name: &str) -> Option<Arc<BlockDefinition>> {
        self.definitions.iter().find(|d| d.name == name).cloned()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<BlockDefinition>> {
        self.definitions.iter()
    }

    /// Toolbox grouping: categories in first-seen order
    pub fn categories(&self) -> Vec<(String, Vec<Arc<BlockDefinition>>)> {
        let mut categories: Vec<(String, Vec<Arc<BlockDefinition>>)> = Vec::new();
        for definition in &self.definitions {
            match categories.iter_mut().find(|(name, _)| *name == definition.category) {
                Some((_, entries)) => entries.push(Arc::clone(definition)),
                None => categories.push((definition.category.clone(), vec![Arc::clone(definition)])),
            }
        }
        categories
    }

    /// Create an unattached block by definition name
    pub fn create_block(&self, name: &str, position: Pos2) -> Option<Block> {
        self.get(name).map(|definition| Block::new(definition, position))
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}
