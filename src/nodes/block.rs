//! Block types and core block functionality

use std::sync::Arc;

use egui::{Color32, Pos2, Rect, Vec2};
use serde::{Deserialize, Serialize};

use super::factory::{BlockDefinition, PortType};
use super::port::{LiteralValue, Port, PortDirection, PortId};
use crate::constants;
use crate::error::{GraphError, Result};

/// Unique identifier for a block; 0 until the block joins a graph
pub type BlockId = usize;

/// Geometry used to place port anchors on a block
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutMetrics {
    pub width: f32,
    pub header_height: f32,
    pub slot_spacing: f32,
    pub first_slot_offset: f32,
    pub bottom_padding: f32,
}

impl Default for LayoutMetrics {
    fn default() -> Self {
        Self {
            width: constants::layout::BLOCK_WIDTH,
            header_height: constants::layout::HEADER_HEIGHT,
            slot_spacing: constants::layout::SLOT_SPACING,
            first_slot_offset: constants::layout::FIRST_SLOT_OFFSET,
            bottom_padding: constants::layout::BOTTOM_PADDING,
        }
    }
}

/// A block instance built from a definition
#[derive(Debug, Clone)]
pub struct Block {
    id: BlockId,
    definition: Arc<BlockDefinition>,
    pub title: String,
    pub color: Color32,
    position: Pos2,
    size: Vec2,
    inputs: Vec<Port>,
    outputs: Vec<Port>,
    /// Does not affect connectivity
    pub disabled: bool,
    inline_code: Option<String>,
    layout: LayoutMetrics,
    next_port_id: PortId,
}

impl Block {
    /// Builds a block with one port per definition entry, in declaration order
    pub fn new(definition: Arc<BlockDefinition>, position: Pos2) -> Self {
        let mut block = Self {
            id: 0,
            title: definition.name.clone(),
            color: definition.header_color(),
            position,
            size: Vec2::ZERO,
            inputs: vec![],
            outputs: vec![],
            disabled: false,
            inline_code: None,
            layout: LayoutMetrics::default(),
            next_port_id: 0,
            definition,
        };

        let definition = Arc::clone(&block.definition);
        for input in &definition.inputs {
            block.add_input_port(&input.name, input.port_type, input.is_variadic, input.options.clone());
        }
        for output in &definition.outputs {
            block.add_output_port(&output.name, output.port_type);
        }
        if definition.custom_code {
            block.inline_code = Some(String::new());
        }

        block.recompute_layout_slots();
        block
    }

    /// Use different layout metrics
    pub fn with_layout(mut self, layout: LayoutMetrics) -> Self {
        self.layout = layout;
        self.recompute_layout_slots();
        self
    }

    pub fn id(&self) -> BlockId {
        self.id
    }

    pub fn definition(&self) -> &Arc<BlockDefinition> {
        &self.definition
    }

    pub fn position(&self) -> Pos2 {
        self.position
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn layout(&self) -> LayoutMetrics {
        self.layout
    }

    pub fn inputs(&self) -> &[Port] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[Port] {
        &self.outputs
    }

    pub fn port(&self, id: PortId) -> Option<&Port> {
        self.inputs.iter().chain(self.outputs.iter()).find(|p| p.id == id)
    }

    pub fn port_mut(&mut self, id: PortId) -> Option<&mut Port> {
        self.inputs.iter_mut().chain(self.outputs.iter_mut()).find(|p| p.id == id)
    }

    /// First input with the given name
    pub fn input_named(&self, name: &str) -> Option<&Port> {
        self.inputs.iter().find(|p| p.name == name)
    }

    /// First output with the given name
    pub fn output_named(&self, name: &str) -> Option<&Port> {
        self.outputs.iter().find(|p| p.name == name)
    }

    /// Appends an input port with the next slot index
    pub fn add_input_port(
        &mut self,
        name: &str,
        port_type: PortType,
        is_variadic: bool,
        options: Option<Vec<LiteralValue>>,
    ) -> &mut Port {
        let mut port = self.make_port(name, port_type, PortDirection::Input);
        port.is_variadic = is_variadic;
        port.options = options;
        port.slot_index = self.inputs.len();
        self.inputs.push(port);
        self.place_ports();
        let index = self.inputs.len() - 1;
        &mut self.inputs[index]
    }

    /// Appends an output port with the next slot index
    pub fn add_output_port(&mut self, name: &str, port_type: PortType) -> &mut Port {
        let mut port = self.make_port(name, port_type, PortDirection::Output);
        port.slot_index = self.outputs.len();
        self.outputs.push(port);
        self.place_ports();
        let index = self.outputs.len() - 1;
        &mut self.outputs[index]
    }

    /// Inserts a copy of the variadic slot `after` directly behind it
    pub(crate) fn insert_variadic_slot_after(&mut self, after: PortId) -> Option<PortId> {
        let index = self.inputs.iter().position(|p| p.id == after)?;
        let template = &self.inputs[index];
        let (name, port_type, options) = (template.name.clone(), template.port_type, template.options.clone());

        let mut port = self.make_port(&name, port_type, PortDirection::Input);
        port.is_variadic = true;
        port.options = options;
        let id = port.id;
        self.inputs.insert(index + 1, port);
        self.recompute_layout_slots();
        Some(id)
    }

    /// Removes an input port; the caller guarantees no wire ends there
    pub(crate) fn remove_input_port(&mut self, id: PortId) -> Option<Port> {
        let index = self.inputs.iter().position(|p| p.id == id)?;
        let port = self.inputs.remove(index);
        self.recompute_layout_slots();
        Some(port)
    }

    /// Input port ids of the variadic group `name`, in slot order
    pub fn variadic_group(&self, name: &str) -> Vec<PortId> {
        self.inputs
            .iter()
            .filter(|p| p.is_variadic && p.name == name)
            .map(|p| p.id)
            .collect()
    }

    /// Reassigns contiguous slot indices and re-derives every anchor
    pub fn recompute_layout_slots(&mut self) {
        for (slot, port) in self.inputs.iter_mut().enumerate() {
            port.slot_index = slot;
        }
        for (slot, port) in self.outputs.iter_mut().enumerate() {
            port.slot_index = slot;
        }
        self.place_ports();
    }

    /// Moves the block and its port anchors
    pub fn set_position(&mut self, position: Pos2) {
        self.position = position;
        self.place_ports();
    }

    /// Returns the bounding rectangle of the block
    pub fn get_rect(&self) -> Rect {
        Rect::from_min_size(self.position, self.size)
    }

    pub fn contains(&self, point: Pos2) -> bool {
        let rect = self.get_rect();
        point.x > rect.left() && point.x < rect.right() && point.y > rect.top() && point.y < rect.bottom()
    }

    pub fn has_inline_code(&self) -> bool {
        self.definition.custom_code
    }

    pub fn inline_code(&self) -> Option<&str> {
        self.inline_code.as_deref()
    }

    pub fn set_inline_code(&mut self, code: impl Into<String>) -> Result<()> {
        if !self.has_inline_code() {
            return Err(GraphError::InlineCodeUnsupported(self.id));
        }
        self.inline_code = Some(code.into());
        Ok(())
    }

    pub(crate) fn assign_id(&mut self, id: BlockId) {
        self.id = id;
        for port in self.inputs.iter_mut().chain(self.outputs.iter_mut()) {
            port.block = id;
        }
    }

    fn make_port(&mut self, name: &str, port_type: PortType, direction: PortDirection) -> Port {
        let mut port = Port::new(self.next_port_id, name, port_type, direction);
        port.block = self.id;
        self.next_port_id += 1;
        port
    }

    fn place_ports(&mut self) {
        let layout = self.layout;
        let slots = self.inputs.len().max(self.outputs.len()) as f32;
        self.size = Vec2::new(
            layout.width,
            layout.header_height + slots * layout.slot_spacing + layout.bottom_padding,
        );

        let first = layout.header_height + layout.first_slot_offset;
        for port in self.inputs.iter_mut() {
            port.local_offset = Vec2::new(0.0, first + port.slot_index as f32 * layout.slot_spacing);
            port.position = self.position + port.local_offset;
        }
        for port in self.outputs.iter_mut() {
            port.local_offset = Vec2::new(layout.width, first + port.slot_index as f32 * layout.slot_spacing);
            port.position = self.position + port.local_offset;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::factory::{InputDefinition, OutputDefinition};

    fn format_text() -> Arc<BlockDefinition> {
        Arc::new(
            BlockDefinition::new("Utilities", "Format Text")
                .with_inputs(vec![
                    InputDefinition::new("Format", PortType::String),
                    InputDefinition::new("Args", PortType::Any).variadic(),
                    InputDefinition::new("Trailer", PortType::String),
                ])
                .with_outputs(vec![OutputDefinition::new("Result", PortType::String)]),
        )
    }

    #[test]
    fn test_construct_from_definition() {
        let block = Block::new(format_text(), Pos2::new(100.0, 50.0));
        assert_eq!(block.title, "Format Text");
        assert_eq!(block.inputs().len(), 3);
        assert_eq!(block.outputs().len(), 1);

        let slots: Vec<usize> = block.inputs().iter().map(|p| p.slot_index).collect();
        assert_eq!(slots, vec![0, 1, 2]);
        assert!(block.inputs()[1].is_variadic);
        assert_eq!(block.outputs()[0].slot_index, 0);
        assert!(block.inline_code().is_none());
    }

    #[test]
    fn test_port_anchors_follow_layout() {
        let mut block = Block::new(format_text(), Pos2::new(100.0, 50.0));
        let layout = block.layout();
        let second = &block.inputs()[1];
        assert_eq!(second.local_offset, Vec2::new(0.0, 30.0 + 15.0 + 25.0));
        assert_eq!(second.position, Pos2::new(100.0, 50.0 + 70.0));
        assert_eq!(block.outputs()[0].local_offset.x, layout.width);
        assert_eq!(block.size().y, 30.0 + 3.0 * 25.0 + 10.0);

        block.set_position(Pos2::new(0.0, 0.0));
        assert_eq!(block.inputs()[1].position, Pos2::new(0.0, 70.0));
    }

    #[test]
    fn test_insert_and_remove_variadic_slot() {
        let mut block = Block::new(format_text(), Pos2::ZERO);
        let first = block.variadic_group("Args")[0];
        let added = block.insert_variadic_slot_after(first).unwrap();

        let names: Vec<&str> = block.inputs().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Format", "Args", "Args", "Trailer"]);
        assert_eq!(block.port(added).unwrap().slot_index, 2);
        assert_eq!(block.input_named("Trailer").unwrap().slot_index, 3);
        assert_eq!(block.variadic_group("Args"), vec![first, added]);

        block.remove_input_port(first);
        assert_eq!(block.variadic_group("Args"), vec![added]);
        assert_eq!(block.port(added).unwrap().slot_index, 1);
        assert_eq!(block.input_named("Trailer").unwrap().slot_index, 2);
    }

    #[test]
    fn test_port_ids_are_never_reused() {
        let mut block = Block::new(format_text(), Pos2::ZERO);
        let trailer = block.input_named("Trailer").unwrap().id;
        block.remove_input_port(trailer);
        let added = block.add_input_port("Extra", PortType::Number, false, None).id;
        assert_ne!(added, trailer);
        assert_eq!(block.port(added).unwrap().slot_index, 2);
    }

    #[test]
    fn test_inline_code_requires_flag() {
        let mut plain = Block::new(format_text(), Pos2::ZERO);
        assert!(matches!(
            plain.set_inline_code("x"),
            Err(GraphError::InlineCodeUnsupported(_))
        ));

        let custom = Arc::new(BlockDefinition::new("Custom", "Custom Code").with_custom_code());
        let mut block = Block::new(custom, Pos2::ZERO);
        assert_eq!(block.inline_code(), Some(""));
        block.set_inline_code("return 1;").unwrap();
        assert_eq!(block.inline_code(), Some("return 1;"));
    }
}
