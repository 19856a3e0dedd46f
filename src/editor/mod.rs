//! Headless editing session over a block graph
//!
//! `EditorSession` owns the graph together with the definition registry,
//! the editor configuration and the in-progress interaction state. Every
//! user-level edit goes through it so the unsaved-changes flag stays
//! accurate.

pub mod file_manager;
pub mod interaction;

pub use file_manager::FileManager;
pub use interaction::InteractionManager;

use std::path::Path;
use std::sync::Arc;

use egui::Pos2;
use log::{debug, info};

use crate::config::EditorConfig;
use crate::constants;
use crate::error::{ExportError, GraphError, Result};
use crate::nodes::{
    Block, BlockDefinition, BlockId, DefinitionRegistry, Graph, LiteralValue, PortConnections,
    PortRef, WireId,
};

/// Entries of the block context menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextAction {
    Delete,
    Duplicate,
    ToggleDisabled,
}

impl ContextAction {
    /// Menu label; the toggle entry reads according to the block's current state
    pub fn label(&self, disabled: bool) -> &'static str {
        match self {
            ContextAction::Delete => "Delete",
            ContextAction::Duplicate => "Duplicate",
            ContextAction::ToggleDisabled if disabled => "Enable",
            ContextAction::ToggleDisabled => "Disable",
        }
    }
}

pub struct EditorSession {
    graph: Graph,
    registry: DefinitionRegistry,
    config: EditorConfig,
    interaction: InteractionManager,
    file_manager: FileManager,
}

impl EditorSession {
    pub fn new(registry: DefinitionRegistry, config: EditorConfig) -> Self {
        Self {
            graph: Graph::new(),
            registry,
            config,
            interaction: InteractionManager::new(),
            file_manager: FileManager::new(),
        }
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn registry(&self) -> &DefinitionRegistry {
        &self.registry
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn interaction(&self) -> &InteractionManager {
        &self.interaction
    }

    pub fn file_manager(&self) -> &FileManager {
        &self.file_manager
    }

    /// Toolbox contents grouped by category
    pub fn toolbox(&self) -> Vec<(String, Vec<Arc<BlockDefinition>>)> {
        self.registry.categories()
    }

    fn snap(&self, position: Pos2) -> Pos2 {
        Pos2::new(self.config.snap_to_grid(position.x), self.config.snap_to_grid(position.y))
    }

    /// Instantiate a registered definition at a grid-snapped position
    pub fn spawn_block(&mut self, name: &str, position: Pos2) -> Result<BlockId> {
        let definition = self
            .registry
            .get(name)
            .ok_or_else(|| GraphError::UnknownDefinition(name.to_string()))?;
        let block = Block::new(definition, self.snap(position)).with_layout(self.config.layout);
        let id = self.graph.add_block(block);
        self.file_manager.mark_modified();
        Ok(id)
    }

    pub fn move_block(&mut self, id: BlockId, position: Pos2) -> Result<()> {
        let position = self.snap(position);
        self.graph.move_block(id, position)?;
        self.file_manager.mark_modified();
        Ok(())
    }

    pub fn delete_block(&mut self, id: BlockId) -> Result<Block> {
        let block = self.graph.remove_block(id).ok_or(GraphError::BlockNotFound(id))?;
        if self.interaction.context_target == Some(id) {
            self.interaction.context_target = None;
        }
        self.file_manager.mark_modified();
        Ok(block)
    }

    pub fn duplicate_block(&mut self, id: BlockId) -> Result<BlockId> {
        let copy = self.graph.duplicate_block(id, self.config.duplicate_offset())?;
        self.file_manager.mark_modified();
        Ok(copy)
    }

    pub fn toggle_disabled(&mut self, id: BlockId) -> Result<bool> {
        let disabled = self.graph.toggle_disabled(id)?;
        self.file_manager.mark_modified();
        Ok(disabled)
    }

    pub fn set_literal(&mut self, port: PortRef, value: Option<LiteralValue>) -> Result<()> {
        self.graph.set_literal(port, value)?;
        self.file_manager.mark_modified();
        Ok(())
    }

    pub fn remove_variadic_slot(&mut self, port: PortRef) -> Result<()> {
        self.graph.remove_variadic_slot(port)?;
        self.file_manager.mark_modified();
        Ok(())
    }

    /// Incoming and outgoing connectivity of a block, in port order
    pub fn describe_connections(&self, id: BlockId) -> Result<(Vec<PortConnections>, Vec<PortConnections>)> {
        Ok((self.graph.get_connected_inputs(id)?, self.graph.get_connected_outputs(id)?))
    }

    // Context menu

    /// Target the top-most block under `point`; returns it when there is one
    pub fn open_context_menu(&mut self, point: Pos2) -> Option<BlockId> {
        self.interaction.context_target = self.graph.find_block_at(point);
        self.interaction.context_target
    }

    pub fn close_context_menu(&mut self) {
        self.interaction.context_target = None;
    }

    /// Menu entries with labels for the current target
    pub fn context_actions(&self) -> Vec<(ContextAction, &'static str)> {
        let Some(block) = self.interaction.context_target.and_then(|id| self.graph.block(id)) else {
            return Vec::new();
        };
        [ContextAction::Delete, ContextAction::Duplicate, ContextAction::ToggleDisabled]
            .into_iter()
            .map(|action| (action, action.label(block.disabled)))
            .collect()
    }

    /// Apply a menu entry to the current target and close the menu.
    /// Returns the new block for `Duplicate`.
    pub fn run_context_action(&mut self, action: ContextAction) -> Result<Option<BlockId>> {
        let Some(target) = self.interaction.context_target.take() else {
            return Ok(None);
        };
        debug!("Context action {:?} on block {}", action, target);
        match action {
            ContextAction::Delete => self.delete_block(target).map(|_| None),
            ContextAction::Duplicate => self.duplicate_block(target).map(Some),
            ContextAction::ToggleDisabled => self.toggle_disabled(target).map(|_| None),
        }
    }

    // Connection gesture

    pub fn begin_connection(&mut self, port: PortRef) -> Result<Option<PortRef>> {
        let picked_up = self.graph.port(port).map(|p| p.is_input()).unwrap_or(false);
        let origin = self.interaction.begin_connection(&mut self.graph, port)?;
        if picked_up && origin.is_some() {
            self.file_manager.mark_modified();
        }
        Ok(origin)
    }

    /// Begin from the port under a world position, if any
    pub fn begin_connection_at(&mut self, point: Pos2) -> Result<Option<PortRef>> {
        match self.graph.find_port_at(point, self.config.port_pick_radius) {
            Some(port) => self.begin_connection(port),
            None => Ok(None),
        }
    }

    pub fn hover(&mut self, target: Option<PortRef>) -> bool {
        self.interaction.hover(&self.graph, target)
    }

    pub fn hover_at(&mut self, point: Pos2) -> bool {
        let target = self.input_port_at(point);
        self.interaction.hover(&self.graph, target)
    }

    pub fn complete_connection(&mut self, target: PortRef) -> Result<Option<WireId>> {
        let wire = self.interaction.complete_connection(&mut self.graph, target)?;
        if wire.is_some() {
            self.file_manager.mark_modified();
        }
        Ok(wire)
    }

    /// Drop at a world position; open space cancels the gesture
    pub fn complete_connection_at(&mut self, point: Pos2) -> Result<Option<WireId>> {
        match self.input_port_at(point) {
            Some(target) => self.complete_connection(target),
            None => {
                self.cancel_connection();
                Ok(None)
            }
        }
    }

    pub fn cancel_connection(&mut self) {
        self.interaction.cancel_connection();
    }

    fn input_port_at(&self, point: Pos2) -> Option<PortRef> {
        self.graph
            .find_port_at(point, self.config.port_drop_radius)
            .filter(|port| self.graph.port(*port).map(|p| p.is_input()).unwrap_or(false))
    }

    // Custom code

    /// Code shown when the editor opens; a template when nothing is stored yet
    pub fn open_code_editor(&self, id: BlockId) -> Result<String> {
        let block = self.graph.block(id).ok_or(GraphError::BlockNotFound(id))?;
        if !block.has_inline_code() {
            return Err(GraphError::InlineCodeUnsupported(id));
        }
        Ok(match block.inline_code() {
            Some(code) if !code.is_empty() => code.to_string(),
            _ => constants::editor::CODE_TEMPLATE.to_string(),
        })
    }

    pub fn save_code(&mut self, id: BlockId, code: &str) -> Result<()> {
        self.graph.set_inline_code(id, code)?;
        debug!("Saved {} bytes of code on block {}", code.len(), id);
        self.file_manager.mark_modified();
        Ok(())
    }

    // Export

    pub fn export_json(&self) -> std::result::Result<String, ExportError> {
        self.file_manager.export_json(&self.graph)
    }

    pub fn export_to_file(&mut self, path: &Path) -> std::result::Result<(), ExportError> {
        self.file_manager.export_to_file(path, &self.graph)?;
        info!("Session saved as {}", self.file_manager.get_file_display_name());
        Ok(())
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.file_manager.has_unsaved_changes()
    }
}
