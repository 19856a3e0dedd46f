//! Block interaction handling (connection gestures, context menu target)

use log::debug;

use crate::error::{GraphError, Result};
use crate::nodes::{BlockId, Graph, PortDirection, PortRef, PortType, WireId};

/// Manages the in-progress connection gesture and the context menu target
#[derive(Debug, Clone)]
pub struct InteractionManager {
    connecting_from: Option<PortRef>,
    hover_target: Option<PortRef>,
    preview_valid: bool,
    pub context_target: Option<BlockId>,
}

impl InteractionManager {
    /// Creates a new interaction manager
    pub fn new() -> Self {
        Self {
            connecting_from: None,
            hover_target: None,
            preview_valid: true,
            context_target: None,
        }
    }

    /// Start a connection gesture from a port.
    ///
    /// From an output the gesture starts there. From an input that already
    /// has a wire, the wire is disconnected and the gesture resumes from its
    /// source, moving the existing wire's endpoint. An unconnected input
    /// starts nothing. Returns the port the gesture drags from.
    pub fn begin_connection(&mut self, graph: &mut Graph, port: PortRef) -> Result<Option<PortRef>> {
        let direction = graph.port(port).ok_or(GraphError::PortNotFound(port))?.direction;
        let origin = match direction {
            PortDirection::Output => Some(port),
            PortDirection::Input => match graph.disconnect_input(port)? {
                Some(wire) => {
                    debug!("Picked up wire {} from {}, dragging from {}", wire.id, port, wire.source);
                    Some(wire.source)
                }
                None => None,
            },
        };
        self.connecting_from = origin;
        self.hover_target = None;
        self.preview_valid = true;
        Ok(origin)
    }

    /// Update the hovered input; returns whether dropping there would succeed.
    /// Open space counts as valid.
    pub fn hover(&mut self, graph: &Graph, target: Option<PortRef>) -> bool {
        let source_type = self
            .connecting_from
            .and_then(|source| graph.port(source))
            .map(|p| p.port_type);
        let target = target.and_then(|t| graph.port(t)).filter(|p| p.is_input());

        self.hover_target = target.map(|p| p.port_ref());
        self.preview_valid = match (source_type, target) {
            (Some(source_type), Some(target)) => PortType::compatible(source_type, target.port_type),
            _ => true,
        };
        self.preview_valid
    }

    /// Finish the gesture on `target`. The gesture ends whether or not the
    /// connection is accepted.
    pub fn complete_connection(&mut self, graph: &mut Graph, target: PortRef) -> Result<Option<WireId>> {
        let Some(source) = self.connecting_from else {
            return Ok(None);
        };
        self.cancel_connection();
        graph.connect(source, target).map(Some)
    }

    /// Cancel current connection
    pub fn cancel_connection(&mut self) {
        self.connecting_from = None;
        self.hover_target = None;
        self.preview_valid = true;
    }

    pub fn is_connecting(&self) -> bool {
        self.connecting_from.is_some()
    }

    pub fn connecting_from(&self) -> Option<PortRef> {
        self.connecting_from
    }

    pub fn hover_target(&self) -> Option<PortRef> {
        self.hover_target
    }

    /// Rendering hint for the dragged wire
    pub fn preview_valid(&self) -> bool {
        self.preview_valid
    }
}

impl Default for InteractionManager {
    fn default() -> Self {
        Self::new()
    }
}
