//! Wires and the connection rules that create and destroy them

use log::{debug, warn};

use super::block::BlockId;
use super::factory::PortType;
use super::graph::Graph;
use super::port::{Port, PortDirection, PortRef};
use crate::error::{GraphError, Result};

/// Unique identifier for a wire
pub type WireId = usize;

/// A directed edge from an output port to an input port
#[derive(Debug, Clone, PartialEq)]
pub struct Wire {
    pub id: WireId,
    pub source: PortRef,
    pub target: PortRef,
    /// Rendering hint: type compatibility of the endpoints when created
    pub valid: bool,
}

impl Wire {
    pub(crate) fn new(id: WireId, source: PortRef, target: PortRef, valid: bool) -> Self {
        Self {
            id,
            source,
            target,
            valid,
        }
    }

    /// Whether either endpoint belongs to `block`
    pub fn touches_block(&self, block: BlockId) -> bool {
        self.source.block == block || self.target.block == block
    }
}

/// Checks direction and type rules for a prospective wire
pub fn check_connection(source: &Port, target: &Port) -> Result<()> {
    if source.direction != PortDirection::Output || target.direction != PortDirection::Input {
        return Err(GraphError::Direction {
            source_direction: source.direction,
            target_direction: target.direction,
        });
    }
    if !PortType::compatible(source.port_type, target.port_type) {
        return Err(GraphError::IncompatibleType {
            source_type: source.port_type,
            target_type: target.port_type,
        });
    }
    Ok(())
}

impl Graph {
    /// Connects an output to an input, replacing any wire already feeding the
    /// input. A variadic group on the target block is rebalanced before this
    /// returns.
    pub fn connect(&mut self, source: PortRef, target: PortRef) -> Result<WireId> {
        let source_port = self.port(source).ok_or(GraphError::PortNotFound(source))?;
        let target_port = self.port(target).ok_or(GraphError::PortNotFound(target))?;

        if let Err(err) = check_connection(source_port, target_port) {
            warn!("Rejected connection {} -> {}: {}", source, target, err);
            return Err(err);
        }
        let group = target_port.is_variadic.then(|| target_port.name.clone());

        let checkpoint = group.as_ref().map(|_| self.checkpoint(target.block));
        if let Some(index) = self.wires.iter().position(|w| w.target == target) {
            let replaced = self.wires.remove(index);
            debug!("Replacing wire {} into {}", replaced.id, target);
        }

        let id = self.next_wire_id;
        self.next_wire_id += 1;
        self.wires.push(Wire::new(id, source, target, true));
        debug!("Created wire {}: {} -> {}", id, source, target);

        if let Some(group) = group {
            if let Err(err) = self.rebalance_variadic_group(target.block, &group) {
                if let Some(checkpoint) = checkpoint {
                    self.restore(checkpoint);
                }
                return Err(err);
            }
        }
        Ok(id)
    }

    /// Removes a wire, rebalancing the variadic group it fed
    pub fn disconnect(&mut self, wire: WireId) -> Result<Wire> {
        let index = self
            .wires
            .iter()
            .position(|w| w.id == wire)
            .ok_or(GraphError::WireNotFound(wire))?;
        let target = self.wires[index].target;
        let group = self
            .port(target)
            .filter(|p| p.is_variadic)
            .map(|p| p.name.clone());

        let checkpoint = group.as_ref().map(|_| self.checkpoint(target.block));
        let removed = self.wires.remove(index);
        debug!("Removed wire {}: {} -> {}", removed.id, removed.source, removed.target);

        if let Some(group) = group {
            if let Err(err) = self.rebalance_variadic_group(target.block, &group) {
                if let Some(checkpoint) = checkpoint {
                    self.restore(checkpoint);
                }
                return Err(err);
            }
        }
        Ok(removed)
    }

    /// Disconnects whatever wire feeds `input`, if any
    pub fn disconnect_input(&mut self, input: PortRef) -> Result<Option<Wire>> {
        match self.incoming_wire(input).map(|w| w.id) {
            Some(id) => self.disconnect(id).map(Some),
            None => Ok(None),
        }
    }
}
