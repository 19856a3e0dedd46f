//! Block graph data structures and operations

use egui::{Pos2, Vec2};
use log::{debug, warn};
use serde::Serialize;

use super::block::{Block, BlockId};
use super::port::{LiteralValue, Port, PortDirection, PortRef};
use super::snapshot::BlockSnapshot;
use super::wire::{Wire, WireId};
use crate::error::{GraphError, Result};

/// Blocks connected to one port, for inspectors
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortConnections {
    pub port_name: String,
    pub port: PortRef,
    /// Source blocks for an input, target blocks for an output
    pub blocks: Vec<BlockId>,
}

/// Saved state of one block and the wire set, restored when a mutation fails
pub(crate) struct Checkpoint {
    block: Option<Block>,
    wires: Vec<Wire>,
}

/// A graph containing blocks and the wires between their ports
#[derive(Debug, Clone)]
pub struct Graph {
    pub(crate) blocks: Vec<Block>,
    pub(crate) wires: Vec<Wire>,
    next_block_id: BlockId,
    pub(crate) next_wire_id: WireId,
}

impl Graph {
    /// Creates a new empty graph
    pub fn new() -> Self {
        Self {
            blocks: Vec::new(),
            wires: Vec::new(),
            next_block_id: 1,
            next_wire_id: 1,
        }
    }

    /// Adds a block to the graph and returns its freshly assigned ID
    pub fn add_block(&mut self, mut block: Block) -> BlockId {
        let id = self.next_block_id;
        self.next_block_id += 1;
        block.assign_id(id);
        debug!("Added block {} '{}'", id, block.title);
        self.blocks.push(block);
        id
    }

    /// Removes a block and every wire touching it
    pub fn remove_block(&mut self, id: BlockId) -> Option<Block> {
        let index = self.blocks.iter().position(|b| b.id() == id)?;

        let mut affected_groups: Vec<(BlockId, String)> = Vec::new();
        let mut removed = 0;
        let mut kept = Vec::with_capacity(self.wires.len());
        for wire in std::mem::take(&mut self.wires) {
            if !wire.touches_block(id) {
                kept.push(wire);
                continue;
            }
            removed += 1;
            if wire.target.block != id {
                if let Some(port) = self.port(wire.target).filter(|p| p.is_variadic) {
                    let group = (wire.target.block, port.name.clone());
                    if !affected_groups.contains(&group) {
                        affected_groups.push(group);
                    }
                }
            }
        }
        self.wires = kept;
        let block = self.blocks.remove(index);
        debug!("Removed block {} '{}' and {} wire(s)", id, block.title, removed);

        for (block_id, group) in affected_groups {
            if let Err(err) = self.rebalance_variadic_group(block_id, &group) {
                warn!("Could not rebalance group '{}' on block {}: {}", group, block_id, err);
            }
        }
        Some(block)
    }

    /// Adds a disconnected copy of a block, carrying over input literals.
    ///
    /// Variadic groups are grown to the source's size first so every literal
    /// lands on the port at the same slot.
    pub fn duplicate_block(&mut self, id: BlockId, offset: Vec2) -> Result<BlockId> {
        let source = self.block(id).ok_or(GraphError::BlockNotFound(id))?;
        let mut copy = Block::new(source.definition().clone(), source.position() + offset)
            .with_layout(source.layout());

        let groups: Vec<(String, usize)> = source
            .definition()
            .inputs
            .iter()
            .filter(|input| input.is_variadic)
            .map(|input| (input.name.clone(), source.variadic_group(&input.name).len()))
            .collect();
        for (group, size) in groups {
            while copy.variadic_group(&group).len() < size {
                let Some(&tail) = copy.variadic_group(&group).last() else {
                    break;
                };
                if copy.insert_variadic_slot_after(tail).is_none() {
                    break;
                }
            }
        }

        let literals: Vec<(usize, Option<LiteralValue>)> = source
            .inputs()
            .iter()
            .map(|p| (p.slot_index, p.literal_value.clone()))
            .collect();
        let targets: Vec<(usize, usize)> = copy
            .inputs()
            .iter()
            .map(|p| (p.slot_index, p.id))
            .collect();
        for (slot, port_id) in targets {
            if let Some((_, value)) = literals.iter().find(|(s, _)| *s == slot) {
                if let Some(port) = copy.port_mut(port_id) {
                    port.literal_value = value.clone();
                }
            }
        }

        let new_id = self.add_block(copy);
        debug!("Duplicated block {} as {}", id, new_id);
        Ok(new_id)
    }

    pub fn block(&self, id: BlockId) -> Option<&Block> {
        self.blocks.iter().find(|b| b.id() == id)
    }

    pub fn block_mut(&mut self, id: BlockId) -> Option<&mut Block> {
        self.blocks.iter_mut().find(|b| b.id() == id)
    }

    /// Blocks in insertion order
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn wires(&self) -> &[Wire] {
        &self.wires
    }

    pub fn wire(&self, id: WireId) -> Option<&Wire> {
        self.wires.iter().find(|w| w.id == id)
    }

    pub fn port(&self, port: PortRef) -> Option<&Port> {
        self.block(port.block)?.port(port.port)
    }

    /// The single wire feeding an input port, if any
    pub fn incoming_wire(&self, input: PortRef) -> Option<&Wire> {
        self.wires.iter().find(|w| w.target == input)
    }

    /// Wires leaving an output port
    pub fn outgoing_wires(&self, output: PortRef) -> impl Iterator<Item = &Wire> + '_ {
        self.wires.iter().filter(move |w| w.source == output)
    }

    pub fn wires_touching(&self, block: BlockId) -> impl Iterator<Item = &Wire> + '_ {
        self.wires.iter().filter(move |w| w.touches_block(block))
    }

    pub fn connected_source_blocks_of(&self, input: PortRef) -> Vec<BlockId> {
        self.wires
            .iter()
            .filter(|w| w.target == input)
            .map(|w| w.source.block)
            .collect()
    }

    pub fn connected_target_blocks_of(&self, output: PortRef) -> Vec<BlockId> {
        self.outgoing_wires(output).map(|w| w.target.block).collect()
    }

    /// Per input port, the blocks wired into it
    pub fn get_connected_inputs(&self, block: BlockId) -> Result<Vec<PortConnections>> {
        let block = self.block(block).ok_or(GraphError::BlockNotFound(block))?;
        Ok(block
            .inputs()
            .iter()
            .map(|p| PortConnections {
                port_name: p.name.clone(),
                port: p.port_ref(),
                blocks: self.connected_source_blocks_of(p.port_ref()),
            })
            .collect())
    }

    /// Per output port, the blocks it feeds
    pub fn get_connected_outputs(&self, block: BlockId) -> Result<Vec<PortConnections>> {
        let block = self.block(block).ok_or(GraphError::BlockNotFound(block))?;
        Ok(block
            .outputs()
            .iter()
            .map(|p| PortConnections {
                port_name: p.name.clone(),
                port: p.port_ref(),
                blocks: self.connected_target_blocks_of(p.port_ref()),
            })
            .collect())
    }

    pub fn move_block(&mut self, id: BlockId, position: Pos2) -> Result<()> {
        self.block_mut(id)
            .ok_or(GraphError::BlockNotFound(id))?
            .set_position(position);
        Ok(())
    }

    /// Sets or clears the literal of an input port
    pub fn set_literal(&mut self, port: PortRef, value: Option<LiteralValue>) -> Result<()> {
        let target = self.port(port).ok_or(GraphError::PortNotFound(port))?;
        if target.direction != PortDirection::Input {
            return Err(GraphError::InvalidLiteral {
                port,
                reason: "literals are only stored on input ports".to_string(),
            });
        }
        if let Some(value) = &value {
            target
                .accepts_literal(value)
                .map_err(|reason| GraphError::InvalidLiteral { port, reason })?;
        }
        if let Some(target) = self.block_mut(port.block).and_then(|b| b.port_mut(port.port)) {
            target.literal_value = value;
        }
        Ok(())
    }

    pub fn set_disabled(&mut self, id: BlockId, disabled: bool) -> Result<()> {
        self.block_mut(id).ok_or(GraphError::BlockNotFound(id))?.disabled = disabled;
        Ok(())
    }

    /// Flips the disabled flag and returns the new value
    pub fn toggle_disabled(&mut self, id: BlockId) -> Result<bool> {
        let block = self.block_mut(id).ok_or(GraphError::BlockNotFound(id))?;
        block.disabled = !block.disabled;
        Ok(block.disabled)
    }

    pub fn set_inline_code(&mut self, id: BlockId, code: impl Into<String>) -> Result<()> {
        self.block_mut(id)
            .ok_or(GraphError::BlockNotFound(id))?
            .set_inline_code(code)
    }

    pub fn inline_code(&self, id: BlockId) -> Result<Option<&str>> {
        Ok(self.block(id).ok_or(GraphError::BlockNotFound(id))?.inline_code())
    }

    /// Top-most block under a point (later blocks draw on top)
    pub fn find_block_at(&self, point: Pos2) -> Option<BlockId> {
        self.blocks.iter().rev().find(|b| b.contains(point)).map(|b| b.id())
    }

    /// Nearest port anchor within `radius` of a point
    pub fn find_port_at(&self, point: Pos2, radius: f32) -> Option<PortRef> {
        self.blocks
            .iter()
            .flat_map(|b| b.inputs().iter().chain(b.outputs().iter()))
            .map(|p| (p, (p.position - point).length()))
            .filter(|(_, distance)| *distance < radius)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(p, _)| p.port_ref())
    }

    /// Minimal export shape, one entry per block in insertion order
    pub fn export_snapshot(&self) -> Vec<BlockSnapshot> {
        self.blocks.iter().map(BlockSnapshot::from_block).collect()
    }

    pub(crate) fn checkpoint(&self, block: BlockId) -> Checkpoint {
        Checkpoint {
            block: self.block(block).cloned(),
            wires: self.wires.clone(),
        }
    }

    pub(crate) fn restore(&mut self, checkpoint: Checkpoint) {
        if let Some(saved) = checkpoint.block {
            if let Some(slot) = self.block_mut(saved.id()) {
                *slot = saved;
            }
        }
        self.wires = checkpoint.wires;
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}
