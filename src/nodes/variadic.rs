//! Variadic ("...params") input groups
//!
//! A group is the run of input ports on one block that share a name and are
//! flagged variadic. After every connect or disconnect that touches a group it
//! is rebalanced so that exactly one empty spare slot follows the last wired
//! slot: a spare is appended when the tail gets wired, surplus empty tail
//! slots are dropped otherwise. Wires never move between slots, so empty
//! slots in the middle of a group stay until `remove_variadic_slot` closes
//! them.
//!
//! A slot is never removed while a wire ends on it.

use log::debug;

use super::block::BlockId;
use super::graph::Graph;
use super::port::{PortId, PortRef};
use crate::error::{GraphError, Result};

impl Graph {
    pub(crate) fn rebalance_variadic_group(&mut self, block_id: BlockId, name: &str) -> Result<()> {
        let group = self
            .block(block_id)
            .ok_or(GraphError::BlockNotFound(block_id))?
            .variadic_group(name);
        let Some(&tail) = group.last() else {
            return Ok(());
        };

        let wired: Vec<bool> = group
            .iter()
            .map(|&port| self.incoming_wire(PortRef::new(block_id, port)).is_some())
            .collect();
        let keep = wired.iter().rposition(|w| *w).map_or(1, |last| last + 2);

        if keep > group.len() {
            let block = self
                .block_mut(block_id)
                .ok_or(GraphError::BlockNotFound(block_id))?;
            if let Some(spare) = block.insert_variadic_slot_after(tail) {
                debug!("Appended spare slot {} to group '{}' on block {}", spare, name, block_id);
            }
        } else {
            for &surplus in group[keep..].iter().rev() {
                self.remove_variadic_port(block_id, name, surplus)?;
                debug!("Trimmed surplus slot {} from group '{}' on block {}", surplus, name, block_id);
            }
        }
        Ok(())
    }

    fn remove_variadic_port(&mut self, block_id: BlockId, group: &str, port: PortId) -> Result<()> {
        let port_ref = PortRef::new(block_id, port);
        if self.incoming_wire(port_ref).is_some() {
            return Err(GraphError::VariadicCompactionConflict {
                group: group.to_string(),
                port: port_ref,
            });
        }
        if let Some(block) = self.block_mut(block_id) {
            block.remove_input_port(port);
        }
        Ok(())
    }

    /// Removes one empty slot of a variadic group, closing the gap it left.
    ///
    /// Fails with `VariadicCompactionConflict` while a wire still ends on the
    /// slot. The trailing spare is always kept, so removing it (or the only
    /// slot of a group) leaves the graph unchanged.
    pub fn remove_variadic_slot(&mut self, port: PortRef) -> Result<()> {
        let group = match self.port(port) {
            Some(p) if p.is_variadic => p.name.clone(),
            Some(_) => return Err(GraphError::NotVariadic(port)),
            None => return Err(GraphError::PortNotFound(port)),
        };
        if self.incoming_wire(port).is_some() {
            return Err(GraphError::VariadicCompactionConflict { group, port });
        }
        let slots = self
            .block(port.block)
            .map(|b| b.variadic_group(&group))
            .unwrap_or_default();
        if slots.last() == Some(&port.port) {
            return Ok(());
        }

        let checkpoint = self.checkpoint(port.block);
        self.remove_variadic_port(port.block, &group, port.port)?;
        if let Err(err) = self.rebalance_variadic_group(port.block, &group) {
            self.restore(checkpoint);
            return Err(err);
        }
        debug!("Closed empty slot {} in group '{}'", port, group);
        Ok(())
    }
}
