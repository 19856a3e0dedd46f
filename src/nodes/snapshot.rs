//! Minimal export shape handed to external exporters and runners
//!
//! Connectivity is deliberately absent; consumers that need it query the
//! graph's connection helpers.

use serde::{Deserialize, Serialize};

use super::block::{Block, BlockId};
use super::port::LiteralValue;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SnapshotPosition {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputSnapshot {
    pub name: String,
    pub literal_value: Option<LiteralValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputSnapshot {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockSnapshot {
    pub id: BlockId,
    pub name: String,
    pub position: SnapshotPosition,
    pub inputs: Vec<InputSnapshot>,
    pub outputs: Vec<OutputSnapshot>,
}

impl BlockSnapshot {
    pub fn from_block(block: &Block) -> Self {
        Self {
            id: block.id(),
            name: block.title.clone(),
            position: SnapshotPosition {
                x: block.position().x,
                y: block.position().y,
            },
            inputs: block
                .inputs()
                .iter()
                .map(|p| InputSnapshot {
                    name: p.name.clone(),
                    literal_value: p.literal_value.clone(),
                })
                .collect(),
            outputs: block
                .outputs()
                .iter()
                .map(|p| OutputSnapshot { name: p.name.clone() })
                .collect(),
        }
    }
}
