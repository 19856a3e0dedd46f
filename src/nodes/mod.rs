//! Block system - Core data structures for the block graph

// Core block system modules
pub mod block;
pub mod factory;
pub mod graph;
pub mod port;
pub mod snapshot;
pub mod variadic;
pub mod wire;

mod builtin;

// Re-export core types
pub use block::{Block, BlockId, LayoutMetrics};
pub use graph::{Graph, PortConnections};
pub use port::{LiteralValue, Port, PortDirection, PortId, PortRef};
pub use snapshot::{BlockSnapshot, InputSnapshot, OutputSnapshot, SnapshotPosition};
pub use wire::{check_connection, Wire, WireId};

// Re-export factory types
pub use factory::{
    BlockDefinition, DefinitionRegistry, InputDefinition, OutputDefinition, PinShape, PortType,
};
