//! Blockgraph core library
//!
//! Block definitions, the connectivity graph with its variadic port groups,
//! and a headless editing session on top of them.

pub mod config;
pub mod constants;
pub mod editor;
pub mod error;
pub mod nodes;

// Re-export commonly used types
pub use config::EditorConfig;
pub use editor::{ContextAction, EditorSession};
pub use error::{ConfigError, DefinitionError, ExportError, GraphError, Result};
pub use nodes::{
    Block, BlockDefinition, BlockId, DefinitionRegistry, Graph, LiteralValue, Port, PortDirection,
    PortRef, PortType, Wire, WireId,
};
