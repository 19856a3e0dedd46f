//! Application-wide constants and default values
//!
//! Centralized location for all hard-coded values to improve maintainability

/// Block layout constants
pub mod layout {
    /// Default block width in world units
    pub const BLOCK_WIDTH: f32 = 160.0;

    /// Height of the title header strip
    pub const HEADER_HEIGHT: f32 = 30.0;

    /// Vertical distance between two port slots
    pub const SLOT_SPACING: f32 = 25.0;

    /// Offset of the first slot below the header
    pub const FIRST_SLOT_OFFSET: f32 = 15.0;

    /// Padding below the last slot
    pub const BOTTOM_PADDING: f32 = 10.0;
}

/// Editor interaction constants
pub mod editor {
    /// Offset applied to a duplicated block
    pub const DUPLICATE_OFFSET: [f32; 2] = [20.0, 20.0];

    /// Grid size used to snap dropped blocks
    pub const GRID_SIZE: f32 = 20.0;

    /// Radius for picking a port when starting a connection
    pub const PORT_PICK_RADIUS: f32 = 10.0;

    /// Radius for dropping a connection on an input port
    pub const PORT_DROP_RADIUS: f32 = 15.0;

    /// Text shown when a custom code block is opened for the first time
    pub const CODE_TEMPLATE: &str = "// Custom block code\n// Inputs are available as input_1, input_2, ...\n";
}

/// Block definition constants
pub mod block {
    /// Header color used when a definition has none or an unparsable one
    pub const FALLBACK_COLOR: &str = "#444";
}

/// Configuration file location
pub mod config {
    /// Directory created under the platform config dir
    pub const APP_DIR: &str = "blockgraph";

    /// File name of the editor configuration
    pub const FILE_NAME: &str = "config.json";
}
