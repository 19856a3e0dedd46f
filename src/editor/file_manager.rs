//! Export and modification tracking for the editing session

use std::path::{Path, PathBuf};

use log::info;

use crate::error::ExportError;
use crate::nodes::Graph;

/// Tracks where the graph was last exported and whether it changed since
pub struct FileManager {
    /// Last export path (None until the first export)
    current_file_path: Option<PathBuf>,
    /// Whether the graph has been modified since the last export
    is_modified: bool,
}

impl FileManager {
    pub fn new() -> Self {
        Self {
            current_file_path: None,
            is_modified: false,
        }
    }

    pub fn current_file_path(&self) -> Option<&PathBuf> {
        self.current_file_path.as_ref()
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.is_modified
    }

    pub fn mark_modified(&mut self) {
        self.is_modified = true;
    }

    pub fn mark_saved(&mut self) {
        self.is_modified = false;
    }

    /// Display name for the current export target, `*` suffixed when dirty
    pub fn get_file_display_name(&self) -> String {
        let name = self
            .current_file_path
            .as_ref()
            .and_then(|path| path.file_name())
            .and_then(|n| n.to_str())
            .unwrap_or("Untitled");
        if self.is_modified {
            format!("{}*", name)
        } else {
            name.to_string()
        }
    }

    /// Serialize the graph's export snapshot as pretty JSON
    pub fn export_json(&self, graph: &Graph) -> Result<String, ExportError> {
        Ok(serde_json::to_string_pretty(&graph.export_snapshot())?)
    }

    /// Write the export to `file_path` and remember it as the current file
    pub fn export_to_file(&mut self, file_path: &Path, graph: &Graph) -> Result<(), ExportError> {
        let json_content = self.export_json(graph)?;
        std::fs::write(file_path, json_content)?;

        self.current_file_path = Some(file_path.to_path_buf());
        self.is_modified = false;
        info!("Exported {} blocks to {}", graph.blocks().len(), file_path.display());
        Ok(())
    }

    /// Re-export to the remembered path
    pub fn export_file(&mut self, graph: &Graph) -> Result<bool, ExportError> {
        match self.current_file_path.clone() {
            Some(path) => self.export_to_file(&path, graph).map(|_| true),
            None => Ok(false),
        }
    }
}

impl Default for FileManager {
    fn default() -> Self {
        Self::new()
    }
}
