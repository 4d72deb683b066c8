//! The conversion pipeline: raw text → diagnostics + document → layout.
//!
//! Wires together the validator, parser, assembler and layout engine
//! behind one configured entry point.

use std::path::Path;
use thiserror::Error;

use crate::core::assembler::assemble;
use crate::core::layout::{layout_all_with, LayoutConfig, LayoutConfigError};
use crate::core::parser::parse;
use crate::core::validator::validate;
use crate::schema::dialogue::DialogueNode;
use crate::schema::document::{DialogueDocument, DocumentError};
use crate::schema::layout_node::LayoutNode;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("layout config error: {0}")]
    LayoutConfig(#[from] LayoutConfigError),
    #[error("document error: {0}")]
    Document(#[from] DocumentError),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result of converting one script: the document plus advisory diagnostics.
///
/// Diagnostics never block the conversion; an empty document with
/// diagnostics is a normal outcome.
#[derive(Debug, Clone)]
pub struct Conversion {
    pub document: DialogueDocument,
    pub diagnostics: Vec<String>,
}

/// The top-level dialogue engine. Built via `DialogueEngine::builder()`.
#[derive(Debug, Clone)]
pub struct DialogueEngine {
    layout: LayoutConfig,
    document_name: String,
}

/// Builder for constructing a `DialogueEngine`.
pub struct DialogueEngineBuilder {
    layout_config_path: Option<String>,
    document_name: Option<String>,
    /// Directly provided layout config (for testing without files).
    layout: Option<LayoutConfig>,
}

impl DialogueEngine {
    pub fn builder() -> DialogueEngineBuilder {
        DialogueEngineBuilder {
            layout_config_path: None,
            document_name: None,
            layout: None,
        }
    }

    pub fn layout_config(&self) -> &LayoutConfig {
        &self.layout
    }

    pub fn parse(&self, text: &str) -> Vec<DialogueNode> {
        parse(text)
    }

    pub fn validate(&self, text: &str) -> Vec<String> {
        validate(text)
    }

    /// Validate and parse one script, then assemble it under `scene`/`sequence`.
    pub fn convert(&self, text: &str, scene: &str, sequence: &str, title: &str) -> Conversion {
        let diagnostics = validate(text);
        let document = assemble(parse(text), scene, sequence, title);
        tracing::debug!(
            scene = %document.metadata.scene,
            sequence = %document.metadata.sequence,
            dialogues = document.dialogues.len(),
            diagnostics = diagnostics.len(),
            "converted script"
        );
        Conversion {
            document,
            diagnostics,
        }
    }

    /// Lay out documents into one page.
    pub fn layout(&self, documents: &[DialogueDocument]) -> LayoutNode {
        layout_all_with(documents, &self.layout)
    }

    /// The page wrapped in a `DOCUMENT` root for the design-tool importer.
    pub fn design_document(&self, documents: &[DialogueDocument]) -> LayoutNode {
        self.layout(documents).to_design_document(&self.document_name)
    }

    pub fn design_document_json(
        &self,
        documents: &[DialogueDocument],
    ) -> Result<String, PipelineError> {
        Ok(serde_json::to_string_pretty(&self.design_document(documents))?)
    }

    /// Lay out documents produced elsewhere (e.g. by an external converter).
    pub fn layout_json(&self, input: &str) -> Result<LayoutNode, PipelineError> {
        let documents = DialogueDocument::parse_all(input)?;
        Ok(self.design_document(&documents))
    }
}

impl DialogueEngineBuilder {
    pub fn layout_config_path(mut self, path: &str) -> Self {
        self.layout_config_path = Some(path.to_string());
        self
    }

    /// Name of the `DOCUMENT` root in design output.
    pub fn document_name(mut self, name: &str) -> Self {
        self.document_name = Some(name.to_string());
        self
    }

    /// Provide a layout config directly (for testing without files).
    pub fn with_layout_config(mut self, config: LayoutConfig) -> Self {
        self.layout = Some(config);
        self
    }

    pub fn build(self) -> Result<DialogueEngine, PipelineError> {
        // A config file overrides a directly provided config.
        let layout = match self.layout_config_path {
            Some(ref path) => LayoutConfig::load_from_ron(Path::new(path))?,
            None => self.layout.unwrap_or_default(),
        };
        layout.validate()?;

        Ok(DialogueEngine {
            layout,
            document_name: self
                .document_name
                .unwrap_or_else(|| "Dialogue Script".to_string()),
        })
    }
}
