use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use super::dialogue::DialogueNode;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("contract violation: {0}")]
    Contract(String),
}

/// Scene and sequence identity of a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    /// Canonical `SCENE_NN`.
    pub scene: String,
    /// `SEQUENCE_` plus the caller's identifier, suffixes included.
    pub sequence: String,
    pub title: String,
    /// ISO-8601, UTC.
    pub timestamp: String,
}

/// A versioned dialogue document: metadata plus ordered dialogue nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogueDocument {
    pub metadata: Metadata,
    pub dialogues: Vec<DialogueNode>,
}

impl DialogueDocument {
    /// The clean export shape: `{ "dialogues": [...] }`.
    pub fn to_export_json(&self) -> serde_json::Value {
        serde_json::json!({ "dialogues": self.dialogues })
    }

    pub fn to_json_pretty(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a full document, metadata included.
    ///
    /// Known node tags with the wrong fields are rejected; unknown tags
    /// are kept for the layout fallback.
    pub fn from_json(input: &str) -> Result<DialogueDocument, DocumentError> {
        let value: serde_json::Value = serde_json::from_str(input)?;
        Self::from_value(value)
    }

    pub fn from_value(value: serde_json::Value) -> Result<DialogueDocument, DocumentError> {
        for field in ["metadata", "dialogues"] {
            if value.get(field).is_none() {
                return Err(DocumentError::Contract(format!(
                    "document is missing '{field}'"
                )));
            }
        }
        serde_json::from_value(value).map_err(|e| DocumentError::Contract(e.to_string()))
    }

    /// Load one document, or a JSON array of documents, from a file.
    pub fn load_all(path: &Path) -> Result<Vec<DialogueDocument>, DocumentError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_all(&contents)
    }

    pub fn parse_all(input: &str) -> Result<Vec<DialogueDocument>, DocumentError> {
        let value: serde_json::Value = serde_json::from_str(input)?;
        match value {
            serde_json::Value::Array(items) => items.into_iter().map(Self::from_value).collect(),
            value @ serde_json::Value::Object(_) => Ok(vec![Self::from_value(value)?]),
            _ => Err(DocumentError::Contract(
                "expected a document object or an array of documents".to_string(),
            )),
        }
    }

    /// Data-quality defects: mismatched choice targets and unrecognized nodes.
    pub fn quality_issues(&self) -> Vec<String> {
        let mut issues = Vec::new();
        for (i, node) in self.dialogues.iter().enumerate() {
            if let Some(defect) = node.choice_defect() {
                issues.push(format!(
                    "{} {} dialogue {}: {}",
                    self.metadata.scene,
                    self.metadata.sequence,
                    i + 1,
                    defect
                ));
            }
            if matches!(node, DialogueNode::Unrecognized(_)) {
                issues.push(format!(
                    "{} {} dialogue {}: unrecognized node type",
                    self.metadata.scene,
                    self.metadata.sequence,
                    i + 1
                ));
            }
        }
        issues
    }
}
