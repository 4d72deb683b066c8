//! WASM bindings for dialogue-engine: powers the browser converter UI.

use wasm_bindgen::prelude::*;

use dialogue_engine::core::layout::LayoutConfig;
use dialogue_engine::core::pipeline::DialogueEngine;
use dialogue_engine::core::validator::validate;
use dialogue_engine::schema::document::DialogueDocument;

// ---------------------------------------------------------------------------
// JSON helper types for communication across the WASM boundary
// ---------------------------------------------------------------------------
#[derive(serde::Serialize)]
struct ConversionOutput<'a> {
    document: &'a DialogueDocument,
    diagnostics: &'a [String],
}

#[derive(serde::Serialize)]
struct SequenceInfo {
    scene: String,
    sequence: String,
    title: String,
    dialogues: usize,
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, JsError> {
    serde_json::to_string(value).map_err(|e| JsError::new(&format!("Serialization error: {e}")))
}

// ---------------------------------------------------------------------------
// Stateless helpers
// ---------------------------------------------------------------------------

/// Diagnostics for raw script text, as a JSON array of strings.
#[wasm_bindgen]
pub fn validate_script(text: &str) -> Result<String, JsError> {
    to_json(&validate(text))
}

/// The clean `{ "dialogues": [...] }` export for a document JSON string.
#[wasm_bindgen]
pub fn export_dialogues(document_json: &str) -> Result<String, JsError> {
    let document = DialogueDocument::from_json(document_json)
        .map_err(|e| JsError::new(&format!("Invalid document JSON: {e}")))?;
    to_json(&document.to_export_json())
}

// ---------------------------------------------------------------------------
// DialogueStudio: the main exported struct
// ---------------------------------------------------------------------------
#[wasm_bindgen]
pub struct DialogueStudio {
    engine: DialogueEngine,
    documents: Vec<DialogueDocument>,
}

#[wasm_bindgen]
impl DialogueStudio {
    /// Create a studio, optionally with a RON layout config.
    #[wasm_bindgen(constructor)]
    pub fn new(layout_ron: Option<String>) -> Result<DialogueStudio, JsError> {
        let mut builder = DialogueEngine::builder();
        if let Some(src) = layout_ron.filter(|s| !s.trim().is_empty()) {
            let config = LayoutConfig::parse_ron(&src)
                .map_err(|e| JsError::new(&format!("Layout config error: {e}")))?;
            builder = builder.with_layout_config(config);
        }
        let engine = builder
            .build()
            .map_err(|e| JsError::new(&format!("Engine build error: {e}")))?;
        Ok(DialogueStudio {
            engine,
            documents: Vec::new(),
        })
    }

    /// Convert a script and keep the document for layout.
    ///
    /// Returns `{ "document": {...}, "diagnostics": [...] }`.
    pub fn add_script(
        &mut self,
        text: &str,
        scene: &str,
        sequence: &str,
        title: &str,
    ) -> Result<String, JsError> {
        let conversion = self.engine.convert(text, scene, sequence, title);
        let output = to_json(&ConversionOutput {
            document: &conversion.document,
            diagnostics: &conversion.diagnostics,
        })?;
        self.replace(conversion.document);
        Ok(output)
    }

    /// Add documents produced elsewhere (one object or an array).
    ///
    /// These are appended, not replaced, so documents sharing a
    /// scene+sequence merge in the layout.
    pub fn add_documents(&mut self, json: &str) -> Result<usize, JsError> {
        let documents = DialogueDocument::parse_all(json)
            .map_err(|e| JsError::new(&format!("Invalid document JSON: {e}")))?;
        let count = documents.len();
        self.documents.extend(documents);
        Ok(count)
    }

    /// Summary of loaded sequences as a JSON array.
    pub fn sequences(&self) -> Result<String, JsError> {
        let infos: Vec<SequenceInfo> = self
            .documents
            .iter()
            .map(|doc| SequenceInfo {
                scene: doc.metadata.scene.clone(),
                sequence: doc.metadata.sequence.clone(),
                title: doc.metadata.title.clone(),
                dialogues: doc.dialogues.len(),
            })
            .collect();
        to_json(&infos)
    }

    /// Design-tool document JSON for everything loaded so far.
    pub fn layout(&self) -> Result<String, JsError> {
        to_json(&self.engine.design_document(&self.documents))
    }

    pub fn clear(&mut self) {
        self.documents.clear();
    }
}

impl DialogueStudio {
    /// Editing a sequence re-parses it; the old document is replaced whole.
    fn replace(&mut self, document: DialogueDocument) {
        let slot = self.documents.iter().position(|d| {
            d.metadata.scene == document.metadata.scene
                && d.metadata.sequence == document.metadata.sequence
        });
        match slot {
            Some(i) => self.documents[i] = document,
            None => self.documents.push(document),
        }
    }
}
