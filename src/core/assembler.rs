//! Wraps parsed dialogue nodes with scene/sequence metadata.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::schema::dialogue::DialogueNode;
use crate::schema::document::{DialogueDocument, Metadata};

const SCENE_PREFIX: &str = "SCENE_";
const SEQUENCE_PREFIX: &str = "SEQUENCE_";

/// Assemble a document stamped with the current time.
pub fn assemble(
    nodes: Vec<DialogueNode>,
    scene: &str,
    sequence_raw: &str,
    title: &str,
) -> DialogueDocument {
    assemble_at(nodes, scene, sequence_raw, title, Utc::now())
}

/// Assemble a document with an explicit timestamp.
pub fn assemble_at(
    nodes: Vec<DialogueNode>,
    scene: &str,
    sequence_raw: &str,
    title: &str,
    at: DateTime<Utc>,
) -> DialogueDocument {
    let title = if title.trim().is_empty() {
        format!("Dialogue {}-{}", scene.trim(), sequence_raw.trim())
    } else {
        title.to_string()
    };
    DialogueDocument {
        metadata: Metadata {
            scene: canonical_scene(scene),
            sequence: canonical_sequence(sequence_raw),
            title,
            timestamp: at.to_rfc3339_opts(SecondsFormat::Millis, true),
        },
        dialogues: nodes,
    }
}

/// `"2"` → `"SCENE_02"`. Non-numeric identifiers are kept as given.
pub fn canonical_scene(scene: &str) -> String {
    let raw = scene.trim();
    let raw = raw.strip_prefix(SCENE_PREFIX).unwrap_or(raw);
    match raw.parse::<u32>() {
        Ok(number) => format!("{SCENE_PREFIX}{number:02}"),
        Err(_) => format!("{SCENE_PREFIX}{raw}"),
    }
}

/// `"05A"` → `"SEQUENCE_05A"`, verbatim: no padding, suffixes kept.
pub fn canonical_sequence(sequence_raw: &str) -> String {
    let raw = sequence_raw.trim();
    let raw = raw.strip_prefix(SEQUENCE_PREFIX).unwrap_or(raw);
    format!("{SEQUENCE_PREFIX}{raw}")
}
