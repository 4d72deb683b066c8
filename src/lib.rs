//! Dialogue Engine: screenplay-style text to structured dialogue.
//!
//! Parses loosely structured script text (narration, character lines,
//! branching choices) into versioned dialogue documents, and lays those
//! documents out as a deterministic tree of positioned frames for a
//! design-tool importer.

pub mod core;
pub mod schema;
