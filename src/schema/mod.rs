pub mod dialogue;
pub mod document;
pub mod layout_node;
