use serde::{Deserialize, Serialize};

/// Kind of a positioned visual node, named the way the design tool names them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum NodeKind {
    Document,
    Page,
    Frame,
    Rectangle,
    Text,
}

/// Absolute position and size in page coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// True when `other` lies entirely inside this box.
    pub fn contains(&self, other: &BoundingBox) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.x + other.width <= self.x + self.width
            && other.bottom() <= self.bottom()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FontStyle {
    Normal,
    Italic,
}

/// Font and fill description for the importer.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Style {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_style: Option<FontStyle>,
    /// Hex fill color, e.g. `#1F2937`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
}

/// A node in the derived visual-geometry tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutNode {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    #[serde(default)]
    pub children: Vec<LayoutNode>,
    #[serde(rename = "absoluteBoundingBox")]
    pub bounding_box: BoundingBox,
    #[serde(rename = "characters", default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<Style>,
}

impl LayoutNode {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        kind: NodeKind,
        bounding_box: BoundingBox,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            children: Vec::new(),
            bounding_box,
            content: None,
            style: None,
        }
    }

    pub fn with_children(mut self, children: Vec<LayoutNode>) -> Self {
        self.children = children;
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = Some(style);
        self
    }

    /// Wrap a page into the `DOCUMENT` root the importer expects.
    pub fn to_design_document(self, name: &str) -> LayoutNode {
        let bounding_box = self.bounding_box;
        LayoutNode::new("0:0", name, NodeKind::Document, bounding_box).with_children(vec![self])
    }

    /// Depth-first search by id.
    pub fn find(&self, id: &str) -> Option<&LayoutNode> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }

    /// Pre-order traversal of this node and all descendants.
    pub fn walk(&self) -> Vec<&LayoutNode> {
        let mut out = vec![self];
        for child in &self.children {
            out.extend(child.walk());
        }
        out
    }
}
