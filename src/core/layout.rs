//! Layout engine: turns dialogue documents into a tree of positioned frames.
//!
//! Geometry is fixed per node kind and never measures text, so the same
//! documents in the same order always produce identical bounding boxes.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::schema::dialogue::DialogueNode;
use crate::schema::document::DialogueDocument;
use crate::schema::layout_node::{BoundingBox, FontStyle, LayoutNode, NodeKind, Style};

#[derive(Debug, Error)]
pub enum LayoutConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("invalid layout config: {0}")]
    Invalid(String),
}

/// Every layout constant, in logical pixels. Missing RON fields take the
/// built-in defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub page_width: f64,
    pub min_page_height: f64,
    pub margin: f64,
    /// Horizontal inset of sequence frames within a scene, and of items
    /// within a sequence.
    pub inset: f64,
    pub header_height: f64,
    pub footer_height: f64,
    pub scene_header_height: f64,
    pub sequence_header_height: f64,
    pub item_height: f64,
    pub item_padding: f64,
    pub label_height: f64,
    pub option_spacing: f64,
    pub sequence_padding: f64,
    pub sequence_spacing: f64,
    pub scene_spacing: f64,
    pub font_family: String,
    pub title_font_size: f64,
    pub heading_font_size: f64,
    pub body_font_size: f64,
    pub page_fill: String,
    pub header_fill: String,
    pub scene_fill: String,
    pub sequence_fill: String,
    pub item_fill: String,
    pub text_fill: String,
    pub accent_fill: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            page_width: 1200.0,
            min_page_height: 1080.0,
            margin: 40.0,
            inset: 20.0,
            header_height: 120.0,
            footer_height: 80.0,
            scene_header_height: 80.0,
            sequence_header_height: 60.0,
            item_height: 100.0,
            item_padding: 12.0,
            label_height: 20.0,
            option_spacing: 24.0,
            sequence_padding: 40.0,
            sequence_spacing: 30.0,
            scene_spacing: 60.0,
            font_family: "Inter".to_string(),
            title_font_size: 32.0,
            heading_font_size: 20.0,
            body_font_size: 14.0,
            page_fill: "#F9FAFB".to_string(),
            header_fill: "#111827".to_string(),
            scene_fill: "#E5E7EB".to_string(),
            sequence_fill: "#FFFFFF".to_string(),
            item_fill: "#F3F4F6".to_string(),
            text_fill: "#1F2937".to_string(),
            accent_fill: "#2563EB".to_string(),
        }
    }
}

impl LayoutConfig {
    pub fn load_from_ron(path: &Path) -> Result<LayoutConfig, LayoutConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_ron(&contents)
    }

    pub fn parse_ron(input: &str) -> Result<LayoutConfig, LayoutConfigError> {
        let config: LayoutConfig = ron::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configs whose boxes would have no room for their children.
    pub fn validate(&self) -> Result<(), LayoutConfigError> {
        let sizes = [
            ("page_width", self.page_width),
            ("min_page_height", self.min_page_height),
            ("header_height", self.header_height),
            ("footer_height", self.footer_height),
            ("scene_header_height", self.scene_header_height),
            ("sequence_header_height", self.sequence_header_height),
            ("item_height", self.item_height),
            ("label_height", self.label_height),
            ("option_spacing", self.option_spacing),
        ];
        for (name, value) in sizes {
            if !(value.is_finite() && value > 0.0) {
                return Err(LayoutConfigError::Invalid(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        let gaps = [
            ("margin", self.margin),
            ("inset", self.inset),
            ("item_padding", self.item_padding),
            ("sequence_padding", self.sequence_padding),
            ("sequence_spacing", self.sequence_spacing),
            ("scene_spacing", self.scene_spacing),
        ];
        for (name, value) in gaps {
            if !(value.is_finite() && value >= 0.0) {
                return Err(LayoutConfigError::Invalid(format!(
                    "{name} must not be negative, got {value}"
                )));
            }
        }
        if self.item_width() <= 2.0 * self.item_padding {
            return Err(LayoutConfigError::Invalid(
                "page_width leaves no room for dialogue items".to_string(),
            ));
        }
        if self.item_height <= 2.0 * self.item_padding + self.label_height {
            return Err(LayoutConfigError::Invalid(
                "item_height must exceed twice item_padding plus label_height".to_string(),
            ));
        }
        Ok(())
    }

    fn content_width(&self) -> f64 {
        self.page_width - 2.0 * self.margin
    }

    fn sequence_width(&self) -> f64 {
        self.content_width() - 2.0 * self.inset
    }

    fn item_width(&self) -> f64 {
        self.sequence_width() - 2.0 * self.inset
    }

    /// Header + one fixed slot per dialogue node + padding.
    pub fn sequence_height(&self, dialogue_count: usize) -> f64 {
        self.sequence_header_height
            + dialogue_count as f64 * self.item_height
            + self.sequence_padding
    }

    fn text_style(&self, size: f64, weight: u16, font_style: FontStyle, fill: &str) -> Style {
        Style {
            font_family: Some(self.font_family.clone()),
            font_size: Some(size),
            font_weight: Some(weight),
            font_style: Some(font_style),
            fill: Some(fill.to_string()),
        }
    }

    fn body_style(&self, weight: u16, font_style: FontStyle, fill: &str) -> Style {
        self.text_style(self.body_font_size, weight, font_style, fill)
    }

    fn fill(&self, color: &str) -> Style {
        Style {
            fill: Some(color.to_string()),
            ..Style::default()
        }
    }
}

/// Documents sharing a scene+sequence, concatenated in input order.
#[derive(Debug)]
pub struct SequenceGroup<'a> {
    pub sequence: &'a str,
    /// Title of the first document in the group.
    pub title: &'a str,
    pub dialogues: Vec<&'a DialogueNode>,
}

#[derive(Debug)]
pub struct SceneGroup<'a> {
    pub scene: &'a str,
    pub sequences: Vec<SequenceGroup<'a>>,
}

impl SceneGroup<'_> {
    pub fn height(&self, config: &LayoutConfig) -> f64 {
        let sequences: f64 = self
            .sequences
            .iter()
            .map(|seq| config.sequence_height(seq.dialogues.len()))
            .sum();
        sequences
            + self.sequences.len() as f64 * config.sequence_spacing
            + config.scene_header_height
    }
}

/// Group by scene, then by sequence, both in first-seen order.
pub fn group_documents(documents: &[DialogueDocument]) -> Vec<SceneGroup<'_>> {
    let mut scenes: Vec<SceneGroup<'_>> = Vec::new();
    let mut scene_index: FxHashMap<&str, usize> = FxHashMap::default();
    let mut sequence_index: FxHashMap<(&str, &str), usize> = FxHashMap::default();

    for doc in documents {
        let scene = doc.metadata.scene.as_str();
        let sequence = doc.metadata.sequence.as_str();
        let si = *scene_index.entry(scene).or_insert_with(|| {
            scenes.push(SceneGroup {
                scene,
                sequences: Vec::new(),
            });
            scenes.len() - 1
        });
        let group = &mut scenes[si];
        let qi = *sequence_index.entry((scene, sequence)).or_insert_with(|| {
            group.sequences.push(SequenceGroup {
                sequence,
                title: doc.metadata.title.as_str(),
                dialogues: Vec::new(),
            });
            group.sequences.len() - 1
        });
        group.sequences[qi].dialogues.extend(doc.dialogues.iter());
    }
    scenes
}

/// Total page height, floored at the configured minimum.
pub fn page_height(scenes: &[SceneGroup<'_>], config: &LayoutConfig) -> f64 {
    let scenes_height: f64 = scenes.iter().map(|scene| scene.height(config)).sum();
    let content = scenes_height
        + scenes.len() as f64 * config.scene_spacing
        + config.header_height
        + config.footer_height;
    content.max(config.min_page_height)
}

/// Lay out documents with the built-in constants.
pub fn layout_all(documents: &[DialogueDocument]) -> LayoutNode {
    layout_all_with(documents, &LayoutConfig::default())
}

/// Lay out documents into one page frame.
pub fn layout_all_with(documents: &[DialogueDocument], config: &LayoutConfig) -> LayoutNode {
    for doc in documents {
        for issue in doc.quality_issues() {
            tracing::warn!(%issue, "data-quality defect in dialogue document");
        }
    }

    let scenes = group_documents(documents);
    let height = page_height(&scenes, config);
    let sequence_count: usize = scenes.iter().map(|scene| scene.sequences.len()).sum();
    let dialogue_count: usize = documents.iter().map(|doc| doc.dialogues.len()).sum();
    tracing::debug!(
        scenes = scenes.len(),
        sequences = sequence_count,
        dialogues = dialogue_count,
        height,
        "computed dialogue layout"
    );

    let mut children = vec![master_header(
        config,
        &format!(
            "{} scenes, {} sequences, {} dialogues",
            scenes.len(),
            sequence_count,
            dialogue_count
        ),
    )];
    let mut y = config.header_height;
    for (i, scene) in scenes.iter().enumerate() {
        y += config.scene_spacing;
        children.push(scene_frame(scene, &format!("scene:{i}"), y, config));
        y += scene.height(config);
    }
    children.push(master_footer(height, config));

    LayoutNode::new(
        "page",
        "Dialogue Script",
        NodeKind::Page,
        BoundingBox::new(0.0, 0.0, config.page_width, height),
    )
    .with_style(config.fill(&config.page_fill))
    .with_children(children)
}

fn master_header(config: &LayoutConfig, summary: &str) -> LayoutNode {
    let h = config.header_height;
    let w = config.content_width();
    LayoutNode::new(
        "header",
        "Header",
        NodeKind::Frame,
        BoundingBox::new(0.0, 0.0, config.page_width, h),
    )
    .with_style(config.fill(&config.header_fill))
    .with_children(vec![
        LayoutNode::new(
            "header:title",
            "Title",
            NodeKind::Text,
            BoundingBox::new(config.margin, h * 0.2, w, h * 0.35),
        )
        .with_content("Dialogue Script")
        .with_style(config.text_style(
            config.title_font_size,
            700,
            FontStyle::Normal,
            &config.page_fill,
        )),
        LayoutNode::new(
            "header:summary",
            "Summary",
            NodeKind::Text,
            BoundingBox::new(config.margin, h * 0.6, w, h * 0.25),
        )
        .with_content(summary)
        .with_style(config.body_style(400, FontStyle::Normal, &config.page_fill)),
    ])
}

fn master_footer(page_height: f64, config: &LayoutConfig) -> LayoutNode {
    let h = config.footer_height;
    let y = page_height - h;
    LayoutNode::new(
        "footer",
        "Footer",
        NodeKind::Frame,
        BoundingBox::new(0.0, y, config.page_width, h),
    )
    .with_style(config.fill(&config.header_fill))
    .with_children(vec![LayoutNode::new(
        "footer:note",
        "Footer Note",
        NodeKind::Text,
        BoundingBox::new(config.margin, y + h * 0.3, config.content_width(), h * 0.4),
    )
    .with_content("End of script")
    .with_style(config.body_style(400, FontStyle::Normal, &config.page_fill))])
}

/// Label box vertically centred in a header band.
fn header_label_box(x: f64, y: f64, w: f64, header_h: f64, config: &LayoutConfig) -> BoundingBox {
    BoundingBox::new(
        x + config.inset,
        y + header_h * 0.25,
        w - 2.0 * config.inset,
        header_h * 0.5,
    )
}

fn scene_frame(scene: &SceneGroup<'_>, id: &str, y: f64, config: &LayoutConfig) -> LayoutNode {
    let x = config.margin;
    let w = config.content_width();
    let header_h = config.scene_header_height;

    let mut children = vec![LayoutNode::new(
        format!("{id}:header"),
        "Scene Header",
        NodeKind::Frame,
        BoundingBox::new(x, y, w, header_h),
    )
    .with_children(vec![
        LayoutNode::new(
            format!("{id}:header:bg"),
            "Background",
            NodeKind::Rectangle,
            BoundingBox::new(x, y, w, header_h),
        )
        .with_style(config.fill(&config.scene_fill)),
        LayoutNode::new(
            format!("{id}:header:label"),
            "Scene Label",
            NodeKind::Text,
            header_label_box(x, y, w, header_h, config),
        )
        .with_content(scene.scene)
        .with_style(config.text_style(
            config.heading_font_size,
            700,
            FontStyle::Normal,
            &config.text_fill,
        )),
    ])];

    let mut seq_y = y + header_h;
    for (j, sequence) in scene.sequences.iter().enumerate() {
        seq_y += config.sequence_spacing;
        children.push(sequence_frame(
            sequence,
            &format!("{id}:seq:{j}"),
            seq_y,
            config,
        ));
        seq_y += config.sequence_height(sequence.dialogues.len());
    }

    LayoutNode::new(
        id,
        scene.scene,
        NodeKind::Frame,
        BoundingBox::new(x, y, w, scene.height(config)),
    )
    .with_children(children)
}

fn sequence_frame(
    sequence: &SequenceGroup<'_>,
    id: &str,
    y: f64,
    config: &LayoutConfig,
) -> LayoutNode {
    let x = config.margin + config.inset;
    let w = config.sequence_width();
    let header_h = config.sequence_header_height;

    let mut children = vec![LayoutNode::new(
        format!("{id}:header"),
        "Sequence Header",
        NodeKind::Text,
        header_label_box(x, y, w, header_h, config),
    )
    .with_content(format!("{}: {}", sequence.sequence, sequence.title))
    .with_style(config.text_style(
        config.heading_font_size,
        600,
        FontStyle::Normal,
        &config.accent_fill,
    ))];

    let item_x = x + config.inset;
    let item_w = config.item_width();
    let first_item_y = y + header_h + config.sequence_padding / 2.0;
    for (k, node) in sequence.dialogues.iter().enumerate() {
        let item_y = first_item_y + k as f64 * config.item_height;
        children.push(dialogue_item(
            node,
            &format!("{id}:item:{k}"),
            BoundingBox::new(item_x, item_y, item_w, config.item_height),
            config,
        ));
    }

    LayoutNode::new(
        id,
        sequence.sequence,
        NodeKind::Frame,
        BoundingBox::new(x, y, w, config.sequence_height(sequence.dialogues.len())),
    )
    .with_style(config.fill(&config.sequence_fill))
    .with_children(children)
}

/// Build the fixed-shape sub-tree for one dialogue node.
pub fn dialogue_item(
    node: &DialogueNode,
    id: &str,
    bbox: BoundingBox,
    config: &LayoutConfig,
) -> LayoutNode {
    let (name, body) = match node {
        DialogueNode::Character { speaker, text } => (
            format!("Character: {speaker}"),
            character_body(speaker, text, id, bbox, config),
        ),
        DialogueNode::Narration { text } => (
            "Narration".to_string(),
            narration_body(text, id, bbox, config),
        ),
        DialogueNode::Choice {
            question,
            options,
            target_sequences,
        } => (
            "Choice".to_string(),
            choice_body(question.as_deref(), options, target_sequences, id, bbox, config),
        ),
        DialogueNode::Unrecognized(value) => (
            "Unknown".to_string(),
            fallback_body(value, id, bbox, config),
        ),
    };

    let mut children = vec![LayoutNode::new(
        format!("{id}:bg"),
        "Background",
        NodeKind::Rectangle,
        bbox,
    )
    .with_style(config.fill(&config.item_fill))];
    children.extend(body);
    LayoutNode::new(id, name, NodeKind::Frame, bbox).with_children(children)
}

/// Box inside an item's padding, starting `offset` below its top.
fn inner_box(bbox: BoundingBox, offset: f64, height: f64, config: &LayoutConfig) -> BoundingBox {
    let pad = config.item_padding;
    BoundingBox::new(
        bbox.x + pad,
        bbox.y + pad + offset,
        bbox.width - 2.0 * pad,
        height,
    )
}

fn character_body(
    speaker: &str,
    text: &str,
    id: &str,
    bbox: BoundingBox,
    config: &LayoutConfig,
) -> Vec<LayoutNode> {
    let label_h = config.label_height;
    let body_h = bbox.height - 2.0 * config.item_padding - label_h;
    vec![
        LayoutNode::new(
            format!("{id}:speaker"),
            "Speaker",
            NodeKind::Text,
            inner_box(bbox, 0.0, label_h, config),
        )
        .with_content(speaker)
        .with_style(config.body_style(700, FontStyle::Normal, &config.accent_fill)),
        LayoutNode::new(
            format!("{id}:text"),
            "Line",
            NodeKind::Text,
            inner_box(bbox, label_h, body_h, config),
        )
        .with_content(text)
        .with_style(config.body_style(400, FontStyle::Normal, &config.text_fill)),
    ]
}

fn narration_body(
    text: &str,
    id: &str,
    bbox: BoundingBox,
    config: &LayoutConfig,
) -> Vec<LayoutNode> {
    let h = bbox.height - 2.0 * config.item_padding;
    vec![LayoutNode::new(
        format!("{id}:text"),
        "Narration Text",
        NodeKind::Text,
        inner_box(bbox, 0.0, h, config),
    )
    .with_content(text)
    .with_style(config.body_style(400, FontStyle::Italic, &config.text_fill))]
}

/// Vertical step between option rows.
///
/// The configured spacing, shrunk so that every option still fits below
/// the question inside the item's padding.
fn option_step(option_count: usize, item_height: f64, config: &LayoutConfig) -> f64 {
    if option_count == 0 {
        return config.option_spacing;
    }
    let room = item_height - 2.0 * config.item_padding - config.label_height;
    config.option_spacing.min(room / option_count as f64)
}

fn choice_body(
    question: Option<&str>,
    options: &[String],
    targets: &[String],
    id: &str,
    bbox: BoundingBox,
    config: &LayoutConfig,
) -> Vec<LayoutNode> {
    let mut nodes = vec![LayoutNode::new(
        format!("{id}:question"),
        "Question",
        NodeKind::Text,
        inner_box(bbox, 0.0, config.label_height, config),
    )
    .with_content(question.unwrap_or("Choice"))
    .with_style(config.body_style(700, FontStyle::Normal, &config.text_fill))];

    let step = option_step(options.len(), bbox.height, config);
    for (i, option) in options.iter().enumerate() {
        let content = match targets.get(i) {
            Some(target) => format!("\u{2022} {option} -> {target}"),
            None => format!("\u{2022} {option}"),
        };
        let offset = config.label_height + i as f64 * step;
        nodes.push(
            LayoutNode::new(
                format!("{id}:option:{i}"),
                format!("Option {}", i + 1),
                NodeKind::Text,
                inner_box(bbox, offset, step, config),
            )
            .with_content(content)
            .with_style(config.body_style(400, FontStyle::Normal, &config.accent_fill)),
        );
    }
    nodes
}

fn fallback_body(
    value: &serde_json::Value,
    id: &str,
    bbox: BoundingBox,
    config: &LayoutConfig,
) -> Vec<LayoutNode> {
    let h = bbox.height - 2.0 * config.item_padding;
    vec![LayoutNode::new(
        format!("{id}:dump"),
        "Raw Node",
        NodeKind::Text,
        inner_box(bbox, 0.0, h, config),
    )
    .with_content(value.to_string())
    .with_style(config.body_style(400, FontStyle::Normal, &config.text_fill))]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::assembler::assemble;
    use serde_json::json;

    fn narration(text: &str) -> DialogueNode {
        DialogueNode::Narration {
            text: text.to_string(),
        }
    }

    #[test]
    fn sequence_height_formula() {
        let config = LayoutConfig::default();
        assert_eq!(config.sequence_height(0), 60.0 + 40.0);
        assert_eq!(config.sequence_height(3), 60.0 + 300.0 + 40.0);
    }

    #[test]
    fn empty_input_uses_min_height() {
        let page = layout_all(&[]);
        assert_eq!(page.kind, NodeKind::Page);
        assert_eq!(page.bounding_box.height, 1080.0);
        assert_eq!(page.children.len(), 2);
        assert_eq!(page.children[1].bounding_box.y, 1000.0);
    }

    #[test]
    fn page_height_grows_with_content() {
        let nodes: Vec<DialogueNode> = (0..20).map(|i| narration(&format!("beat {i}"))).collect();
        let docs = vec![assemble(nodes, "1", "01", "")];
        let page = layout_all(&docs);
        // scene = (60 + 2000 + 40) + 30 + 80; page = scene + 60 + 120 + 80
        assert_eq!(page.bounding_box.height, 2210.0 + 260.0);
    }

    #[test]
    fn groups_keep_first_seen_order() {
        let docs = vec![
            assemble(vec![narration("a")], "3", "02", ""),
            assemble(vec![narration("b")], "1", "01", ""),
            assemble(vec![narration("c")], "3", "01", ""),
        ];
        let scenes = group_documents(&docs);
        assert_eq!(scenes.len(), 2);
        assert_eq!(scenes[0].scene, "SCENE_03");
        assert_eq!(scenes[0].sequences[0].sequence, "SEQUENCE_02");
        assert_eq!(scenes[0].sequences[1].sequence, "SEQUENCE_01");
        assert_eq!(scenes[1].scene, "SCENE_01");
    }

    #[test]
    fn shared_sequence_is_merged_under_first_title() {
        let docs = vec![
            assemble(vec![narration("a"), narration("b")], "1", "05A", "First"),
            assemble(vec![narration("c")], "1", "05A", "Second"),
        ];
        let scenes = group_documents(&docs);
        assert_eq!(scenes[0].sequences.len(), 1);
        let seq = &scenes[0].sequences[0];
        assert_eq!(seq.title, "First");
        assert_eq!(seq.dialogues.len(), 3);
        assert_eq!(seq.dialogues[2], &narration("c"));
    }

    #[test]
    fn character_item_has_speaker_and_text() {
        let config = LayoutConfig::default();
        let node = DialogueNode::Character {
            speaker: "Holmes".to_string(),
            text: "\"Come.\"".to_string(),
        };
        let item = dialogue_item(&node, "i", BoundingBox::new(0.0, 0.0, 500.0, 100.0), &config);
        assert_eq!(item.name, "Character: Holmes");
        let texts: Vec<_> = item.children.iter().filter(|c| c.kind == NodeKind::Text).collect();
        assert_eq!(texts.len(), 2);
        assert_eq!(texts[0].content.as_deref(), Some("Holmes"));
        assert_eq!(texts[1].content.as_deref(), Some("\"Come.\""));
        assert!(texts[0].bounding_box.bottom() <= texts[1].bounding_box.y);
    }

    #[test]
    fn narration_is_italic() {
        let config = LayoutConfig::default();
        let bbox = BoundingBox::new(0.0, 0.0, 500.0, 100.0);
        let item = dialogue_item(&narration("Rain."), "i", bbox, &config);
        let text = item.find("i:text").unwrap();
        assert_eq!(text.style.as_ref().unwrap().font_style, Some(FontStyle::Italic));
    }

    #[test]
    fn choice_item_lists_options_with_targets() {
        let config = LayoutConfig::default();
        let node = DialogueNode::Choice {
            question: None,
            options: vec!["\"Left\"".to_string(), "\"Right\"".to_string()],
            target_sequences: vec!["05A".to_string()],
        };
        let item = dialogue_item(&node, "c", BoundingBox::new(0.0, 0.0, 500.0, 100.0), &config);
        assert_eq!(item.find("c:question").unwrap().content.as_deref(), Some("Choice"));
        let first = item.find("c:option:0").unwrap();
        let second = item.find("c:option:1").unwrap();
        assert_eq!(first.content.as_deref(), Some("\u{2022} \"Left\" -> 05A"));
        assert_eq!(second.content.as_deref(), Some("\u{2022} \"Right\""));
        assert_eq!(second.bounding_box.y - first.bounding_box.y, config.option_spacing);
    }

    #[test]
    fn many_options_stay_inside_the_item() {
        let config = LayoutConfig::default();
        let node = DialogueNode::Choice {
            question: Some("Which door?".to_string()),
            options: (1..=4).map(|i| format!("\"Door {i}\"")).collect(),
            target_sequences: vec![],
        };
        let bbox = BoundingBox::new(0.0, 370.0, 500.0, 100.0);
        let item = dialogue_item(&node, "c", bbox, &config);
        let last = item.find("c:option:3").unwrap();
        assert!(last.bounding_box.bottom() <= bbox.bottom() - config.item_padding);
        // (100 - 2 * 12 - 20) / 4 = 14
        let first = item.find("c:option:0").unwrap();
        assert_eq!(first.bounding_box.height, 14.0);
    }

    #[test]
    fn unrecognized_node_falls_back_to_dump() {
        let config = LayoutConfig::default();
        let node = DialogueNode::Unrecognized(json!({"type": "sfx", "cue": "bell"}));
        let item = dialogue_item(&node, "u", BoundingBox::new(0.0, 0.0, 500.0, 100.0), &config);
        let dump = item.find("u:dump").unwrap();
        assert!(dump.content.as_deref().unwrap().contains("\"cue\":\"bell\""));
    }

    #[test]
    fn ron_overrides_merge_with_defaults() {
        let config = LayoutConfig::parse_ron("(page_width: 1600.0, item_height: 120.0)").unwrap();
        assert_eq!(config.page_width, 1600.0);
        assert_eq!(config.item_height, 120.0);
        assert_eq!(config.margin, LayoutConfig::default().margin);
    }

    #[test]
    fn invalid_config_rejected() {
        assert!(matches!(
            LayoutConfig::parse_ron("(item_height: 0.0)"),
            Err(LayoutConfigError::Invalid(_))
        ));
        assert!(matches!(
            LayoutConfig::parse_ron("(page_width: 100.0)"),
            Err(LayoutConfigError::Invalid(_))
        ));
        assert!(matches!(LayoutConfig::parse_ron("(("), Err(LayoutConfigError::Ron(_))));
    }
}
