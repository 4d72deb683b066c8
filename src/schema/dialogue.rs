use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// One parsed unit of dialogue content.
///
/// Serialized with an internal `type` tag (`narration`, `character`,
/// `choice`). Nodes with a missing or unknown tag are kept as
/// [`DialogueNode::Unrecognized`] and round-trip verbatim.
#[derive(Debug, Clone, PartialEq)]
pub enum DialogueNode {
    Narration {
        text: String,
    },
    Character {
        speaker: String,
        text: String,
    },
    Choice {
        question: Option<String>,
        options: Vec<String>,
        target_sequences: Vec<String>,
    },
    Unrecognized(serde_json::Value),
}

impl DialogueNode {
    /// The serialized tag for this node, if it has a known one.
    pub fn tag(&self) -> Option<&'static str> {
        match self {
            Self::Narration { .. } => Some("narration"),
            Self::Character { .. } => Some("character"),
            Self::Choice { .. } => Some("choice"),
            Self::Unrecognized(_) => None,
        }
    }

    /// Describes a choice whose targets do not line up with its options.
    ///
    /// An empty target list is not a defect: targets are optional.
    pub fn choice_defect(&self) -> Option<String> {
        match self {
            Self::Choice {
                options,
                target_sequences,
                ..
            } if !target_sequences.is_empty() && target_sequences.len() != options.len() => {
                Some(format!(
                    "choice has {} options but {} target sequences",
                    options.len(),
                    target_sequences.len()
                ))
            }
            _ => None,
        }
    }
}

const KNOWN_TAGS: [&str; 3] = ["narration", "character", "choice"];

/// Fields that only a `choice` node may carry.
const CHOICE_FIELDS: [&str; 2] = ["options", "targetSequences"];

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum TaggedRef<'a> {
    Narration {
        text: &'a str,
    },
    Character {
        speaker: &'a str,
        text: &'a str,
    },
    Choice {
        #[serde(skip_serializing_if = "Option::is_none")]
        question: Option<&'a str>,
        options: &'a [String],
        #[serde(rename = "targetSequences")]
        target_sequences: &'a [String],
    },
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum Tagged {
    Narration {
        text: String,
    },
    Character {
        speaker: String,
        text: String,
    },
    Choice {
        #[serde(default)]
        question: Option<String>,
        options: Vec<String>,
        #[serde(rename = "targetSequences", default)]
        target_sequences: Vec<String>,
    },
}

impl From<Tagged> for DialogueNode {
    fn from(tagged: Tagged) -> Self {
        match tagged {
            Tagged::Narration { text } => Self::Narration { text },
            Tagged::Character { speaker, text } => Self::Character { speaker, text },
            Tagged::Choice {
                question,
                options,
                target_sequences,
            } => Self::Choice {
                question,
                options,
                target_sequences,
            },
        }
    }
}

impl Serialize for DialogueNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let tagged = match self {
            Self::Narration { text } => TaggedRef::Narration { text },
            Self::Character { speaker, text } => TaggedRef::Character { speaker, text },
            Self::Choice {
                question,
                options,
                target_sequences,
            } => TaggedRef::Choice {
                question: question.as_deref(),
                options,
                target_sequences,
            },
            Self::Unrecognized(value) => return value.serialize(serializer),
        };
        tagged.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for DialogueNode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        let tag = value.get("type").and_then(serde_json::Value::as_str);
        if tag != Some("choice") {
            if let Some(field) = CHOICE_FIELDS.iter().find(|f| value.get(**f).is_some()) {
                return Err(D::Error::custom(match tag {
                    Some(tag) => format!("'{field}' on a '{tag}' node; only choice nodes carry it"),
                    None => format!("'{field}' on a node without a 'type' tag"),
                }));
            }
        }
        if !tag.is_some_and(|tag| KNOWN_TAGS.contains(&tag)) {
            return Ok(Self::Unrecognized(value));
        }
        Tagged::deserialize(value)
            .map(Into::into)
            .map_err(D::Error::custom)
    }
}

/// Wraps dialogue text in literal double quotes.
///
/// Text that already carries a surrounding pair is not quoted twice.
pub fn quote(text: &str) -> String {
    let inner = text
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .unwrap_or(text);
    format!("\"{inner}\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn narration_serializes_with_tag() {
        let node = DialogueNode::Narration {
            text: "The fog rolled in.".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&node).unwrap(),
            json!({"type": "narration", "text": "The fog rolled in."})
        );
    }

    #[test]
    fn choice_omits_absent_question() {
        let node = DialogueNode::Choice {
            question: None,
            options: vec!["\"Yes\"".to_string()],
            target_sequences: vec!["A".to_string()],
        };
        let value = serde_json::to_value(&node).unwrap();
        assert!(value.get("question").is_none());
        assert_eq!(value["targetSequences"], json!(["A"]));
    }

    #[test]
    fn unknown_tag_is_kept_verbatim() {
        let raw = json!({"type": "sound", "cue": "thunder"});
        let node: DialogueNode = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(node, DialogueNode::Unrecognized(raw.clone()));
        assert_eq!(serde_json::to_value(&node).unwrap(), raw);
    }

    #[test]
    fn missing_tag_is_unrecognized() {
        let node: DialogueNode = serde_json::from_value(json!({"text": "orphan"})).unwrap();
        assert!(matches!(node, DialogueNode::Unrecognized(_)));
        assert_eq!(node.tag(), None);
    }

    #[test]
    fn malformed_known_tag_is_an_error() {
        let result: Result<DialogueNode, _> =
            serde_json::from_value(json!({"type": "choice", "question": "Go?"}));
        assert!(result.is_err());
    }

    #[test]
    fn choice_fields_need_a_choice_tag() {
        let stray: Result<DialogueNode, _> = serde_json::from_value(
            json!({"type": "narration", "text": "x", "options": ["a"], "targetSequences": ["B"]}),
        );
        let err = stray.unwrap_err().to_string();
        assert!(err.contains("'options' on a 'narration' node"), "{err}");

        let untagged: Result<DialogueNode, _> =
            serde_json::from_value(json!({"targetSequences": ["B"]}));
        assert!(untagged.is_err());
    }

    #[test]
    fn choice_targets_default_to_empty() {
        let node: DialogueNode =
            serde_json::from_value(json!({"type": "choice", "options": ["\"Run\""]})).unwrap();
        match node {
            DialogueNode::Choice {
                question,
                options,
                target_sequences,
            } => {
                assert_eq!(question, None);
                assert_eq!(options.len(), 1);
                assert!(target_sequences.is_empty());
            }
            other => panic!("expected choice, got {other:?}"),
        }
    }

    #[test]
    fn choice_defect_reports_mismatch() {
        let node = DialogueNode::Choice {
            question: None,
            options: vec!["\"A\"".to_string(), "\"B\"".to_string()],
            target_sequences: vec!["05A".to_string()],
        };
        assert_eq!(
            node.choice_defect().as_deref(),
            Some("choice has 2 options but 1 target sequences")
        );

        let untargeted = DialogueNode::Choice {
            question: None,
            options: vec!["\"A\"".to_string()],
            target_sequences: vec![],
        };
        assert!(untargeted.choice_defect().is_none());
    }

    #[test]
    fn quote_wraps_once() {
        assert_eq!(quote("Indeed."), "\"Indeed.\"");
        assert_eq!(quote("\"Indeed.\""), "\"Indeed.\"");
        assert_eq!(quote("\"half"), "\"\"half\"");
    }
}
