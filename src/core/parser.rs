//! Line-oriented dialogue parser.
//!
//! The state machine is threaded through a fold over classified lines:
//! each line maps `(ParseState, emitted)` to the next state, so every
//! transition can be exercised on its own.

use crate::core::classify::{classify, LineKind, Mode};
use crate::schema::dialogue::{quote, DialogueNode};

/// Parser state between lines.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ParseState {
    #[default]
    Idle,
    AccumulatingCharacterLine {
        speaker: String,
        text: String,
    },
    InChoiceBlock {
        question: Option<String>,
        options: Vec<String>,
        targets: Vec<String>,
    },
}

impl ParseState {
    pub fn mode(&self) -> Mode {
        match self {
            Self::Idle => Mode::Idle,
            Self::AccumulatingCharacterLine { .. } => Mode::Speaking,
            Self::InChoiceBlock { .. } => Mode::InChoice,
        }
    }

    /// Consume one classified line, pushing any finished nodes onto `out`.
    pub fn step(self, line: LineKind<'_>, out: &mut Vec<DialogueNode>) -> ParseState {
        match (self, line) {
            (state, LineKind::Blank | LineKind::SceneMarker(_)) => state,

            (
                Self::InChoiceBlock {
                    question,
                    mut options,
                    targets,
                },
                LineKind::ChoiceOption(text),
            ) => {
                if !text.is_empty() {
                    options.push(quote(text));
                }
                Self::InChoiceBlock {
                    question,
                    options,
                    targets,
                }
            }
            (
                Self::InChoiceBlock {
                    question,
                    options,
                    mut targets,
                },
                LineKind::ChoiceTarget(text),
            ) => {
                if !text.is_empty() {
                    targets.push(text.to_string());
                }
                Self::InChoiceBlock {
                    question,
                    options,
                    targets,
                }
            }
            (
                Self::InChoiceBlock {
                    question,
                    options,
                    targets,
                },
                LineKind::ChoiceClose,
            ) => {
                // Choices without options are dropped.
                if !options.is_empty() {
                    out.push(DialogueNode::Choice {
                        question,
                        options,
                        target_sequences: targets,
                    });
                }
                Self::Idle
            }
            (state @ Self::InChoiceBlock { .. }, _) => state,

            (state, LineKind::ChoiceOpen(question)) => {
                state.flush(out);
                Self::InChoiceBlock {
                    question: (!question.is_empty()).then(|| question.to_string()),
                    options: Vec::new(),
                    targets: Vec::new(),
                }
            }
            (state, LineKind::Narration(text)) => {
                state.flush(out);
                if !text.is_empty() {
                    out.push(DialogueNode::Narration {
                        text: text.to_string(),
                    });
                }
                Self::Idle
            }
            (state, LineKind::Character { speaker, text }) => {
                state.flush(out);
                Self::AccumulatingCharacterLine {
                    speaker: speaker.to_string(),
                    text: text.to_string(),
                }
            }
            (
                Self::AccumulatingCharacterLine { speaker, mut text },
                LineKind::Continuation(more),
            ) => {
                if !text.is_empty() {
                    text.push(' ');
                }
                text.push_str(more);
                Self::AccumulatingCharacterLine { speaker, text }
            }

            // Orphaned continuations and unrecognized lines.
            (state, _) => state,
        }
    }

    /// Emit a pending character line, if any. Empty speakers or text are dropped.
    pub fn flush(self, out: &mut Vec<DialogueNode>) {
        if let Self::AccumulatingCharacterLine { speaker, text } = self {
            if !speaker.is_empty() && !text.is_empty() {
                out.push(DialogueNode::Character {
                    speaker,
                    text: quote(&text),
                });
            }
        }
    }
}

/// Parse screenplay-style text into dialogue nodes, in input order.
///
/// Never fails: ill-formed constructs are dropped. An unclosed choice
/// block at end of input is discarded.
pub fn parse(input: &str) -> Vec<DialogueNode> {
    let mut out = Vec::new();
    let last = input.lines().fold(ParseState::Idle, |state, line| {
        let kind = classify(line, state.mode());
        state.step(kind, &mut out)
    });
    last.flush(&mut out);
    tracing::debug!(nodes = out.len(), "parsed dialogue script");
    out
}
