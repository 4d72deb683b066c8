//! Line classification shared by the parser and the validator.

pub const NARRATION_PREFIX: &str = "NARRATION:";
pub const CHOICE_PREFIX: &str = "CHOICE:";
pub const OPTION_PREFIX: &str = "OPTION:";
pub const TARGET_PREFIX: &str = "TARGET:";
pub const END_CHOICE_PREFIX: &str = "END_CHOICE";

/// Lines starting with this word are never character lines.
const RESERVED_WORD: &str = "Dialogue";

/// Where the classifier is in the script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Idle,
    /// A speaker's line is open and may be continued.
    Speaking,
    InChoice,
}

/// Token kind of one physical line, with its extracted payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind<'a> {
    Blank,
    SceneMarker(&'a str),
    Narration(&'a str),
    ChoiceOpen(&'a str),
    ChoiceOption(&'a str),
    ChoiceTarget(&'a str),
    ChoiceClose,
    Character { speaker: &'a str, text: &'a str },
    Continuation(&'a str),
    /// Unusable line inside a choice block.
    InvalidInChoice(&'a str),
    Invalid(&'a str),
}

impl LineKind<'_> {
    /// True for narration, character and choice-opening lines.
    pub fn is_dialogue_marker(&self) -> bool {
        matches!(
            self,
            Self::Narration(_) | Self::Character { .. } | Self::ChoiceOpen(_)
        )
    }
}

/// Classify one line. The line is trimmed here; payloads are trimmed
/// after their prefix is stripped.
pub fn classify(line: &str, mode: Mode) -> LineKind<'_> {
    let line = line.trim();
    if line.is_empty() {
        return LineKind::Blank;
    }

    if mode == Mode::InChoice {
        if line.starts_with(END_CHOICE_PREFIX) {
            return LineKind::ChoiceClose;
        }
        if let Some(rest) = line.strip_prefix(OPTION_PREFIX) {
            return LineKind::ChoiceOption(rest.trim());
        }
        if let Some(rest) = line.strip_prefix(TARGET_PREFIX) {
            return LineKind::ChoiceTarget(rest.trim());
        }
        return LineKind::InvalidInChoice(line);
    }

    if let Some(rest) = line.strip_prefix(CHOICE_PREFIX) {
        return LineKind::ChoiceOpen(rest.trim());
    }
    if let Some(rest) = line.strip_prefix(NARRATION_PREFIX) {
        return LineKind::Narration(rest.trim());
    }
    if let Some((speaker, text)) = line.split_once(':') {
        if !line.starts_with(RESERVED_WORD) {
            return LineKind::Character {
                speaker: speaker.trim(),
                text: text.trim(),
            };
        }
    } else if is_scene_marker(line) {
        return LineKind::SceneMarker(line);
    }
    if mode == Mode::Speaking {
        return LineKind::Continuation(line);
    }
    LineKind::Invalid(line)
}

/// `SCENE 2`, `SCENE_02`, `SEQUENCE_05A` and the like.
fn is_scene_marker(line: &str) -> bool {
    ["SCENE", "SEQUENCE"].iter().any(|word| {
        line.strip_prefix(word)
            .and_then(|rest| rest.chars().next())
            .is_some_and(|c| c == ' ' || c == '_' || c.is_ascii_digit())
    })
}
