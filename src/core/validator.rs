//! Advisory checks over raw script text.
//!
//! Re-classifies lines with the same rules as the parser but keeps its own
//! lightweight state, so diagnostics do not depend on a parse succeeding.

use crate::core::classify::{classify, LineKind, Mode, OPTION_PREFIX, TARGET_PREFIX};

pub const NO_VALID_DIALOGUE: &str = "No valid dialogue found";

struct OpenChoice {
    line: usize,
    options: usize,
    targets: usize,
}

/// Check raw text and return diagnostics, with 1-indexed line numbers.
pub fn validate(input: &str) -> Vec<String> {
    let mut diagnostics = Vec::new();
    let mut mode = Mode::Idle;
    let mut choice: Option<OpenChoice> = None;
    let mut found_dialogue = false;

    for (index, raw) in input.lines().enumerate() {
        let n = index + 1;
        let kind = classify(raw, mode);
        if kind.is_dialogue_marker() {
            found_dialogue = true;
        }

        match kind {
            LineKind::Blank | LineKind::SceneMarker(_) | LineKind::Continuation(_) => {}
            LineKind::Narration(text) => {
                if text.is_empty() {
                    diagnostics.push(format!("Line {n}: Narration text cannot be empty"));
                }
                mode = Mode::Idle;
            }
            LineKind::Character { speaker, text } => {
                if speaker.is_empty() || text.is_empty() {
                    diagnostics.push(format!(
                        "Line {n}: Character dialogue must have both a speaker and text"
                    ));
                }
                let line = raw.trim();
                if line.starts_with(OPTION_PREFIX) || line.starts_with(TARGET_PREFIX) {
                    diagnostics.push(format!(
                        "Line {n}: {speaker} outside of a choice block is read as character dialogue"
                    ));
                }
                mode = Mode::Speaking;
            }
            LineKind::ChoiceOpen(_) => {
                choice = Some(OpenChoice {
                    line: n,
                    options: 0,
                    targets: 0,
                });
                mode = Mode::InChoice;
            }
            LineKind::ChoiceOption(_) => {
                if let Some(open) = choice.as_mut() {
                    open.options += 1;
                }
            }
            LineKind::ChoiceTarget(_) => {
                if let Some(open) = choice.as_mut() {
                    open.targets += 1;
                }
            }
            LineKind::ChoiceClose => {
                if let Some(open) = choice.take() {
                    if open.options == 0 {
                        diagnostics.push(format!(
                            "Line {n}: Choice block must have at least one option"
                        ));
                    } else if open.targets == 0 {
                        diagnostics.push(format!(
                            "Line {n}: Choice block must have at least one target"
                        ));
                    }
                }
                mode = Mode::Idle;
            }
            LineKind::InvalidInChoice(line) => {
                diagnostics.push(format!("Line {n}: Invalid line inside choice block: {line}"));
            }
            LineKind::Invalid(line) => {
                diagnostics.push(format!("Line {n}: Unrecognized line format: {line}"));
            }
        }
    }

    if let Some(open) = choice {
        diagnostics.push(format!(
            "Choice block starting at line {} is never closed",
            open.line
        ));
    }
    if !found_dialogue {
        diagnostics.push(NO_VALID_DIALOGUE.to_string());
    }
    diagnostics
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_script_has_no_diagnostics() {
        let input = "NARRATION: Fog.\nHolmes: Come.\ncontinued\nCHOICE: Go?\nOPTION: Yes\nTARGET: 02\nEND_CHOICE";
        assert!(validate(input).is_empty());
    }

    #[test]
    fn zero_option_choice_yields_one_diagnostic() {
        let diagnostics = validate("CHOICE: Proceed?\nEND_CHOICE");
        assert_eq!(
            diagnostics,
            vec!["Line 2: Choice block must have at least one option".to_string()]
        );
    }

    #[test]
    fn zero_target_choice() {
        let diagnostics = validate("CHOICE:\nOPTION: Yes\nEND_CHOICE");
        assert_eq!(
            diagnostics,
            vec!["Line 3: Choice block must have at least one target".to_string()]
        );
    }

    #[test]
    fn empty_fields_reported_with_line_numbers() {
        let diagnostics = validate("Holmes: Hi\n\nNARRATION:\n: lonely text");
        assert_eq!(
            diagnostics,
            vec![
                "Line 3: Narration text cannot be empty".to_string(),
                "Line 4: Character dialogue must have both a speaker and text".to_string(),
            ]
        );
    }

    #[test]
    fn unrecognized_lines_outside_blocks() {
        let diagnostics = validate("NARRATION: Dawn.\nstray words");
        assert_eq!(
            diagnostics,
            vec!["Line 2: Unrecognized line format: stray words".to_string()]
        );
    }

    #[test]
    fn no_dialogue_at_all() {
        let diagnostics = validate("\n\n");
        assert_eq!(diagnostics, vec![NO_VALID_DIALOGUE.to_string()]);
    }

    #[test]
    fn unclosed_and_invalid_inside_choice() {
        let diagnostics = validate("CHOICE: Which?\nOPTION: A\nrandom");
        assert_eq!(
            diagnostics,
            vec![
                "Line 3: Invalid line inside choice block: random".to_string(),
                "Choice block starting at line 1 is never closed".to_string(),
            ]
        );
    }

    #[test]
    fn stray_option_outside_block() {
        let diagnostics = validate("OPTION: Run");
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].starts_with("Line 1: OPTION outside"));
    }
}
