//! End-to-end script parsing and validation against fixture files.

use dialogue_engine::core::assembler::assemble;
use dialogue_engine::core::parser::parse;
use dialogue_engine::core::validator::validate;
use dialogue_engine::schema::dialogue::DialogueNode;

fn fixture(name: &str) -> String {
    std::fs::read_to_string(format!("tests/fixtures/{name}")).unwrap()
}

#[test]
fn baker_street_parses_in_order() {
    let nodes = parse(&fixture("baker_street.txt"));
    let tags: Vec<_> = nodes.iter().map(|n| n.tag().unwrap()).collect();
    assert_eq!(
        tags,
        ["narration", "character", "character", "choice", "narration", "character"]
    );

    assert_eq!(
        nodes[1],
        DialogueNode::Character {
            speaker: "Holmes".to_string(),
            text: "\"You see, Watson, but you do not observe.\"".to_string(),
        }
    );
    assert_eq!(
        nodes[3],
        DialogueNode::Choice {
            question: Some("Follow the stranger?".to_string()),
            options: vec!["\"Follow him\"".to_string(), "\"Stay by the fire\"".to_string()],
            target_sequences: vec!["05A".to_string(), "05B".to_string()],
        }
    );
    assert!(matches!(
        &nodes[5],
        DialogueNode::Character { speaker, .. } if speaker == "Mrs. Hudson"
    ));
}

#[test]
fn baker_street_is_clean() {
    assert!(validate(&fixture("baker_street.txt")).is_empty());
}

#[test]
fn broken_script_diagnostics() {
    let diagnostics = validate(&fixture("broken.txt"));
    assert_eq!(
        diagnostics,
        vec![
            "Line 1: Unrecognized line format: Dialogue: draft two",
            "Line 2: Unrecognized line format: this line means nothing",
            "Line 5: Choice block must have at least one option",
            "Line 6: Narration text cannot be empty",
            "Line 7: Character dialogue must have both a speaker and text",
            "Choice block starting at line 8 is never closed",
        ]
    );
}

#[test]
fn broken_script_parses_to_nothing() {
    // Every construct in the fixture is ill-formed and dropped.
    assert!(parse(&fixture("broken.txt")).is_empty());
}

#[test]
fn every_speaker_turn_is_one_quoted_node() {
    let script = "A: one\nB: two\nA: three: with colon\nC:  spaced  ";
    let nodes = parse(script);
    assert_eq!(nodes.len(), 4);
    for node in &nodes {
        match node {
            DialogueNode::Character { text, .. } => {
                assert!(text.starts_with('"') && text.ends_with('"'), "unquoted: {text}");
            }
            other => panic!("expected character, got {other:?}"),
        }
    }
    assert!(matches!(
        &nodes[2],
        DialogueNode::Character { text, .. } if text == "\"three: with colon\""
    ));
    assert!(matches!(
        &nodes[3],
        DialogueNode::Character { speaker, text } if speaker == "C" && text == "\"spaced\""
    ));
}

#[test]
fn n_options_and_n_targets() {
    let mut script = String::from("CHOICE: Pick\n");
    for i in 0..5 {
        script.push_str(&format!("OPTION: opt {i}\n"));
    }
    for i in 0..5 {
        script.push_str(&format!("TARGET: 0{i}B\n"));
    }
    script.push_str("END_CHOICE\n");

    let nodes = parse(&script);
    assert_eq!(nodes.len(), 1);
    match &nodes[0] {
        DialogueNode::Choice {
            options,
            target_sequences,
            ..
        } => {
            assert_eq!(options.len(), 5);
            assert_eq!(target_sequences.len(), 5);
            assert_eq!(target_sequences[4], "04B");
        }
        other => panic!("expected choice, got {other:?}"),
    }
}

#[test]
fn export_json_matches_external_shape() {
    let doc = assemble(parse(&fixture("baker_street.txt")), "2", "05", "");
    let export = doc.to_export_json();
    let dialogues = export["dialogues"].as_array().unwrap();
    assert_eq!(export.as_object().unwrap().len(), 1);
    assert_eq!(dialogues.len(), 6);
    assert_eq!(dialogues[0]["type"], "narration");
    assert_eq!(dialogues[3]["type"], "choice");
    assert_eq!(dialogues[3]["question"], "Follow the stranger?");
    assert_eq!(dialogues[3]["targetSequences"][1], "05B");
}

#[test]
fn choice_without_question_omits_field_in_export() {
    let doc = assemble(parse("CHOICE:\nOPTION: Go\nTARGET: 02\nEND_CHOICE"), "1", "01", "");
    let export = doc.to_export_json();
    assert!(export["dialogues"][0].get("question").is_none());
}
