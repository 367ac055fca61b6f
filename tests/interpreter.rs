//! Tests for translating single blocks into markup fragments.
mod common;
use common::*;
use ringflow::interpreter::{BlockRegistry, interpret, parse_block};
use ringflow::markup::{Callback, MarkupWriter, Recipient};
use ringflow::prelude::*;
use serde_json::json;

fn step_for(block: &BlockDefinition) -> Step {
    let action = parse_block(block, &BlockRegistry::default()).expect("known block type");
    interpret(&block.id, &action, &CompilerOptions::default())
}

fn render(verbs: &[Verb]) -> String {
    let context = context();
    let options = CompilerOptions::default();
    MarkupWriter::new(&context, &options)
        .render_fragment(verbs)
        .expect("fragment renders")
}

#[test]
fn test_say_escapes_reserved_characters() {
    let step = step_for(&block("s", "say", json!({ "text": "<A&B>" }), &[]));
    let markup = render(&step.fragment);

    assert!(markup.contains("&lt;A&amp;B&gt;"));
    assert!(!markup.contains("<A&B>"));
    assert_eq!(step.continuation, Continuation::Next);
}

#[test]
fn test_say_escapes_quotes() {
    let step = step_for(&block("s", "say", json!({ "text": "Say \"hi\" to O'Brien" }), &[]));
    let markup = render(&step.fragment);
    assert!(markup.contains("&quot;hi&quot;"));
    assert!(markup.contains("O&apos;Brien"));
}

#[test]
fn test_say_speed_is_clamped_into_rate() {
    let fast = step_for(&block("s", "say", json!({ "text": "Hi", "speed": 5.0 }), &[]));
    match &fast.fragment[0] {
        Verb::Say(speech) => assert_eq!(speech.rate, Some(200)),
        other => panic!("Expected Say, got {:?}", other),
    }

    let slow = step_for(&block("s", "say", json!({ "text": "Hi", "speed": "0.1" }), &[]));
    match &slow.fragment[0] {
        Verb::Say(speech) => assert_eq!(speech.rate, Some(50)),
        other => panic!("Expected Say, got {:?}", other),
    }

    let normal = step_for(&block("s", "say", json!({ "text": "Hi" }), &[]));
    match &normal.fragment[0] {
        Verb::Say(speech) => {
            assert_eq!(speech.rate, None);
            assert_eq!(speech.voice, "alice");
            assert_eq!(speech.language, "en-US");
        }
        other => panic!("Expected Say, got {:?}", other),
    }
    assert!(render(&fast.fragment).contains("<prosody rate=\"200%\">Hi</prosody>"));
}

#[test]
fn test_say_without_text_is_silent_but_continues() {
    let step = step_for(&block("s", "say", json!({ "text": "   " }), &["next"]));
    assert!(step.fragment.is_empty());
    assert_eq!(step.continuation, Continuation::Next);
}

#[test]
fn test_pause_defaults_to_two_seconds() {
    let step = step_for(&block("p", "pause", json!({}), &[]));
    assert_eq!(step.fragment, vec![Verb::Pause { length: 2 }]);
    assert_eq!(render(&step.fragment), "<Pause length=\"2\"/>");

    let custom = step_for(&block("p", "pause", json!({ "duration": 5 }), &[]));
    assert_eq!(custom.fragment, vec![Verb::Pause { length: 5 }]);
}

#[test]
fn test_gather_emits_prompt_fallback_and_awaits_input() {
    let step = step_for(&block("menu-1", "gather", json!({ "prompt": "Press 1" }), &["x"]));

    assert_eq!(step.continuation, Continuation::AwaitInput);
    assert_eq!(step.fragment.len(), 3);
    match &step.fragment[0] {
        Verb::Gather(gather) => {
            assert_eq!(gather.num_digits, 1);
            assert_eq!(gather.timeout, 10);
            assert_eq!(
                gather.action,
                Callback::Gather {
                    block_id: "menu-1".to_string()
                }
            );
        }
        other => panic!("Expected Gather, got {:?}", other),
    }
    assert_eq!(step.fragment[2], Verb::Hangup);

    let markup = render(&step.fragment);
    assert!(
        markup.contains("action=\"https://hooks.example.com/api/voice/gather?blockId=menu-1\"")
    );
    assert!(markup.contains("We didn&apos;t receive any input. Goodbye!"));
    assert!(markup.ends_with("<Hangup/>"));
}

#[test]
fn test_gather_without_prompt_is_silent_and_still_halts() {
    let step = step_for(&block("g", "gather", json!({}), &["next"]));
    assert!(step.fragment.is_empty());
    assert_eq!(step.continuation, Continuation::AwaitInput);
}

#[test]
fn test_forward_with_hold_music() {
    let step = step_for(&block(
        "f",
        "forward",
        json!({ "number": "+15551234567", "holdMusicUrl": "https://cdn.example.com/hold.mp3" }),
        &[],
    ));

    match &step.fragment[0] {
        Verb::Dial(dial) => {
            assert_eq!(dial.timeout, 30);
            let music = dial.hold_music.as_ref().expect("hold music");
            assert_eq!(music.loop_count, Some(10));
            assert_eq!(dial.status_callback, Callback::DialStatus);
        }
        other => panic!("Expected Dial, got {:?}", other),
    }

    let markup = render(&step.fragment);
    let play_at = markup.find("<Play loop=\"10\">").expect("nested play");
    let number_at = markup.find("<Number").expect("number");
    assert!(markup.starts_with("<Dial timeout=\"30\">"));
    assert!(play_at < number_at);
    assert!(markup.contains("statusCallback=\"https://hooks.example.com/api/voice/status\""));
}

#[test]
fn test_forward_without_number_is_silent() {
    let step = step_for(&block("f", "forward", json!({ "timeout": 12 }), &[]));
    assert!(step.fragment.is_empty());
    assert_eq!(step.continuation, Continuation::Next);
}

#[test]
fn test_record_defaults() {
    let step = step_for(&block("r", "record", json!({}), &[]));
    assert_eq!(step.fragment.len(), 1);
    match &step.fragment[0] {
        Verb::Record(recording) => {
            assert_eq!(recording.max_length, 300);
            assert_eq!(recording.finish_on_key, "#");
            assert!(recording.transcribe);
        }
        other => panic!("Expected Record, got {:?}", other),
    }

    let prompted = step_for(&block(
        "r",
        "record",
        json!({ "prompt": "Speak now", "maxLength": 60 }),
        &[],
    ));
    assert!(matches!(prompted.fragment[0], Verb::Say(_)));
    assert!(render(&prompted.fragment).contains("maxLength=\"60\""));
}

#[test]
fn test_play_requires_url() {
    assert!(step_for(&block("p", "play", json!({}), &[])).fragment.is_empty());

    let step = step_for(&block(
        "p",
        "play",
        json!({ "url": "https://cdn.example.com/a.mp3" }),
        &[],
    ));
    assert_eq!(render(&step.fragment), "<Play>https://cdn.example.com/a.mp3</Play>");
}

#[test]
fn test_sms_defaults_to_caller() {
    let step = step_for(&block("m", "sms", json!({ "message": "Thanks!" }), &[]));
    match &step.fragment[0] {
        Verb::Sms(reply) => assert_eq!(reply.to, Recipient::Caller),
        other => panic!("Expected Sms, got {:?}", other),
    }
    assert_eq!(render(&step.fragment), "<Sms to=\"+15550001111\">Thanks!</Sms>");

    let explicit = step_for(&block(
        "m",
        "sms",
        json!({ "message": "Hi", "to": "+15559990000" }),
        &[],
    ));
    assert!(render(&explicit.fragment).contains("to=\"+15559990000\""));

    assert!(step_for(&block("m", "sms", json!({}), &[])).fragment.is_empty());
}

#[test]
fn test_hangup_terminates() {
    let step = step_for(&block("h", "hangup", json!({}), &["ignored"]));
    assert_eq!(step.fragment, vec![Verb::Hangup]);
    assert_eq!(step.continuation, Continuation::Terminate);
}

#[test]
fn test_unknown_block_type_is_rejected() {
    let result = parse_block(&block("x", "teleport", json!({}), &[]), &BlockRegistry::default());
    match result {
        Err(CompileError::UnknownBlockType { block_id, type_name }) => {
            assert_eq!(block_id, "x");
            assert_eq!(type_name, "teleport");
        }
        other => panic!("Expected UnknownBlockType, got {:?}", other),
    }
}

#[test]
fn test_registry_aliases() {
    let mut registry = BlockRegistry::default();
    assert!(registry.register_alias("message", "say"));
    assert!(!registry.register_alias("beam", "teleport"));
    assert_eq!(registry.resolve("message"), Some(BlockType::Say));
    assert_eq!(registry.resolve("beam"), None);
}
