mod common;

use common::ScriptedBackend;
use serde_json::{json, Value};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tone_of_voice::llm::CompletionOptions;
use tone_of_voice::text::count_emoji;
use tone_of_voice::{apply_fallback, optimize, OptimizeRequest, StylePolicy, HEURISTIC_FALLBACK};

fn scenario_a_signature() -> Value {
    json!({
        "formality_level": "formal",
        "punctuation_cadence": { "exclamation_max_per_1000w": 1 },
        "emoji_policy": "none",
        "address_forms": {}
    })
}

fn options() -> CompletionOptions {
    CompletionOptions {
        timeout: Duration::from_secs(5),
        ..CompletionOptions::default()
    }
}

#[tokio::test]
async fn formal_fallback_rewrites_informal_draft() {
    let request = OptimizeRequest::new("Hey guys!!! I can't wait!!");
    let result = optimize(None, &scenario_a_signature(), &request, &options()).await;

    assert!(result.is_fallback());
    assert_eq!(result.self_check, json!(HEURISTIC_FALLBACK));
    assert_eq!(result.improved_text, "Hello everyone... I cannot wait..");
    assert!(result.improved_text.matches('!').count() <= 1);
}

#[test]
fn banned_address_term_becomes_first_allowed() {
    let policy = StylePolicy::from_value(&json!({
        "address_forms": { "en": { "banned": ["sir"], "allowed": ["there"] } }
    }));
    assert_eq!(apply_fallback(&policy, "Thanks, sir."), "Thanks, there.");
    assert_eq!(apply_fallback(&policy, "Thanks, SIR. Sirius is bright."), "Thanks, there. Sirius is bright.");
}

#[test]
fn banned_term_without_allowed_list_becomes_you() {
    let policy = StylePolicy::from_value(&json!({
        "address_forms": { "de": { "banned": ["Du"] } }
    }));
    assert_eq!(apply_fallback(&policy, "Danke, du bist toll."), "Danke, you bist toll.");
}

#[test]
fn exclamations_within_cap_are_kept() {
    let policy = StylePolicy::default();
    assert_eq!(apply_fallback(&policy, "Great news! Really!"), "Great news! Really!");
    assert_eq!(apply_fallback(&policy, "Wow! Great! Really!"), "Wow. Great. Really.");
}

#[test]
fn emoji_stripped_only_when_policy_is_none() {
    let draft = "Launch day 🚀 is here 🎉";
    let none = StylePolicy::from_value(&json!({ "emoji_policy": "none" }));
    let allow = StylePolicy::from_value(&json!({ "emoji_policy": "allow" }));

    let stripped = apply_fallback(&none, draft);
    assert_eq!(count_emoji(&stripped), 0);
    assert_eq!(stripped, "Launch day  is here ");
    assert_eq!(apply_fallback(&allow, draft), draft);
    assert_eq!(apply_fallback(&StylePolicy::default(), draft), draft);
}

#[test]
fn emoji_free_draft_stays_emoji_free() {
    let none = StylePolicy::from_value(&json!({ "emoji_policy": "none" }));
    let out = apply_fallback(&none, "Plain words only.");
    assert_eq!(count_emoji(&out), 0);
    assert_eq!(out, "Plain words only.");
}

#[test]
fn fallback_is_pure_and_stable_on_reapplication() {
    let policy = StylePolicy::from_value(&json!({
        "emoji_policy": "none",
        "punctuation_cadence": { "exclamation_max_per_1000w": 2 }
    }));
    let draft = "Big day!!! 🎉 Come see us! 😀";

    let once = apply_fallback(&policy, draft);
    assert_eq!(once, apply_fallback(&policy, draft));
    assert_eq!(apply_fallback(&policy, &once), once);
    assert_eq!(once.matches('!').count(), 0);
}

#[test]
fn long_sentences_are_truncated_to_upper_bound() {
    let policy = StylePolicy::from_value(&json!({ "sentence_length_range": [3, 6] }));
    assert_eq!(
        apply_fallback(&policy, "one two three four five six seven eight"),
        "one two three four five six"
    );
    assert_eq!(
        apply_fallback(&policy, "Short and sweet. one two three four five six seven eight."),
        "Short and sweet. one two three four five six"
    );
}

#[tokio::test]
async fn zero_sentence_bound_still_returns_text() {
    let signature = json!({ "sentence_length_range": [0, 0] });
    let backend = ScriptedBackend::replying(json!({ "improved_text": "" }));
    let request = OptimizeRequest::new("Hello there. How are you?");

    let result = optimize(Some(&backend), &signature, &request, &options()).await;
    assert!(result.is_fallback());
    assert_eq!(result.improved_text, "Hello How");
}

#[test]
fn truncation_keeps_layout_between_sentences() {
    let policy = StylePolicy::from_value(&json!({ "sentence_length_range": [1, 10] }));
    assert_eq!(
        apply_fallback(&policy, "Hi there.\n\nSecond para."),
        "Hi there.\n\nSecond para."
    );
}

#[test]
fn informal_contraction_keeps_leading_capital() {
    let policy = StylePolicy::from_value(&json!({ "formality_level": "informal" }));
    assert_eq!(
        apply_fallback(&policy, "Do not panic. DO NOT. We do not."),
        "Don't panic. Don't. We don't."
    );
}

#[test]
fn steps_apply_in_order() {
    let policy = StylePolicy::from_value(&json!({
        "formality_level": "formal",
        "emoji_policy": "none",
        "punctuation_cadence": { "exclamation_max_per_1000w": 0 },
        "address_forms": { "en": { "banned": ["everyone"], "allowed": ["all"] } },
        "sentence_length_range": [1, 2]
    }));
    // "guys" becomes "everyone" before address forms run, then truncation
    assert_eq!(apply_fallback(&policy, "Hey guys 👋 welcome!"), "Hello all");
}

#[tokio::test]
async fn usable_backend_reply_is_returned_verbatim() {
    let backend = ScriptedBackend::replying(json!({
        "improved_text": "  Hello everyone, we cannot wait.  ",
        "self_check": { "formality": "formal" }
    }));
    let request = OptimizeRequest::new("Hey guys!!! I can't wait!!");

    let result = optimize(Some(&backend), &scenario_a_signature(), &request, &options()).await;
    assert_eq!(backend.calls(), 1);
    assert!(!result.is_fallback());
    assert_eq!(result.improved_text, "  Hello everyone, we cannot wait.  ");
    assert_eq!(result.self_check, json!({ "formality": "formal" }));
}

#[tokio::test]
async fn unusable_replies_fall_back() {
    let request = OptimizeRequest::new("Hey guys!!! I can't wait!!");
    let expected = apply_fallback(
        &StylePolicy::from_value(&scenario_a_signature()),
        &request.draft,
    );

    let replies = [
        json!({ "improved_text": "" }),
        json!({ "improved_text": 42 }),
        json!({ "self_check": "ok" }),
    ];
    for reply in replies {
        let backend = ScriptedBackend::replying(reply);
        let result = optimize(Some(&backend), &scenario_a_signature(), &request, &options()).await;
        assert!(result.is_fallback());
        assert_eq!(result.improved_text, expected);
    }

    let backend = ScriptedBackend::failing();
    let result = optimize(Some(&backend), &scenario_a_signature(), &request, &options()).await;
    assert!(result.is_fallback());
    assert_eq!(result.improved_text, expected);
}

#[tokio::test]
async fn timeout_and_cancellation_fall_back() {
    let request = OptimizeRequest::new("Hey guys!!! I can't wait!!");
    let backend = ScriptedBackend::replying(json!({ "improved_text": "too late" }))
        .with_delay(Duration::from_millis(500));

    let quick = CompletionOptions {
        timeout: Duration::from_millis(20),
        ..CompletionOptions::default()
    };
    let result = optimize(Some(&backend), &scenario_a_signature(), &request, &quick).await;
    assert!(result.is_fallback());

    let token = CancellationToken::new();
    token.cancel();
    let cancelled = CompletionOptions {
        cancel: Some(token),
        ..options()
    };
    let result = optimize(Some(&backend), &scenario_a_signature(), &request, &cancelled).await;
    assert!(result.is_fallback());
    assert_eq!(result.improved_text, "Hello everyone... I cannot wait..");
}

#[tokio::test]
async fn prompt_carries_signature_and_constraints() {
    let backend = ScriptedBackend::replying(json!({ "improved_text": "Hi." }));
    let mut request = OptimizeRequest::new("Hey guys");
    request.task = "Announce the launch".to_string();
    request.audience = "existing customers".to_string();
    request.word_count_range = "20-40".to_string();

    optimize(Some(&backend), &scenario_a_signature(), &request, &options()).await;

    let payload: Value = serde_json::from_str(&backend.last_messages()[1].content).unwrap();
    assert_eq!(payload["signature"], scenario_a_signature());
    assert_eq!(payload["task_description"], "Announce the launch");
    assert_eq!(payload["audience"], "existing customers");
    assert_eq!(payload["word_count_range"], "20-40");
    assert_eq!(payload["draft_text"], "Hey guys");
}
