use serde_json::{json, Value};
use tone_of_voice::{score, StylePolicy};

fn policy(value: Value) -> StylePolicy {
    StylePolicy::from_value(&value)
}

#[test]
fn emoji_free_text_passes_none_policy() {
    let result = score("No emojis here.", &policy(json!({ "emoji_policy": "none" })));
    assert!(result.feedback.emoji_policy_ok);
}

#[test]
fn emoji_and_informal_marker_fail_formal_policy() {
    let result = score(
        "😀 hey!",
        &policy(json!({ "emoji_policy": "none", "formality_level": "formal" })),
    );
    assert!(!result.feedback.emoji_policy_ok);
    assert!(!result.feedback.formality_ok);
    assert!(result.feedback.exclamation_ok);
    assert!(result.feedback.address_forms_ok);
    assert!(result.feedback.sentence_length_ok);
    assert_eq!(result.score, 60);
}

#[test]
fn missing_emoji_policy_means_none() {
    let result = score("Party time 🎉", &policy(json!({})));
    assert!(!result.feedback.emoji_policy_ok);

    let result = score("Party time 🎉", &policy(json!({ "emoji_policy": "allow" })));
    assert!(result.feedback.emoji_policy_ok);
}

#[test]
fn informal_markers_only_matter_when_formal() {
    let text = "lol that was fun, guys";
    assert!(score(text, &policy(json!({ "formality_level": "neutral" }))).feedback.formality_ok);
    assert!(!score(text, &policy(json!({ "formality_level": "formal" }))).feedback.formality_ok);
    // whole words only
    assert!(score("They said hello.", &policy(json!({ "formality_level": "formal" }))).feedback.formality_ok);
}

#[test]
fn exclamation_cap_is_absolute() {
    let capped = policy(json!({ "punctuation_cadence": { "exclamation_max_per_1000w": 1 } }));
    assert!(score("Yes!", &capped).feedback.exclamation_ok);
    assert!(!score("Yes! Yes!", &capped).feedback.exclamation_ok);
    assert!(score("A! B!", &policy(json!({}))).feedback.exclamation_ok);
    assert!(!score("A! B! C!", &policy(json!({}))).feedback.exclamation_ok);
}

#[test]
fn banned_address_forms_fail() {
    let signature = policy(json!({
        "address_forms": {
            "en": { "allowed": ["you"], "banned": ["sir", "madam"] },
            "de": { "allowed": ["Sie"], "banned": ["du"] }
        }
    }));
    assert!(!score("Thank you, Madam.", &signature).feedback.address_forms_ok);
    assert!(!score("Danke, DU.", &signature).feedback.address_forms_ok);
    assert!(score("Thank you, Sirius.", &signature).feedback.address_forms_ok);
}

#[test]
fn sentence_length_uses_split_piece_average() {
    // 6 words over 3 pieces ("One two three", " Four five six", "")
    let text = "One two three. Four five six.";
    assert!(score(text, &policy(json!({ "sentence_length_range": [1, 3] }))).feedback.sentence_length_ok);
    assert!(score(text, &policy(json!({ "sentence_length_range": [2, 2] }))).feedback.sentence_length_ok);
    assert!(!score(text, &policy(json!({ "sentence_length_range": [3, 6] }))).feedback.sentence_length_ok);
    assert!(score(text, &policy(json!({}))).feedback.sentence_length_ok);
}

#[test]
fn clean_text_scores_full_marks() {
    let signature = policy(json!({
        "formality_level": "formal",
        "emoji_policy": "none",
        "address_forms": { "en": { "allowed": ["you"], "banned": ["sir"] } },
        "sentence_length_range": [1, 10]
    }));
    let result = score("We will reply to you within one business day.", &signature);
    assert_eq!(result.score, 100);
}

#[test]
fn score_always_matches_feedback() {
    let signatures = [
        json!({}),
        json!({ "emoji_policy": "none", "formality_level": "formal" }),
        json!({ "emoji_policy": "sparingly", "sentence_length_range": [8, 20] }),
        json!({
            "punctuation_cadence": { "exclamation_max_per_1000w": 0 },
            "address_forms": { "en": { "banned": ["hey"] } }
        }),
    ];
    let texts = [
        "",
        "Hey guys!!! 😀",
        "A calm and measured note. Nothing more.",
        "lol!",
    ];

    for signature in &signatures {
        let signature = policy(signature.clone());
        for text in texts {
            let first = score(text, &signature);
            assert_eq!(first, score(text, &signature));
            let expected = (first.feedback.passed() as f64 / 5.0 * 100.0).round() as u8;
            assert_eq!(first.score, expected);
            assert_eq!(first.score % 20, 0);
        }
    }
}

#[test]
fn feedback_serializes_with_check_names() {
    let result = score("Hello.", &policy(json!({})));
    let value = serde_json::to_value(result).unwrap();
    for key in [
        "exclamation_ok",
        "emoji_policy_ok",
        "formality_ok",
        "address_forms_ok",
        "sentence_length_ok",
    ] {
        assert!(value["feedback"][key].is_boolean(), "missing {}", key);
    }
    assert_eq!(value["score"], 100);
}
