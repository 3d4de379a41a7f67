//! Ordered decoding of the realtime and LeMUR message families.

use assemblyai::lemur::LemurResponse;
use assemblyai::realtime::{RealtimeMessage, RealtimeOutbound};
use assemblyai::Tagged;
use serde_json::json;

fn names<T: Tagged>() -> Vec<&'static str> {
    T::candidates().iter().map(|c| c.name).collect()
}

#[test]
fn candidate_orders_are_fixed() {
    assert_eq!(
        names::<RealtimeMessage>(),
        [
            "SessionBegins",
            "PartialTranscript",
            "FinalTranscript",
            "SessionTerminated",
            "RealtimeError"
        ]
    );
    assert_eq!(
        names::<RealtimeOutbound>(),
        [
            "TerminateSession",
            "ForceEndUtterance",
            "ConfigureEndUtteranceSilenceThreshold",
            "AudioData"
        ]
    );
    assert_eq!(
        names::<LemurResponse>(),
        ["Task", "Summary", "QuestionAnswer", "ActionItems"]
    );
}

#[test]
fn session_begins_wins_over_later_candidates() {
    // Also carries an `error` string, which the last candidate would accept.
    let raw = json!({
        "message_type": "SessionBegins",
        "session_id": "abc",
        "expires_at": "2024-01-01T00:00:00Z",
        "error": "ignored"
    });
    assert_eq!(RealtimeMessage::matched_name(&raw), Some("SessionBegins"));
    match RealtimeMessage::from_value(raw) {
        RealtimeMessage::SessionBegins(begins) => assert_eq!(begins.session_id, "abc"),
        other => panic!("expected SessionBegins, got {other:?}"),
    }
}

#[test]
fn termination_beats_error_when_both_match() {
    let raw = json!({"message_type": "SessionTerminated", "error": "closing"});
    assert!(RealtimeMessage::from_value(raw).is_termination());
}

#[test]
fn bare_error_decodes_as_realtime_error() {
    let msg = RealtimeMessage::from_json_str(r#"{"error":"Session idle for too long"}"#).unwrap();
    match msg {
        RealtimeMessage::Error(err) => assert_eq!(err.error, "Session idle for too long"),
        other => panic!("expected Error, got {other:?}"),
    }
}

#[test]
fn unmatched_payloads_fall_back_to_unknown() {
    let raw = json!({"foo": "bar"});
    assert_eq!(
        RealtimeMessage::from_value(raw.clone()),
        RealtimeMessage::Unknown(raw.clone())
    );
    assert_eq!(
        RealtimeOutbound::from_value(raw.clone()),
        RealtimeOutbound::Unknown(raw.clone())
    );
    assert_eq!(
        LemurResponse::from_value(raw.clone()),
        LemurResponse::Unknown(raw)
    );
}

#[test]
fn non_object_payloads_fall_back_to_unknown() {
    assert!(matches!(
        RealtimeMessage::from_json_str("[1, 2, 3]").unwrap(),
        RealtimeMessage::Unknown(_)
    ));
    assert!(matches!(
        RealtimeMessage::from_json_str("\"AAEC\"").unwrap(),
        RealtimeMessage::Unknown(_)
    ));
}

#[test]
fn decoding_is_idempotent() {
    let text = r#"{
        "message_type": "FinalTranscript",
        "audio_start": 100,
        "audio_end": 900,
        "confidence": 0.88,
        "text": "Good morning.",
        "words": [{"start": 100, "end": 500, "confidence": 0.9, "text": "Good"}],
        "created": "2024-01-01T00:00:00.000000",
        "punctuated": true,
        "text_formatted": true
    }"#;
    let first = RealtimeMessage::from_json_str(text).unwrap();
    let second = RealtimeMessage::from_json_str(text).unwrap();
    assert!(first.is_final_transcript());
    assert_eq!(first, second);
}

#[test]
fn lemur_free_text_response_decodes_as_task() {
    let raw = json!({
        "request_id": "req-1",
        "response": "The call covered quarterly results.",
        "usage": {"input_tokens": 120, "output_tokens": 18}
    });
    match LemurResponse::from_value(raw) {
        LemurResponse::Task(task) => {
            assert_eq!(task.request_id, "req-1");
            assert_eq!(task.usage.output_tokens, 18);
        }
        other => panic!("expected Task, got {other:?}"),
    }
}

#[test]
fn lemur_question_answer_is_recognised() {
    let raw = json!({
        "request_id": "req-2",
        "response": [{"question": "Who spoke?", "answer": "Two people."}],
        "usage": {"input_tokens": 50, "output_tokens": 5}
    });
    let response = LemurResponse::from_value(raw);
    assert_eq!(response.request_id(), Some("req-2"));
    match response {
        LemurResponse::QuestionAnswer(qa) => assert_eq!(qa.response[0].answer, "Two people."),
        other => panic!("expected QuestionAnswer, got {other:?}"),
    }
}

#[test]
fn lemur_malformed_answers_are_unknown() {
    let raw = json!({
        "request_id": "req-3",
        "response": [{"question": "Who spoke?"}],
        "usage": {"input_tokens": 1, "output_tokens": 1}
    });
    let response = LemurResponse::from_value(raw);
    assert!(matches!(response, LemurResponse::Unknown(_)));
    assert_eq!(response.request_id(), Some("req-3"));
}

#[test]
fn outbound_priority_follows_declaration_order() {
    let raw = json!({"terminate_session": true, "force_end_utterance": true});
    assert!(matches!(
        RealtimeOutbound::from_value(raw),
        RealtimeOutbound::TerminateSession(_)
    ));

    let raw = json!({"force_end_utterance": true, "end_utterance_silence_threshold": 500});
    assert!(matches!(
        RealtimeOutbound::from_value(raw),
        RealtimeOutbound::ForceEndUtterance(_)
    ));

    let raw = json!({"end_utterance_silence_threshold": 500});
    match RealtimeOutbound::from_value(raw) {
        RealtimeOutbound::ConfigureEndUtteranceSilenceThreshold(c) => {
            assert_eq!(c.end_utterance_silence_threshold, 500)
        }
        other => panic!("unexpected {other:?}"),
    }
}
