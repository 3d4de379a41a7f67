//! REST client tests against a local mockito server.

use assemblyai::lemur::{
    LemurBaseParams, LemurQuestion, LemurQuestionAnswerParams, LemurResponse, LemurSummaryParams,
};
use assemblyai::transcripts::{ListTranscriptParams, SubtitleFormat, TranscriptParams};
use assemblyai::{AssemblyAiClient, ClientBuilder, Error, PollingOptions, TranscriptStatus};
use mockito::{Matcher, Server, ServerGuard};
use serde_json::json;

const API_KEY: &str = "test-key";

async fn setup() -> (ServerGuard, AssemblyAiClient) {
    let server = Server::new_async().await;
    let client = ClientBuilder::new()
        .api_key(API_KEY)
        .base_url(server.url())
        .build()
        .unwrap();
    (server, client)
}

fn transcript_body(status: &str) -> String {
    let mut body = json!({
        "id": "t1",
        "status": status,
        "audio_url": "https://example.com/a.mp3",
        "text": null,
        "error": null
    });
    if status == "completed" {
        body["text"] = json!("hello world");
    }
    body.to_string()
}

#[tokio::test]
async fn submit_sends_key_and_params() {
    let (mut server, client) = setup().await;
    let mock = server
        .mock("POST", "/v2/transcript")
        .match_header("authorization", API_KEY)
        .match_body(Matcher::PartialJson(json!({
            "audio_url": "https://example.com/a.mp3",
            "speaker_labels": true
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(transcript_body("queued"))
        .create_async()
        .await;

    let params = TranscriptParams {
        speaker_labels: Some(true),
        ..TranscriptParams::new("https://example.com/a.mp3")
    };
    let transcript = client.transcripts().submit(&params).await.unwrap();

    assert_eq!(transcript.id, "t1");
    assert_eq!(transcript.status, TranscriptStatus::Queued);
    mock.assert_async().await;
}

#[tokio::test]
async fn transcribe_submits_then_polls() {
    let (mut server, client) = setup().await;
    let submit = server
        .mock("POST", "/v2/transcript")
        .with_status(200)
        .with_body(transcript_body("queued"))
        .create_async()
        .await;
    let poll = server
        .mock("GET", "/v2/transcript/t1")
        .match_header("authorization", API_KEY)
        .with_status(200)
        .with_body(transcript_body("completed"))
        .expect(1)
        .create_async()
        .await;

    let options = PollingOptions::from_millis(10, 5_000).unwrap();
    let transcript = client
        .transcripts()
        .transcribe(&TranscriptParams::new("https://example.com/a.mp3"), &options)
        .await
        .unwrap();

    assert!(transcript.is_completed());
    assert_eq!(transcript.text.as_deref(), Some("hello world"));
    submit.assert_async().await;
    poll.assert_async().await;
}

#[tokio::test]
async fn terminal_submit_skips_polling() {
    let (mut server, client) = setup().await;
    server
        .mock("POST", "/v2/transcript")
        .with_status(200)
        .with_body(transcript_body("error"))
        .create_async()
        .await;
    let poll = server
        .mock("GET", "/v2/transcript/t1")
        .expect(0)
        .create_async()
        .await;

    let transcript = client
        .transcripts()
        .transcribe(
            &TranscriptParams::new("https://example.com/a.mp3"),
            &PollingOptions::default(),
        )
        .await
        .unwrap();

    assert!(transcript.is_error());
    poll.assert_async().await;
}

#[tokio::test]
async fn api_errors_carry_status_and_message() {
    let (mut server, client) = setup().await;
    server
        .mock("GET", "/v2/transcript/missing")
        .with_status(404)
        .with_body(r#"{"error": "Transcript not found"}"#)
        .create_async()
        .await;

    let err = client.transcripts().get("missing").await.unwrap_err();
    match err {
        Error::Api { status, message } => {
            assert_eq!(status, 404);
            assert_eq!(message, "Transcript not found");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn unknown_transcript_fields_are_preserved() {
    let (mut server, client) = setup().await;
    server
        .mock("GET", "/v2/transcript/t1")
        .with_status(200)
        .with_body(
            json!({
                "id": "t1",
                "status": "completed",
                "text": "hi",
                "auto_highlights_result": {"status": "success", "results": []}
            })
            .to_string(),
        )
        .create_async()
        .await;

    let transcript = client.transcripts().get("t1").await.unwrap();
    assert_eq!(
        transcript.extra["auto_highlights_result"]["status"],
        json!("success")
    );
}

#[tokio::test]
async fn list_sends_filters_as_query() {
    let (mut server, client) = setup().await;
    let mock = server
        .mock("GET", "/v2/transcript")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("limit".into(), "2".into()),
            Matcher::UrlEncoded("status".into(), "completed".into()),
        ]))
        .with_status(200)
        .with_body(
            json!({
                "page_details": {
                    "limit": 2,
                    "result_count": 1,
                    "current_url": "https://api.assemblyai.com/v2/transcript?limit=2",
                    "prev_url": null,
                    "next_url": null
                },
                "transcripts": [{
                    "id": "t1",
                    "resource_url": "https://api.assemblyai.com/v2/transcript/t1",
                    "status": "completed",
                    "created": "2024-01-01T00:00:00",
                    "completed": "2024-01-01T00:01:00",
                    "audio_url": "https://example.com/a.mp3",
                    "error": null
                }]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let list = client
        .transcripts()
        .list(&ListTranscriptParams {
            limit: Some(2),
            status: Some(TranscriptStatus::Completed),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(list.page_details.result_count, 1);
    assert_eq!(list.transcripts[0].id, "t1");
    mock.assert_async().await;
}

#[tokio::test]
async fn delete_returns_redacted_transcript() {
    let (mut server, client) = setup().await;
    let mock = server
        .mock("DELETE", "/v2/transcript/t1")
        .with_status(200)
        .with_body(transcript_body("completed"))
        .create_async()
        .await;

    let transcript = client.transcripts().delete("t1").await.unwrap();
    assert_eq!(transcript.id, "t1");
    mock.assert_async().await;
}

#[tokio::test]
async fn subtitles_are_returned_as_text() {
    let (mut server, client) = setup().await;
    let srt = "1\n00:00:00,000 --> 00:00:01,000\nhello world\n";
    server
        .mock("GET", "/v2/transcript/t1/srt")
        .match_query(Matcher::UrlEncoded("chars_per_caption".into(), "32".into()))
        .with_status(200)
        .with_header("content-type", "text/plain")
        .with_body(srt)
        .create_async()
        .await;

    let text = client
        .transcripts()
        .get_subtitles("t1", SubtitleFormat::Srt, Some(32))
        .await
        .unwrap();
    assert_eq!(text, srt);
}

#[tokio::test]
async fn word_search_joins_words() {
    let (mut server, client) = setup().await;
    let mock = server
        .mock("GET", "/v2/transcript/t1/word-search")
        .match_query(Matcher::UrlEncoded("words".into(), "foo,bar".into()))
        .with_status(200)
        .with_body(
            json!({
                "id": "t1",
                "total_count": 1,
                "matches": [{
                    "text": "foo",
                    "count": 1,
                    "timestamps": [[250, 600]],
                    "indexes": [3]
                }]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let found = client
        .transcripts()
        .word_search("t1", &["foo", "bar"])
        .await
        .unwrap();
    assert_eq!(found.total_count, 1);
    assert_eq!(found.matches[0].timestamps, vec![[250u64, 600]]);
    mock.assert_async().await;
}

#[tokio::test]
async fn sentences_and_redacted_audio() {
    let (mut server, client) = setup().await;
    server
        .mock("GET", "/v2/transcript/t1/sentences")
        .with_status(200)
        .with_body(
            json!({
                "id": "t1",
                "confidence": 0.9,
                "audio_duration": 2.0,
                "sentences": [{
                    "text": "Hello world.",
                    "start": 0,
                    "end": 900,
                    "confidence": 0.9,
                    "words": []
                }]
            })
            .to_string(),
        )
        .create_async()
        .await;
    server
        .mock("GET", "/v2/transcript/t1/redacted-audio")
        .with_status(200)
        .with_body(r#"{"status": "redacted_audio_ready", "redacted_audio_url": "https://cdn/x.mp3"}"#)
        .create_async()
        .await;

    let sentences = client.transcripts().get_sentences("t1").await.unwrap();
    assert_eq!(sentences.sentences[0].text, "Hello world.");
    let audio = client.transcripts().get_redacted_audio("t1").await.unwrap();
    assert_eq!(audio.redacted_audio_url, "https://cdn/x.mp3");
}

#[tokio::test]
async fn upload_posts_raw_bytes() {
    let (mut server, client) = setup().await;
    let mock = server
        .mock("POST", "/v2/upload")
        .match_header("authorization", API_KEY)
        .match_header("content-type", "application/octet-stream")
        .match_body("RIFF0000WAVE")
        .with_status(200)
        .with_body(r#"{"upload_url": "https://cdn.assemblyai.com/upload/abc"}"#)
        .create_async()
        .await;

    let uploaded = client.files().upload(b"RIFF0000WAVE".to_vec()).await.unwrap();
    assert_eq!(uploaded.upload_url, "https://cdn.assemblyai.com/upload/abc");
    mock.assert_async().await;
}

#[tokio::test]
async fn upload_file_streams_contents() {
    let (mut server, client) = setup().await;
    let path = std::env::temp_dir().join(format!("assemblyai-upload-{}.wav", std::process::id()));
    tokio::fs::write(&path, b"streamed audio").await.unwrap();
    let mock = server
        .mock("POST", "/v2/upload")
        .match_body("streamed audio")
        .with_status(200)
        .with_body(r#"{"upload_url": "https://cdn.assemblyai.com/upload/def"}"#)
        .create_async()
        .await;

    let uploaded = client.files().upload_file(&path).await;
    let _ = tokio::fs::remove_file(&path).await;

    assert_eq!(uploaded.unwrap().upload_url, "https://cdn.assemblyai.com/upload/def");
    mock.assert_async().await;
}

#[tokio::test]
async fn upload_missing_file_is_io_error() {
    let (_server, client) = setup().await;
    let err = client
        .files()
        .upload_file("/definitely/not/here.wav")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}

#[tokio::test]
async fn lemur_summary_round_trip() {
    let (mut server, client) = setup().await;
    let mock = server
        .mock("POST", "/lemur/v3/generate/summary")
        .match_body(Matcher::PartialJson(json!({
            "transcript_ids": ["t1"],
            "answer_format": "bullet points"
        })))
        .with_status(200)
        .with_body(
            json!({
                "request_id": "req-1",
                "response": "- greeting",
                "usage": {"input_tokens": 10, "output_tokens": 3}
            })
            .to_string(),
        )
        .create_async()
        .await;

    let summary = client
        .lemur()
        .summary(&LemurSummaryParams {
            answer_format: Some("bullet points".into()),
            base: LemurBaseParams::for_transcripts(["t1"]),
        })
        .await
        .unwrap();

    assert_eq!(summary.response, "- greeting");
    mock.assert_async().await;
}

#[tokio::test]
async fn lemur_question_answer_and_stored_response() {
    let (mut server, client) = setup().await;
    let body = json!({
        "request_id": "req-2",
        "response": [{"question": "Who spoke?", "answer": "Two people."}],
        "usage": {"input_tokens": 10, "output_tokens": 3}
    })
    .to_string();
    server
        .mock("POST", "/lemur/v3/generate/question-answer")
        .match_body(Matcher::PartialJson(json!({
            "questions": [{"question": "Who spoke?"}]
        })))
        .with_status(200)
        .with_body(&body)
        .create_async()
        .await;
    server
        .mock("GET", "/lemur/v3/req-2")
        .with_status(200)
        .with_body(&body)
        .create_async()
        .await;

    let answered = client
        .lemur()
        .question_answer(&LemurQuestionAnswerParams {
            questions: vec![LemurQuestion::new("Who spoke?")],
            base: LemurBaseParams::for_transcripts(["t1"]),
        })
        .await
        .unwrap();
    assert_eq!(answered.response[0].answer, "Two people.");

    let stored = client.lemur().get_response("req-2").await.unwrap();
    assert!(matches!(stored, LemurResponse::QuestionAnswer(_)));
}

#[tokio::test]
async fn lemur_purge_deletes_request_data() {
    let (mut server, client) = setup().await;
    let mock = server
        .mock("DELETE", "/lemur/v3/req-1")
        .with_status(200)
        .with_body(r#"{"request_id": "req-9", "request_id_to_purge": "req-1", "deleted": true}"#)
        .create_async()
        .await;

    let purged = client.lemur().purge_request_data("req-1").await.unwrap();
    assert!(purged.deleted);
    assert_eq!(purged.request_id_to_purge, "req-1");
    mock.assert_async().await;
}

#[tokio::test]
async fn temporary_token_is_minted() {
    let (mut server, client) = setup().await;
    let mock = server
        .mock("POST", "/v2/realtime/token")
        .match_body(Matcher::Json(json!({"expires_in": 60})))
        .with_status(200)
        .with_body(r#"{"token": "tmp-token"}"#)
        .create_async()
        .await;

    let token = client.realtime().create_temporary_token(60).await.unwrap();
    assert_eq!(token, "tmp-token");
    mock.assert_async().await;
}

#[tokio::test]
async fn waiting_on_server_side_failure_returns_transcript() {
    let (mut server, client) = setup().await;
    server
        .mock("GET", "/v2/transcript/t1")
        .with_status(200)
        .with_body(
            json!({"id": "t1", "status": "error", "error": "Download error"}).to_string(),
        )
        .create_async()
        .await;

    let transcript = client
        .transcripts()
        .wait_until_ready("t1", &PollingOptions::from_millis(10, 1_000).unwrap(), None)
        .await
        .unwrap();
    assert!(transcript.is_error());
    assert_eq!(transcript.error.as_deref(), Some("Download error"));
}

/// Response body that arrives only after `delay`.
fn slow_body(
    delay: std::time::Duration,
    body: &'static str,
) -> impl Fn(&mut dyn std::io::Write) -> std::io::Result<()> + Send + Sync + 'static {
    move |w| {
        std::thread::sleep(delay);
        w.write_all(body.as_bytes())
    }
}

#[tokio::test]
async fn uploads_outlive_the_request_timeout() {
    let mut server = Server::new_async().await;
    let client = ClientBuilder::new()
        .api_key(API_KEY)
        .base_url(server.url())
        .timeout(std::time::Duration::from_millis(200))
        .upload_timeout(std::time::Duration::from_secs(10))
        .build()
        .unwrap();
    let delay = std::time::Duration::from_millis(600);
    server
        .mock("POST", "/v2/upload")
        .with_status(200)
        .with_chunked_body(slow_body(
            delay,
            r#"{"upload_url": "https://cdn.assemblyai.com/upload/slow"}"#,
        ))
        .create_async()
        .await;
    server
        .mock("GET", "/v2/transcript/t1")
        .with_status(200)
        .with_chunked_body(slow_body(delay, r#"{"id": "t1", "status": "queued"}"#))
        .create_async()
        .await;

    let uploaded = client.files().upload(b"big audio".to_vec()).await.unwrap();
    assert_eq!(uploaded.upload_url, "https://cdn.assemblyai.com/upload/slow");

    let err = client.transcripts().get("t1").await.unwrap_err();
    assert!(matches!(err, Error::Transport(_)), "got {err:?}");
}
