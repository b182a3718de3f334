//! Tests for the document generation service.

use std::sync::{Arc, Mutex};

use bytes::Bytes;
use futures_util::{StreamExt, stream};
use rstest::{fixture, rstest};
use serde_json::json;

use super::*;
use crate::domain::ports::{HistoryRepositoryError, MockDocumentBuilder, MockHistoryRepository};
use crate::domain::{ErrorCode, ExtractionSummary};
use crate::domain::test_clock::{fixture_clock, fixture_timestamp};

const JS_SOURCE: &str = "function greet() {}\nclass Greeter {}\n";

#[fixture]
fn user_id() -> UserId {
    UserId::random()
}

fn request(user_id: UserId, format: OutputFormat) -> GenerationRequest {
    GenerationRequest::try_new(user_id, "app.js", JS_SOURCE.as_bytes(), "Explain it", format)
        .expect("valid request")
}

fn make_service(builder: MockDocumentBuilder, history: MockHistoryRepository) -> GenerationService {
    GenerationService::new(Arc::new(builder), Arc::new(history), fixture_clock())
}

#[rstest]
#[case("", "Explain", GenerationValidationError::MissingFile)]
#[case("app.js", "", GenerationValidationError::MissingInstructions)]
#[case("app.js", "   \n", GenerationValidationError::MissingInstructions)]
fn request_requires_file_and_instructions(
    user_id: UserId,
    #[case] file_name: &str,
    #[case] instructions: &str,
    #[case] expected: GenerationValidationError,
) {
    let err = GenerationRequest::try_new(user_id, file_name, b"x", instructions, OutputFormat::Docx)
        .expect_err("invalid request");
    assert_eq!(err, expected);
}

#[rstest]
fn request_decodes_invalid_utf8_lossily(user_id: UserId) {
    let request =
        GenerationRequest::try_new(user_id, "a.py", &[b'x', 0xff, b'y'], "Doc", OutputFormat::Pdf)
            .expect("valid request");
    assert_eq!(request.source(), "x\u{fffd}y");
}

#[rstest]
fn request_keeps_instruction_whitespace(user_id: UserId) {
    let request =
        GenerationRequest::try_new(user_id, "a.py", b"", "  Doc  ", OutputFormat::Pdf)
            .expect("valid request");
    assert_eq!(request.instructions(), "  Doc  ");
}

#[rstest]
#[case("report.docx", true)]
#[case("report", true)]
#[case("", false)]
#[case("../etc/passwd", false)]
#[case("nested/report.pdf", false)]
#[case("nested\\report.pdf", false)]
#[case("..", false)]
fn artifact_names_are_single_segments(#[case] raw: &str, #[case] valid: bool) {
    assert_eq!(ArtifactName::new(raw).is_ok(), valid);
}

#[rstest]
#[tokio::test]
async fn generate_records_history_and_returns_builder_body(user_id: UserId) {
    let mut builder = MockDocumentBuilder::new();
    builder
        .expect_build_document()
        .withf(|payload| {
            payload.code == JS_SOURCE
                && payload.instructions == "Explain it"
                && payload.abstract_text == "Explain it"
                && payload.format == OutputFormat::Pptx
        })
        .times(1)
        .return_once(|_| Ok(json!({ "diagrams_count": 2, "pptx": "deck.pptx" })));

    let stored: Arc<Mutex<Vec<HistoryRecord>>> = Arc::default();
    let sink = Arc::clone(&stored);
    let mut history = MockHistoryRepository::new();
    history.expect_insert().times(1).returning(move |record| {
        sink.lock().expect("history lock").push(record.clone());
        Ok(())
    });

    let service = make_service(builder, history);
    let body = service
        .generate(request(user_id, OutputFormat::Pptx))
        .await
        .expect("generation succeeds");

    assert_eq!(body, json!({ "diagrams_count": 2, "pptx": "deck.pptx" }));
    let records = stored.lock().expect("history lock");
    let [record] = records.as_slice() else {
        panic!("expected exactly one record, got {}", records.len());
    };
    assert_eq!(record.user_id, user_id);
    assert_eq!(record.file_name, "app.js");
    assert_eq!(record.format, OutputFormat::Pptx);
    assert_eq!(record.instructions, "Explain it");
    assert_eq!(record.created_at, fixture_timestamp());
    assert_eq!(record.artifacts.get(OutputFormat::Pptx), Some("deck.pptx"));
    assert_eq!(
        record.summary,
        ExtractionSummary::Parsed {
            functions: vec!["greet".to_owned()],
            classes: vec!["Greeter".to_owned()],
            lines: 3,
        }
    );
}

#[rstest]
#[tokio::test]
async fn builder_status_errors_carry_details_and_skip_history(user_id: UserId) {
    let mut builder = MockDocumentBuilder::new();
    builder.expect_build_document().times(1).return_once(|_| {
        Err(DocumentBuilderError::status(502_u16, "bad gateway"))
    });
    let mut history = MockHistoryRepository::new();
    history.expect_insert().times(0);

    let err = make_service(builder, history)
        .generate(request(user_id, OutputFormat::Docx))
        .await
        .expect_err("builder failure");

    assert_eq!(err.code(), ErrorCode::UpstreamError);
    assert_eq!(
        err.details(),
        Some(&json!({ "status": 502, "body": "bad gateway" }))
    );
}

#[rstest]
#[case(DocumentBuilderError::timeout("deadline elapsed"))]
#[case(DocumentBuilderError::transport("connection refused"))]
#[tokio::test]
async fn builder_transport_errors_have_null_status(
    user_id: UserId,
    #[case] failure: DocumentBuilderError,
) {
    let mut builder = MockDocumentBuilder::new();
    builder
        .expect_build_document()
        .times(1)
        .return_once(move |_| Err(failure));
    let mut history = MockHistoryRepository::new();
    history.expect_insert().times(0);

    let err = make_service(builder, history)
        .generate(request(user_id, OutputFormat::Docx))
        .await
        .expect_err("builder failure");

    assert_eq!(err.code(), ErrorCode::UpstreamError);
    let details = err.details().expect("details present");
    assert!(details["status"].is_null());
}

#[rstest]
#[tokio::test]
async fn history_failures_surface_after_a_successful_build(user_id: UserId) {
    let mut builder = MockDocumentBuilder::new();
    builder
        .expect_build_document()
        .times(1)
        .return_once(|_| Ok(json!({ "diagrams_count": 0 })));
    let mut history = MockHistoryRepository::new();
    history
        .expect_insert()
        .times(1)
        .return_once(|_| Err(HistoryRepositoryError::connection("pool exhausted")));

    let err = make_service(builder, history)
        .generate(request(user_id, OutputFormat::Docx))
        .await
        .expect_err("history failure");
    assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
}

#[rstest]
#[tokio::test]
async fn fetch_artifact_streams_builder_bytes() {
    let mut builder = MockDocumentBuilder::new();
    builder
        .expect_download()
        .withf(|format, name| *format == OutputFormat::Pdf && name == "report.pdf")
        .times(1)
        .return_once(|_, _| {
            Ok(ArtifactDownload {
                content_type: Some("application/pdf".to_owned()),
                content_length: Some(3),
                body: Box::pin(stream::iter([Ok(Bytes::from_static(b"pdf"))])),
            })
        });

    let name = ArtifactName::new("report.pdf").expect("valid name");
    let download = make_service(builder, MockHistoryRepository::new())
        .fetch_artifact(OutputFormat::Pdf, &name)
        .await
        .expect("download opens");

    assert_eq!(download.content_type.as_deref(), Some("application/pdf"));
    let chunks: Vec<_> = download.body.collect().await;
    assert_eq!(chunks.len(), 1);
}

#[rstest]
#[tokio::test]
async fn fetch_artifact_maps_missing_files_to_not_found() {
    let mut builder = MockDocumentBuilder::new();
    builder
        .expect_download()
        .times(1)
        .return_once(|_, _| Err(DocumentBuilderError::not_found("no such file")));

    let name = ArtifactName::new("gone.docx").expect("valid name");
    let err = make_service(builder, MockHistoryRepository::new())
        .fetch_artifact(OutputFormat::Docx, &name)
        .await
        .expect_err("missing artefact");
    assert_eq!(err.code(), ErrorCode::NotFound);
}
