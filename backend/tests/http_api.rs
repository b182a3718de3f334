//! End-to-end tests for the REST surface: accounts, generation, history and
//! downloads running against real services and in-memory stores.

#[path = "support/app.rs"]
mod app_support;

use std::sync::Arc;

use actix_http::Request;
use actix_web::body::BoxBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::{StatusCode, header};
use actix_web::test::{self, TestRequest};
use backend::domain::OutputFormat;
use rstest::{fixture, rstest};
use serde_json::{Value, json};
use app_support::{ARTIFACT_BYTES, Part, RecordingBuilder, http_state, init_app, multipart};
use tempfile::TempDir;

const PYTHON_SOURCE: &[u8] = b"import os\n\ndef greet(name):\n    return name\n\nclass Greeter:\n    pass\n";

struct World {
    builder: Arc<RecordingBuilder>,
    uploads: TempDir,
}

#[fixture]
fn world() -> World {
    World {
        builder: Arc::new(RecordingBuilder::default()),
        uploads: tempfile::tempdir().expect("upload dir"),
    }
}

async fn signup<S>(app: &S, username: &str, email: &str) -> String
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let response = test::call_service(
        app,
        TestRequest::post()
            .uri("/signup")
            .set_json(json!({ "username": username, "email": email, "password": "correct horse" }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["message"], "User created");
    body["token"].as_str().expect("token").to_owned()
}

fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {token}"))
}

fn generate_request(token: &str, format: &str) -> Request {
    let (content_type, body) = multipart(&[
        Part::File("inputFile", "main.py", PYTHON_SOURCE),
        Part::Text("instructions", "Document the greeting module"),
        Part::Text("format", format),
    ]);
    TestRequest::post()
        .uri("/generate")
        .insert_header(bearer(token))
        .insert_header((header::CONTENT_TYPE, content_type))
        .set_payload(body)
        .to_request()
}

#[rstest]
#[actix_web::test]
async fn signup_login_and_profile(world: World) {
    let app = init_app(http_state(world.builder.clone(), world.uploads.path())).await;
    let token = signup(&app, "ada", "Ada@Example.com").await;

    let me = test::call_service(
        &app,
        TestRequest::get().uri("/auth/me").insert_header(bearer(&token)).to_request(),
    )
    .await;
    assert_eq!(me.status(), StatusCode::OK);
    let profile: Value = test::read_body_json(me).await;
    assert_eq!(profile, json!({ "name": "ada" }));

    let login = test::call_service(
        &app,
        TestRequest::post()
            .uri("/login")
            .set_json(json!({ "email": "ada@example.com", "password": "correct horse" }))
            .to_request(),
    )
    .await;
    assert_eq!(login.status(), StatusCode::OK);
    let body: Value = test::read_body_json(login).await;
    assert_eq!(body["message"], "Logged in");
    assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));
}

#[rstest]
#[actix_web::test]
async fn duplicate_signup_conflicts(world: World) {
    let app = init_app(http_state(world.builder.clone(), world.uploads.path())).await;
    signup(&app, "ada", "ada@example.com").await;

    let again = test::call_service(
        &app,
        TestRequest::post()
            .uri("/signup")
            .set_json(json!({ "username": "ada2", "email": "ADA@example.com", "password": "x" }))
            .to_request(),
    )
    .await;
    assert_eq!(again.status(), StatusCode::CONFLICT);
    let body: Value = test::read_body_json(again).await;
    assert_eq!(body["code"], "conflict");
}

#[rstest]
#[case("ada@example.com", "wrong password")]
#[case("nobody@example.com", "correct horse")]
#[actix_web::test]
async fn bad_credentials_are_unauthorised(
    world: World,
    #[case] email: &str,
    #[case] password: &str,
) {
    let app = init_app(http_state(world.builder.clone(), world.uploads.path())).await;
    signup(&app, "ada", "ada@example.com").await;

    let response = test::call_service(
        &app,
        TestRequest::post()
            .uri("/login")
            .set_json(json!({ "email": email, "password": password }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["message"], "invalid credentials");
}

#[rstest]
#[actix_web::test]
async fn generate_records_history_and_cleans_up(world: World) {
    let app = init_app(http_state(world.builder.clone(), world.uploads.path())).await;
    let token = signup(&app, "ada", "ada@example.com").await;

    let response = test::call_service(&app, generate_request(&token, "PDF")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body, json!({ "pdf": "report.pdf", "diagrams_count": 1 }));

    let payloads = world.builder.payloads();
    let payload = payloads.first().expect("builder called");
    assert_eq!(payloads.len(), 1);
    assert_eq!(payload.format, OutputFormat::Pdf);
    assert_eq!(payload.code.as_bytes(), PYTHON_SOURCE);
    assert_eq!(payload.abstract_text, "Document the greeting module");
    assert_eq!(payload.uml_instructions, payload.instructions);

    let leftovers = std::fs::read_dir(world.uploads.path())
        .expect("read upload dir")
        .count();
    assert_eq!(leftovers, 0, "staged upload should be removed");

    let history = test::call_service(
        &app,
        TestRequest::get().uri("/history").insert_header(bearer(&token)).to_request(),
    )
    .await;
    assert_eq!(history.status(), StatusCode::OK);
    let items: Value = test::read_body_json(history).await;
    let item = items.get(0).expect("one history item");
    assert_eq!(items.as_array().map(Vec::len), Some(1));
    assert_eq!(item["fileName"], "main.py");
    assert_eq!(item["format"], "pdf");
    assert_eq!(item["instructions"], "Document the greeting module");
    assert_eq!(item["summary"]["functions"], json!(["greet"]));
    assert_eq!(item["summary"]["classes"], json!(["Greeter"]));
    assert_eq!(item["artifacts"], json!({ "pdf": "report.pdf" }));
}

#[rstest]
#[actix_web::test]
async fn history_is_scoped_to_its_owner(world: World) {
    let app = init_app(http_state(world.builder.clone(), world.uploads.path())).await;
    let owner = signup(&app, "ada", "ada@example.com").await;
    let other = signup(&app, "grace", "grace@example.com").await;

    let generated = test::call_service(&app, generate_request(&owner, "docx")).await;
    assert_eq!(generated.status(), StatusCode::OK);
    let items: Value = test::read_body_json(
        test::call_service(
            &app,
            TestRequest::get().uri("/history").insert_header(bearer(&owner)).to_request(),
        )
        .await,
    )
    .await;
    let id = items[0]["id"].as_str().expect("history id").to_owned();

    let others_view: Value = test::read_body_json(
        test::call_service(
            &app,
            TestRequest::get().uri("/history").insert_header(bearer(&other)).to_request(),
        )
        .await,
    )
    .await;
    assert_eq!(others_view, json!([]));

    let stolen = test::call_service(
        &app,
        TestRequest::delete()
            .uri(&format!("/history/{id}"))
            .insert_header(bearer(&other))
            .to_request(),
    )
    .await;
    assert_eq!(stolen.status(), StatusCode::NOT_FOUND);

    let deleted = test::call_service(
        &app,
        TestRequest::delete()
            .uri(&format!("/history/{id}"))
            .insert_header(bearer(&owner))
            .to_request(),
    )
    .await;
    assert_eq!(deleted.status(), StatusCode::OK);
    let body: Value = test::read_body_json(deleted).await;
    assert_eq!(body["message"], "History item deleted");

    let again = test::call_service(
        &app,
        TestRequest::delete()
            .uri(&format!("/history/{id}"))
            .insert_header(bearer(&owner))
            .to_request(),
    )
    .await;
    assert_eq!(again.status(), StatusCode::NOT_FOUND);
}

#[rstest]
#[actix_web::test]
async fn malformed_history_ids_are_not_found(world: World) {
    let app = init_app(http_state(world.builder.clone(), world.uploads.path())).await;
    let token = signup(&app, "ada", "ada@example.com").await;

    let response = test::call_service(
        &app,
        TestRequest::delete()
            .uri("/history/not-a-uuid")
            .insert_header(bearer(&token))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[rstest]
#[actix_web::test]
async fn downloads_stream_builder_artifacts(world: World) {
    let app = init_app(http_state(world.builder.clone(), world.uploads.path())).await;
    let token = signup(&app, "ada", "ada@example.com").await;

    let response = test::call_service(
        &app,
        TestRequest::get()
            .uri("/download/pdf/report.pdf")
            .insert_header(bearer(&token))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .and_then(|value| value.to_str().ok()),
        Some("attachment; filename=\"report.pdf\"")
    );
    let body = test::read_body(response).await;
    assert_eq!(body.as_ref(), ARTIFACT_BYTES);

    let missing = test::call_service(
        &app,
        TestRequest::get()
            .uri("/download/pdf/missing.pdf")
            .insert_header(bearer(&token))
            .to_request(),
    )
    .await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[rstest]
#[case(TestRequest::get().uri("/auth/me"))]
#[case(TestRequest::get().uri("/history"))]
#[case(TestRequest::delete().uri("/history/abc"))]
#[case(TestRequest::get().uri("/download/pdf/report.pdf"))]
#[case(TestRequest::post().uri("/generate"))]
#[actix_web::test]
async fn protected_routes_require_a_bearer(world: World, #[case] request: TestRequest) {
    let app = init_app(http_state(world.builder.clone(), world.uploads.path())).await;
    let response = test::call_service(&app, request.to_request()).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.headers().contains_key("trace-id"));
}

#[rstest]
#[actix_web::test]
async fn forged_tokens_are_forbidden(world: World) {
    let app = init_app(http_state(world.builder.clone(), world.uploads.path())).await;
    let response = test::call_service(
        &app,
        TestRequest::get()
            .uri("/history")
            .insert_header(bearer("not.a.token"))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["code"], "forbidden");
}

#[rstest]
#[actix_web::test]
async fn generate_rejects_missing_instructions_without_calling_builder(world: World) {
    let app = init_app(http_state(world.builder.clone(), world.uploads.path())).await;
    let token = signup(&app, "ada", "ada@example.com").await;

    let (content_type, body) = multipart(&[Part::File("file", "main.py", PYTHON_SOURCE)]);
    let response = test::call_service(
        &app,
        TestRequest::post()
            .uri("/generate")
            .insert_header(bearer(&token))
            .insert_header((header::CONTENT_TYPE, content_type))
            .set_payload(body)
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(world.builder.payloads().is_empty());
    assert_eq!(
        std::fs::read_dir(world.uploads.path())
            .expect("read upload dir")
            .count(),
        0
    );
}
