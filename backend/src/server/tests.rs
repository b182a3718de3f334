//! Tests for server bootstrap: readiness signalling and app wiring.

use super::*;
use actix_web::http::StatusCode;
use actix_web::test;
use backend::inbound::http::state::UploadSettings;
use backend::inbound::http::token_config::TokenSettings;
use rstest::{fixture, rstest};
use std::time::Duration;
use zeroize::Zeroizing;

#[fixture]
fn health_state() -> web::Data<HealthState> {
    web::Data::new(HealthState::new())
}

fn server_config(upload_dir: &std::path::Path) -> ServerConfig {
    ServerConfig::new(
        "127.0.0.1:0".parse().expect("socket addr"),
        TokenSettings {
            secret: Zeroizing::new(vec![1_u8; 32]),
            fingerprint: "test".to_owned(),
            ephemeral: true,
        },
        BuilderConfig::new(
            "http://127.0.0.1:9".parse().expect("builder url"),
            Duration::from_secs(1),
        ),
        UploadSettings::new(upload_dir, 1024),
    )
    .with_cors_origins(vec!["http://localhost:3000".to_owned()])
}

#[rstest]
#[actix_web::test]
async fn create_server_marks_ready(health_state: web::Data<HealthState>) {
    let dir = tempfile::tempdir().expect("tempdir");
    let upload_dir = dir.path().join("uploads");
    assert!(!health_state.is_ready(), "state should start unready");

    let _server =
        create_server(health_state.clone(), server_config(&upload_dir)).expect("server builds");

    assert!(health_state.is_ready(), "server creation should mark readiness");
    assert!(upload_dir.is_dir(), "upload directory should be created");
}

#[rstest]
#[actix_web::test]
async fn app_serves_health_checks_and_guards_api(health_state: web::Data<HealthState>) {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = server_config(dir.path());
    let http_state = build_http_state(&config).expect("state");
    health_state.mark_ready();
    let app = test::init_service(build_app(AppDependencies {
        health_state,
        http_state,
        cors_origins: config.cors_origins.clone(),
    }))
    .await;

    let readiness =
        test::call_service(&app, test::TestRequest::get().uri("/health/ready").to_request()).await;
    assert_eq!(readiness.status(), StatusCode::OK);
    assert!(readiness.headers().contains_key("trace-id"));

    let history = test::call_service(&app, test::TestRequest::get().uri("/history").to_request())
        .await;
    assert_eq!(history.status(), StatusCode::UNAUTHORIZED);
}

#[rstest]
#[actix_web::test]
async fn cors_allows_configured_origin_only(health_state: web::Data<HealthState>) {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = server_config(dir.path());
    let http_state = build_http_state(&config).expect("state");
    let app = test::init_service(build_app(AppDependencies {
        health_state,
        http_state,
        cors_origins: config.cors_origins.clone(),
    }))
    .await;

    let allowed = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/health/live")
            .insert_header((header::ORIGIN, "http://localhost:3000"))
            .to_request(),
    )
    .await;
    assert_eq!(
        allowed
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|value| value.to_str().ok()),
        Some("http://localhost:3000")
    );

    let rejected = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/health/live")
            .insert_header((header::ORIGIN, "http://evil.example"))
            .to_request(),
    )
    .await;
    assert!(
        rejected
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none()
    );
}
