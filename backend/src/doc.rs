//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every REST handler, the request and response
//! payloads and the bearer security scheme. Swagger UI serves it at `/docs`
//! in debug builds and `cargo run --bin openapi-dump` prints it for tooling.

use crate::domain::{Error, ErrorCode, ExtractionSummary, GeneratedArtifacts, OutputFormat};
use crate::inbound::http::accounts::{LoginRequest, ProfileResponse, SignupRequest, TokenResponse};
use crate::inbound::http::generate::GenerateUpload;
use crate::inbound::http::history::{HistoryItemResponse, MessageResponse};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Name of the bearer security scheme referenced by protected operations.
pub const BEARER_SCHEME: &str = "BearerAuth";

/// Enrich the generated document with the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            BEARER_SCHEME,
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some("Token issued by POST /signup or POST /login."))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "GenDoc backend API",
        description = "Accounts, source-to-document generation, history and artefact downloads.",
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerAuth" = [])),
    paths(
        crate::inbound::http::accounts::signup,
        crate::inbound::http::accounts::login,
        crate::inbound::http::accounts::current_user,
        crate::inbound::http::generate::generate,
        crate::inbound::http::download::download,
        crate::inbound::http::history::list_history,
        crate::inbound::http::history::delete_history,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        SignupRequest,
        LoginRequest,
        TokenResponse,
        ProfileResponse,
        GenerateUpload,
        OutputFormat,
        ExtractionSummary,
        GeneratedArtifacts,
        HistoryItemResponse,
        MessageResponse,
    )),
    tags(
        (name = "accounts", description = "Signup, login and the current user"),
        (name = "generation", description = "Document generation and artefact downloads"),
        (name = "history", description = "Per-user generation history"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
