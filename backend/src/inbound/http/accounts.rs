//! Account API handlers.
//!
//! ```text
//! POST /signup {"username":"ada","email":"ada@example.com","password":"pw"}
//! POST /login {"email":"ada@example.com","password":"pw"}
//! GET /auth/me
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::{AccessToken, CredentialsValidationError, Error, LoginCredentials, NewAccount};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::BearerIdentity;
use crate::inbound::http::state::HttpState;

/// Signup request body for `POST /signup`.
///
/// Missing fields deserialise as empty strings so they surface as field
/// validation errors rather than JSON parse failures.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(default)]
pub struct SignupRequest {
    #[schema(example = "ada")]
    pub username: String,
    #[schema(example = "ada@example.com")]
    pub email: String,
    pub password: String,
}

/// Login request body for `POST /login`.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(default)]
pub struct LoginRequest {
    #[schema(example = "ada@example.com")]
    pub email: String,
    pub password: String,
}

/// Body returned after signup or login.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct TokenResponse {
    #[schema(example = "Logged in")]
    pub message: String,
    /// Bearer token for the `Authorization` header.
    pub token: String,
}

impl TokenResponse {
    fn new(message: &str, token: &AccessToken) -> Self {
        Self {
            message: message.to_owned(),
            token: token.as_str().to_owned(),
        }
    }
}

/// Body returned by `GET /auth/me`.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ProfileResponse {
    #[schema(example = "Ada Lovelace")]
    pub name: String,
}

fn map_credentials_error(err: CredentialsValidationError) -> Error {
    let field = err.field();
    Error::invalid_request(err.to_string()).with_details(json!({ "field": field }))
}

/// Register an account and return a bearer token.
#[utoipa::path(
    post,
    path = "/signup",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created", body = TokenResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 409, description = "E-mail already registered", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["accounts"],
    operation_id = "signup",
    security([])
)]
#[post("/signup")]
pub async fn signup(
    state: web::Data<HttpState>,
    payload: web::Json<SignupRequest>,
) -> ApiResult<HttpResponse> {
    let SignupRequest {
        username,
        email,
        password,
    } = payload.into_inner();
    let account =
        NewAccount::try_from_parts(&username, &email, &password).map_err(map_credentials_error)?;
    let token = state.accounts.signup(&account).await?;
    Ok(HttpResponse::Created().json(TokenResponse::new("User created", &token)))
}

/// Check credentials and return a bearer token.
#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = TokenResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["accounts"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<TokenResponse>> {
    let LoginRequest { email, password } = payload.into_inner();
    let credentials =
        LoginCredentials::try_from_parts(&email, &password).map_err(map_credentials_error)?;
    let token = state.accounts.login(&credentials).await?;
    Ok(web::Json(TokenResponse::new("Logged in", &token)))
}

/// Return the caller's display name.
#[utoipa::path(
    get,
    path = "/auth/me",
    responses(
        (status = 200, description = "Caller profile", body = ProfileResponse),
        (status = 401, description = "Missing bearer token", body = Error),
        (status = 403, description = "Invalid bearer token", body = Error),
        (status = 404, description = "User no longer exists", body = Error)
    ),
    tags = ["accounts"],
    operation_id = "currentUser"
)]
#[get("/auth/me")]
pub async fn current_user(
    state: web::Data<HttpState>,
    caller: BearerIdentity,
) -> ApiResult<web::Json<ProfileResponse>> {
    let user = state.profile.fetch_profile(&caller.identity().user_id).await?;
    Ok(web::Json(ProfileResponse {
        name: user.display_name().as_ref().to_owned(),
    }))
}
