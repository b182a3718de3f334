//! Bearer authentication gate.
//!
//! Handlers take [`BearerIdentity`] as an argument to require a verified
//! caller. A missing or malformed `Authorization` header is `401`; a token
//! that fails verification is `403`.

use std::future::{Ready, ready};

use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use tracing::debug;

use crate::domain::{Error, UserIdentity};

use super::state::HttpState;

const BEARER_SCHEME: &str = "Bearer";

/// Verified identity of the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BearerIdentity(pub UserIdentity);

impl BearerIdentity {
    pub fn identity(&self) -> &UserIdentity {
        &self.0
    }
}

/// Extract the raw token from an `Authorization` header value.
///
/// The scheme name is case-insensitive (RFC 7235) and the token must be
/// non-empty.
pub(crate) fn bearer_token(header: Option<&str>) -> Result<&str, Error> {
    let header = header.ok_or_else(|| Error::unauthorized("missing bearer token"))?;
    match header.trim_start().split_once(' ') {
        Some((scheme, token))
            if scheme.eq_ignore_ascii_case(BEARER_SCHEME) && !token.trim().is_empty() =>
        {
            Ok(token.trim())
        }
        _ => Err(Error::unauthorized("missing bearer token")),
    }
}

fn authenticate(req: &HttpRequest) -> Result<BearerIdentity, Error> {
    let state = req
        .app_data::<web::Data<HttpState>>()
        .ok_or_else(|| Error::internal("HTTP state is not configured"))?;
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());
    let token = bearer_token(header).inspect_err(|_| {
        debug!(path = req.path(), "request without bearer token");
    })?;
    state.identity.verify_bearer(token).map(BearerIdentity)
}

impl FromRequest for BearerIdentity {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}
