//! HTTP inbound adapter exposing REST endpoints.

pub mod accounts;
pub mod auth;
pub mod download;
pub mod error;
pub mod generate;
pub mod health;
pub mod history;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod token_config;
pub mod upload;

pub use error::ApiResult;

use actix_web::{HttpRequest, web};

use crate::domain::Error;

/// Register every API route on `cfg`.
///
/// Health checks are mounted separately because they read
/// [`health::HealthState`] rather than [`state::HttpState`].
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use backend::inbound::http::{self, state::{HttpState, HttpStatePorts, UploadSettings}};
///
/// let state = HttpState::new(HttpStatePorts::fixtures(), UploadSettings::default());
/// let _app = App::new()
///     .app_data(web::Data::new(state))
///     .configure(http::configure);
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .service(accounts::signup)
        .service(accounts::login)
        .service(accounts::current_user)
        .service(generate::generate)
        .service(history::list_history)
        .service(history::delete_history)
        .service(download::download);
}

/// JSON extractor settings reporting malformed bodies as `invalid_request`.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req: &HttpRequest| {
        Error::invalid_request(format!("invalid JSON body: {err}")).into()
    })
}
