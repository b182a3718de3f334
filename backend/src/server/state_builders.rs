//! Builders wiring outbound adapters into domain services and HTTP state.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};
use tracing::info;

use backend::domain::ports::{HistoryRepository, UserRepository};
use backend::domain::{AccountService, GenerationService, HistoryService};
use backend::inbound::http::state::{HttpState, HttpStatePorts};
use backend::outbound::builder::HttpDocumentBuilder;
use backend::outbound::memory::{InMemoryHistoryRepository, InMemoryUserRepository};
use backend::outbound::persistence::{DbPool, DieselHistoryRepository, DieselUserRepository};
use backend::outbound::security::{Argon2CredentialHasher, JwtAccessTokens};

use super::ServerConfig;

/// Repository pair backing accounts and history.
struct Repositories {
    users: Arc<dyn UserRepository>,
    history: Arc<dyn HistoryRepository>,
}

/// Use Diesel adapters when a pool is configured, otherwise in-process
/// stores that forget everything on restart.
fn build_repositories(pool: Option<&DbPool>) -> Repositories {
    match pool {
        Some(pool) => Repositories {
            users: Arc::new(DieselUserRepository::new(pool.clone())),
            history: Arc::new(DieselHistoryRepository::new(pool.clone())),
        },
        None => {
            info!("no database configured; using in-memory stores");
            Repositories {
                users: Arc::new(InMemoryUserRepository::new()),
                history: Arc::new(InMemoryHistoryRepository::new()),
            }
        }
    }
}

/// Assemble the HTTP state from server configuration.
///
/// # Errors
/// Returns [`std::io::Error`] when the builder HTTP client cannot be created.
pub(super) fn build_http_state(config: &ServerConfig) -> std::io::Result<web::Data<HttpState>> {
    let Repositories { users, history } = build_repositories(config.db_pool.as_ref());
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);

    let builder = HttpDocumentBuilder::new(config.builder.base_url.clone(), config.builder.timeout)
        .map_err(|err| std::io::Error::other(format!("document builder client: {err}")))?;

    let accounts = Arc::new(AccountService::new(
        users,
        Arc::new(Argon2CredentialHasher),
        Arc::new(JwtAccessTokens::new(&config.tokens.secret)),
        clock.clone(),
    ));
    let generation = Arc::new(GenerationService::new(
        Arc::new(builder),
        history.clone(),
        clock,
    ));
    let history = Arc::new(HistoryService::new(history));

    Ok(web::Data::new(HttpState::new(
        HttpStatePorts {
            accounts: accounts.clone(),
            identity: accounts.clone(),
            profile: accounts,
            generation: generation.clone(),
            artifacts: generation,
            history_query: history.clone(),
            history_command: history,
        },
        config.uploads.clone(),
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::BuilderConfig;
    use backend::domain::UserId;
    use backend::inbound::http::state::UploadSettings;
    use backend::inbound::http::token_config::TokenSettings;
    use rstest::rstest;
    use std::time::Duration;
    use zeroize::Zeroizing;

    fn config() -> ServerConfig {
        ServerConfig::new(
            "127.0.0.1:0".parse().expect("socket addr"),
            TokenSettings {
                secret: Zeroizing::new(vec![7_u8; 32]),
                fingerprint: "test".to_owned(),
                ephemeral: true,
            },
            BuilderConfig::new(
                "http://127.0.0.1:9".parse().expect("url"),
                Duration::from_secs(1),
            ),
            UploadSettings::default(),
        )
    }

    #[rstest]
    #[tokio::test]
    async fn in_memory_state_supports_signup_and_login() {
        let state = build_http_state(&config()).expect("state");
        let account = backend::domain::NewAccount::try_from_parts("Ada", "ada@example.com", "pw")
            .expect("account");
        let token = state.accounts.signup(&account).await.expect("signup");

        let identity = state.identity.verify_bearer(token.as_str()).expect("valid token");
        let profile = state
            .profile
            .fetch_profile(&identity.user_id)
            .await
            .expect("profile");
        assert_eq!(profile.display_name().as_ref(), "Ada");
        assert!(
            state
                .history_query
                .list(&UserId::random())
                .await
                .expect("history")
                .is_empty()
        );
    }
}
