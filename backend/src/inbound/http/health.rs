//! Liveness and readiness checks for orchestrators and load balancers.

use std::sync::atomic::{AtomicBool, Ordering};

use actix_web::{HttpResponse, get, http::header, web};

/// Process health flags shared between the server bootstrap and the health endpoints.
///
/// Starts live but not ready; the bootstrap marks it ready once the
/// listener is bound and every adapter has been constructed.
pub struct HealthState {
    ready: AtomicBool,
    live: AtomicBool,
}

impl Default for HealthState {
    fn default() -> Self {
        Self {
            ready: AtomicBool::new(false),
            live: AtomicBool::new(true),
        }
    }
}

impl HealthState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept traffic.
    pub fn mark_ready(&self) {
        self.ready.store(true, Ordering::Release);
    }

    /// Fail both checks while draining so traffic stops before shutdown.
    pub fn mark_unhealthy(&self) {
        self.ready.store(false, Ordering::Release);
        self.live.store(false, Ordering::Release);
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    pub fn is_alive(&self) -> bool {
        self.live.load(Ordering::Acquire)
    }

    fn check_response(healthy: bool) -> HttpResponse {
        let mut response = if healthy {
            HttpResponse::Ok()
        } else {
            HttpResponse::ServiceUnavailable()
        };
        response
            .insert_header((header::CACHE_CONTROL, "no-store"))
            .finish()
    }
}

/// Readiness check: 200 once the server can take traffic, 503 otherwise.
#[utoipa::path(
    get,
    path = "/health/ready",
    tags = ["health"],
    security([]),
    responses(
        (status = 200, description = "Server is ready to handle traffic"),
        (status = 503, description = "Server is not ready")
    )
)]
#[get("/health/ready")]
pub async fn ready(state: web::Data<HealthState>) -> HttpResponse {
    HealthState::check_response(state.is_ready())
}

/// Liveness check: 200 while the process is alive, 503 once draining.
#[utoipa::path(
    get,
    path = "/health/live",
    tags = ["health"],
    security([]),
    responses(
        (status = 200, description = "Server is alive"),
        (status = 503, description = "Server is shutting down")
    )
)]
#[get("/health/live")]
pub async fn live(state: web::Data<HealthState>) -> HttpResponse {
    HealthState::check_response(state.is_alive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use rstest::rstest;

    #[derive(Clone, Copy, Debug)]
    enum Phase {
        Starting,
        Ready,
        Draining,
    }

    #[rstest]
    #[case(Phase::Starting, "/health/live", StatusCode::OK)]
    #[case(Phase::Starting, "/health/ready", StatusCode::SERVICE_UNAVAILABLE)]
    #[case(Phase::Ready, "/health/ready", StatusCode::OK)]
    #[case(Phase::Draining, "/health/ready", StatusCode::SERVICE_UNAVAILABLE)]
    #[case(Phase::Draining, "/health/live", StatusCode::SERVICE_UNAVAILABLE)]
    #[actix_web::test]
    async fn health_checks_follow_lifecycle(
        #[case] phase: Phase,
        #[case] path: &str,
        #[case] expected: StatusCode,
    ) {
        let health = web::Data::new(HealthState::new());
        match phase {
            Phase::Starting => {}
            Phase::Ready => health.mark_ready(),
            Phase::Draining => {
                health.mark_ready();
                health.mark_unhealthy();
            }
        }
        let app =
            test::init_service(App::new().app_data(health).service(ready).service(live)).await;

        let response = test::call_service(&app, test::TestRequest::get().uri(path).to_request())
            .await;
        assert_eq!(response.status(), expected);
        assert_eq!(
            response
                .headers()
                .get(header::CACHE_CONTROL)
                .and_then(|value| value.to_str().ok()),
            Some("no-store")
        );
    }
}
