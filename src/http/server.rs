//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with all handlers
//! - Wire up middleware (tracing, request ID, limits, admission layer)
//! - Serve the pre-built frontend with an index fallback
//! - Bind the server to a listener and drain on shutdown

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::DefaultBodyLimit,
    http::Request,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    services::{ServeDir, ServeFile},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::db::Store;
use crate::http::handlers;
use crate::mail::Mailer;
use crate::observability::metrics;
use crate::security::{
    origin_middleware, rate_limit_middleware, AllowedOrigins, FixedWindowLimiter, RateLimitGate,
};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub mailer: Option<Mailer>,
}

/// HTTP server for the backend service.
pub struct HttpServer {
    router: Router,
    limiters: Vec<Arc<FixedWindowLimiter>>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: &AppConfig, store: Store, mailer: Option<Mailer>) -> Self {
        let state = AppState { store, mailer };

        let reads = RateLimitGate::new(
            &config.rate_limit.reads,
            "reads",
            config.server.trust_proxy,
        );
        let submissions = RateLimitGate::new(
            &config.rate_limit.submissions,
            "submissions",
            config.server.trust_proxy,
        );
        let limiters = vec![reads.limiter(), submissions.limiter()];

        let router = Self::build_router(config, state, reads, submissions);

        Self { router, limiters }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(
        config: &AppConfig,
        state: AppState,
        reads: RateLimitGate,
        submissions: RateLimitGate,
    ) -> Router {
        let listings = Router::new()
            .route("/otherservice", get(handlers::list_other_service))
            .route("/services_content", get(handlers::list_services_content))
            .route_layer(middleware::from_fn_with_state(reads, rate_limit_middleware));

        let form = Router::new()
            .route("/form_request", post(handlers::submit_form))
            .route_layer(middleware::from_fn_with_state(
                submissions,
                rate_limit_middleware,
            ));

        let mut router = Router::new()
            .merge(listings)
            .merge(form)
            .route("/health", get(handlers::health))
            .with_state(state);

        if let Some(dir) = &config.server.static_dir {
            let dir = Path::new(dir);
            let index = dir.join("index.html");
            router = router
                .fallback_service(ServeDir::new(dir).not_found_service(ServeFile::new(index)));
        }

        let allowed = Arc::new(AllowedOrigins::new(config.cors.origins.iter().cloned()));

        router.layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(DefaultBodyLimit::max(config.server.max_body_bytes))
                .layer(TimeoutLayer::new(Duration::from_secs(
                    config.server.request_timeout_secs,
                )))
                .layer(middleware::from_fn(track_requests))
                .layer(middleware::from_fn_with_state(allowed, origin_middleware)),
        )
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        // Keep limiter memory bounded; admission never depends on this.
        let limiters = self.limiters.clone();
        let mut sweep_shutdown = shutdown.resubscribe();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(60));
            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        for limiter in &limiters {
                            limiter.sweep();
                        }
                    }
                    _ = sweep_shutdown.recv() => break,
                }
            }
        });

        let app = self
            .router
            .into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Request accounting middleware.
async fn track_requests(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();

    let response = next.run(request).await;

    metrics::record_request(&method, response.status().as_u16(), start);
    response
}
