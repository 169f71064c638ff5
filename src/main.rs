use axum::{
    extract::DefaultBodyLimit,
    middleware::from_fn,
    routing::{get, post, put},
    Router,
};
use oetprep_backend::{
    config::{get_config, init_config},
    middleware::auth::{require_admin, require_bearer_auth},
    routes, AppState,
};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    init_config()?;
    let config = get_config();

    let app_state = AppState::new();

    let base_routes = Router::new().route("/health", get(routes::health::health));

    let public_api = Router::new()
        .route("/api/auth/register", post(routes::auth::register))
        .route("/api/auth/login", post(routes::auth::login))
        .route("/api/tests", get(routes::tests::list_tests))
        .route(
            "/api/tests/:id",
            get(routes::tests::get_test),
        )
        .route("/api/tests/:id/submit", post(routes::tests::submit_test))
        .route(
            "/api/mock-results/:id",
            get(routes::results::get_mock_result),
        )
        .route("/api/vocabulary", get(routes::vocabulary::list_words))
        .route("/api/vocabulary/check", post(routes::vocabulary::check_word))
        .route("/api/jobs", get(routes::jobs::list_jobs))
        .route("/api/jobs/:id", get(routes::jobs::get_job))
        .route("/api/billing/webhook", post(routes::billing::stripe_webhook));

    let user_api = Router::new()
        .route("/api/auth/me", get(routes::auth::me))
        .route("/api/results", get(routes::results::list_my_results))
        .route("/api/results/:id", get(routes::results::get_result))
        .route(
            "/api/vocabulary/progress",
            get(routes::vocabulary::my_progress),
        )
        .route(
            "/api/vocabulary/:id/learned",
            post(routes::vocabulary::mark_learned),
        )
        .route(
            "/api/chat/messages",
            get(routes::chat::my_messages).post(routes::chat::send_message),
        )
        .route(
            "/api/billing/checkout",
            post(routes::billing::create_checkout),
        )
        .route(
            "/api/billing/subscription-success",
            get(routes::billing::subscription_success),
        )
        .layer(from_fn(require_bearer_auth));

    let admin_api = Router::new()
        .route("/api/admin/tests", post(routes::admin_tests::create_test))
        .route(
            "/api/admin/tests/stats",
            get(routes::admin_tests::test_statistics),
        )
        .route(
            "/api/admin/tests/:id",
            axum::routing::delete(routes::admin_tests::delete_test),
        )
        .route(
            "/api/admin/tests/:id/metadata",
            put(routes::admin_tests::update_metadata),
        )
        .route(
            "/api/admin/tests/:id/sections/:section",
            get(routes::admin_tests::get_section).put(routes::admin_tests::save_section),
        )
        .route(
            "/api/admin/tests/:id/duplicate",
            post(routes::admin_tests::duplicate_test),
        )
        .route(
            "/api/admin/vocabulary",
            post(routes::vocabulary::add_word),
        )
        .route(
            "/api/admin/vocabulary/:id",
            put(routes::vocabulary::update_word).delete(routes::vocabulary::delete_word),
        )
        .route("/api/admin/jobs", get(routes::jobs::list_all_jobs).post(routes::jobs::create_job))
        .route(
            "/api/admin/jobs/:id",
            put(routes::jobs::update_job).delete(routes::jobs::delete_job),
        )
        .route("/api/admin/users", get(routes::auth::search_users))
        .route("/api/admin/chat/messages", get(routes::chat::all_messages))
        .route("/api/admin/chat/reply", post(routes::chat::admin_reply))
        .route(
            "/api/admin/chat/messages/:id/read",
            post(routes::chat::mark_read),
        )
        .layer(from_fn(require_admin));

    let app = base_routes
        .merge(public_api)
        .merge(user_api)
        .merge(admin_api)
        .with_state(app_state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(10 * 1024 * 1024));

    let addr: SocketAddr = config.server_address.parse()?;
    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
