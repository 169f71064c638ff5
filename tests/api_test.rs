use std::env;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    middleware::from_fn,
    routing::{get, post, put},
    Router,
};
use hmac::{Hmac, Mac};
use oetprep_backend::middleware::auth::{require_admin, require_bearer_auth};
use oetprep_backend::utils::token::issue_token;
use oetprep_backend::{routes, AppState};
use serde_json::{json, Value};
use sha2::Sha256;
use tempfile::TempDir;
use tower::ServiceExt;

const WEBHOOK_SECRET: &str = "whsec_test";

fn init_test_config() {
    env::set_var("SERVER_ADDRESS", "127.0.0.1:0");
    env::set_var("JWT_SECRET", "test_secret_key");
    env::set_var("STRIPE_SECRET_KEY", "sk_test_x");
    env::set_var("STRIPE_WEBHOOK_SECRET", WEBHOOK_SECRET);
    env::set_var("WEBAPP_URL", "http://localhost:3000");
    let _ = oetprep_backend::config::init_config();
}

fn setup_app() -> (Router, TempDir, TempDir) {
    init_test_config();
    let data_dir = TempDir::new().expect("data dir");
    let reports_dir = TempDir::new().expect("reports dir");
    let state = AppState::with_dirs(
        data_dir.path().to_str().expect("utf-8 path"),
        reports_dir.path().to_str().expect("utf-8 path"),
    );

    let public_api = Router::new()
        .route("/api/auth/register", post(routes::auth::register))
        .route("/api/auth/login", post(routes::auth::login))
        .route("/api/tests", get(routes::tests::list_tests))
        .route("/api/tests/:id", get(routes::tests::get_test))
        .route("/api/tests/:id/submit", post(routes::tests::submit_test))
        .route(
            "/api/mock-results/:id",
            get(routes::results::get_mock_result),
        )
        .route("/api/billing/webhook", post(routes::billing::stripe_webhook));

    let user_api = Router::new()
        .route("/api/auth/me", get(routes::auth::me))
        .route("/api/results", get(routes::results::list_my_results))
        .route("/api/results/:id", get(routes::results::get_result))
        .layer(from_fn(require_bearer_auth));

    let admin_api = Router::new()
        .route("/api/admin/tests", post(routes::admin_tests::create_test))
        .route(
            "/api/admin/tests/stats",
            get(routes::admin_tests::test_statistics),
        )
        .route(
            "/api/admin/tests/:id/sections/:section",
            get(routes::admin_tests::get_section).put(routes::admin_tests::save_section),
        )
        .route(
            "/api/admin/tests/:id/metadata",
            put(routes::admin_tests::update_metadata),
        )
        .layer(from_fn(require_admin));

    let app = public_api
        .merge(user_api)
        .merge(admin_api)
        .with_state(state);
    (app, data_dir, reports_dir)
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn authed_json_request(method: &str, uri: &str, token: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn json_body(resp: axum::response::Response) -> Value {
    let bytes = to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn register_user(app: &Router, username: &str, email: &str) -> (i64, String) {
    let resp = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/register",
            json!({ "username": username, "email": email, "password": "password123" }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body = json_body(resp).await;
    (
        body["user"]["id"].as_i64().unwrap(),
        body["token"].as_str().unwrap().to_string(),
    )
}

fn admin_token() -> String {
    issue_token(999, Some("admin".to_string())).unwrap()
}

/// Create a test through the admin API and load one question into its
/// reading section.
async fn seed_reading_test(app: &Router, is_mock: bool) -> i64 {
    let token = admin_token();
    let resp = app
        .clone()
        .oneshot(authed_json_request(
            "POST",
            "/api/admin/tests",
            &token,
            json!({
                "title": "Reading Practice",
                "section": "reading",
                "duration_minutes": 45,
                "is_mock": is_mock,
            }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let test_id = json_body(resp).await["test_id"].as_i64().unwrap();

    let resp = app
        .clone()
        .oneshot(authed_json_request(
            "PUT",
            &format!("/api/admin/tests/{test_id}/sections/reading"),
            &token,
            json!({
                "is_mock": is_mock,
                "content": {
                    "duration_minutes": 45,
                    "passages": [],
                    "questions": [
                        {
                            "id": 1,
                            "question": "Pick the right option",
                            "type": "multiple_choice",
                            "options": ["a", "b"],
                            "correct_answer": 1
                        }
                    ]
                }
            }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    test_id
}

#[tokio::test]
async fn register_login_me_flow() {
    let (app, _data, _reports) = setup_app();

    let (user_id, _token) = register_user(&app, "alice", "alice@example.com").await;

    // Duplicate email is rejected.
    let resp = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/register",
            json!({ "username": "alice2", "email": "alice@example.com", "password": "password123" }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            json!({ "email": "alice@example.com", "password": "password123" }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let token = json_body(resp).await["token"].as_str().unwrap().to_string();

    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/auth/me")
                .header("authorization", format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    assert_eq!(body["id"].as_i64().unwrap(), user_id);
    assert_eq!(body["has_active_subscription"], json!(false));

    let resp = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            json!({ "email": "alice@example.com", "password": "wrong-password" }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn admin_routes_reject_regular_tokens() {
    let (app, _data, _reports) = setup_app();
    let (_user_id, token) = register_user(&app, "bob", "bob@example.com").await;

    let resp = app
        .clone()
        .oneshot(authed_json_request(
            "POST",
            "/api/admin/tests",
            &token,
            json!({ "title": "X", "section": "reading", "duration_minutes": 45 }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/admin/tests",
            json!({ "title": "X", "section": "reading", "duration_minutes": 45 }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn practice_submission_requires_auth_and_grades() {
    let (app, _data, _reports) = setup_app();
    let test_id = seed_reading_test(&app, false).await;

    let submission = json!({
        "answers": { "question_1": "1" },
        "time_taken_minutes": 12
    });

    // Anonymous practice submission is refused.
    let resp = app
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/api/tests/{test_id}/submit"),
            submission.clone(),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let (_user_id, token) = register_user(&app, "carol", "carol@example.com").await;
    let resp = app
        .clone()
        .oneshot(authed_json_request(
            "POST",
            &format!("/api/tests/{test_id}/submit"),
            &token,
            submission,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body = json_body(resp).await;
    assert_eq!(body["score_percentage"].as_f64().unwrap(), 100.0);
    assert_eq!(body["is_mock"], json!(false));
    let result_id = body["result_id"].as_i64().unwrap();

    // The owner can read the stored result.
    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/api/results/{result_id}"))
                .header("authorization", format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    assert_eq!(body["test_id"].as_i64().unwrap(), test_id);
    assert_eq!(body["time_taken_minutes"].as_i64().unwrap(), 12);

    // Another account cannot.
    let (_other_id, other_token) = register_user(&app, "dave", "dave@example.com").await;
    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/api/results/{result_id}"))
                .header("authorization", format!("Bearer {other_token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    // But it shows up in the owner's history.
    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/results")
                .header("authorization", format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    let summaries = body.as_array().unwrap();
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0]["test_title"], json!("Reading Practice"));
}

#[tokio::test]
async fn mock_submission_is_anonymous_and_result_is_public() {
    let (app, _data, _reports) = setup_app();
    let test_id = seed_reading_test(&app, true).await;

    let resp = app
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/api/tests/{test_id}/submit"),
            json!({ "answers": { "question_1": "0" } }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body = json_body(resp).await;
    assert_eq!(body["score_percentage"].as_f64().unwrap(), 0.0);
    assert_eq!(body["is_mock"], json!(true));
    let result_id = body["result_id"].as_i64().unwrap();

    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/api/mock-results/{result_id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    assert!(body["user_id"].is_null());
}

#[tokio::test]
async fn test_listing_includes_created_and_builtin_tests() {
    let (app, _data, _reports) = setup_app();
    let test_id = seed_reading_test(&app, false).await;

    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/tests")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    let tests = body.as_array().unwrap();
    assert!(tests
        .iter()
        .any(|t| t["id"].as_i64() == Some(test_id) && t["title"] == json!("Reading Practice")));
    // The built-in catalogue fills in around directory tests.
    assert!(tests.len() > 1);

    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/api/tests/{test_id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    assert_eq!(body["test_type"], json!("practice"));
    assert_eq!(
        body["content"]["sections"]["reading"]["questions"]
            .as_array()
            .unwrap()
            .len(),
        1
    );

    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/tests/424242")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn premium_tests_are_gated() {
    let (app, _data, _reports) = setup_app();
    let token = admin_token();

    let resp = app
        .clone()
        .oneshot(authed_json_request(
            "POST",
            "/api/admin/tests",
            &token,
            json!({
                "title": "Premium Reading",
                "section": "reading",
                "duration_minutes": 45,
                "is_premium": true,
            }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let test_id = json_body(resp).await["test_id"].as_i64().unwrap();

    // Anonymous and unsubscribed users are both turned away.
    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/api/tests/{test_id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let (_user_id, user_token) = register_user(&app, "eve", "eve@example.com").await;
    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/api/tests/{test_id}"))
                .header("authorization", format!("Bearer {user_token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn stripe_webhook_verifies_signatures() {
    let (app, _data, _reports) = setup_app();
    let payload = json!({ "type": "checkout.session.completed" }).to_string();

    let mut mac = Hmac::<Sha256>::new_from_slice(WEBHOOK_SECRET.as_bytes()).unwrap();
    mac.update(format!("1700000000.{payload}").as_bytes());
    let signature = hex::encode(mac.finalize().into_bytes());

    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/billing/webhook")
                .header("Stripe-Signature", format!("t=1700000000,v1={signature}"))
                .body(Body::from(payload.clone()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/billing/webhook")
                .header("Stripe-Signature", "t=1700000000,v1=deadbeef")
                .body(Body::from(payload))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/billing/webhook")
                .body(Body::from("{}"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
