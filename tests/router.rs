mod common;

use axum::{
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use pharma_care_api::{middleware::auth::issue_token, routes::create_app};
use tower::ServiceExt;
use uuid::Uuid;

fn bearer(email: &str, role: &str) -> String {
    let token = issue_token(common::JWT_SECRET, Uuid::new_v4(), email, role, 1).unwrap();
    format!("Bearer {token}")
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn root_reports_liveness() {
    let app = create_app(common::offline_state());
    let response = app
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"server is running");
}

#[tokio::test]
async fn responses_carry_request_id() {
    let app = create_app(common::offline_state());
    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn unknown_path_is_json_not_found() {
    let app = create_app(common::offline_state());
    let response = app
        .oneshot(Request::get("/no-such-route").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["data"]["path"], "/no-such-route");
}

#[tokio::test]
async fn cart_requires_bearer_token() {
    let app = create_app(common::offline_state());
    let response = app
        .oneshot(Request::get("/carts").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn forged_token_is_rejected_before_role_lookup() {
    let forged = issue_token("some-other-secret", Uuid::new_v4(), "x@y.z", "admin", 1).unwrap();
    let app = create_app(common::offline_state());
    let response = app
        .oneshot(
            Request::get("/admin-stats")
                .header(header::AUTHORIZATION, format!("Bearer {forged}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn non_bearer_scheme_is_unauthorized() {
    let app = create_app(common::offline_state());
    let response = app
        .oneshot(
            Request::get("/carts")
                .header(header::AUTHORIZATION, "Basic dXNlcjpwYXNz")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn clearing_someone_elses_cart_is_forbidden() {
    let app = create_app(common::offline_state());
    let response = app
        .oneshot(
            Request::delete("/carts/clear/victim@example.com")
                .header(header::AUTHORIZATION, bearer("buyer@example.com", "user"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn payment_intent_without_provider_key_is_unavailable() {
    let app = create_app(common::offline_state());
    let response = app
        .oneshot(
            Request::post("/create-payment-intent")
                .header(header::AUTHORIZATION, bearer("buyer@example.com", "user"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Payment provider is not configured");
}

#[tokio::test]
async fn docs_are_served() {
    let app = create_app(common::offline_state());
    let response = app
        .oneshot(Request::get("/docs").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[test]
fn documented_user_paths_match_router_segments() {
    use pharma_care_api::routes::doc::ApiDoc;
    use utoipa::OpenApi;

    let doc = ApiDoc::openapi();
    let paths = &doc.paths.paths;
    assert!(paths.contains_key("/users/{user}"));
    assert!(paths.contains_key("/users/{user}/{role}"));
    assert!(paths.contains_key("/users/payments/{email}"));
    assert!(!paths.contains_key("/users/{email}"));
    assert!(!paths.contains_key("/users/{id}/{role}"));
}
