use pharma_care_api::{error::AppError, payment::StripeClient};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_string_contains, header, method, path},
};

#[tokio::test]
async fn creates_card_payment_intent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/payment_intents"))
        .and(header("authorization", "Bearer sk_test_123"))
        .and(body_string_contains("amount=2450"))
        .and(body_string_contains("currency=usd"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "pi_1",
            "object": "payment_intent",
            "client_secret": "pi_1_secret_abc",
            "amount": 2450,
            "currency": "usd",
            "status": "requires_payment_method"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = StripeClient::new(server.uri(), Some("sk_test_123".to_string()));
    let intent = client
        .create_payment_intent(2450, "usd", Some("buyer@example.com"))
        .await
        .unwrap();

    assert_eq!(intent.id, "pi_1");
    assert_eq!(intent.client_secret, "pi_1_secret_abc");
    assert_eq!(intent.amount, 2450);
}

#[tokio::test]
async fn provider_error_message_is_surfaced() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/payment_intents"))
        .respond_with(ResponseTemplate::new(402).set_body_json(serde_json::json!({
            "error": { "message": "Your card was declined.", "code": "card_declined" }
        })))
        .mount(&server)
        .await;

    let client = StripeClient::new(server.uri(), Some("sk_test_123".to_string()));
    let err = client
        .create_payment_intent(100, "usd", None)
        .await
        .unwrap_err();

    match err {
        AppError::Payment(reason) => assert_eq!(reason, "Your card was declined."),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn missing_key_never_calls_provider() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = StripeClient::new(server.uri(), None);
    assert!(!client.is_configured());
    let err = client
        .create_payment_intent(100, "usd", None)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::PaymentUnavailable));
}

#[tokio::test]
async fn zero_amount_is_rejected_locally() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = StripeClient::new(server.uri(), Some("sk_test_123".to_string()));
    let err = client.create_payment_intent(0, "usd", None).await.unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));
}
