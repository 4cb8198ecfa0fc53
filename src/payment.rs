use reqwest::Client;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};

/// Thin client for the Stripe PaymentIntents endpoint.
#[derive(Clone)]
pub struct StripeClient {
    http_client: Client,
    api_base: String,
    secret_key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PaymentIntent {
    pub id: String,
    pub client_secret: String,
    pub amount: i64,
    pub currency: String,
}

#[derive(Debug, Deserialize)]
struct StripeErrorBody {
    error: StripeErrorDetail,
}

#[derive(Debug, Deserialize)]
struct StripeErrorDetail {
    message: Option<String>,
    code: Option<String>,
}

impl StripeClient {
    pub fn new(api_base: impl Into<String>, secret_key: Option<String>) -> Self {
        Self {
            http_client: Client::new(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
            secret_key,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.secret_key.is_some()
    }

    /// Create a card PaymentIntent for `amount` minor units.
    pub async fn create_payment_intent(
        &self,
        amount: i64,
        currency: &str,
        receipt_email: Option<&str>,
    ) -> AppResult<PaymentIntent> {
        let secret_key = self
            .secret_key
            .as_deref()
            .ok_or(AppError::PaymentUnavailable)?;

        if amount <= 0 {
            return Err(AppError::BadRequest("amount must be greater than 0".into()));
        }

        let amount_param = amount.to_string();
        let mut form: Vec<(&str, &str)> = vec![
            ("amount", amount_param.as_str()),
            ("currency", currency),
            ("payment_method_types[]", "card"),
        ];
        if let Some(email) = receipt_email {
            form.push(("receipt_email", email));
        }

        let response = self
            .http_client
            .post(format!("{}/v1/payment_intents", self.api_base))
            .bearer_auth(secret_key)
            .form(&form)
            .send()
            .await
            .map_err(|e| AppError::Payment(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let reason = match response.json::<StripeErrorBody>().await {
                Ok(body) => body
                    .error
                    .message
                    .or(body.error.code)
                    .unwrap_or_else(|| status.to_string()),
                Err(_) => status.to_string(),
            };
            return Err(AppError::Payment(reason));
        }

        response
            .json::<PaymentIntent>()
            .await
            .map_err(|e| AppError::Payment(format!("invalid payment intent response: {e}")))
    }
}
