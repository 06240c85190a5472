//! Payment processor REST client.
//!
//! Drives the confirmation leg of a checkout attempt against the processor's
//! REST API. Confirmation is scoped to a single intent: the call carries the
//! backend-issued client secret plus the payment method the customer picked,
//! authenticated with the publishable key - the same handshake the
//! processor's hosted SDK performs.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use thiserror::Error;
use tracing::instrument;

use crate::config::PaymentConfig;

use super::{CardProcessor, Confirmation, IntentHandle, IntentStatus};

/// Errors that can occur when talking to the payment processor.
#[derive(Debug, Error)]
pub enum ProcessorError {
    /// HTTP transport failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The processor rejected the attempt (declined card, invalid request).
    #[error("processor error: {message}")]
    Api {
        /// HTTP status of the rejection.
        status: u16,
        /// Processor-provided message, surfaced to the user.
        message: String,
    },

    /// The intent handle did not have the expected shape.
    #[error("malformed payment intent handle")]
    MalformedHandle,

    /// The response body could not be parsed.
    #[error("malformed processor response: {0}")]
    Parse(String),
}

impl ProcessorError {
    /// Message safe to surface to the user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Api { message, .. } => message.clone(),
            Self::Http(_) | Self::Parse(_) | Self::MalformedHandle => {
                "The payment could not be processed, please try again".to_string()
            }
        }
    }
}

/// A confirmed payment intent, as the processor returns it.
#[derive(Debug, Deserialize)]
struct IntentResponse {
    id: String,
    status: IntentStatus,
}

/// An error payload, as the processor returns it.
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    message: Option<String>,
}

/// Client for the payment processor REST API.
#[derive(Clone)]
pub struct ProcessorClient {
    inner: Arc<ProcessorClientInner>,
}

struct ProcessorClientInner {
    client: reqwest::Client,
    api_url: String,
    publishable_key: SecretString,
}

impl ProcessorClient {
    /// Create a new processor client.
    #[must_use]
    pub fn new(config: &PaymentConfig) -> Self {
        Self {
            inner: Arc::new(ProcessorClientInner {
                client: reqwest::Client::new(),
                api_url: config.api_url.trim_end_matches('/').to_string(),
                publishable_key: config.publishable_key.clone(),
            }),
        }
    }

    /// Extract the intent id from a client-secret handle.
    ///
    /// Handles look like `pi_123_secret_456`; the intent id is the part
    /// before `_secret`.
    fn intent_id(handle: &IntentHandle) -> Result<&str, ProcessorError> {
        let raw = handle.as_str();
        let (id, _) = raw
            .split_once("_secret")
            .ok_or(ProcessorError::MalformedHandle)?;
        if id.is_empty() {
            return Err(ProcessorError::MalformedHandle);
        }
        Ok(id)
    }
}

impl CardProcessor for ProcessorClient {
    #[instrument(skip(self, handle, payment_method))]
    async fn confirm(
        &self,
        handle: &IntentHandle,
        payment_method: &str,
    ) -> Result<Confirmation, ProcessorError> {
        let intent_id = Self::intent_id(handle)?;
        let url = format!(
            "{}/v1/payment_intents/{intent_id}/confirm",
            self.inner.api_url
        );

        let params = [
            ("client_secret", handle.as_str()),
            ("payment_method", payment_method),
        ];

        let response = self
            .inner
            .client
            .post(&url)
            .basic_auth(self.inner.publishable_key.expose_secret(), None::<&str>)
            .form(&params)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            // Declines and invalid requests arrive as {"error": {...}}.
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .ok()
                .and_then(|e| e.error.message)
                .unwrap_or_else(|| "Payment was not accepted".to_string());
            return Err(ProcessorError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let intent: IntentResponse =
            serde_json::from_str(&body).map_err(|e| ProcessorError::Parse(e.to_string()))?;

        Ok(Confirmation {
            transaction_id: intent.id,
            status: intent.status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intent_id_from_handle() {
        let handle = IntentHandle::new("pi_3Abc_secret_Xyz".to_string());
        assert_eq!(ProcessorClient::intent_id(&handle).expect("id"), "pi_3Abc");
    }

    #[test]
    fn test_malformed_handle_rejected() {
        let handle = IntentHandle::new("not-a-client-secret".to_string());
        assert!(matches!(
            ProcessorClient::intent_id(&handle),
            Err(ProcessorError::MalformedHandle)
        ));

        let empty_id = IntentHandle::new("_secret_Xyz".to_string());
        assert!(matches!(
            ProcessorClient::intent_id(&empty_id),
            Err(ProcessorError::MalformedHandle)
        ));
    }

    #[test]
    fn test_intent_response_parses() {
        let body = r#"{"id": "pi_3Abc", "status": "succeeded", "amount": 2500}"#;
        let intent: IntentResponse = serde_json::from_str(body).expect("parse");
        assert_eq!(intent.id, "pi_3Abc");
        assert!(intent.status.is_succeeded());
    }

    #[test]
    fn test_error_response_parses() {
        let body = r#"{"error": {"message": "Your card was declined.", "code": "card_declined"}}"#;
        let err: ErrorResponse = serde_json::from_str(body).expect("parse");
        assert_eq!(err.error.message.as_deref(), Some("Your card was declined."));
    }
}
