// ABOUTME: Transactional email gateway with an HTTP provider client and a development sink
// ABOUTME: EmailGateway trait, EmailMessage, EmailReceipt, HttpEmailGateway, LogOnlyEmailGateway
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Groomdesk.io

use crate::errors::{AppError, AppResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// One outbound email
#[derive(Debug, Clone, Serialize)]
pub struct EmailMessage {
    /// Recipient address
    pub to: String,
    /// Subject line
    pub subject: String,
    /// HTML body
    pub html_body: String,
    /// Plain-text body
    pub text_body: String,
}

/// Provider acknowledgement for an accepted message
#[derive(Debug, Clone, Deserialize)]
pub struct EmailReceipt {
    /// Provider-assigned message id
    pub message_id: String,
}

/// Boundary for outbound email delivery.
///
/// Injected into the invitation service as an explicit dependency so tests
/// can substitute a recording or failing gateway.
#[async_trait]
pub trait EmailGateway: Send + Sync {
    /// Deliver one message. Failure is terminal for the current call;
    /// nothing in this crate retries sends.
    ///
    /// # Errors
    ///
    /// Returns `EmailDeliveryFailed` when the provider rejects or cannot be
    /// reached.
    async fn send(&self, message: &EmailMessage) -> AppResult<EmailReceipt>;
}

/// Email gateway backed by a transactional email provider's HTTP API
pub struct HttpEmailGateway {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    from_address: String,
}

#[derive(Serialize)]
struct ProviderSendRequest<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    html: &'a str,
    text: &'a str,
}

#[derive(Deserialize)]
struct ProviderSendResponse {
    id: String,
}

impl HttpEmailGateway {
    /// Create a gateway for the given provider endpoint
    #[must_use]
    pub fn new(api_url: String, api_key: String, from_address: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url,
            api_key,
            from_address,
        }
    }
}

#[async_trait]
impl EmailGateway for HttpEmailGateway {
    async fn send(&self, message: &EmailMessage) -> AppResult<EmailReceipt> {
        let request = ProviderSendRequest {
            from: &self.from_address,
            to: &message.to,
            subject: &message.subject,
            html: &message.html_body,
            text: &message.text_body,
        };

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "email provider unreachable");
                AppError::email_delivery_failed(format!("Email provider unreachable: {e}"))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!(%status, %body, "email provider rejected message");
            return Err(AppError::email_delivery_failed(format!(
                "Email provider returned {status}"
            )));
        }

        let accepted: ProviderSendResponse = response.json().await.map_err(|e| {
            AppError::email_delivery_failed(format!("Malformed provider response: {e}"))
        })?;

        info!(to = %message.to, message_id = %accepted.id, "email accepted by provider");

        Ok(EmailReceipt {
            message_id: accepted.id,
        })
    }
}

/// Development gateway that logs messages instead of sending them.
///
/// Used when no email provider is configured so local setups can exercise
/// the invitation flow end to end.
pub struct LogOnlyEmailGateway;

#[async_trait]
impl EmailGateway for LogOnlyEmailGateway {
    async fn send(&self, message: &EmailMessage) -> AppResult<EmailReceipt> {
        info!(
            to = %message.to,
            subject = %message.subject,
            "email delivery disabled; logging message instead"
        );
        Ok(EmailReceipt {
            message_id: format!("log-only-{}", uuid::Uuid::new_v4()),
        })
    }
}
