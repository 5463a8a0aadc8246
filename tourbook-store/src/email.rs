use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, error, info};
use tourbook_core::{ConfirmationParams, NotificationError, Notifier};
use tourbook_shared::pii::redact_email;
use crate::app_config::EmailConfig;

/// Sends booking confirmations through the EmailJS REST API
#[derive(Debug, Clone)]
pub struct EmailJsNotifier {
    config: EmailConfig,
    client: Client,
}

#[derive(Debug, Serialize)]
struct EmailJsRequest<'a> {
    service_id: &'a str,
    template_id: &'a str,
    user_id: &'a str,
    #[serde(rename = "accessToken", skip_serializing_if = "Option::is_none")]
    access_token: Option<&'a str>,
    template_params: &'a ConfirmationParams,
}

impl EmailJsNotifier {
    pub fn new(config: EmailConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self { config, client })
    }

    fn request_body<'a>(&'a self, params: &'a ConfirmationParams) -> EmailJsRequest<'a> {
        EmailJsRequest {
            service_id: &self.config.service_id,
            template_id: &self.config.template_id,
            user_id: &self.config.public_key,
            access_token: self.config.private_key.as_deref(),
            template_params: params,
        }
    }
}

#[async_trait]
impl Notifier for EmailJsNotifier {
    async fn send_confirmation(
        &self,
        params: &ConfirmationParams,
    ) -> Result<(), NotificationError> {
        debug!("Dispatching confirmation '{}' to {}", params.title, redact_email(params.to_email.expose()));

        let response = self
            .client
            .post(&self.config.api_url)
            .json(&self.request_body(params))
            .send()
            .await
            .map_err(|e| {
                error!("Email dispatch request failed: {}", e);
                NotificationError::DispatchFailed(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Email dispatcher answered {}: {}", status, body);
            return Err(NotificationError::DispatchFailed(format!("{}: {}", status, body)));
        }

        info!("Confirmation email accepted by dispatcher");
        Ok(())
    }
}

/// Stand-in used when no `[email]` section is configured. Every send fails,
/// so callers surface the delivery warning instead of claiming success.
#[derive(Debug, Clone, Default)]
pub struct UnconfiguredNotifier;

#[async_trait]
impl Notifier for UnconfiguredNotifier {
    async fn send_confirmation(
        &self,
        _params: &ConfirmationParams,
    ) -> Result<(), NotificationError> {
        Err(NotificationError::NotConfigured)
    }
}
