use async_trait::async_trait;
use serde::Serialize;
use tourbook_shared::Masked;
use crate::NotificationError;

/// Template parameters for the booking confirmation email
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ConfirmationParams {
    pub name: String,
    pub title: String,
    pub to_email: Masked<String>,
}

#[async_trait]
pub trait Notifier: Send + Sync {
    /// Dispatch one confirmation email. Implementations must not retry.
    async fn send_confirmation(
        &self,
        params: &ConfirmationParams,
    ) -> Result<(), NotificationError>;
}
