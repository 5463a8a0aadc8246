use serde::Serialize;
use uuid::Uuid;
use tourbook_core::{BookingRecord, StorageError};
use crate::form::ValidationError;

pub const SUCCESS_MESSAGE: &str = "Booking submitted successfully!";
pub const PERSISTENCE_FAILURE_MESSAGE: &str = "There was an error submitting your booking. Please try again.";

#[derive(Debug, thiserror::Error)]
#[error("Booking could not be recorded: {0}")]
pub struct PersistenceError(#[from] pub StorageError);

/// What happened to the confirmation email of a recorded booking
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notification {
    /// One send was made; `delivered` is its result
    Attempted { delivered: bool },
    /// No address could be resolved, so nothing was sent
    Skipped,
}

/// Terminal state of one booking submission
#[derive(Debug)]
pub enum BookingOutcome {
    Rejected(ValidationError),
    Failed(PersistenceError),
    Recorded {
        booking: BookingRecord,
        notification: Notification,
    },
}

impl BookingOutcome {
    pub fn persisted(&self) -> bool {
        matches!(self, BookingOutcome::Recorded { .. })
    }

    /// `None` when no send was attempted
    pub fn notified(&self) -> Option<bool> {
        match self {
            BookingOutcome::Recorded { notification: Notification::Attempted { delivered }, .. } => Some(*delivered),
            _ => None,
        }
    }

    /// Set only when a send was attempted and failed
    pub fn delivery_warning(&self) -> bool {
        self.notified() == Some(false)
    }

    pub fn message(&self) -> &'static str {
        match self {
            BookingOutcome::Rejected(err) => err.user_message(),
            BookingOutcome::Failed(_) => PERSISTENCE_FAILURE_MESSAGE,
            BookingOutcome::Recorded { .. } => SUCCESS_MESSAGE,
        }
    }

    pub fn booking(&self) -> Option<&BookingRecord> {
        match self {
            BookingOutcome::Recorded { booking, .. } => Some(booking),
            _ => None,
        }
    }

    pub fn summary(&self) -> OutcomeSummary {
        OutcomeSummary {
            persisted: self.persisted(),
            notified: self.notified(),
            message: self.message().to_string(),
            delivery_warning: self.delivery_warning(),
            booking_id: self.booking().map(|b| b.id),
        }
    }
}

/// Flat view of an outcome for rendering
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct OutcomeSummary {
    pub persisted: bool,
    pub notified: Option<bool>,
    pub message: String,
    pub delivery_warning: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub booking_id: Option<Uuid>,
}
