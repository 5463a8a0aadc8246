use std::sync::Arc;
use tracing::{error, info, warn};
use tourbook_core::{BookingRecord, BookingRepository, ConfirmationParams, Notifier, Requester};
use tourbook_shared::{pii::redact_email, Masked};
use crate::form::BookingForm;
use crate::outcome::{BookingOutcome, Notification, PersistenceError};

/// Validates, records and confirms booking submissions.
///
/// Persist and notify run strictly in order: no email goes out for a
/// booking that was not durably written, and a failed email never undoes
/// a written booking. Each call is independent; duplicate submissions
/// produce duplicate records.
pub struct BookingWorkflow {
    bookings: Arc<dyn BookingRepository>,
    notifier: Arc<dyn Notifier>,
}

impl BookingWorkflow {
    pub fn new(bookings: Arc<dyn BookingRepository>, notifier: Arc<dyn Notifier>) -> Self {
        Self { bookings, notifier }
    }

    pub async fn submit(&self, requester: &Requester, form: BookingForm) -> BookingOutcome {
        // 1. Validate
        let request = match form.validate(requester) {
            Ok(request) => request,
            Err(err) => {
                info!("Booking rejected for requester {}: {}", requester.id, err);
                return BookingOutcome::Rejected(err);
            }
        };

        // 2. Persist
        let booking = match self.bookings.create_booking(&request).await {
            Ok(booking) => booking,
            Err(err) => {
                error!("Failed to record booking for package {}: {}", request.package_id, err);
                return BookingOutcome::Failed(PersistenceError(err));
            }
        };
        info!("Booking recorded: {} (package {}, {} guests)", booking.id, booking.package_id, booking.guest_count);

        // 3. Notify, at most once
        let notification = self.confirm(&booking, requester).await;

        BookingOutcome::Recorded { booking, notification }
    }

    async fn confirm(&self, booking: &BookingRecord, requester: &Requester) -> Notification {
        let to_email = booking
            .customer_email
            .as_ref()
            .map(|email| email.expose().as_str())
            .or_else(|| requester.profile_email());

        let Some(to_email) = to_email else {
            warn!("No email address for booking {}; confirmation skipped", booking.id);
            return Notification::Skipped;
        };

        let params = ConfirmationParams {
            name: booking.customer_name.clone(),
            title: booking.package_name.clone(),
            to_email: Masked(to_email.to_string()),
        };

        match self.notifier.send_confirmation(&params).await {
            Ok(()) => {
                info!("Confirmation sent for booking {} to {}", booking.id, redact_email(to_email));
                Notification::Attempted { delivered: true }
            }
            Err(err) => {
                warn!("Confirmation for booking {} not delivered: {}", booking.id, err);
                Notification::Attempted { delivered: false }
            }
        }
    }
}
