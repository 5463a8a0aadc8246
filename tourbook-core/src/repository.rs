use async_trait::async_trait;
use crate::booking::{BookingRecord, BookingRequest};
use crate::StorageResult;

/// Storage gateway for bookings. Append-only: nothing here updates or
/// deletes a record.
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Durably write a new `pending` record. The store assigns the id and a
    /// creation timestamp that never goes backwards.
    async fn create_booking(
        &self,
        request: &BookingRequest,
    ) -> StorageResult<BookingRecord>;
}
