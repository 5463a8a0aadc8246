use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, NaiveDate, Utc};
use std::fmt;
use tourbook_shared::Masked;

/// Largest party a single booking can carry; bounded by the storage column
pub const MAX_GUEST_COUNT: u32 = i32::MAX as u32;

/// Booking status. Records are only ever created as `Pending`; later
/// transitions belong to an administrative process outside this service.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(BookingStatus::Pending),
            other => Err(format!("unknown booking status: {}", other)),
        }
    }
}

/// A booking submission that passed validation. Immutable once built.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BookingRequest {
    pub package_id: String,
    pub package_name: String,
    pub customer_name: String,
    pub customer_email: Option<Masked<String>>,
    pub guest_count: u32,
    pub booking_date: NaiveDate,
    pub requester_id: String,
}

/// The persisted booking
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BookingRecord {
    pub id: Uuid,
    pub package_id: String,
    pub package_name: String,
    pub customer_name: String,
    pub customer_email: Option<Masked<String>>,
    pub guest_count: u32,
    pub booking_date: NaiveDate,
    pub requester_id: String,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
}

impl BookingRecord {
    /// Build the record a store writes for `request`. The store supplies the
    /// id and the creation timestamp.
    pub fn from_request(id: Uuid, request: &BookingRequest, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            package_id: request.package_id.clone(),
            package_name: request.package_name.clone(),
            customer_name: request.customer_name.clone(),
            customer_email: request.customer_email.clone(),
            guest_count: request.guest_count,
            booking_date: request.booking_date,
            requester_id: request.requester_id.clone(),
            status: BookingStatus::Pending,
            created_at,
        }
    }
}
