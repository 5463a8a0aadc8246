use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tourbook_core::{is_valid_email, BookingRequest, Requester, MAX_GUEST_COUNT};
use tourbook_shared::Masked;

/// Raw booking form as submitted by the browser. Every field may be absent
/// or blank; `validate` decides what is acceptable.
///
/// Field names follow the booking page (`packageId`, `packageName`,
/// `bookingDate`); snake_case names are accepted as well.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingForm {
    #[serde(alias = "package_id")]
    pub package_id: Option<String>,
    #[serde(alias = "package_name")]
    pub package_name: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub guests: Option<String>,
    #[serde(alias = "booking_date")]
    pub booking_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("invalid guest count: {0}")]
    InvalidGuestCount(String),

    #[error("invalid email address")]
    InvalidEmail,

    #[error("invalid booking date: {0}")]
    InvalidDate(String),
}

impl ValidationError {
    /// Message shown next to the form
    pub fn user_message(&self) -> &'static str {
        match self {
            ValidationError::MissingFields(_) => "Please fill out all fields.",
            ValidationError::InvalidGuestCount(_) => "Number of guests must be a whole number of at least 1.",
            ValidationError::InvalidEmail => "Please enter a valid email address.",
            ValidationError::InvalidDate(_) => "Please pick a valid booking date.",
        }
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl BookingForm {
    /// Presence checks first, then shape checks. Nothing here touches a
    /// gateway.
    pub fn validate(&self, requester: &Requester) -> Result<BookingRequest, ValidationError> {
        let package_id = present(&self.package_id);
        let package_name = present(&self.package_name);
        let name = present(&self.name);
        let guests = present(&self.guests);
        let booking_date = present(&self.booking_date);
        let requester_id = Some(requester.id.trim()).filter(|id| !id.is_empty());

        let mut missing = Vec::new();
        for (field, value) in [
            ("package_id", package_id),
            ("package_name", package_name),
            ("name", name),
            ("guests", guests),
            ("booking_date", booking_date),
            ("requester_id", requester_id),
        ] {
            if value.is_none() {
                missing.push(field);
            }
        }

        let (Some(package_id), Some(package_name), Some(name), Some(guests), Some(booking_date), Some(requester_id)) =
            (package_id, package_name, name, guests, booking_date, requester_id)
        else {
            return Err(ValidationError::MissingFields(missing));
        };

        let guest_count = match guests.parse::<u32>() {
            Ok(n) if (1..=MAX_GUEST_COUNT).contains(&n) => n,
            _ => return Err(ValidationError::InvalidGuestCount(guests.to_string())),
        };

        let customer_email = match present(&self.email) {
            Some(email) if is_valid_email(email) => Some(Masked(email.to_string())),
            Some(_) => return Err(ValidationError::InvalidEmail),
            None => None,
        };

        let booking_date = NaiveDate::parse_from_str(booking_date, "%Y-%m-%d")
            .map_err(|_| ValidationError::InvalidDate(booking_date.to_string()))?;

        Ok(BookingRequest {
            package_id: package_id.to_string(),
            package_name: package_name.to_string(),
            customer_name: name.to_string(),
            customer_email,
            guest_count,
            booking_date,
            requester_id: requester_id.to_string(),
        })
    }
}
