pub mod form;
pub mod outcome;
pub mod workflow;

pub use form::{BookingForm, ValidationError};
pub use outcome::{BookingOutcome, Notification, OutcomeSummary, PersistenceError};
pub use workflow::BookingWorkflow;
