//! Business errors for scheduling operations.

use thiserror::Error;

/// Business rule failures surfaced to the transport boundary.
///
/// Display strings are the exact messages returned to API clients; the
/// transport layer maps every variant except `Store` to 422.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchedulingError {
    #[error("No Buyer found")]
    BuyerNotFound,

    #[error("No Vendor found")]
    VendorNotFound,

    #[error("Buyer have already an appointment")]
    BuyerSlotTaken,

    #[error("Vendor have already an appointment")]
    VendorSlotTaken,

    #[error("No Appointment found")]
    AppointmentNotFound,

    #[error("startTime must be before endTime")]
    InvalidTimeSlot,

    #[error("Storage error: {0}")]
    Store(String),
}

/// Result type alias for scheduling operations.
pub type SchedulingResult<T> = Result<T, SchedulingError>;
