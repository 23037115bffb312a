//! Port interfaces between the scheduler and its collaborators.
//!
//! These traits define the boundary to the persistence layer; the scheduler
//! only ever talks to storage and the party directory through them.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::appointment::{Appointment, AppointmentPatch, NewAppointment};
use crate::error::SchedulingResult;

/// Persistence for appointments. The store is the sole writer of record;
/// the scheduler re-reads committed state on every operation.
#[async_trait]
pub trait AppointmentStore: Send + Sync {
    /// Persist a new appointment and return it with its assigned id.
    async fn insert(&self, appointment: NewAppointment) -> SchedulingResult<Appointment>;

    async fn find_by_id(&self, id: i64) -> SchedulingResult<Option<Appointment>>;

    /// All appointments booked for the given vendor OR the given buyer.
    async fn find_for_parties(
        &self,
        host_id: i64,
        buyer_id: i64,
    ) -> SchedulingResult<Vec<Appointment>>;

    /// Appointments whose start time falls within `[from, to]`.
    async fn find_starting_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> SchedulingResult<Vec<Appointment>>;

    /// Apply a partial change set to an existing record.
    async fn apply_patch(&self, id: i64, patch: AppointmentPatch)
        -> SchedulingResult<Appointment>;

    /// Delete permanently, returning the prior record.
    async fn delete(&self, id: i64) -> SchedulingResult<Appointment>;
}

/// Existence lookups for the two party types.
#[async_trait]
pub trait PartyDirectory: Send + Sync {
    async fn buyer_exists(&self, id: i64) -> SchedulingResult<bool>;

    async fn vendor_exists(&self, id: i64) -> SchedulingResult<bool>;
}
