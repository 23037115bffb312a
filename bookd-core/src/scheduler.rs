//! Appointment lifecycle rules: double-booking prevention and the
//! create/query/update/remove operations.
//!
//! Every operation re-reads committed state from the store; there is no
//! caching between calls. Preconditions fail fast with a single business
//! error.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::appointment::{Appointment, AppointmentPatch, NewAppointment};
use crate::day::DayRange;
use crate::error::{SchedulingError, SchedulingResult};
use crate::ports::{AppointmentStore, PartyDirectory};

/// Orchestrates appointment operations against the store and the party
/// directory. Collaborators are injected at construction.
pub struct Scheduler {
    store: Arc<dyn AppointmentStore>,
    directory: Arc<dyn PartyDirectory>,
}

impl Scheduler {
    pub fn new(store: Arc<dyn AppointmentStore>, directory: Arc<dyn PartyDirectory>) -> Self {
        Scheduler { store, directory }
    }

    /// Book a new appointment.
    ///
    /// Checks run in order: valid time slot, buyer exists, vendor exists,
    /// no overlapping appointment for either party.
    pub async fn create(&self, request: NewAppointment) -> SchedulingResult<Appointment> {
        ensure_time_slot(request.start_time, request.end_time)?;
        self.ensure_buyer(request.buyer_id).await?;
        self.ensure_vendor(request.host_id).await?;
        self.ensure_slot_free(
            request.host_id,
            request.buyer_id,
            request.start_time,
            request.end_time,
            None,
        )
        .await?;

        self.store.insert(request).await
    }

    /// Every appointment starting on the given day, across all parties.
    pub async fn find_all_by_day(&self, day: DayRange) -> SchedulingResult<Vec<Appointment>> {
        self.store.find_starting_between(day.start, day.end).await
    }

    /// Apply a partial change set to an existing appointment.
    ///
    /// Changed party references are re-validated before any conflict work.
    /// A changed time slot triggers the same conflict check as `create`,
    /// with the record itself excluded from its own conflict set.
    pub async fn update(
        &self,
        id: i64,
        patch: AppointmentPatch,
    ) -> SchedulingResult<Appointment> {
        let current = self
            .store
            .find_by_id(id)
            .await?
            .ok_or(SchedulingError::AppointmentNotFound)?;

        if let Some(buyer_id) = patch.buyer_id {
            self.ensure_buyer(buyer_id).await?;
        }
        if let Some(host_id) = patch.host_id {
            self.ensure_vendor(host_id).await?;
        }

        if patch.touches_slot() {
            let effective = patch.apply_to(&current);
            ensure_time_slot(effective.start_time, effective.end_time)?;
            self.ensure_slot_free(
                effective.host_id,
                effective.buyer_id,
                effective.start_time,
                effective.end_time,
                Some(id),
            )
            .await?;
        }

        self.store.apply_patch(id, patch).await
    }

    /// Delete an appointment permanently, returning its prior representation.
    pub async fn remove(&self, id: i64) -> SchedulingResult<Appointment> {
        if self.store.find_by_id(id).await?.is_none() {
            return Err(SchedulingError::AppointmentNotFound);
        }
        self.store.delete(id).await
    }

    async fn ensure_buyer(&self, id: i64) -> SchedulingResult<()> {
        if self.directory.buyer_exists(id).await? {
            Ok(())
        } else {
            Err(SchedulingError::BuyerNotFound)
        }
    }

    async fn ensure_vendor(&self, id: i64) -> SchedulingResult<()> {
        if self.directory.vendor_exists(id).await? {
            Ok(())
        } else {
            Err(SchedulingError::VendorNotFound)
        }
    }

    /// Reject the slot if it overlaps any appointment of either party.
    ///
    /// Buyer-side conflicts take precedence when both sides clash.
    async fn ensure_slot_free(
        &self,
        host_id: i64,
        buyer_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        exclude: Option<i64>,
    ) -> SchedulingResult<()> {
        let booked = self.store.find_for_parties(host_id, buyer_id).await?;
        let conflicts: Vec<&Appointment> = booked
            .iter()
            .filter(|a| Some(a.id) != exclude)
            .filter(|a| a.overlaps(start, end))
            .collect();

        if conflicts.is_empty() {
            return Ok(());
        }
        if conflicts.iter().any(|a| a.buyer_id == buyer_id) {
            Err(SchedulingError::BuyerSlotTaken)
        } else {
            Err(SchedulingError::VendorSlotTaken)
        }
    }
}

fn ensure_time_slot(start: DateTime<Utc>, end: DateTime<Utc>) -> SchedulingResult<()> {
    if start < end {
        Ok(())
    } else {
        Err(SchedulingError::InvalidTimeSlot)
    }
}
