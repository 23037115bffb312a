//! In-memory port doubles for scheduler tests.
//!
//! Deterministic substitutes for the storage backend and party directory,
//! so the scheduling rules can be tested without a database.

use std::sync::Mutex;

use async_trait::async_trait;
use bookd_core::ports::{AppointmentStore, PartyDirectory};
use bookd_core::{
    Appointment, AppointmentPatch, NewAppointment, SchedulingError, SchedulingResult,
};
use chrono::{DateTime, Utc};

/// In-memory `AppointmentStore` double.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Rows>,
}

#[derive(Default)]
struct Rows {
    rows: Vec<Appointment>,
    next_id: i64,
}

impl Rows {
    fn insert(&mut self, appointment: NewAppointment) -> Appointment {
        self.next_id += 1;
        let row = Appointment {
            id: self.next_id,
            title: appointment.title,
            host_id: appointment.host_id,
            buyer_id: appointment.buyer_id,
            kind: appointment.kind,
            location: appointment.location,
            link: appointment.link,
            start_time: appointment.start_time,
            end_time: appointment.end_time,
        };
        self.rows.push(row.clone());
        row
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an appointment directly, bypassing the scheduler's checks.
    pub fn seed(&self, appointment: NewAppointment) -> i64 {
        self.inner.lock().unwrap().insert(appointment).id
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().rows.len()
    }
}

#[async_trait]
impl AppointmentStore for MemoryStore {
    async fn insert(&self, appointment: NewAppointment) -> SchedulingResult<Appointment> {
        Ok(self.inner.lock().unwrap().insert(appointment))
    }

    async fn find_by_id(&self, id: i64) -> SchedulingResult<Option<Appointment>> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .rows
            .iter()
            .find(|a| a.id == id)
            .cloned())
    }

    async fn find_for_parties(
        &self,
        host_id: i64,
        buyer_id: i64,
    ) -> SchedulingResult<Vec<Appointment>> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .rows
            .iter()
            .filter(|a| a.host_id == host_id || a.buyer_id == buyer_id)
            .cloned()
            .collect())
    }

    async fn find_starting_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> SchedulingResult<Vec<Appointment>> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .rows
            .iter()
            .filter(|a| a.start_time >= from && a.start_time <= to)
            .cloned()
            .collect())
    }

    async fn apply_patch(
        &self,
        id: i64,
        patch: AppointmentPatch,
    ) -> SchedulingResult<Appointment> {
        let mut inner = self.inner.lock().unwrap();
        let row = inner
            .rows
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(SchedulingError::AppointmentNotFound)?;
        *row = patch.apply_to(row);
        Ok(row.clone())
    }

    async fn delete(&self, id: i64) -> SchedulingResult<Appointment> {
        let mut inner = self.inner.lock().unwrap();
        let index = inner
            .rows
            .iter()
            .position(|a| a.id == id)
            .ok_or(SchedulingError::AppointmentNotFound)?;
        Ok(inner.rows.remove(index))
    }
}

/// In-memory `PartyDirectory` double, seeded with known ids.
#[derive(Default)]
pub struct MemoryDirectory {
    buyers: Vec<i64>,
    vendors: Vec<i64>,
}

impl MemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_buyer(mut self, id: i64) -> Self {
        self.buyers.push(id);
        self
    }

    pub fn with_vendor(mut self, id: i64) -> Self {
        self.vendors.push(id);
        self
    }
}

#[async_trait]
impl PartyDirectory for MemoryDirectory {
    async fn buyer_exists(&self, id: i64) -> SchedulingResult<bool> {
        Ok(self.buyers.contains(&id))
    }

    async fn vendor_exists(&self, id: i64) -> SchedulingResult<bool> {
        Ok(self.vendors.contains(&id))
    }
}
