//! SQLite implementation of the appointment store and party directory ports.
//!
//! Times are stored as unix seconds (`start_ts` / `end_ts`); the kind is
//! stored under its wire name. A single connection behind a mutex is enough
//! for the request volumes this serves. Note that the scheduler's
//! check-then-act sequence spans two calls and is not wrapped in a
//! transaction here.

use std::path::Path;

use async_trait::async_trait;
use bookd_core::ports::{AppointmentStore, PartyDirectory};
use bookd_core::{
    Appointment, AppointmentPatch, NewAppointment, SchedulingError, SchedulingResult,
};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension, Row};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS vendors (
    id   INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS buyers (
    id   INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS appointments (
    id       INTEGER PRIMARY KEY AUTOINCREMENT,
    title    TEXT NOT NULL,
    host_id  INTEGER NOT NULL REFERENCES vendors(id),
    buyer_id INTEGER NOT NULL REFERENCES buyers(id),
    kind     TEXT NOT NULL,
    location TEXT,
    link     TEXT,
    start_ts INTEGER NOT NULL,
    end_ts   INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_appointments_parties ON appointments(host_id, buyer_id);
CREATE INDEX IF NOT EXISTS idx_appointments_start ON appointments(start_ts);
";

const APPOINTMENT_COLUMNS: &str = "id, title, host_id, buyer_id, kind, location, link, start_ts, end_ts";

/// SQLite store; the sole writer of record for appointments and parties.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (creating if needed) a database at the given path.
    pub fn open(path: &Path) -> SchedulingResult<Self> {
        let conn = Connection::open(path).map_err(storage_err)?;
        Self::init(conn)
    }

    /// Open a fresh in-memory database. Used by tests and local runs.
    pub fn open_in_memory() -> SchedulingResult<Self> {
        let conn = Connection::open_in_memory().map_err(storage_err)?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> SchedulingResult<Self> {
        conn.pragma_update(None, "foreign_keys", "ON")
            .map_err(storage_err)?;
        conn.execute_batch(SCHEMA).map_err(storage_err)?;
        Ok(SqliteStore {
            conn: Mutex::new(conn),
        })
    }

    /// Register a vendor and return its id.
    pub fn create_vendor(&self, name: &str) -> SchedulingResult<i64> {
        let conn = self.conn.lock();
        conn.execute("INSERT INTO vendors (name) VALUES (?1)", params![name])
            .map_err(storage_err)?;
        Ok(conn.last_insert_rowid())
    }

    /// Register a buyer and return its id.
    pub fn create_buyer(&self, name: &str) -> SchedulingResult<i64> {
        let conn = self.conn.lock();
        conn.execute("INSERT INTO buyers (name) VALUES (?1)", params![name])
            .map_err(storage_err)?;
        Ok(conn.last_insert_rowid())
    }

    fn fetch(conn: &Connection, id: i64) -> SchedulingResult<Option<Appointment>> {
        conn.query_row(
            &format!("SELECT {APPOINTMENT_COLUMNS} FROM appointments WHERE id = ?1"),
            params![id],
            map_appointment,
        )
        .optional()
        .map_err(storage_err)
    }
}

#[async_trait]
impl AppointmentStore for SqliteStore {
    async fn insert(&self, appointment: NewAppointment) -> SchedulingResult<Appointment> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO appointments (title, host_id, buyer_id, kind, location, link, start_ts, end_ts)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                appointment.title,
                appointment.host_id,
                appointment.buyer_id,
                appointment.kind.as_str(),
                appointment.location,
                appointment.link,
                appointment.start_time.timestamp(),
                appointment.end_time.timestamp(),
            ],
        )
        .map_err(storage_err)?;

        Ok(Appointment {
            id: conn.last_insert_rowid(),
            title: appointment.title,
            host_id: appointment.host_id,
            buyer_id: appointment.buyer_id,
            kind: appointment.kind,
            location: appointment.location,
            link: appointment.link,
            start_time: appointment.start_time,
            end_time: appointment.end_time,
        })
    }

    async fn find_by_id(&self, id: i64) -> SchedulingResult<Option<Appointment>> {
        let conn = self.conn.lock();
        Self::fetch(&conn, id)
    }

    async fn find_for_parties(
        &self,
        host_id: i64,
        buyer_id: i64,
    ) -> SchedulingResult<Vec<Appointment>> {
        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {APPOINTMENT_COLUMNS} FROM appointments
                 WHERE host_id = ?1 OR buyer_id = ?2
                 ORDER BY id"
            ))
            .map_err(storage_err)?;
        let rows = stmt
            .query_map(params![host_id, buyer_id], map_appointment)
            .map_err(storage_err)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(storage_err)
    }

    async fn find_starting_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> SchedulingResult<Vec<Appointment>> {
        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {APPOINTMENT_COLUMNS} FROM appointments
                 WHERE start_ts >= ?1 AND start_ts <= ?2
                 ORDER BY start_ts, id"
            ))
            .map_err(storage_err)?;
        let rows = stmt
            .query_map(params![from.timestamp(), to.timestamp()], map_appointment)
            .map_err(storage_err)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(storage_err)
    }

    async fn apply_patch(
        &self,
        id: i64,
        patch: AppointmentPatch,
    ) -> SchedulingResult<Appointment> {
        let conn = self.conn.lock();
        let current = Self::fetch(&conn, id)?.ok_or(SchedulingError::AppointmentNotFound)?;
        let merged = patch.apply_to(&current);

        conn.execute(
            "UPDATE appointments
             SET title = ?1, host_id = ?2, buyer_id = ?3, kind = ?4,
                 location = ?5, link = ?6, start_ts = ?7, end_ts = ?8
             WHERE id = ?9",
            params![
                merged.title,
                merged.host_id,
                merged.buyer_id,
                merged.kind.as_str(),
                merged.location,
                merged.link,
                merged.start_time.timestamp(),
                merged.end_time.timestamp(),
                id,
            ],
        )
        .map_err(storage_err)?;

        Ok(merged)
    }

    async fn delete(&self, id: i64) -> SchedulingResult<Appointment> {
        let conn = self.conn.lock();
        let current = Self::fetch(&conn, id)?.ok_or(SchedulingError::AppointmentNotFound)?;
        conn.execute("DELETE FROM appointments WHERE id = ?1", params![id])
            .map_err(storage_err)?;
        Ok(current)
    }
}

#[async_trait]
impl PartyDirectory for SqliteStore {
    async fn buyer_exists(&self, id: i64) -> SchedulingResult<bool> {
        let conn = self.conn.lock();
        conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM buyers WHERE id = ?1)",
            params![id],
            |row| row.get(0),
        )
        .map_err(storage_err)
    }

    async fn vendor_exists(&self, id: i64) -> SchedulingResult<bool> {
        let conn = self.conn.lock();
        conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM vendors WHERE id = ?1)",
            params![id],
            |row| row.get(0),
        )
        .map_err(storage_err)
    }
}

fn storage_err(err: rusqlite::Error) -> SchedulingError {
    SchedulingError::Store(err.to_string())
}

fn map_appointment(row: &Row<'_>) -> rusqlite::Result<Appointment> {
    let kind: String = row.get(4)?;
    let kind = kind.parse().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, Box::new(e))
    })?;

    Ok(Appointment {
        id: row.get(0)?,
        title: row.get(1)?,
        host_id: row.get(2)?,
        buyer_id: row.get(3)?,
        kind,
        location: row.get(5)?,
        link: row.get(6)?,
        start_time: datetime_col(row, 7)?,
        end_time: datetime_col(row, 8)?,
    })
}

fn datetime_col(row: &Row<'_>, index: usize) -> rusqlite::Result<DateTime<Utc>> {
    let secs: i64 = row.get(index)?;
    DateTime::from_timestamp(secs, 0)
        .ok_or(rusqlite::Error::IntegralValueOutOfRange(index, secs))
}
