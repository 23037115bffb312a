//! Appointment types shared across the bookd ecosystem.
//!
//! An appointment is a time-boxed booking between a vendor (the "host") and
//! a buyer. The storage backend assigns identifiers; everything else is set
//! by the caller and checked by the `Scheduler`.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How an appointment takes place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppointmentKind {
    /// In person; requires a `location`.
    Physical,
    /// Remote; requires a `link`.
    Virtual,
}

impl AppointmentKind {
    pub fn as_str(self) -> &'static str {
        match self {
            AppointmentKind::Physical => "PHYSICAL",
            AppointmentKind::Virtual => "VIRTUAL",
        }
    }
}

/// Error returned when a kind string is not one of the enumerated values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown appointment kind: {0}")]
pub struct ParseKindError(pub String);

impl FromStr for AppointmentKind {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PHYSICAL" => Ok(AppointmentKind::Physical),
            "VIRTUAL" => Ok(AppointmentKind::Virtual),
            other => Err(ParseKindError(other.to_string())),
        }
    }
}

/// A booked appointment between a vendor and a buyer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: i64,
    pub title: String,
    pub host_id: i64,
    pub buyer_id: i64,
    #[serde(rename = "type")]
    pub kind: AppointmentKind,
    pub location: Option<String>,
    pub link: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

impl Appointment {
    /// Closed-interval overlap test against a candidate time slot.
    ///
    /// Two slots overlap when they share at least one instant, endpoints
    /// included. Slots fully contained in this appointment count as well.
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        start <= self.end_time && self.start_time <= end
    }
}

/// Payload for creating an appointment (identifier not yet assigned).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAppointment {
    pub title: String,
    pub host_id: i64,
    pub buyer_id: i64,
    #[serde(rename = "type")]
    pub kind: AppointmentKind,
    pub location: Option<String>,
    pub link: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

/// Partial change set for an appointment. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppointmentPatch {
    pub title: Option<String>,
    pub host_id: Option<i64>,
    pub buyer_id: Option<i64>,
    pub kind: Option<AppointmentKind>,
    pub location: Option<String>,
    pub link: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
}

impl AppointmentPatch {
    /// Whether the patch changes the time slot and thus requires a fresh
    /// conflict check.
    pub fn touches_slot(&self) -> bool {
        self.start_time.is_some() || self.end_time.is_some()
    }

    /// The record as it would look with this patch applied.
    pub fn apply_to(&self, current: &Appointment) -> Appointment {
        Appointment {
            id: current.id,
            title: self.title.clone().unwrap_or_else(|| current.title.clone()),
            host_id: self.host_id.unwrap_or(current.host_id),
            buyer_id: self.buyer_id.unwrap_or(current.buyer_id),
            kind: self.kind.unwrap_or(current.kind),
            location: self.location.clone().or_else(|| current.location.clone()),
            link: self.link.clone().or_else(|| current.link.clone()),
            start_time: self.start_time.unwrap_or(current.start_time),
            end_time: self.end_time.unwrap_or(current.end_time),
        }
    }
}
