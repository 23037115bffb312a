//! Core types and scheduling rules for the bookd ecosystem.
//!
//! This crate provides what the HTTP server and storage backends share:
//! - `Appointment` and related types
//! - the `AppointmentStore` / `PartyDirectory` port traits
//! - the `Scheduler`, which owns the double-booking rules

pub mod appointment;
pub mod day;
pub mod error;
pub mod ports;
pub mod scheduler;

// Re-export the central types at crate root for convenience
pub use appointment::*;
pub use day::{parse_instant, DayRange};
pub use error::{SchedulingError, SchedulingResult};
pub use scheduler::Scheduler;
