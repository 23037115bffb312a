//! SQLite-backed storage for the bookd ecosystem.
//!
//! Implements the `AppointmentStore` and `PartyDirectory` ports from
//! `bookd-core` on top of a single SQLite database.

pub mod store;

pub use store::SqliteStore;
