//! SQLite backend for the PetConnect marketplace store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! pool without blocking the async runtime. A single connection serialises
//! every operation, which is what makes the conditional adoption updates and
//! the donation transaction race-free.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
