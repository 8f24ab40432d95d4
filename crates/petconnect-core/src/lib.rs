//! Core types and trait definitions for the PetConnect adoption marketplace.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

pub mod adoption;
pub mod campaign;
pub mod donation;
pub mod error;
pub mod pet;
pub mod query;
pub mod store;
pub mod user;

pub use error::{Error, Result};
