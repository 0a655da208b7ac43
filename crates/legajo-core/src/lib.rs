//! Core types and trait definitions for the Legajo client registry.
//!
//! This crate is deliberately free of database dependencies. The SQLite
//! backend and the `legajo` binary both depend on it.

pub mod admin;
pub mod backup;
pub mod case;
pub mod client;
pub mod error;
pub mod session;
pub mod store;
pub mod validate;

pub use error::{Error, Result, ValidationError};
