//! Google Sheets backend for the application tracker.
//!
//! The worksheet is the database: one row per program, positional columns,
//! the header row as the authoritative column order. [`SheetsStore`] holds
//! the row-matching and header-healing logic and is generic over the
//! low-level [`SheetsApi`] seam; [`HttpSheets`] is the Sheets v4 REST
//! implementation of that seam.

pub mod auth;
pub mod client;
pub mod encode;
mod store;

pub mod error;

pub use client::{HttpSheets, SheetsApi};
pub use error::{Error, Result};
pub use store::SheetsStore;
