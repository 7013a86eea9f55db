//! Library crate for userdesk.
//!
//! This crate exposes the building blocks of the TUI:
//! - Application state, form, list controller and update loop (`app`)
//! - Backend client (`api`)
//! - Command-line configuration (`config`)
//! - Error and result types (`error`)
//! - Log setup (`logging`)
//! - Domain types (`model`)
//! - Search and pagination helpers (`search`)
//! - UI rendering and widgets (`ui`)
//!
//! It is used by the `userdesk` binary and by tests.
#![doc = include_str!("../README.md")]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod search;
pub mod ui;

// Re-export commonly used items at the crate root for convenience
pub use error::{ApiError, Result};
pub use model::{Record, RecordFields, RecordId};
