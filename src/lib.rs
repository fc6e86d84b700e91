//! Campus event participation records: colleges, students, events, registrations, attendance, and
//! feedback, plus the reports computed over them.
//!
//! Three components share one [`Store`]: the [`EntityRegistry`] creates colleges, students, and
//! events; the [`RelationshipManager`] links students to events; the [`ReportEngine`] reads
//! aggregates back out. None of them call each other.

pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod models;
pub mod registry;
pub mod relationships;
pub mod reports;
pub mod schema;
pub mod store;
pub mod web;

#[cfg(test)]
mod test_support;

pub use error::{Error, Result};
pub use registry::EntityRegistry;
pub use relationships::RelationshipManager;
pub use reports::ReportEngine;
pub use store::Store;
