//! Business logic services

pub mod coerce;
pub mod csv;
pub mod import;
pub mod persist;
pub mod snapshot;
pub mod template;
pub mod validate;
