//! Type definitions

pub mod entity;
pub mod import;
pub mod messages;
pub mod opportunity;
pub mod organizer;
pub mod school;

pub use entity::*;
pub use import::*;
pub use messages::*;
pub use opportunity::*;
pub use organizer::*;
pub use school::*;
