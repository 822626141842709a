//! Data models for the Intern Portal.
//!
//! Field names serialize in camelCase to match the stored JSON and the frontend.

mod dashboard;
mod intern;
mod reward;
mod snapshot;

pub use dashboard::*;
pub use intern::*;
pub use reward::*;
pub use snapshot::*;
