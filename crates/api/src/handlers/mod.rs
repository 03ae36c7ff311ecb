//! Request handlers, grouped by resource.

pub mod analytics;
pub mod tasks;
