//! Row structs and DTOs.
//!
//! Each submodule pairs a `FromRow` row struct with an `into_domain`
//! conversion into the `focusdesk-core` entity. Conversions are fallible
//! where a column holds an encoded enum; a row that fails to decode is
//! surfaced as `CoreError::StoreUnavailable` rather than a panic.

pub mod sample;
pub mod session;
pub mod task;
