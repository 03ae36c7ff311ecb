//! Domain core for the focusdesk backend.
//!
//! Pure logic only: the focus/environment scoring engine, the study-session
//! state machine, the task controller that serializes session commands per
//! task, and the insight generator. Persistence and event delivery are
//! reached exclusively through the traits in [`store`], so this crate never
//! touches SQL or sockets.

pub mod controller;
pub mod error;
pub mod event;
pub mod insights;
pub mod samples;
pub mod scoring;
pub mod session;
pub mod store;
pub mod types;
