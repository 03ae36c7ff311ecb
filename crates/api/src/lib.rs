//! HTTP and WebSocket surface for the focusdesk backend.
//!
//! Thin axum layer over `focusdesk-core`: task/session command routes,
//! analytics queries, and the realtime push endpoint. Handlers translate
//! transport concerns (extractors, status codes, the response envelope)
//! and delegate all domain decisions to the core.

pub mod config;
pub mod error;
pub mod handlers;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
pub mod ws;
