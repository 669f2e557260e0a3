//! Recipe-sharing service library crate.
//!
//! # Purpose
//! Exposes the HTTP API surface, auth helpers, configuration, the service
//! facade, and storage implementations for use by the binary and tests.
//!
//! # Notes
//! Module boundaries mirror the request path: `api` → `service` →
//! (`search`, `feedback`, `store`, cache).
pub mod api;
pub mod app;
pub mod auth;
pub mod config;
pub mod feedback;
pub mod model;
pub mod observability;
pub mod search;
pub mod service;
pub mod store;
pub mod upload;
