//! Modules layer - clients for external systems
//!
//! The content API is the system of record for categories; this gateway only
//! reads from and writes to it.

pub mod content_api;
