//! REST API server module.
//!
//! Provides HTTP endpoints for listing streams, relaying upstream media,
//! and driving synchronized playback.

pub mod error;
pub mod models;
pub mod routes;
pub mod server;

pub use server::ApiServer;
