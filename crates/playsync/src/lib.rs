//! # Playsync
//!
//! This crate provides the coordination core for synchronized playback of
//! independently buffering live video players. It defines a small capability
//! interface over playable media elements, a registry of the players taking
//! part in synchronization, and an engine that selects a reference timeline
//! and re-aligns every player to it.
//!
//! ## Features
//!
//! - `MediaHandle` trait abstracting a playable media element
//! - `PlayerRegistry` tracking the players eligible for synchronization
//! - `SyncEngine` performing serialized pause/align/resume passes
//!

pub mod config;
pub mod engine;
pub mod handle;
pub mod registry;

#[cfg(test)]
mod test_utils;

pub use config::SyncConfig;
pub use engine::{HandleSnapshot, SyncEngine, SyncReport, select_master};
pub use handle::{HandleError, MediaHandle, ReadyState, TimeRange};
pub use registry::{PlayerRegistry, RegisterOutcome};
