//! Dashboard player sessions.
//!
//! Each video tile opens a WebSocket once its HLS loader reports the manifest
//! ready, announces which camera stream it carries, and keeps reporting its
//! observable playback state. The session wraps the connection in a
//! [`RemoteHandle`] the sync engine drives like any other media element.

pub mod handle;
pub mod protocol;
pub mod session;

pub use handle::RemoteHandle;
pub use protocol::{ClientMessage, ServerCommand};
