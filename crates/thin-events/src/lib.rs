//! thin-events - Event model and dispatch
//!
//! A listener registry with bubble-phase dispatch over a thin-dom tree,
//! and the listener-registration capability seam with its standard and
//! legacy implementations.

mod backend;
mod event;
mod system;

pub use backend::{BackendKind, LegacyBackend, ListenerBackend, StandardBackend};
pub use event::Event;
pub use system::{handler, EventSystem, Handler};
