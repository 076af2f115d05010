//! Per-user interaction history and the lifetime of interactive surfaces.

mod timer;
mod tracker;

pub use timer::{ActiveSurface, SessionTimer, DEFAULT_SESSION_TIMEOUT};
pub use tracker::{InteractionRecord, SessionState, SessionTracker, DEFAULT_HISTORY_LIMIT};
