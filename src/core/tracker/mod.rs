// Import provenance: per-run tracking and cross-run session queries

pub mod manager;
pub mod session;
#[allow(clippy::module_inception)]
pub mod tracker;

pub use manager::{ClearResult, SessionManager};
pub use session::{ImportSession, SessionStatus};
pub use tracker::ImportTracker;
