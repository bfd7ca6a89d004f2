pub mod controller;
pub mod state;

pub use controller::{FetchOutcome, LogoutOutcome, SessionController, TriggerOutcome};
pub use state::{SessionState, Snapshot, SyncPhase, SyncStatus, View};
