use serde::Serialize;

use crate::api::{EmailRecord, Filter};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    #[default]
    Unknown,
    Authenticated,
    Unauthenticated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncPhase {
    Idle,
    Syncing,
}

/// Busy flags for the two independent network operations behind the sync
/// indicator. Each flag is owned by exactly one operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SyncStatus {
    pub triggering: bool,
    pub fetching: bool,
}

impl SyncStatus {
    pub fn is_syncing(&self) -> bool {
        self.triggering || self.fetching
    }

    pub fn phase(&self) -> SyncPhase {
        if self.is_syncing() {
            SyncPhase::Syncing
        } else {
            SyncPhase::Idle
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    Loading,
    Login,
    Inbox,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Snapshot {
    pub session: SessionState,
    /// Set while the status check is outstanding.
    pub checking: bool,
    pub sync: SyncStatus,
    pub emails: Vec<EmailRecord>,
    pub filter: Filter,
    /// Refreshes armed by a sync trigger that have not finished yet.
    pub pending_refreshes: usize,
}

impl Snapshot {
    pub fn view(&self) -> View {
        if self.checking {
            return View::Loading;
        }

        match self.session {
            SessionState::Unknown => View::Loading,
            SessionState::Authenticated => View::Inbox,
            SessionState::Unauthenticated => View::Login,
        }
    }

    pub fn visible_emails(&self) -> Vec<EmailRecord> {
        self.filter
            .apply(&self.emails)
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn is_settled(&self) -> bool {
        self.pending_refreshes == 0 && !self.sync.is_syncing()
    }
}
