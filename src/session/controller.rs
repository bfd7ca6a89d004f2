use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::Serialize;
use tokio::sync::watch;
use tokio::time;
use tracing::{debug, info, warn};

use crate::api::{Backend, EmailRecord, Filter};
use crate::auth::{self, CaptureOutcome, LocalStorage, TOKEN_KEY};
use crate::error::AppResult;

use super::state::{SessionState, Snapshot, SyncStatus, View};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum FetchOutcome {
    /// The list was replaced with this many records.
    Updated { count: usize },
    /// The request failed; the previous list is kept.
    Stale,
    /// The backend rejected the session and the controller was reset.
    SessionExpired,
    /// A logout or reset ran while the request was in flight; its result was
    /// dropped.
    Superseded,
    NotAuthenticated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum TriggerOutcome {
    /// The request settled and a refresh is armed. `status` is absent when
    /// the request never reached the backend.
    Triggered { status: Option<u16> },
    /// A sync request or inbox fetch is still in flight.
    AlreadySyncing,
    NotAuthenticated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LogoutOutcome {
    pub remote_invalidated: bool,
    pub session: SessionState,
}

/// Owns the authentication and sync state of one client process and runs the
/// status check, inbox fetch, sync trigger and logout against a [`Backend`].
///
/// Refreshes armed by [`trigger_sync`](Self::trigger_sync) are cancelled when
/// the controller is dropped.
pub struct SessionController {
    shared: Arc<Shared>,
}

impl SessionController {
    pub fn new(
        backend: Arc<dyn Backend>,
        storage: Arc<dyn LocalStorage>,
        sync_delay: Duration,
    ) -> Self {
        let (changes, _) = watch::channel(Snapshot::default());
        let (cancel, _) = watch::channel(0_u64);

        Self {
            shared: Arc::new(Shared {
                backend,
                storage,
                sync_delay,
                changes,
                cancel,
                generation: AtomicU64::new(0),
            }),
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        self.shared.changes.borrow().clone()
    }

    pub fn session(&self) -> SessionState {
        self.shared.changes.borrow().session
    }

    pub fn sync_status(&self) -> SyncStatus {
        self.shared.changes.borrow().sync
    }

    pub fn view(&self) -> View {
        self.shared.changes.borrow().view()
    }

    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.shared.changes.subscribe()
    }

    pub fn sync_delay(&self) -> Duration {
        self.shared.sync_delay
    }

    /// Status check, then the initial fetch when the session is valid.
    pub async fn start(&self) -> SessionState {
        let session = self.shared.check_status().await;
        if session == SessionState::Authenticated {
            self.shared.fetch_emails().await;
        }
        session
    }

    pub async fn check_status(&self) -> SessionState {
        self.shared.check_status().await
    }

    pub async fn fetch_emails(&self) -> FetchOutcome {
        self.shared.fetch_emails().await
    }

    pub async fn trigger_sync(&self) -> TriggerOutcome {
        self.shared.trigger_sync().await
    }

    pub async fn reset_session(&self) -> SessionState {
        self.shared.reset_session().await
    }

    pub async fn logout(&self) -> LogoutOutcome {
        self.shared.logout().await
    }

    pub fn capture_token(&self, location: &str) -> AppResult<CaptureOutcome> {
        auth::capture_token(location, self.shared.storage.as_ref())
    }

    pub fn select_filter(&self, filter: Filter) {
        self.shared
            .changes
            .send_modify(|snapshot| snapshot.filter = filter);
    }

    pub fn visible_emails(&self) -> Vec<EmailRecord> {
        self.shared.changes.borrow().visible_emails()
    }

    pub fn cancel_pending_refreshes(&self) {
        self.shared.cancel_pending();
    }

    /// Resolves once no request is in flight and no refresh is armed.
    pub async fn wait_until_settled(&self) {
        let mut changes = self.shared.changes.subscribe();
        let _ = changes.wait_for(Snapshot::is_settled).await;
    }
}

impl Drop for SessionController {
    fn drop(&mut self) {
        self.shared.cancel_pending();
    }
}

struct Shared {
    backend: Arc<dyn Backend>,
    storage: Arc<dyn LocalStorage>,
    sync_delay: Duration,
    changes: watch::Sender<Snapshot>,
    /// Bumped to cancel every refresh armed before the bump.
    cancel: watch::Sender<u64>,
    /// Bumped by logout and reset. Fetches started under an older value drop
    /// their result.
    generation: AtomicU64,
}

impl Shared {
    async fn check_status(&self) -> SessionState {
        let _checking = self.raise(Flag::Checking);

        let session = match self.backend.auth_status().await {
            Ok(()) => SessionState::Authenticated,
            Err(err) => {
                info!(error = %err, "session is not authenticated");
                SessionState::Unauthenticated
            }
        };

        self.changes
            .send_modify(|snapshot| snapshot.session = session);
        session
    }

    async fn fetch_emails(&self) -> FetchOutcome {
        if self.changes.borrow().session != SessionState::Authenticated {
            debug!("skipping inbox fetch without an authenticated session");
            return FetchOutcome::NotAuthenticated;
        }

        let started = self.generation.load(Ordering::Acquire);
        let result = {
            let _fetching = self.raise(Flag::Fetching);
            self.backend.list_emails().await
        };

        match result {
            Ok(emails) => {
                let count = emails.len();
                let applied = self.changes.send_if_modified(|snapshot| {
                    if !self.is_current(started, snapshot) {
                        return false;
                    }
                    snapshot.emails = emails;
                    true
                });
                if !applied {
                    debug!("session changed during inbox fetch; dropping result");
                    return FetchOutcome::Superseded;
                }
                info!(count, "inbox refreshed");
                FetchOutcome::Updated { count }
            }
            Err(_) if !self.is_current(started, &self.changes.borrow()) => {
                debug!("session changed during inbox fetch; ignoring failure");
                FetchOutcome::Superseded
            }
            Err(err) if err.is_unauthorized() => {
                warn!(error = %err, "backend rejected the session; resetting");
                self.reset_session().await;
                FetchOutcome::SessionExpired
            }
            Err(err) => {
                warn!(error = %err, "inbox fetch failed; keeping previous list");
                FetchOutcome::Stale
            }
        }
    }

    async fn trigger_sync(self: &Arc<Self>) -> TriggerOutcome {
        if self.changes.borrow().session != SessionState::Authenticated {
            return TriggerOutcome::NotAuthenticated;
        }

        let acquired = self.changes.send_if_modified(|snapshot| {
            if snapshot.sync.is_syncing() {
                return false;
            }
            snapshot.sync.triggering = true;
            true
        });
        if !acquired {
            debug!("sync or fetch already in flight");
            return TriggerOutcome::AlreadySyncing;
        }

        let status = {
            let _triggering = FlagGuard {
                shared: self.as_ref(),
                flag: Flag::Triggering,
            };

            match self.backend.trigger_sync().await {
                Ok(status) if status.is_success() => {
                    info!(%status, "sync requested");
                    Some(status.as_u16())
                }
                Ok(status) => {
                    warn!(%status, "sync request was not accepted; refresh still scheduled");
                    Some(status.as_u16())
                }
                Err(err) => {
                    warn!(error = %err, "sync request failed; refresh still scheduled");
                    None
                }
            }
        };

        self.arm_refresh();
        TriggerOutcome::Triggered { status }
    }

    fn arm_refresh(self: &Arc<Self>) {
        let armed_at = *self.cancel.borrow();
        let cancelled = self.cancel.subscribe();
        let shared = Arc::clone(self);
        let delay = self.sync_delay;

        self.changes
            .send_modify(|snapshot| snapshot.pending_refreshes += 1);
        debug!(delay_ms = delay.as_millis() as u64, "refresh armed");

        tokio::spawn(async move {
            let fired = tokio::select! {
                _ = time::sleep(delay) => true,
                _ = wait_for_cancel(cancelled, armed_at) => false,
            };

            if fired {
                shared.fetch_emails().await;
            } else {
                debug!("armed refresh cancelled");
            }

            shared.changes.send_modify(|snapshot| {
                snapshot.pending_refreshes = snapshot.pending_refreshes.saturating_sub(1);
            });
        });
    }

    fn cancel_pending(&self) {
        self.cancel.send_modify(|epoch| *epoch = epoch.wrapping_add(1));
    }

    fn is_current(&self, started: u64, snapshot: &Snapshot) -> bool {
        snapshot.session == SessionState::Authenticated
            && self.generation.load(Ordering::Acquire) == started
    }

    async fn reset_session(&self) -> SessionState {
        self.cancel_pending();
        self.changes.send_modify(|snapshot| {
            self.generation.fetch_add(1, Ordering::AcqRel);
            snapshot.session = SessionState::Unknown;
            snapshot.emails.clear();
        });
        self.check_status().await
    }

    async fn logout(&self) -> LogoutOutcome {
        self.cancel_pending();
        self.changes.send_modify(|_| {
            self.generation.fetch_add(1, Ordering::AcqRel);
        });

        let remote_invalidated = match self.backend.logout().await {
            Ok(()) => true,
            Err(err) => {
                warn!(error = %err, "logout request failed; clearing local session anyway");
                false
            }
        };

        if let Err(err) = self.storage.remove(TOKEN_KEY) {
            warn!(error = %err, "failed to clear stored token");
        }

        self.changes.send_modify(|snapshot| {
            snapshot.session = SessionState::Unauthenticated;
            snapshot.emails.clear();
            snapshot.filter = Filter::All;
        });
        info!(remote_invalidated, "logged out");

        LogoutOutcome {
            remote_invalidated,
            session: SessionState::Unauthenticated,
        }
    }

    fn raise(&self, flag: Flag) -> FlagGuard<'_> {
        self.changes.send_modify(|snapshot| flag.set(snapshot, true));
        FlagGuard { shared: self, flag }
    }
}

async fn wait_for_cancel(mut cancelled: watch::Receiver<u64>, armed_at: u64) {
    loop {
        if *cancelled.borrow_and_update() != armed_at {
            return;
        }
        if cancelled.changed().await.is_err() {
            return;
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Flag {
    Checking,
    Triggering,
    Fetching,
}

impl Flag {
    fn set(self, snapshot: &mut Snapshot, value: bool) {
        match self {
            Self::Checking => snapshot.checking = value,
            Self::Triggering => snapshot.sync.triggering = value,
            Self::Fetching => snapshot.sync.fetching = value,
        }
    }
}

/// Lowers its flag when dropped, whichever way the operation ends.
struct FlagGuard<'a> {
    shared: &'a Shared,
    flag: Flag,
}

impl Drop for FlagGuard<'_> {
    fn drop(&mut self) {
        let flag = self.flag;
        self.shared
            .changes
            .send_modify(|snapshot| flag.set(snapshot, false));
    }
}
