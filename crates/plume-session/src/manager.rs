//! The session lifecycle manager.

use chrono::Utc;
use plume_core::error::AuthError;
use plume_core::{Credentials, Result, Session, SessionService};
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::{AbortHandle, JoinHandle};
use tokio::time::Instant;
use tracing::{debug, error, info, instrument, warn};

use crate::config::SessionConfig;
use crate::schedule::renewal_delay;

/// Where a manager is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No session installed.
    Unauthenticated,
    /// A session is installed and no renewal is running.
    Authenticated,
    /// A session is installed and a renewal call is in flight.
    Renewing,
    /// [`SessionManager::dispose`] was called. Terminal.
    Disposed,
}

/// Result of a renewal trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// This trigger performed the renewal and installed the new session.
    Renewed(Session),
    /// Another renewal was already in flight; this trigger did nothing.
    Coalesced,
    /// The session was cleared or replaced while the call was in flight, so
    /// its result was discarded.
    Superseded,
}

/// Owns the current session and keeps it renewed.
///
/// Cheap to clone; clones share one session. Reading the session or the
/// authorization header never waits on a renewal in flight.
///
/// # Renewal
///
/// With [`SessionConfig::auto_renew`] set, installing a session arms a
/// one-shot background task. It fires after the configured interval, or at
/// the refresh token's expiry, and performs one renewal through the
/// [`SessionService`]. A successful renewal installs the new session, which
/// arms the next task. A failed background renewal is logged and the stale
/// session is kept; the task is re-armed only when a fixed interval is
/// configured. The same holds for a scheduled renewal that coalesces with a
/// manual one.
///
/// Only one renewal runs at a time. A trigger that finds one in flight
/// returns [`RefreshOutcome::Coalesced`] immediately.
///
/// Scheduling needs a Tokio runtime. Outside one, sessions are still
/// installed but nothing is armed.
#[derive(Clone)]
pub struct SessionManager {
    inner: Arc<Inner>,
}

struct Inner {
    service: Arc<dyn SessionService>,
    config: SessionConfig,
    session: watch::Sender<Option<Session>>,
    refreshing: AtomicUsize,
    disposed: AtomicBool,
    control: Mutex<Control>,
}

/// Mutable bookkeeping, always touched under one short lock.
#[derive(Default)]
struct Control {
    /// Bumped whenever the session is installed or cleared.
    epoch: u64,
    next_generation: u64,
    timer: Option<Timer>,
}

struct Timer {
    generation: u64,
    due: Instant,
    abort: AbortHandle,
}

impl SessionManager {
    pub fn new(service: Arc<dyn SessionService>, config: SessionConfig) -> Self {
        let (session, _) = watch::channel(None);
        Self {
            inner: Arc::new(Inner {
                service,
                config,
                session,
                refreshing: AtomicUsize::new(0),
                disposed: AtomicBool::new(false),
                control: Mutex::new(Control::default()),
            }),
        }
    }

    /// Create a manager with a restored session already installed.
    pub fn with_session(
        service: Arc<dyn SessionService>,
        config: SessionConfig,
        session: Session,
    ) -> Self {
        let manager = Self::new(service, config);
        let mut control = manager.inner.control();
        manager.inner.install(&mut control, session, None);
        drop(control);
        manager
    }

    pub fn config(&self) -> &SessionConfig {
        &self.inner.config
    }

    // ========================================================================
    // Session access
    // ========================================================================

    /// Authenticate through the service and install the new session.
    #[instrument(skip(self, credentials), fields(identifier = %credentials.identifier()))]
    pub async fn login(&self, credentials: &Credentials) -> Result<Session> {
        self.inner.ensure_live()?;
        info!("Creating session");

        let session = self.inner.service.create_session(credentials).await?;
        self.set_session(session.clone())?;

        debug!(did = %session.did, "Session created");
        Ok(session)
    }

    /// Install a session, replacing any current one.
    ///
    /// Cancels a pending renewal and, with auto-renew on, arms a new one for
    /// this session.
    #[instrument(skip_all, fields(did = %session.did))]
    pub fn set_session(&self, session: Session) -> Result<()> {
        let mut control = self.inner.control();
        self.inner.ensure_live()?;
        self.inner.install(&mut control, session, None);
        Ok(())
    }

    /// A snapshot of the current session.
    pub fn session(&self) -> Option<Session> {
        self.inner.session.borrow().clone()
    }

    /// The `Authorization` header value for the current access token.
    pub fn current_auth_header(&self) -> Option<String> {
        self.inner
            .session
            .borrow()
            .as_ref()
            .map(|session| session.access_token.bearer())
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(
            self.state(),
            SessionState::Authenticated | SessionState::Renewing
        )
    }

    pub fn state(&self) -> SessionState {
        if self.inner.is_disposed() {
            return SessionState::Disposed;
        }
        match &*self.inner.session.borrow() {
            None => SessionState::Unauthenticated,
            Some(_) if self.inner.refreshing.load(Ordering::SeqCst) > 0 => SessionState::Renewing,
            Some(_) => SessionState::Authenticated,
        }
    }

    /// Watch session changes, e.g. to persist renewed credentials.
    ///
    /// The receiver sees every installed session and `None` on clear or
    /// dispose.
    pub fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.inner.session.subscribe()
    }

    /// Time until the armed renewal fires, if one is armed.
    pub fn next_renewal_delay(&self) -> Option<Duration> {
        self.inner
            .control()
            .timer
            .as_ref()
            .map(|timer| timer.due.saturating_duration_since(Instant::now()))
    }

    // ========================================================================
    // Renewal
    // ========================================================================

    /// Renew the session now.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Disposed`] after disposal,
    /// [`AuthError::NotAuthenticated`] with no session, or the service's
    /// error when the renewal call fails. A failure keeps the current session.
    pub async fn refresh_now(&self) -> Result<RefreshOutcome> {
        self.inner.refresh(None).await
    }

    /// Hook for a request rejected with 401: renew in the background.
    ///
    /// Coalesces with any renewal already in flight. Returns `None` outside
    /// a Tokio runtime.
    pub fn on_unauthorized(&self) -> Option<JoinHandle<()>> {
        let handle = Handle::try_current().ok()?;
        let inner = Arc::clone(&self.inner);
        Some(handle.spawn(async move {
            match inner.refresh(None).await {
                Ok(RefreshOutcome::Renewed(_)) => info!("Session renewed after unauthorized response"),
                Ok(outcome) => debug!(?outcome, "Renewal after unauthorized response skipped"),
                Err(e) => warn!(error = %e, "Renewal after unauthorized response failed"),
            }
        }))
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Drop the session and cancel any pending renewal (logout).
    pub fn clear_session(&self) {
        let mut control = self.inner.control();
        self.inner.clear(&mut control);
        debug!("Session cleared");
    }

    /// Shut the manager down. Idempotent.
    ///
    /// Cancels the pending renewal, aborting it if it is mid-call, and clears
    /// the session. A manual renewal that completes afterwards is discarded.
    pub fn dispose(&self) {
        if self.inner.disposed.swap(true, Ordering::SeqCst) {
            return;
        }
        let mut control = self.inner.control();
        self.inner.clear(&mut control);
        info!("Session manager disposed");
    }
}

impl fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionManager")
            .field("state", &self.state())
            .field("config", &self.inner.config)
            .field("session", &*self.inner.session.borrow())
            .finish()
    }
}

impl Inner {
    fn control(&self) -> MutexGuard<'_, Control> {
        self.control.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::SeqCst)
    }

    fn ensure_live(&self) -> Result<()> {
        if self.is_disposed() {
            return Err(AuthError::Disposed.into());
        }
        Ok(())
    }

    /// Publish `session` and re-arm. `current` is the generation of the timer
    /// task doing the install, which must not abort itself.
    fn install(self: &Arc<Self>, control: &mut Control, session: Session, current: Option<u64>) {
        control.epoch += 1;
        Self::cancel_timer(control, current);

        let delay = if self.config.auto_renew {
            renewal_delay(&self.config, &session.refresh_token, Utc::now())
        } else {
            None
        };
        self.session.send_replace(Some(session));

        if let Some(delay) = delay {
            self.arm(control, delay);
        }
    }

    fn clear(&self, control: &mut Control) {
        control.epoch += 1;
        Self::cancel_timer(control, None);
        self.session.send_replace(None);
    }

    fn cancel_timer(control: &mut Control, current: Option<u64>) {
        if let Some(timer) = control.timer.take() {
            if Some(timer.generation) != current {
                timer.abort.abort();
            }
        }
    }

    fn arm(self: &Arc<Self>, control: &mut Control, delay: Duration) {
        let Ok(handle) = Handle::try_current() else {
            warn!("No Tokio runtime, session renewal not scheduled");
            return;
        };

        control.next_generation += 1;
        let generation = control.next_generation;
        let weak = Arc::downgrade(self);
        let task = handle.spawn(run_timer(weak, generation, delay));

        debug!(generation, delay_ms = delay.as_millis() as u64, "Session renewal armed");
        control.timer = Some(Timer {
            generation,
            due: Instant::now() + delay,
            abort: task.abort_handle(),
        });
    }

    /// Forget the timer slot if it still belongs to `generation`.
    fn finish_timer(&self, generation: u64) {
        let mut control = self.control();
        if control.timer.as_ref().is_some_and(|t| t.generation == generation) {
            control.timer = None;
        }
    }

    async fn refresh(self: &Arc<Self>, timer: Option<u64>) -> Result<RefreshOutcome> {
        self.ensure_live()?;

        let Some(_guard) = RefreshGuard::acquire(&self.refreshing) else {
            debug!("Renewal already in flight");
            return Ok(RefreshOutcome::Coalesced);
        };

        let (refresh_token, epoch) = {
            let control = self.control();
            let token = self
                .session
                .borrow()
                .as_ref()
                .map(|session| session.refresh_token.clone());
            (token, control.epoch)
        };
        let refresh_token = refresh_token.ok_or(AuthError::NotAuthenticated)?;

        info!("Renewing session");
        let session = self.service.refresh_session(&refresh_token).await?;

        let mut control = self.control();
        if self.is_disposed() {
            debug!("Manager disposed during renewal, result discarded");
            return Err(AuthError::Disposed.into());
        }
        if control.epoch != epoch {
            debug!("Session changed during renewal, result discarded");
            return Ok(RefreshOutcome::Superseded);
        }

        info!(did = %session.did, "Session renewed");
        self.install(&mut control, session.clone(), timer);
        Ok(RefreshOutcome::Renewed(session))
    }

    async fn renew_in_background(self: &Arc<Self>, generation: u64) {
        match self.refresh(Some(generation)).await {
            Ok(RefreshOutcome::Renewed(_)) => {}
            Ok(RefreshOutcome::Coalesced) => {
                // The renewal in flight may fail without reaching this task.
                debug!("Scheduled renewal coalesced");
                self.rearm(generation);
            }
            Ok(outcome) => {
                debug!(?outcome, "Scheduled renewal skipped");
                self.finish_timer(generation);
            }
            Err(e) => {
                error!(error = %e, "Scheduled session renewal failed");
                self.rearm(generation);
            }
        }
    }

    /// Replace the fired timer `generation` with the next interval tick, if
    /// an interval is configured.
    fn rearm(self: &Arc<Self>, generation: u64) {
        let mut control = self.control();
        if !control.timer.as_ref().is_some_and(|t| t.generation == generation) {
            return;
        }
        control.timer = None;

        match self.config.renewal_interval {
            Some(interval) if !self.is_disposed() => {
                self.arm(&mut control, interval.min(crate::MAX_RENEWAL_DELAY));
            }
            _ => debug!("Renewal left to manual triggers"),
        }
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        let control = self.control.get_mut().unwrap_or_else(PoisonError::into_inner);
        if let Some(timer) = control.timer.take() {
            timer.abort.abort();
        }
    }
}

async fn run_timer(inner: Weak<Inner>, generation: u64, delay: Duration) {
    tokio::time::sleep(delay).await;
    let Some(inner) = inner.upgrade() else {
        return;
    };
    inner.renew_in_background(generation).await;
}

/// Holds the in-flight slot; released on drop, including when the renewing
/// task is aborted.
struct RefreshGuard<'a> {
    counter: &'a AtomicUsize,
}

impl<'a> RefreshGuard<'a> {
    fn acquire(counter: &'a AtomicUsize) -> Option<Self> {
        if counter.fetch_add(1, Ordering::SeqCst) > 0 {
            counter.fetch_sub(1, Ordering::SeqCst);
            return None;
        }
        Some(Self { counter })
    }
}

impl Drop for RefreshGuard<'_> {
    fn drop(&mut self) {
        self.counter.fetch_sub(1, Ordering::SeqCst);
    }
}
