//! Silent reauthentication loop.

use crate::clock::{Clock, SystemClock};
use crate::error::{ReauthError, ReauthResult};
use crate::grant::ExpiryGrant;
use crate::notifier::{LogNotifier, Notifier, SESSION_INVALID_NOTICE};
use crate::threshold::ReauthThreshold;
use babel_http_client::{HttpClient, StatusCode};
use babel_log::{debug, info, warn};
use babel_session::CredentialStore;
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Path of the reissue endpoint on the auth host.
pub const REISSUE_PATH: &str = "/reissue";

/// Loop configuration.
#[derive(Debug, Clone)]
pub struct ReauthConfig {
    /// Time between expiry checks
    pub interval: Duration,

    /// Upper bound on a single reissue call
    pub timeout: Duration,

    /// Rule deciding when the expiry is close enough
    pub threshold: ReauthThreshold,
}

impl Default for ReauthConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(60),
            timeout: Duration::from_secs(30),
            threshold: ReauthThreshold::default(),
        }
    }
}

impl ReauthConfig {
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_threshold(mut self, threshold: ReauthThreshold) -> Self {
        self.threshold = threshold;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReauthState {
    Idle,
    Reauthenticating,
    /// Terminal; entered after the server refuses to reissue.
    Stopped,
}

/// What a single tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Nothing stored yet, e.g. before login
    NoExpiry,
    /// Expiry is not close enough
    NotDue,
    /// A renewal succeeded and the new values were stored
    Renewed(ExpiryGrant),
    /// Another renewal was already in flight
    SkippedInFlight,
    /// The loop has stopped and no longer renews
    Stopped,
}

struct Inner {
    client: HttpClient,
    store: CredentialStore,
    reissue_url: String,
    config: ReauthConfig,
    clock: Arc<dyn Clock>,
    notifier: Arc<dyn Notifier>,
    state: Mutex<ReauthState>,
    in_flight: AtomicBool,
    spawned: AtomicBool,
    /// Wakes the spawned loop once the state turns [`ReauthState::Stopped`]
    stopped: Notify,
}

/// Renews the access token before it expires.
///
/// Every tick reads the stored expiry and leeway; once the configured
/// [`ReauthThreshold`] says so it calls the reissue endpoint through the
/// intercepted client, so cookies and the CSRF token go along and a rotated
/// token is captured. A 401 raises the session-invalid notice and stops the
/// loop for good; any other failure is logged and retried on the next tick.
///
/// # Examples
///
/// ```no_run
/// use babel_http_client::{CsrfInterceptor, HttpClient, HttpClientConfig};
/// use babel_reauth::{ReauthConfig, ReauthLoop};
/// use babel_session::CredentialStore;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let store = CredentialStore::in_memory();
/// let client = HttpClient::new(HttpClientConfig::default())?
///     .with_interceptor(CsrfInterceptor::new(store.clone()));
///
/// let handle = ReauthLoop::builder(client, store)
///     .reissue_url("http://localhost:8080/reissue")
///     .config(ReauthConfig::default())
///     .build()
///     .spawn()?;
///
/// // ... on exit
/// handle.shutdown();
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ReauthLoop {
    inner: Arc<Inner>,
}

impl ReauthLoop {
    pub fn builder(client: HttpClient, store: CredentialStore) -> ReauthLoopBuilder {
        ReauthLoopBuilder::new(client, store)
    }

    pub fn state(&self) -> ReauthState {
        *self.inner.state.lock()
    }

    pub fn config(&self) -> &ReauthConfig {
        &self.inner.config
    }

    fn set_state(&self, state: ReauthState) {
        *self.inner.state.lock() = state;
        if state == ReauthState::Stopped {
            self.inner.stopped.notify_one();
        }
    }

    /// Run one expiry check, renewing if due.
    ///
    /// Errors other than [`ReauthError::SessionInvalid`] leave the loop
    /// ready for the next tick.
    pub async fn tick(&self) -> ReauthResult<TickOutcome> {
        if self.state() == ReauthState::Stopped {
            return Ok(TickOutcome::Stopped);
        }
        if self.inner.in_flight.load(Ordering::Acquire) {
            return Ok(TickOutcome::SkippedInFlight);
        }

        let store = &self.inner.store;
        let Some(expiry) = store.get_expiry().await? else {
            return Ok(TickOutcome::NoExpiry);
        };
        let leeway = store.get_leeway().await?;
        let now = self.inner.clock.now();

        if !self.inner.config.threshold.should_renew(now, expiry, leeway) {
            return Ok(TickOutcome::NotDue);
        }

        if self
            .inner
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Ok(TickOutcome::SkippedInFlight);
        }
        let _guard = InFlightGuard(&self.inner.in_flight);

        debug!("Access token expires at {} (now {}), reauthenticating", expiry, now);
        self.set_state(ReauthState::Reauthenticating);

        match self.renew().await {
            Ok(grant) => {
                self.set_state(ReauthState::Idle);
                info!("Silent reauthentication succeeded, expires at {}", grant.access_exp);
                Ok(TickOutcome::Renewed(grant))
            }
            Err(ReauthError::SessionInvalid) => {
                self.set_state(ReauthState::Stopped);
                warn!("Reissue refused, stopping silent reauthentication");
                self.inner.notifier.session_invalid(SESSION_INVALID_NOTICE);
                Err(ReauthError::SessionInvalid)
            }
            Err(e) => {
                self.set_state(ReauthState::Idle);
                Err(e)
            }
        }
    }

    async fn renew(&self) -> ReauthResult<ExpiryGrant> {
        let timeout = self.inner.config.timeout;
        let request = self.inner.client.get(self.inner.reissue_url.as_str()).send();

        let response = tokio::time::timeout(timeout, request)
            .await
            .map_err(|_| ReauthError::Timeout(timeout))??;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(ReauthError::SessionInvalid);
        }
        if !status.is_success() {
            return Err(ReauthError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let body: serde_json::Value = response
            .json()
            .map_err(|e| ReauthError::MalformedResponse(e.to_string()))?;
        let grant = ExpiryGrant::from_body(&body).ok_or_else(|| {
            ReauthError::MalformedResponse("missing or unreadable access_exp".to_string())
        })?;

        self.inner
            .store
            .set_session_expiry(grant.access_exp, grant.leeway)
            .await?;
        Ok(grant)
    }

    /// Start ticking on the current runtime.
    ///
    /// The first check runs immediately, then once per interval. The task
    /// exits as soon as the loop stops, without waiting for the next tick.
    /// A loop can only be spawned once.
    pub fn spawn(&self) -> ReauthResult<ReauthHandle> {
        if self.inner.spawned.swap(true, Ordering::AcqRel) {
            return Err(ReauthError::AlreadyRunning);
        }

        let period = self.inner.config.interval;
        info!("Silent reauthentication started, checking every {:?}", period);

        let this = self.clone();
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = this.inner.stopped.notified() => break,
                    _ = interval.tick() => {}
                }
                if this.state() == ReauthState::Stopped {
                    break;
                }

                // Each check runs on its own task so a slow renewal never
                // delays the schedule; the in-flight flag prevents overlap.
                let check = this.clone();
                tokio::spawn(async move {
                    match check.tick().await {
                        Ok(outcome) => debug!("Reauthentication tick: {:?}", outcome),
                        Err(ReauthError::SessionInvalid) => {}
                        Err(e) => warn!("{}", e),
                    }
                });
            }

            debug!("Silent reauthentication loop exited");
        });

        Ok(ReauthHandle {
            task: Some(handle),
            reauth: self.clone(),
        })
    }
}

struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Builder for [`ReauthLoop`].
pub struct ReauthLoopBuilder {
    client: HttpClient,
    store: CredentialStore,
    reissue_url: String,
    config: ReauthConfig,
    clock: Arc<dyn Clock>,
    notifier: Arc<dyn Notifier>,
}

impl ReauthLoopBuilder {
    fn new(client: HttpClient, store: CredentialStore) -> Self {
        Self {
            client,
            store,
            reissue_url: REISSUE_PATH.to_string(),
            config: ReauthConfig::default(),
            clock: Arc::new(SystemClock),
            notifier: Arc::new(LogNotifier),
        }
    }

    /// Absolute URL of the reissue endpoint, or a path joined onto the
    /// client's base URL.
    pub fn reissue_url(mut self, url: impl Into<String>) -> Self {
        self.reissue_url = url.into();
        self
    }

    pub fn config(mut self, config: ReauthConfig) -> Self {
        self.config = config;
        self
    }

    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn shared_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn notifier(mut self, notifier: impl Notifier + 'static) -> Self {
        self.notifier = Arc::new(notifier);
        self
    }

    pub fn build(self) -> ReauthLoop {
        ReauthLoop {
            inner: Arc::new(Inner {
                client: self.client,
                store: self.store,
                reissue_url: self.reissue_url,
                config: self.config,
                clock: self.clock,
                notifier: self.notifier,
                state: Mutex::new(ReauthState::Idle),
                in_flight: AtomicBool::new(false),
                spawned: AtomicBool::new(false),
                stopped: Notify::new(),
            }),
        }
    }
}

/// Handle to a spawned loop. Dropping it stops the loop.
pub struct ReauthHandle {
    task: Option<JoinHandle<()>>,
    reauth: ReauthLoop,
}

impl ReauthHandle {
    pub fn state(&self) -> ReauthState {
        self.reauth.state()
    }

    /// Whether the loop task has exited.
    pub fn is_finished(&self) -> bool {
        self.task.as_ref().is_none_or(|task| task.is_finished())
    }

    /// Stop ticking. A renewal already in flight is left to finish.
    pub fn shutdown(mut self) {
        self.abort();
    }

    /// Wait until the loop stops on its own (after a refused reissue).
    ///
    /// Cancel-safe: dropping the future leaves the loop running.
    pub async fn wait(&mut self) {
        if let Some(task) = self.task.as_mut() {
            let _ = task.await;
            self.task = None;
        }
    }

    fn abort(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            debug!("Silent reauthentication loop shut down");
        }
    }
}

impl Drop for ReauthHandle {
    fn drop(&mut self) {
        self.abort();
    }
}
