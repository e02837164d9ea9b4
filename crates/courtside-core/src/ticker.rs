//! Shared session handle and the 1 Hz countdown task.
//!
//! [`SharedSession`] is how the UI and the ticker reach the single
//! [`LiveSession`] for a game. Every command runs under one async mutex and
//! every state change republishes the [`LiveView`] on a `watch` channel, so
//! subscribers always see the latest projection.
//!
//! [`ClockTicker`] drives the countdown. It lives exactly as long as the
//! live screen: [`ClockTicker::stop`] ends it cleanly and dropping it
//! aborts the task.

use std::sync::Arc;

use courtside_types::LiveView;
use tokio::sync::{Mutex, Notify, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use crate::clock::TickOutcome;
use crate::config::ClockConfig;
use crate::session::{LiveSession, SessionError};
use crate::store::{EventStore, GameMetaStore};

/// Cloneable handle to one live session.
#[derive(Debug)]
pub struct SharedSession<S> {
    inner: Arc<Mutex<LiveSession<S>>>,
    views: Arc<watch::Sender<LiveView>>,
}

impl<S> Clone for SharedSession<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            views: Arc::clone(&self.views),
        }
    }
}

impl<S: EventStore + GameMetaStore> SharedSession<S> {
    /// Wrap a session and publish its initial view.
    pub fn new(session: LiveSession<S>) -> Result<Self, SessionError> {
        let (views, _) = watch::channel(session.view()?);
        Ok(Self {
            inner: Arc::new(Mutex::new(session)),
            views: Arc::new(views),
        })
    }

    /// Subscribe to view updates.
    pub fn subscribe(&self) -> watch::Receiver<LiveView> {
        self.views.subscribe()
    }

    /// The most recently published view.
    pub fn latest(&self) -> LiveView {
        self.views.borrow().clone()
    }

    /// Run one command against the session, then republish the view.
    ///
    /// The view is republished even when the command fails part-way, since
    /// some events may already be in the log.
    pub async fn run<R, F>(&self, command: F) -> Result<R, SessionError>
    where
        F: FnOnce(&mut LiveSession<S>) -> Result<R, SessionError>,
    {
        let mut session = self.inner.lock().await;
        let outcome = command(&mut session);
        if outcome.is_err() {
            self.publish_after_failure(&session);
            return outcome;
        }
        self.publish(&session)?;
        outcome
    }

    /// Advance the clock one second. Idle ticks publish nothing.
    ///
    /// A failed tick still republishes, so subscribers see the clock that
    /// stopped at the buzzer while the close-out waits for a retry.
    pub async fn tick(&self) -> Result<TickOutcome, SessionError> {
        let mut session = self.inner.lock().await;
        match session.tick() {
            Ok(TickOutcome::Idle) => Ok(TickOutcome::Idle),
            Ok(outcome) => {
                self.publish(&session)?;
                Ok(outcome)
            }
            Err(e) => {
                self.publish_after_failure(&session);
                Err(e)
            }
        }
    }

    fn publish(&self, session: &LiveSession<S>) -> Result<(), SessionError> {
        self.views.send_replace(session.view()?);
        Ok(())
    }

    /// Republish after a failed command. If the log cannot be read either,
    /// only the clock in the last view is refreshed.
    fn publish_after_failure(&self, session: &LiveSession<S>) {
        if let Err(e) = self.publish(session) {
            warn!(error = %e, "View refresh failed; publishing the clock only");
            let clock = session.clock().snapshot();
            self.views.send_modify(|view| view.clock = clock);
        }
    }
}

/// Background countdown for a live session.
#[derive(Debug)]
pub struct ClockTicker {
    stop: Arc<Notify>,
    handle: Option<JoinHandle<()>>,
}

impl ClockTicker {
    /// Spawn the countdown at the configured tick interval. The session's
    /// clock only moves while it is running; the task keeps polling until
    /// stopped.
    pub fn spawn<S>(session: SharedSession<S>, config: &ClockConfig) -> Self
    where
        S: EventStore + GameMetaStore + Send + 'static,
    {
        let period = config.tick_interval();
        let stop = Arc::new(Notify::new());
        let stop_signal = Arc::clone(&stop);

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately.
            interval.tick().await;

            info!(period = ?period, "Clock ticker started");
            loop {
                tokio::select! {
                    biased;
                    () = stop_signal.notified() => break,
                    _ = interval.tick() => match session.tick().await {
                        Ok(TickOutcome::QuarterExpired { period }) => {
                            info!(period, "Buzzer");
                        }
                        Ok(TickOutcome::Idle | TickOutcome::Ticked) => {}
                        Err(e) => warn!(error = %e, "Clock tick failed"),
                    },
                }
            }
            info!("Clock ticker stopped");
        });

        Self {
            stop,
            handle: Some(handle),
        }
    }

    /// Stop the countdown and wait for the task to finish.
    pub async fn stop(mut self) {
        self.stop.notify_one();
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                warn!(error = %e, "Clock ticker task ended abnormally");
            }
        }
    }
}

impl Drop for ClockTicker {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}
