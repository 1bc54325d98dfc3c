use std::future::Future;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::dispatcher::{RouteOutcome, Router};
use crate::midi::MidiMessage;

/// Counters for one listening session.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SessionStats {
    pub events: u64,
    pub presses: u64,
    pub activations: u64,
    pub unmapped: u64,
    pub not_found: u64,
    pub failures: u64,
    /// The dispatch task itself died instead of stopping cleanly.
    pub listener_failed: bool,
}

impl SessionStats {
    pub fn record(&mut self, outcome: &RouteOutcome) {
        self.events += 1;
        match outcome {
            RouteOutcome::Ignored => return,
            RouteOutcome::Unmapped(_) => self.unmapped += 1,
            RouteOutcome::Activated { .. } | RouteOutcome::ActionInvoked { .. } => {
                self.activations += 1
            }
            RouteOutcome::WindowNotFound { .. } => self.not_found += 1,
            RouteOutcome::Failed { .. } => self.failures += 1,
        }
        self.presses += 1;
    }
}

/// Background dispatch loop for a MIDI event stream.
///
/// Events are routed one at a time in arrival order; while an activation is
/// running, later events wait in the channel.
pub struct ListenerSession {
    handle: Option<JoinHandle<()>>,
    shutdown_tx: Option<oneshot::Sender<()>>,
    stats: Arc<Mutex<SessionStats>>,
}

impl ListenerSession {
    /// Start routing events from `rx`. Must be called inside a tokio runtime.
    pub fn spawn(mut rx: mpsc::UnboundedReceiver<MidiMessage>, router: Router) -> Self {
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();
        let stats = Arc::new(Mutex::new(SessionStats::default()));
        let task_stats = stats.clone();

        let handle = tokio::spawn(async move {
            log::info!("Listening for MIDI notes...");
            loop {
                let message = tokio::select! {
                    _ = &mut shutdown_rx => break,
                    message = rx.recv() => match message {
                        Some(message) => message,
                        None => break,
                    },
                };

                // Window activation shells out, keep it off the async workers
                let router = router.clone();
                match tokio::task::spawn_blocking(move || router.route(&message)).await {
                    Ok(outcome) => {
                        log::debug!("{:?} -> {:?}", message, outcome);
                        task_stats.lock().record(&outcome);
                    }
                    Err(e) => log::error!("Routing task for {:?} failed: {}", message, e),
                }
            }
            log::info!("MIDI listener stopped");
        });

        Self::from_task(handle, shutdown_tx, stats)
    }

    fn from_task(
        handle: JoinHandle<()>,
        shutdown_tx: oneshot::Sender<()>,
        stats: Arc<Mutex<SessionStats>>,
    ) -> Self {
        Self {
            handle: Some(handle),
            shutdown_tx: Some(shutdown_tx),
            stats,
        }
    }

    fn task_finished(&self, result: Result<(), tokio::task::JoinError>) {
        if let Err(e) = result {
            log::error!("MIDI listener task failed: {}", e);
            self.stats.lock().listener_failed = true;
        }
    }

    pub fn stats(&self) -> SessionStats {
        self.stats.lock().clone()
    }

    /// Block until `shutdown` resolves or the event stream ends, then stop.
    pub async fn run_until<F>(mut self, shutdown: F) -> SessionStats
    where
        F: Future<Output = ()>,
    {
        let Some(mut handle) = self.handle.take() else {
            return self.shutdown().await;
        };
        tokio::select! {
            _ = shutdown => {
                log::info!("Shutdown requested");
                self.handle = Some(handle);
            }
            result = &mut handle => {
                log::info!("MIDI event stream ended");
                self.task_finished(result);
            }
        }
        self.shutdown().await
    }

    /// Stop the dispatch loop after the event in flight, if any.
    pub async fn shutdown(mut self) -> SessionStats {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let result = handle.await;
            self.task_finished(result);
        }

        let stats = self.stats();
        log::info!(
            "Session finished: {} events, {} presses, {} activations, {} unmapped, {} not found, {} failed",
            stats.events,
            stats.presses,
            stats.activations,
            stats.unmapped,
            stats.not_found,
            stats.failures
        );
        if stats.listener_failed {
            log::warn!("MIDI listener ended abnormally");
        }
        stats
    }
}
