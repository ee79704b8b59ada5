//! # Overlay Driver
//!
//! Async shell that keeps one [`OverlayCoordinator`] on a single task and
//! serializes everything that can change it:
//!
//! - host input (pointer events, buttons, layout) over an `mpsc` channel
//! - engine notifications from [`PlaybackEngine::subscribe`]
//! - a frame tick that fires due timers and advances animated values
//!
//! After each event the queued engine commands go to the
//! [`CommandDispatcher`] worker, which runs them in order, and the latest [`OverlaySnapshot`] is published on a
//! `watch` channel. Dropping every [`OverlayHandle`] sender stops the loop.
//!
//! ## Usage
//!
//! ```ignore
//! let coordinator = OverlayCoordinator::new(config, engine.clone(), clock)?;
//! let (driver, handle) = OverlayDriver::new(coordinator, Duration::from_millis(16));
//! tokio::spawn(driver.run());
//!
//! handle.send(OverlayEvent::OpenRequested).await?;
//! let snapshot = handle.snapshot();
//! ```

use crate::coordinator::{OverlayCoordinator, OverlayEvent};
use crate::dispatch::{CommandDispatcher, CommandQueue};
use crate::error::{OverlayError, Result};
use crate::surface::OverlaySnapshot;
use bridge_traits::EngineNotification;
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{broadcast, mpsc, watch};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

/// Default host input queue depth.
pub const DEFAULT_INPUT_CAPACITY: usize = 64;

/// Host-side handle for feeding events and reading snapshots.
#[derive(Clone)]
pub struct OverlayHandle {
    input: mpsc::Sender<OverlayEvent>,
    snapshots: watch::Receiver<OverlaySnapshot>,
}

impl OverlayHandle {
    pub async fn send(&self, event: OverlayEvent) -> Result<()> {
        self.input
            .send(event)
            .await
            .map_err(|_| OverlayError::DriverStopped)
    }

    /// Latest published snapshot.
    pub fn snapshot(&self) -> OverlaySnapshot {
        self.snapshots.borrow().clone()
    }

    /// Receiver that wakes whenever a new snapshot is published.
    pub fn subscribe(&self) -> watch::Receiver<OverlaySnapshot> {
        self.snapshots.clone()
    }
}

enum Step {
    Event(OverlayEvent),
    Resync,
    EngineClosed,
    Shutdown,
}

pub struct OverlayDriver {
    coordinator: OverlayCoordinator,
    dispatcher: CommandDispatcher,
    input: mpsc::Receiver<OverlayEvent>,
    notifications: broadcast::Receiver<EngineNotification>,
    snapshots: watch::Sender<OverlaySnapshot>,
    frame_interval: Duration,
}

impl OverlayDriver {
    pub fn new(coordinator: OverlayCoordinator, frame_interval: Duration) -> (Self, OverlayHandle) {
        Self::with_capacity(coordinator, frame_interval, DEFAULT_INPUT_CAPACITY)
    }

    pub fn with_capacity(
        coordinator: OverlayCoordinator,
        frame_interval: Duration,
        capacity: usize,
    ) -> (Self, OverlayHandle) {
        let engine = coordinator.engine().clone();
        let notifications = engine.subscribe();
        let mut dispatcher = CommandDispatcher::new(engine);
        if let Some(bus) = coordinator.event_bus() {
            dispatcher = dispatcher.with_event_bus(bus.clone());
        }

        let (input_tx, input_rx) = mpsc::channel(capacity);
        let (snapshot_tx, snapshot_rx) = watch::channel(coordinator.snapshot());

        let driver = Self {
            coordinator,
            dispatcher,
            input: input_rx,
            notifications,
            snapshots: snapshot_tx,
            frame_interval,
        };
        let handle = OverlayHandle {
            input: input_tx,
            snapshots: snapshot_rx,
        };
        (driver, handle)
    }

    /// Run until every input sender is dropped. Returns the coordinator so
    /// callers can inspect its final state.
    pub async fn run(mut self) -> OverlayCoordinator {
        let mut ticker = tokio::time::interval(self.frame_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut engine_open = true;

        let (queue, worker) = self.dispatcher.clone().spawn();

        info!(frame_ms = self.frame_interval.as_millis() as u64, "Overlay driver started");

        loop {
            let step = tokio::select! {
                biased;

                input = self.input.recv() => match input {
                    Some(event) => Step::Event(event),
                    None => Step::Shutdown,
                },
                notification = self.notifications.recv(), if engine_open => match notification {
                    Ok(notification) => Step::Event(OverlayEvent::Engine(notification)),
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "Engine notifications lagged, resyncing");
                        Step::Resync
                    }
                    Err(RecvError::Closed) => Step::EngineClosed,
                },
                _ = ticker.tick() => Step::Event(OverlayEvent::Tick),
            };

            match step {
                Step::Event(event) => self.coordinator.dispatch(event),
                Step::Resync => self.coordinator.resync(),
                Step::EngineClosed => {
                    debug!("Engine notification channel closed");
                    engine_open = false;
                    continue;
                }
                Step::Shutdown => break,
            }

            self.flush(&queue);
        }

        // Let commands already handed off reach the engine.
        drop(queue);
        if let Err(e) = worker.await {
            warn!(error = %e, "Command worker ended abnormally");
        }

        info!("Overlay driver stopped");
        self.coordinator
    }

    fn flush(&mut self, queue: &CommandQueue) {
        let commands = self.coordinator.take_commands();
        if !commands.is_empty() {
            if let Err(e) = queue.submit_all(commands) {
                warn!(error = %e, "Dropping engine commands");
            }
        }
        self.snapshots.send_replace(self.coordinator.snapshot());
    }
}
