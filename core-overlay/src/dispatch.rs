//! Ordered execution of queued engine commands.
//!
//! The coordinator never awaits the engine. Commands drained from its outbox
//! are submitted to a [`CommandQueue`] and run one after another on a single
//! worker task, so the engine sees them in the order the user issued them. A
//! failure is logged and published as `PlaybackEvent::CommandFailed`, and the
//! reconciler's grace window takes care of reverting whatever the user saw.

use crate::error::{OverlayError, Result};
use bridge_traits::{EngineCommand, PlaybackEngine};
use core_runtime::events::{CoreEvent, EventBus, PlaybackEvent};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

#[derive(Clone)]
pub struct CommandDispatcher {
    engine: Arc<dyn PlaybackEngine>,
    event_bus: Option<EventBus>,
}

impl CommandDispatcher {
    pub fn new(engine: Arc<dyn PlaybackEngine>) -> Self {
        Self {
            engine,
            event_bus: None,
        }
    }

    pub fn with_event_bus(mut self, bus: EventBus) -> Self {
        self.event_bus = Some(bus);
        self
    }

    /// Run `command` and report the engine's answer.
    pub async fn try_execute(&self, command: EngineCommand) -> Result<()> {
        self.engine.execute(command).await?;
        Ok(())
    }

    /// Run `command` to completion, swallowing any failure.
    pub async fn execute(&self, command: EngineCommand) {
        match self.try_execute(command).await {
            Ok(()) => debug!(command = %command, "Engine command completed"),
            Err(e) => {
                warn!(command = %command, error = %e, "Engine command failed");
                if let Some(bus) = &self.event_bus {
                    let _ = bus.emit(CoreEvent::Playback(PlaybackEvent::CommandFailed {
                        command: command.as_str().to_string(),
                        message: e.to_string(),
                    }));
                }
            }
        }
    }

    /// Start the worker task on the current runtime.
    ///
    /// The worker drains the queue in submission order and awaits each
    /// command before starting the next. It exits once every [`CommandQueue`]
    /// clone is dropped and the backlog is empty.
    pub fn spawn(self) -> (CommandQueue, JoinHandle<()>) {
        let (sender, mut receiver) = mpsc::unbounded_channel::<EngineCommand>();
        let worker = tokio::spawn(async move {
            while let Some(command) = receiver.recv().await {
                self.execute(command).await;
            }
            debug!("Command worker stopped");
        });
        (CommandQueue { sender }, worker)
    }
}

/// Sending side of a dispatcher worker.
#[derive(Clone)]
pub struct CommandQueue {
    sender: mpsc::UnboundedSender<EngineCommand>,
}

impl CommandQueue {
    pub fn submit(&self, command: EngineCommand) -> Result<()> {
        self.sender
            .send(command)
            .map_err(|_| OverlayError::DispatcherStopped)
    }

    pub fn submit_all(&self, commands: Vec<EngineCommand>) -> Result<()> {
        commands
            .into_iter()
            .try_for_each(|command| self.submit(command))
    }
}
