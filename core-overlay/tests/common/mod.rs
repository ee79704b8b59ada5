//! Shared fake playback engine for overlay integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use bridge_traits::error::Result;
use bridge_traits::{
    BridgeError, ChangeDirection, EngineCommand, EngineNotification, PlaybackEngine, Track,
    TrackRef,
};
use std::sync::{Arc, Mutex};
use tokio::sync::broadcast;

struct FakeState {
    playlist: Vec<TrackRef>,
    index: Option<usize>,
    previous: Option<TrackRef>,
    direction: ChangeDirection,
    playing: bool,
    calls: Vec<EngineCommand>,
    fail_with: Option<BridgeError>,
}

/// In-memory engine. With `auto_confirm` on, every command immediately
/// applies and broadcasts its notifications, like a fast local player.
/// Otherwise tests apply state changes explicitly.
///
/// A `gapless` engine keeps playing across a skip and only announces the track
/// change, since its play state never moved.
pub struct FakeEngine {
    state: Mutex<FakeState>,
    sender: broadcast::Sender<EngineNotification>,
    auto_confirm: bool,
    gapless: bool,
}

pub fn track(id: &str) -> TrackRef {
    Arc::new(
        Track::new(id, format!("Session {id}"), "Guided", format!("{id}.jpg"))
            .with_accent_color("#6A5ACD"),
    )
}

impl FakeEngine {
    pub fn new(playlist: &[&str], playing: bool) -> Self {
        let (sender, _) = broadcast::channel(32);
        let playlist: Vec<TrackRef> = playlist.iter().map(|id| track(id)).collect();
        let index = if playlist.is_empty() { None } else { Some(0) };
        Self {
            state: Mutex::new(FakeState {
                playlist,
                index,
                previous: None,
                direction: ChangeDirection::None,
                playing,
                calls: Vec::new(),
                fail_with: None,
            }),
            sender,
            auto_confirm: false,
            gapless: false,
        }
    }

    pub fn auto_confirming(mut self) -> Self {
        self.auto_confirm = true;
        self
    }

    pub fn gapless(mut self) -> Self {
        self.gapless = true;
        self
    }

    pub fn calls(&self) -> Vec<EngineCommand> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn fail_commands_with(&self, error: BridgeError) {
        self.state.lock().unwrap().fail_with = Some(error);
    }

    /// Move to the neighbouring track and record the direction, without
    /// notifying.
    pub fn apply_skip(&self, direction: ChangeDirection) {
        let mut state = self.state.lock().unwrap();
        let Some(index) = state.index else {
            return;
        };
        let len = state.playlist.len();
        let next = match direction {
            ChangeDirection::Next => (index + 1) % len,
            ChangeDirection::Previous => (index + len - 1) % len,
            ChangeDirection::None => index,
        };
        state.previous = Some(state.playlist[index].clone());
        state.index = Some(next);
        state.direction = direction;
    }

    pub fn set_playing(&self, playing: bool) {
        self.state.lock().unwrap().playing = playing;
    }

    pub fn notify(&self, notification: EngineNotification) {
        let _ = self.sender.send(notification);
    }

    fn confirm_skip(&self, direction: ChangeDirection) {
        self.apply_skip(direction);
        self.notify(EngineNotification::TrackChanged);
        if !self.gapless {
            let is_playing = self.is_playing();
            self.notify(EngineNotification::PlayStateChanged { is_playing });
        }
    }

    fn record(&self, command: EngineCommand) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(command);
        match &state.fail_with {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl PlaybackEngine for FakeEngine {
    fn current_track(&self) -> Option<TrackRef> {
        let state = self.state.lock().unwrap();
        state.index.map(|i| state.playlist[i].clone())
    }

    fn previous_track(&self) -> Option<TrackRef> {
        self.state.lock().unwrap().previous.clone()
    }

    fn change_direction(&self) -> ChangeDirection {
        self.state.lock().unwrap().direction
    }

    fn is_playing(&self) -> bool {
        self.state.lock().unwrap().playing
    }

    async fn play(&self) -> Result<()> {
        self.record(EngineCommand::Play)?;
        if self.auto_confirm {
            self.set_playing(true);
            self.notify(EngineNotification::PlayStateChanged { is_playing: true });
        }
        Ok(())
    }

    async fn pause(&self) -> Result<()> {
        self.record(EngineCommand::Pause)?;
        if self.auto_confirm {
            self.set_playing(false);
            self.notify(EngineNotification::PlayStateChanged { is_playing: false });
        }
        Ok(())
    }

    async fn next(&self) -> Result<()> {
        self.record(EngineCommand::Next)?;
        if self.auto_confirm {
            self.confirm_skip(ChangeDirection::Next);
        }
        Ok(())
    }

    async fn prev(&self) -> Result<()> {
        self.record(EngineCommand::Previous)?;
        if self.auto_confirm {
            self.confirm_skip(ChangeDirection::Previous);
        }
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<EngineNotification> {
        self.sender.subscribe()
    }
}
