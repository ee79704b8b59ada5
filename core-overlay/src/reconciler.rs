//! # Optimistic State Reconciler
//!
//! Keeps the rendered play/pause flag in step with the user's intent while the
//! engine catches up.
//!
//! ## States
//!
//! - `Authoritative`: render the last engine-reported value
//! - `Optimistic { is_playing, expires_at }`: render the user's request until
//!   the engine reports anything or the grace window lapses
//!
//! Any engine report collapses an optimistic guess: a match simply confirms
//! it, a divergence snaps to the engine. An expired guess reverts to the last
//! engine value.
//!
//! A separate skip window keeps the flag at "playing" while a track change is
//! in flight, so the engine's brief pause during the swap does not flicker the
//! icon. It opens only if the user was rendered as playing, and closes on a
//! confirmed resume, an explicit pause, or expiry.

use bridge_traits::EngineCommand;
use core_runtime::config::ReconcilerConfig;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PlayState {
    Authoritative,
    Optimistic {
        is_playing: bool,
        expires_at: Duration,
        generation: u64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SkipWindow {
    expires_at: Duration,
    generation: u64,
}

/// Deadline the caller should arm a timer for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraceWindow {
    pub generation: u64,
    pub expires_at: Duration,
}

/// Result of feeding an engine report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Reconciled {
    /// An optimistic guess was collapsed by this report.
    pub closed_optimistic: bool,
    /// The engine diverged from the guess.
    pub diverged: bool,
    /// The skip window closed because playback resumed.
    pub closed_skip: bool,
}

#[derive(Debug)]
pub struct OptimisticStateReconciler {
    config: ReconcilerConfig,
    engine_is_playing: bool,
    state: PlayState,
    skip: Option<SkipWindow>,
    generation: u64,
}

impl OptimisticStateReconciler {
    pub fn new(config: ReconcilerConfig, engine_is_playing: bool) -> Self {
        Self {
            config,
            engine_is_playing,
            state: PlayState::Authoritative,
            skip: None,
            generation: 0,
        }
    }

    /// The single boolean surfaces render.
    pub fn rendered_is_playing(&self) -> bool {
        match self.state {
            PlayState::Optimistic { is_playing, .. } => is_playing,
            PlayState::Authoritative if self.skip.is_some() => true,
            PlayState::Authoritative => self.engine_is_playing,
        }
    }

    /// Last value the engine reported.
    pub fn engine_is_playing(&self) -> bool {
        self.engine_is_playing
    }

    /// Apply a user play/pause request. The rendered value flips before this
    /// returns.
    pub fn request(&mut self, is_playing: bool, now: Duration) -> (EngineCommand, GraceWindow) {
        if !is_playing {
            self.skip = None;
        }
        let window = self.next_window(now, self.config.play_grace());
        self.state = PlayState::Optimistic {
            is_playing,
            expires_at: window.expires_at,
            generation: window.generation,
        };
        debug!(
            requested = is_playing,
            generation = window.generation,
            "Optimistic play state set"
        );
        let command = if is_playing {
            EngineCommand::Play
        } else {
            EngineCommand::Pause
        };
        (command, window)
    }

    /// Flip whatever is currently rendered.
    pub fn toggle(&mut self, now: Duration) -> (EngineCommand, GraceWindow) {
        let requested = !self.rendered_is_playing();
        self.request(requested, now)
    }

    /// Open the skip window for a requested track change. `None` when the
    /// user is not rendered as playing.
    pub fn begin_skip(&mut self, now: Duration) -> Option<GraceWindow> {
        if !self.rendered_is_playing() {
            return None;
        }
        let window = self.next_window(now, self.config.skip_grace());
        self.skip = Some(SkipWindow {
            expires_at: window.expires_at,
            generation: window.generation,
        });
        Some(window)
    }

    /// Feed an authoritative play-state report from the engine.
    pub fn on_engine_state(&mut self, is_playing: bool) -> Reconciled {
        self.engine_is_playing = is_playing;
        let mut outcome = Reconciled::default();

        if let PlayState::Optimistic {
            is_playing: guess, ..
        } = self.state
        {
            outcome.closed_optimistic = true;
            outcome.diverged = guess != is_playing;
            self.state = PlayState::Authoritative;
            if outcome.diverged {
                debug!(guess, engine = is_playing, "Engine diverged from optimistic guess");
            }
        }

        if is_playing && self.skip.take().is_some() {
            outcome.closed_skip = true;
        }
        outcome
    }

    /// Handle a play-grace timer. Returns `true` if the guess was discarded.
    pub fn expire_play(&mut self, generation: u64) -> bool {
        match self.state {
            PlayState::Optimistic {
                generation: live, ..
            } if live == generation => {
                self.state = PlayState::Authoritative;
                true
            }
            _ => false,
        }
    }

    /// Handle a skip-grace timer. Returns `true` if the window closed.
    pub fn expire_skip(&mut self, generation: u64) -> bool {
        match self.skip {
            Some(window) if window.generation == generation => {
                self.skip = None;
                true
            }
            _ => false,
        }
    }

    /// Expiry of the live optimistic guess, if any.
    pub fn optimistic_deadline(&self) -> Option<Duration> {
        match self.state {
            PlayState::Optimistic { expires_at, .. } => Some(expires_at),
            PlayState::Authoritative => None,
        }
    }

    pub fn skip_deadline(&self) -> Option<Duration> {
        self.skip.map(|window| window.expires_at)
    }

    fn next_window(&mut self, now: Duration, grace: Duration) -> GraceWindow {
        self.generation += 1;
        GraceWindow {
            generation: self.generation,
            expires_at: now + grace,
        }
    }
}
