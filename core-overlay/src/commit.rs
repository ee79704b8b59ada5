//! # Commit Gate
//!
//! Single-flight lock that turns a classified gesture into at most one
//! committed action per session.
//!
//! ## Navigate
//!
//! Evaluated on every sample and again on release. The session commits when
//! `|dx| >= distance_threshold` or `|velocity_x| >= velocity_threshold`;
//! `dx < 0` means next, anything else previous. A navigate commit opens a
//! cooldown during which no *new* session may commit, which absorbs residual
//! motion while the cover snaps back. A release without commit snaps the cover
//! back to rest.
//!
//! ## Dismiss
//!
//! Evaluated on release only. The sheet closes when
//! `dy >= extent_ratio * container_height` or `velocity_y >= velocity_threshold`;
//! otherwise it snaps back open. Upward drags never close.

use crate::gesture::{
    GestureClass, GestureClassifier, GestureOrigin, GestureSession, PointerSample,
};
use bridge_traits::ChangeDirection;
use core_runtime::config::{CommitConfig, GestureConfig};
use std::fmt;
use std::time::Duration;
use tracing::{debug, info};

/// Action produced by a committed session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitAction {
    /// Skip in the given direction (never [`ChangeDirection::None`]).
    Navigate(ChangeDirection),
    /// Close the full sheet.
    Close,
}

impl CommitAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommitAction::Navigate(ChangeDirection::Previous) => "previous",
            CommitAction::Navigate(_) => "next",
            CommitAction::Close => "close",
        }
    }
}

impl fmt::Display for CommitAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where an uncommitted layer springs back to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapTarget {
    /// Cover back to zero displacement.
    Rest,
    /// Sheet back to fully open.
    Open,
}

impl SnapTarget {
    pub fn as_str(&self) -> &'static str {
        match self {
            SnapTarget::Rest => "rest",
            SnapTarget::Open => "open",
        }
    }
}

/// What the caller should do with the sample or release it just fed in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GateDecision {
    /// Session still live; drag-follow according to the class.
    Tracking(GestureClass),
    /// The session committed on this input.
    Commit(CommitAction),
    /// Released without committing.
    SnapBack(SnapTarget),
    /// Released without ever leaving the deadzone.
    Tap,
    /// Released after an earlier commit; nothing left to decide.
    Ended,
    /// Input dropped: session already committed or its movement is ignored.
    Ignored,
}

/// Decision together with the session it applies to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GateOutcome {
    pub session_id: u64,
    pub origin: GestureOrigin,
    pub sample: PointerSample,
    pub decision: GateDecision,
}

/// Owns the live gesture session and the navigate cooldown.
#[derive(Debug)]
pub struct CommitGate {
    classifier: GestureClassifier,
    config: CommitConfig,
    container_height: f32,
    session: Option<GestureSession>,
    next_session_id: u64,
    cooldown_until: Option<Duration>,
}

impl CommitGate {
    pub fn new(gesture: GestureConfig, config: CommitConfig, container_height: f32) -> Self {
        Self {
            classifier: GestureClassifier::new(gesture),
            config,
            container_height,
            session: None,
            next_session_id: 1,
            cooldown_until: None,
        }
    }

    pub fn set_container_height(&mut self, height: f32) {
        self.container_height = height;
    }

    pub fn session(&self) -> Option<&GestureSession> {
        self.session.as_ref()
    }

    pub fn in_cooldown(&self, now: Duration) -> bool {
        self.cooldown_until.is_some_and(|until| now < until)
    }

    /// Open a session for a pointer-down. Any session still open is dropped
    /// and returned.
    pub fn begin(&mut self, origin: GestureOrigin, now: Duration) -> (u64, Option<GestureSession>) {
        let id = self.next_session_id;
        self.next_session_id += 1;
        let replaced = self.session.replace(GestureSession::new(id, origin, now));
        debug!(session_id = id, ?origin, "Gesture session started");
        (id, replaced)
    }

    /// Drop the live session without deciding anything.
    pub fn cancel(&mut self) -> Option<GestureSession> {
        let session = self.session.take();
        if let Some(session) = &session {
            debug!(session_id = session.id(), "Gesture session cancelled");
        }
        session
    }

    /// Feed a movement sample into the live session.
    pub fn sample(&mut self, sample: PointerSample, now: Duration) -> Option<GateOutcome> {
        let cooling = self.in_cooldown(now);
        let session = self.session.as_mut()?;

        let decision = if session.is_committed() {
            GateDecision::Ignored
        } else {
            match session.update(&self.classifier, sample) {
                GestureClass::Navigate if !cooling && self.navigate_reached(&sample) => {
                    self.commit_navigate(sample, now)
                }
                GestureClass::Ignore => GateDecision::Ignored,
                class => GateDecision::Tracking(class),
            }
        };

        let session = self.session.as_ref()?;
        Some(GateOutcome {
            session_id: session.id(),
            origin: session.origin(),
            sample,
            decision,
        })
    }

    /// Close the live session with its final sample.
    pub fn release(&mut self, sample: PointerSample, now: Duration) -> Option<GateOutcome> {
        let cooling = self.in_cooldown(now);
        let mut session = self.session.take()?;

        let decision = if session.is_committed() {
            GateDecision::Ended
        } else {
            match session.update(&self.classifier, sample) {
                GestureClass::Unset => GateDecision::Tap,
                GestureClass::Ignore => GateDecision::Ignored,
                GestureClass::Navigate => {
                    if !cooling && self.navigate_reached(&sample) && session.mark_committed() {
                        let action = CommitAction::Navigate(navigate_direction(sample.dx));
                        self.start_cooldown(now);
                        info!(session_id = session.id(), action = %action, "Gesture committed on release");
                        GateDecision::Commit(action)
                    } else {
                        GateDecision::SnapBack(SnapTarget::Rest)
                    }
                }
                GestureClass::Dismiss => {
                    if self.dismiss_reached(&sample) && session.mark_committed() {
                        info!(session_id = session.id(), dy = sample.dy, "Dismiss committed");
                        GateDecision::Commit(CommitAction::Close)
                    } else {
                        GateDecision::SnapBack(SnapTarget::Open)
                    }
                }
            }
        };

        Some(GateOutcome {
            session_id: session.id(),
            origin: session.origin(),
            sample,
            decision,
        })
    }

    fn commit_navigate(&mut self, sample: PointerSample, now: Duration) -> GateDecision {
        let Some(session) = self.session.as_mut() else {
            return GateDecision::Ignored;
        };
        if !session.mark_committed() {
            return GateDecision::Ignored;
        }
        let action = CommitAction::Navigate(navigate_direction(sample.dx));
        info!(session_id = session.id(), action = %action, dx = sample.dx, "Gesture committed");
        self.start_cooldown(now);
        GateDecision::Commit(action)
    }

    fn start_cooldown(&mut self, now: Duration) {
        self.cooldown_until = Some(now + self.config.navigate_cooldown());
    }

    fn navigate_reached(&self, sample: &PointerSample) -> bool {
        sample.dx.abs() >= self.config.navigate_distance_threshold
            || sample.velocity_x.abs() >= self.config.navigate_velocity_threshold
    }

    fn dismiss_reached(&self, sample: &PointerSample) -> bool {
        sample.dy >= self.config.dismiss_extent_ratio * self.container_height
            || sample.velocity_y >= self.config.dismiss_velocity_threshold
    }
}

fn navigate_direction(dx: f32) -> ChangeDirection {
    if dx < 0.0 {
        ChangeDirection::Next
    } else {
        ChangeDirection::Previous
    }
}
