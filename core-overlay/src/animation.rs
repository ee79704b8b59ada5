//! Time-boxed tweens and the animated values surfaces bind to.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Easing curves used by overlay transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    Linear,
    /// Decelerating; used for fades and springs back to rest.
    #[default]
    EaseOutCubic,
    /// Symmetric; used for paired cover slides so both sides stay locked.
    EaseInOutCubic,
}

impl Easing {
    /// Map linear progress `t` in `[0, 1]` onto the curve.
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
            Easing::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
        }
    }
}

/// Interpolation from `from` to `to` over `[start, start + duration]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    pub from: f32,
    pub to: f32,
    pub start: Duration,
    pub duration: Duration,
    pub easing: Easing,
}

impl Tween {
    pub fn new(from: f32, to: f32, start: Duration, duration: Duration, easing: Easing) -> Self {
        Self {
            from,
            to,
            start,
            duration,
            easing,
        }
    }

    pub fn end_time(&self) -> Duration {
        self.start + self.duration
    }

    pub fn is_finished(&self, now: Duration) -> bool {
        now >= self.end_time()
    }

    pub fn value_at(&self, now: Duration) -> f32 {
        if self.duration.is_zero() || now >= self.end_time() {
            return self.to;
        }
        let elapsed = now.saturating_sub(self.start).as_secs_f32();
        let progress = elapsed / self.duration.as_secs_f32();
        self.from + (self.to - self.from) * self.easing.apply(progress)
    }
}

/// A numeric property driven either directly or by a tween.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimatedValue {
    value: f32,
    tween: Option<Tween>,
}

impl AnimatedValue {
    pub fn new(value: f32) -> Self {
        Self { value, tween: None }
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn is_animating(&self) -> bool {
        self.tween.is_some()
    }

    pub fn target(&self) -> f32 {
        self.tween.map_or(self.value, |tween| tween.to)
    }

    /// Stop any tween and jump to `value`.
    pub fn set(&mut self, value: f32) {
        self.tween = None;
        self.value = value;
    }

    /// Start a tween from the current value.
    pub fn animate_to(&mut self, to: f32, now: Duration, duration: Duration, easing: Easing) {
        self.animate(Tween::new(self.value, to, now, duration, easing));
    }

    pub fn animate(&mut self, tween: Tween) {
        self.value = tween.from;
        self.tween = Some(tween);
    }

    /// Freeze at the value reached by `now`, dropping the tween.
    pub fn stop(&mut self, now: Duration) {
        self.sample(now);
        self.tween = None;
    }

    /// Jump to the tween's end value.
    pub fn finish(&mut self) {
        if let Some(tween) = self.tween.take() {
            self.value = tween.to;
        }
    }

    /// Advance to `now`. A finished tween leaves the value at its end.
    pub fn sample(&mut self, now: Duration) -> f32 {
        if let Some(tween) = self.tween {
            self.value = tween.value_at(now);
            if tween.is_finished(now) {
                self.tween = None;
            }
        }
        self.value
    }
}
