//! Read-side view models for the mini-player and the full sheet.
//!
//! Surfaces never mutate overlay state. They take an [`OverlaySnapshot`],
//! published after every coordinator event, and bind to the plain values in
//! [`MiniPlayerSurface`] and [`FullSheetSurface`].

use bridge_traits::{ChangeDirection, Track, TrackRef};
use serde::Serialize;

/// Everything the presentation layer may read, captured at one instant.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OverlaySnapshot {
    pub rendered_is_playing: bool,
    pub sheet_visible: bool,
    pub sheet_position: f32,
    pub backdrop_opacity: f32,
    pub mini_opacity: f32,
    pub current_track: Option<TrackRef>,
    pub outgoing_track: Option<TrackRef>,
    pub direction: ChangeDirection,
    pub cover_prev_translate: f32,
    pub cover_prev_opacity: f32,
    pub cover_curr_translate: f32,
    pub cover_curr_opacity: f32,
    /// Radians in `[0, 2π)`.
    pub spin_angle: f32,
    pub gesture_active: bool,
}

/// One piece of cover artwork and where to draw it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoverView {
    pub track_id: String,
    pub cover_image: String,
    pub overlay_image: Option<String>,
    pub translate_x: f32,
    pub opacity: f32,
}

impl CoverView {
    fn new(track: &Track, translate_x: f32, opacity: f32) -> Self {
        Self {
            track_id: track.id.clone(),
            cover_image: track.cover_image.clone(),
            overlay_image: track.overlay_image.clone(),
            translate_x,
            opacity,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MiniPlayerSurface {
    pub visible: bool,
    pub opacity: f32,
    pub title: String,
    pub subtitle: String,
    pub accent_color: String,
    pub is_playing: bool,
    pub cover: Option<CoverView>,
}

impl MiniPlayerSurface {
    pub fn from_snapshot(snapshot: &OverlaySnapshot) -> Self {
        let track = snapshot.current_track.as_deref();
        Self {
            visible: snapshot.mini_opacity > 0.0 && track.is_some(),
            opacity: snapshot.mini_opacity,
            title: track.map(|t| t.title.clone()).unwrap_or_default(),
            subtitle: track.map(|t| t.subtitle.clone()).unwrap_or_default(),
            accent_color: track.map(|t| t.accent_color.clone()).unwrap_or_default(),
            is_playing: snapshot.rendered_is_playing,
            cover: track.map(|t| {
                CoverView::new(t, snapshot.cover_curr_translate, snapshot.cover_curr_opacity)
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FullSheetSurface {
    pub visible: bool,
    pub position: f32,
    pub backdrop_opacity: f32,
    pub title: String,
    pub subtitle: String,
    pub accent_color: String,
    pub is_playing: bool,
    pub current_cover: Option<CoverView>,
    /// Present only while a directional cover transition is in flight.
    pub outgoing_cover: Option<CoverView>,
    pub spin_angle: f32,
}

impl FullSheetSurface {
    pub fn from_snapshot(snapshot: &OverlaySnapshot) -> Self {
        let track = snapshot.current_track.as_deref();
        Self {
            visible: snapshot.sheet_visible,
            position: snapshot.sheet_position,
            backdrop_opacity: snapshot.backdrop_opacity,
            title: track.map(|t| t.title.clone()).unwrap_or_default(),
            subtitle: track.map(|t| t.subtitle.clone()).unwrap_or_default(),
            accent_color: track.map(|t| t.accent_color.clone()).unwrap_or_default(),
            is_playing: snapshot.rendered_is_playing,
            current_cover: track.map(|t| {
                CoverView::new(t, snapshot.cover_curr_translate, snapshot.cover_curr_opacity)
            }),
            outgoing_cover: snapshot.outgoing_track.as_deref().map(|t| {
                CoverView::new(t, snapshot.cover_prev_translate, snapshot.cover_prev_opacity)
            }),
            spin_angle: snapshot.spin_angle,
        }
    }
}
