//! View module - UI rendering
//!
//! This module handles all UI rendering for the application using ratatui.
//! It is organized into submodules by component type:
//!
//! - `utils`: Shared formatting helpers
//! - `layout`: Screen regions and the track list
//! - `cover`: Cover art crossfade and artist pill
//! - `progress`: Progress bar, volume bar and transport
//! - `overlays`: Help popup

mod utils;
mod layout;
mod cover;
mod progress;
mod overlays;

use std::time::Instant;

use ratatui::Frame;

use crate::model::AppModel;

pub use layout::PlayerAreas;

pub struct AppView;

impl AppView {
    pub fn render(frame: &mut Frame, model: &AppModel, now: Instant) {
        let areas = PlayerAreas::new(frame.area());
        let playback = model.playback();

        // Top: artist pill with the track title
        cover::render_artist_pill(frame, areas.artist, model.metadata(), &model.current_track().title);

        // Middle: cover art and track list
        cover::render_cover(frame, areas.cover, model.metadata().covers(), now);
        layout::render_track_list(
            frame,
            areas.track_list,
            model.catalog(),
            playback.current_track_index,
            playback.is_playing,
        );

        // Bottom: progress, volume and transport
        progress::render_progress_bar(frame, &areas, playback, model.ui_state().time_display);
        progress::render_volume_bar(frame, &areas, playback);
        progress::render_controls(frame, &areas, playback);

        // Help popup overlay (if open)
        if model.ui_state().show_help_popup {
            overlays::render_help_popup(frame);
        }
    }

    /// True while a cover crossfade is still running.
    pub fn is_animating(model: &AppModel, now: Instant) -> bool {
        cover::cover_layers(model.metadata().covers(), now).is_transitioning()
    }
}
