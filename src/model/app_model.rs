//! Main application model with state management

use std::time::Instant;

use crate::catalog::{Catalog, Track};

use super::metadata::{Metadata, MetadataRequest, MetadataState};
use super::playback::{next_index, prev_index, PlaybackState};
use super::types::UiState;

/// Main application model containing all state
pub struct AppModel {
    catalog: Catalog,
    playback: PlaybackState,
    metadata: MetadataState,
    ui_state: UiState,
    should_quit: bool,
}

impl AppModel {
    pub fn new(catalog: Catalog, volume: f64) -> Self {
        Self {
            catalog,
            playback: PlaybackState::new(volume),
            metadata: MetadataState::default(),
            ui_state: UiState::default(),
            should_quit: false,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn current_track(&self) -> &Track {
        // index is kept in [0, len) by every transition below
        &self.catalog.tracks()[self.playback.current_track_index]
    }

    pub fn playback(&self) -> &PlaybackState {
        &self.playback
    }

    pub fn metadata(&self) -> &MetadataState {
        &self.metadata
    }

    pub fn ui_state(&self) -> &UiState {
        &self.ui_state
    }

    // ========================================================================
    // Transport
    // ========================================================================

    pub fn play_pause(&mut self) -> bool {
        self.playback.is_playing = !self.playback.is_playing;
        self.playback.is_playing
    }

    pub fn set_playing(&mut self, is_playing: bool) {
        self.playback.is_playing = is_playing;
    }

    pub fn next(&mut self) -> usize {
        let index = next_index(self.playback.current_track_index, self.catalog.len());
        self.select_track(index);
        index
    }

    pub fn prev(&mut self) -> usize {
        let index = prev_index(self.playback.current_track_index, self.catalog.len());
        self.select_track(index);
        index
    }

    /// Auto-advance: the next track always plays, even across wraparound.
    pub fn on_track_ended(&mut self) -> usize {
        let index = self.next();
        self.playback.is_playing = true;
        index
    }

    fn select_track(&mut self, index: usize) {
        self.playback.current_track_index = index;
        self.playback.current_time = 0.0;
        self.playback.duration = None;
    }

    /// Returns the target time, or `None` while the duration is unusable.
    pub fn seek_to(&mut self, fraction: f64) -> Option<f64> {
        if fraction.is_nan() {
            return None;
        }
        let duration = self.playback.known_duration()?;
        let time = fraction.clamp(0.0, 1.0) * duration;
        self.playback.current_time = time;
        Some(time)
    }

    pub fn set_current_time(&mut self, time: f64) {
        if time.is_finite() {
            self.playback.current_time = time.max(0.0);
        }
    }

    pub fn set_duration(&mut self, duration: Option<f64>) {
        self.playback.duration = duration.filter(|d| d.is_finite() && *d >= 0.0);
    }

    pub fn set_volume(&mut self, volume: f64) -> f64 {
        self.playback.set_volume(volume);
        self.playback.volume
    }

    pub fn adjust_volume(&mut self, delta: f64) -> f64 {
        self.set_volume(self.playback.volume + delta)
    }

    pub fn toggle_mute(&mut self) -> f64 {
        self.playback.toggle_mute();
        self.playback.volume
    }

    pub fn set_playback_rate(&mut self, rate: f64) -> f64 {
        self.playback.set_playback_rate(rate);
        self.playback.playback_rate
    }

    // ========================================================================
    // Metadata
    // ========================================================================

    pub fn begin_metadata_request(&mut self) -> MetadataRequest {
        self.metadata.begin(self.playback.current_track_index)
    }

    pub fn apply_metadata(&mut self, request: MetadataRequest, metadata: Metadata, now: Instant) -> bool {
        self.metadata
            .resolve(request, self.playback.current_track_index, metadata, now)
    }

    // ========================================================================
    // UI
    // ========================================================================

    pub fn toggle_time_display(&mut self) {
        self.ui_state.time_display = self.ui_state.time_display.toggle();
    }

    pub fn set_time_display(&mut self, display: super::TimeDisplay) {
        self.ui_state.time_display = display;
    }

    pub fn toggle_help_popup(&mut self) {
        self.ui_state.show_help_popup = !self.ui_state.show_help_popup;
    }

    pub fn hide_help_popup(&mut self) {
        self.ui_state.show_help_popup = false;
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn set_should_quit(&mut self, quit: bool) {
        self.should_quit = quit;
    }
}
