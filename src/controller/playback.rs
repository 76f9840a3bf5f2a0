//! Playback control methods

use crate::audio::PlaybackEngine;

use super::keyboard::InputAction;
use super::{AppController, MetadataUpdate};

impl<E: PlaybackEngine> AppController<E> {
    pub fn toggle_playback(&mut self) {
        let is_playing = self.model.play_pause();
        tracing::debug!(is_playing, "Toggling playback");
        self.sync_engine_playing(is_playing);
    }

    pub fn next_track(&mut self) {
        let index = self.model.next();
        tracing::info!(index, "Skipped to next track");
        self.load_current_track();
    }

    pub fn previous_track(&mut self) {
        let index = self.model.prev();
        tracing::info!(index, "Skipped to previous track");
        self.load_current_track();
    }

    pub fn on_track_ended(&mut self) {
        let index = self.model.on_track_ended();
        tracing::info!(index, "Track ended, advancing");
        self.load_current_track();
    }

    pub fn seek_to_fraction(&mut self, fraction: f64) {
        let Some(time) = self.model.seek_to(fraction) else {
            tracing::debug!(fraction, "Seek ignored, duration unknown");
            return;
        };
        if let Err(e) = self.engine.seek(time) {
            tracing::warn!(error = %e, time, "Seek failed");
        }
    }

    pub fn rewind(&mut self, seconds: f64) {
        let time = (self.engine.current_time() - seconds).max(0.0);
        if let Err(e) = self.engine.seek(time) {
            tracing::warn!(error = %e, time, "Rewind seek failed");
            return;
        }
        self.model.set_current_time(time);
    }

    pub fn speed_up(&mut self, step: f64) {
        let rate = self.model.playback().playback_rate + step;
        let rate = self.model.set_playback_rate(rate);
        self.engine.set_playback_rate(rate);
    }

    pub fn reset_speed(&mut self) {
        let rate = self.model.set_playback_rate(1.0);
        self.engine.set_playback_rate(rate);
    }

    pub fn set_volume(&mut self, volume: f64) {
        let volume = self.model.set_volume(volume);
        self.engine.set_volume(volume);
    }

    pub fn adjust_volume(&mut self, delta: f64) {
        let volume = self.model.adjust_volume(delta);
        self.engine.set_volume(volume);
    }

    pub fn toggle_mute(&mut self) {
        let volume = self.model.toggle_mute();
        tracing::debug!(volume, "Mute toggled");
        self.engine.set_volume(volume);
    }

    pub(crate) fn apply_actions(&mut self, actions: Vec<InputAction>) {
        for action in actions {
            match action {
                InputAction::PreviousTrack => self.previous_track(),
                InputAction::NextTrack => self.next_track(),
                InputAction::TogglePlayback => self.toggle_playback(),
                InputAction::Rewind(seconds) => self.rewind(seconds),
                InputAction::SpeedUp(step) => self.speed_up(step),
                InputAction::ResetSpeed => self.reset_speed(),
                InputAction::AdjustVolume(delta) => self.adjust_volume(delta),
            }
        }
    }

    /// Point the engine at the selected track and start its metadata load.
    pub(crate) fn load_current_track(&mut self) {
        let track = self.model.current_track().clone();
        let request = self.model.begin_metadata_request();

        if let Err(e) = self.engine.load(&track) {
            tracing::error!(track = %track.title, error = %e, "Failed to load track");
        }
        // a fresh source always starts at normal speed
        self.model.set_playback_rate(1.0);

        if self.model.playback().is_playing {
            self.sync_engine_playing(true);
        }

        let loader = self.loader.clone();
        let metadata_tx = self.metadata_tx.clone();
        tokio::spawn(async move {
            let metadata = loader.load(&track).await;
            if metadata_tx.send(MetadataUpdate { request, metadata }).is_err() {
                tracing::debug!("Metadata receiver closed before load finished");
            }
        });
    }

    fn sync_engine_playing(&mut self, is_playing: bool) {
        if is_playing {
            // state stays "playing" even if the engine refuses
            if let Err(e) = self.engine.play() {
                tracing::error!(error = %e, "Playback failed");
            }
        } else {
            self.engine.pause();
        }
    }
}
