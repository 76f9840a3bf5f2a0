//! Controller module - Application logic and event handling
//!
//! The controller owns the model, the playback engine and the keyboard state.
//! Everything runs on the event loop; metadata loads are the only background
//! work and report back through a channel. It is organized into submodules by
//! responsibility:
//!
//! - `keyboard`: Tap/hold state machine
//! - `input`: Terminal key and mouse event handling
//! - `playback`: Transport operations applied to model and engine
//! - `player_events`: Engine event and metadata result handling

mod keyboard;
mod input;
mod playback;
mod player_events;

use std::time::{Duration, Instant};
use tokio::sync::mpsc;

use crate::audio::PlaybackEngine;
use crate::metadata::MetadataLoader;
use crate::model::{AppModel, Metadata, MetadataRequest};
use keyboard::KeyboardState;

/// Upper bound on how long the event loop waits for terminal input
const MAX_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// A finished metadata load, tagged with the request it answers
#[derive(Debug)]
pub struct MetadataUpdate {
    pub request: MetadataRequest,
    pub metadata: Metadata,
}

pub struct AppController<E: PlaybackEngine> {
    model: AppModel,
    engine: E,
    keyboard: KeyboardState,
    loader: MetadataLoader,
    metadata_tx: mpsc::UnboundedSender<MetadataUpdate>,
    metadata_rx: mpsc::UnboundedReceiver<MetadataUpdate>,
    /// Whether the terminal reports key releases
    release_events: bool,
}

impl<E: PlaybackEngine> AppController<E> {
    pub fn new(model: AppModel, engine: E, loader: MetadataLoader, release_events: bool) -> Self {
        let (metadata_tx, metadata_rx) = mpsc::unbounded_channel();
        Self {
            model,
            engine,
            keyboard: KeyboardState::new(),
            loader,
            metadata_tx,
            metadata_rx,
            release_events,
        }
    }

    pub fn model(&self) -> &AppModel {
        &self.model
    }

    #[cfg(test)]
    pub(crate) fn engine(&self) -> &E {
        &self.engine
    }

    /// Load the first track and push initial settings to the engine.
    pub fn start(&mut self) {
        let playback = self.model.playback();
        self.engine.set_volume(playback.volume);
        self.engine.set_playback_rate(playback.playback_rate);
        self.load_current_track();
    }

    /// Advance time-based state: keyboard repeats, engine events, metadata.
    pub fn update(&mut self, now: Instant) {
        let actions = self.keyboard.tick(now);
        self.apply_actions(actions);
        self.handle_engine_events();
        self.drain_metadata_updates(now);
    }

    /// How long the event loop may block waiting for input.
    pub fn poll_timeout(&self, now: Instant) -> Duration {
        match self.keyboard.next_deadline() {
            Some(deadline) => deadline.saturating_duration_since(now).min(MAX_POLL_INTERVAL),
            None => MAX_POLL_INTERVAL,
        }
    }

    /// Clear every pending timer and stop output.
    pub fn shutdown(&mut self) {
        self.keyboard.reset();
        self.engine.pause();
        tracing::info!("Controller shut down");
    }
}
