//! Engine events and metadata results

use std::time::Instant;

use crate::audio::{EngineEvent, PlaybackEngine};

use super::{AppController, MetadataUpdate};

impl<E: PlaybackEngine> AppController<E> {
    pub(crate) fn handle_engine_events(&mut self) {
        for event in self.engine.poll_events() {
            match event {
                EngineEvent::TimeUpdate(time) => {
                    tracing::trace!(time, "EngineEvent::TimeUpdate");
                    self.model.set_current_time(time);
                }
                EngineEvent::LoadedMetadata(duration) => {
                    tracing::debug!(?duration, "EngineEvent::LoadedMetadata");
                    self.model.set_duration(duration);
                }
                EngineEvent::Ended => {
                    tracing::debug!("EngineEvent::Ended");
                    self.on_track_ended();
                }
                EngineEvent::Play => {
                    tracing::debug!("EngineEvent::Play");
                    self.model.set_playing(true);
                }
                EngineEvent::Pause => {
                    tracing::debug!("EngineEvent::Pause");
                    self.model.set_playing(false);
                }
            }
        }
    }

    pub(crate) fn drain_metadata_updates(&mut self, now: Instant) {
        while let Ok(update) = self.metadata_rx.try_recv() {
            self.apply_metadata_update(update, now);
        }
    }

    /// Wait for the next metadata result and apply it.
    #[cfg(test)]
    pub async fn next_metadata_update(&mut self) -> bool {
        match self.metadata_rx.recv().await {
            Some(update) => self.apply_metadata_update(update, Instant::now()),
            None => false,
        }
    }

    fn apply_metadata_update(&mut self, update: MetadataUpdate, now: Instant) -> bool {
        let MetadataUpdate { request, metadata } = update;
        let applied = self.model.apply_metadata(request, metadata, now);
        if applied {
            tracing::debug!(request_id = request.id, track_index = request.track_index, "Metadata applied");
        }
        applied
    }
}
