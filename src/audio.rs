//! Playback engine: the native audio primitive the controller drives
//!
//! The controller only talks to [`PlaybackEngine`]; [`RodioEngine`] is the
//! implementation used at runtime. Media events (time updates, loaded
//! duration, end of track, play/pause) are collected by polling.

use anyhow::{Context, Result};
use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink, Source};
use std::fs::File;
use std::time::Duration;

use crate::catalog::Track;

#[derive(Clone, Debug, PartialEq)]
pub enum EngineEvent {
    TimeUpdate(f64),
    /// Duration in seconds, `None` when the decoder cannot tell
    LoadedMetadata(Option<f64>),
    Ended,
    Play,
    Pause,
}

pub trait PlaybackEngine {
    /// Replace the current source. Playback rate goes back to 1.0.
    fn load(&mut self, track: &Track) -> Result<()>;
    fn play(&mut self) -> Result<()>;
    fn pause(&mut self);
    fn seek(&mut self, seconds: f64) -> Result<()>;
    fn set_volume(&mut self, volume: f64);
    fn set_playback_rate(&mut self, rate: f64);
    fn current_time(&self) -> f64;
    /// Events produced since the last call
    fn poll_events(&mut self) -> Vec<EngineEvent>;
}

pub struct RodioEngine {
    // dropping the stream stops all output
    _stream: OutputStream,
    sink: Sink,
    loaded: bool,
    pending: Vec<EngineEvent>,
}

impl RodioEngine {
    pub fn new(volume: f64) -> Result<Self> {
        let mut stream = OutputStreamBuilder::open_default_stream()
            .context("Failed to open default audio output")?;
        stream.log_on_drop(false);

        let sink = Sink::connect_new(stream.mixer());
        sink.pause();
        sink.set_volume(volume as f32);

        tracing::info!("Audio output initialized");

        Ok(Self {
            _stream: stream,
            sink,
            loaded: false,
            pending: Vec::new(),
        })
    }
}

impl PlaybackEngine for RodioEngine {
    fn load(&mut self, track: &Track) -> Result<()> {
        // clear() also pauses the sink
        self.sink.clear();
        self.sink.set_speed(1.0);
        self.loaded = false;

        let file = File::open(&track.source)
            .with_context(|| format!("Failed to open {}", track.source.display()))?;
        let source = Decoder::try_from(file)
            .with_context(|| format!("Failed to decode {}", track.source.display()))?;

        let duration = source.total_duration().map(|d| d.as_secs_f64());
        self.sink.append(source);
        self.loaded = true;

        tracing::debug!(track = %track.title, ?duration, "Track loaded");
        self.pending.push(EngineEvent::LoadedMetadata(duration));
        Ok(())
    }

    fn play(&mut self) -> Result<()> {
        if !self.loaded {
            anyhow::bail!("No playable source loaded");
        }
        if self.sink.is_paused() {
            self.sink.play();
            self.pending.push(EngineEvent::Play);
        }
        Ok(())
    }

    fn pause(&mut self) {
        if !self.sink.is_paused() {
            self.sink.pause();
            self.pending.push(EngineEvent::Pause);
        }
    }

    fn seek(&mut self, seconds: f64) -> Result<()> {
        if !self.loaded || !seconds.is_finite() {
            return Ok(());
        }
        let position = Duration::from_secs_f64(seconds.max(0.0));
        self.sink
            .try_seek(position)
            .map_err(|e| anyhow::anyhow!("Seek failed: {e}"))?;
        self.pending.push(EngineEvent::TimeUpdate(position.as_secs_f64()));
        Ok(())
    }

    fn set_volume(&mut self, volume: f64) {
        self.sink.set_volume(volume.clamp(0.0, 1.0) as f32);
    }

    fn set_playback_rate(&mut self, rate: f64) {
        self.sink.set_speed(rate as f32);
    }

    fn current_time(&self) -> f64 {
        self.sink.get_pos().as_secs_f64()
    }

    fn poll_events(&mut self) -> Vec<EngineEvent> {
        if self.loaded && self.sink.empty() {
            self.loaded = false;
            self.pending.push(EngineEvent::Ended);
        } else if self.loaded && !self.sink.is_paused() {
            self.pending.push(EngineEvent::TimeUpdate(self.current_time()));
        }
        std::mem::take(&mut self.pending)
    }
}
