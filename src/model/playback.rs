//! Playback-related state and the pure transport rules

/// Volume restored by unmute when no earlier volume is known
pub const UNMUTE_FALLBACK_VOLUME: f64 = 0.5;
pub const MIN_PLAYBACK_RATE: f64 = 1.0;
pub const MAX_PLAYBACK_RATE: f64 = 16.0;

/// Transport state for the current track
#[derive(Clone, Debug, PartialEq)]
pub struct PlaybackState {
    pub current_track_index: usize,
    pub is_playing: bool,
    /// Seconds into the current track
    pub current_time: f64,
    /// Seconds, `None` until the engine reports it
    pub duration: Option<f64>,
    pub volume: f64,
    pub previous_volume: f64,
    pub playback_rate: f64,
}

impl PlaybackState {
    pub fn new(volume: f64) -> Self {
        let volume = clamp_unit(volume).unwrap_or(1.0);
        Self {
            current_track_index: 0,
            is_playing: false,
            current_time: 0.0,
            duration: None,
            volume,
            previous_volume: volume,
            playback_rate: MIN_PLAYBACK_RATE,
        }
    }

    /// Duration usable for arithmetic: known, finite and positive.
    pub fn known_duration(&self) -> Option<f64> {
        self.duration.filter(|d| d.is_finite() && *d > 0.0)
    }

    /// Fraction of the track already played, in [0, 1].
    pub fn progress_ratio(&self) -> f64 {
        match self.known_duration() {
            Some(duration) => (self.current_time / duration).clamp(0.0, 1.0),
            None => 0.0,
        }
    }

    pub fn set_volume(&mut self, volume: f64) {
        let Some(volume) = clamp_unit(volume) else {
            return;
        };
        if volume == 0.0 && self.volume > 0.0 {
            self.previous_volume = self.volume;
        }
        self.volume = volume;
    }

    pub fn toggle_mute(&mut self) {
        if self.volume > 0.0 {
            self.previous_volume = self.volume;
            self.volume = 0.0;
        } else if self.previous_volume > 0.0 {
            self.volume = self.previous_volume;
        } else {
            self.volume = UNMUTE_FALLBACK_VOLUME;
        }
    }

    pub fn set_playback_rate(&mut self, rate: f64) {
        if rate.is_nan() {
            return;
        }
        self.playback_rate = rate.clamp(MIN_PLAYBACK_RATE, MAX_PLAYBACK_RATE);
    }
}

pub fn next_index(current: usize, len: usize) -> usize {
    if len == 0 || current + 1 >= len { 0 } else { current + 1 }
}

pub fn prev_index(current: usize, len: usize) -> usize {
    if len == 0 {
        0
    } else if current == 0 || current >= len {
        len - 1
    } else {
        current - 1
    }
}

fn clamp_unit(value: f64) -> Option<f64> {
    if value.is_nan() {
        None
    } else {
        Some(value.clamp(0.0, 1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_wraps_around_after_n_steps() {
        for len in 1..6 {
            for start in 0..len {
                let mut index = start;
                for _ in 0..len {
                    index = next_index(index, len);
                }
                assert_eq!(index, start, "len {len}, start {start}");
            }
        }
    }

    #[test]
    fn prev_inverts_next() {
        for len in 1..6 {
            for start in 0..len {
                assert_eq!(prev_index(next_index(start, len), len), start);
                assert_eq!(next_index(prev_index(start, len), len), start);
            }
        }
    }

    #[test]
    fn three_track_scenario() {
        assert_eq!(prev_index(0, 3), 2);
        assert_eq!(next_index(2, 3), 0);
        assert_eq!(next_index(0, 3), 1);
    }

    #[test]
    fn volume_is_clamped() {
        let mut state = PlaybackState::new(0.5);
        state.set_volume(7.0);
        assert_eq!(state.volume, 1.0);
        state.set_volume(-3.0);
        assert_eq!(state.volume, 0.0);
        state.set_volume(f64::NAN);
        assert_eq!(state.volume, 0.0);
    }

    #[test]
    fn setting_zero_remembers_previous_volume() {
        let mut state = PlaybackState::new(0.8);
        state.set_volume(0.0);
        assert_eq!(state.previous_volume, 0.8);
        state.toggle_mute();
        assert_eq!(state.volume, 0.8);
    }

    #[test]
    fn mute_twice_restores_volume() {
        let mut state = PlaybackState::new(0.5);
        state.toggle_mute();
        assert_eq!(state.volume, 0.0);
        assert_eq!(state.previous_volume, 0.5);
        state.toggle_mute();
        assert_eq!(state.volume, 0.5);
    }

    #[test]
    fn unmute_without_history_uses_fallback() {
        let mut state = PlaybackState::new(0.0);
        state.previous_volume = 0.0;
        state.toggle_mute();
        assert_eq!(state.volume, UNMUTE_FALLBACK_VOLUME);
    }

    #[test]
    fn progress_ratio_guards_unknown_duration() {
        let mut state = PlaybackState::new(1.0);
        state.current_time = 12.0;
        assert_eq!(state.progress_ratio(), 0.0);
        state.duration = Some(0.0);
        assert_eq!(state.progress_ratio(), 0.0);
        state.duration = Some(48.0);
        assert_eq!(state.progress_ratio(), 0.25);
    }

    #[test]
    fn playback_rate_is_bounded() {
        let mut state = PlaybackState::new(1.0);
        state.set_playback_rate(40.0);
        assert_eq!(state.playback_rate, MAX_PLAYBACK_RATE);
        state.set_playback_rate(0.1);
        assert_eq!(state.playback_rate, MIN_PLAYBACK_RATE);
    }
}
