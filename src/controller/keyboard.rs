//! Tap/hold keyboard state machine
//!
//! Left/Right distinguish a tap (released within [`LONG_PRESS_DELAY`]) from a
//! hold, which repeats an effect every [`REPEAT_INTERVAL`] until release.
//! Up/Down repeat from the first press and share a single ramp slot.
//!
//! Timers are deadlines stored in the per-key state; nothing here spawns or
//! sleeps. The event loop calls [`KeyboardState::tick`] and uses
//! [`KeyboardState::next_deadline`] to decide how long to wait for input.

use std::time::{Duration, Instant};

pub const LONG_PRESS_DELAY: Duration = Duration::from_millis(200);
pub const REPEAT_INTERVAL: Duration = Duration::from_millis(100);
pub const REWIND_STEP_SECS: f64 = 0.2;
pub const SPEED_STEP: f64 = 0.2;
pub const VOLUME_STEP: f64 = 0.05;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerKey {
    Left,
    Right,
    Up,
    Down,
    Space,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputAction {
    PreviousTrack,
    NextTrack,
    TogglePlayback,
    /// Seek backwards by this many seconds
    Rewind(f64),
    /// Raise the playback rate by this much
    SpeedUp(f64),
    ResetSpeed,
    AdjustVolume(f64),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
enum KeyPhase {
    #[default]
    Idle,
    ArmedShort { fires_at: Instant },
    HoldActive { next_tick: Instant },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct VolumeRamp {
    key: PlayerKey,
    next_tick: Instant,
}

#[derive(Debug, Default)]
pub struct KeyboardState {
    left: KeyPhase,
    right: KeyPhase,
    up_down: bool,
    down_down: bool,
    volume_ramp: Option<VolumeRamp>,
}

impl KeyboardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, key: PlayerKey, now: Instant) -> Vec<InputAction> {
        let mut actions = self.tick(now);

        match key {
            PlayerKey::Left | PlayerKey::Right => {
                let phase = self.phase_mut(key);
                if *phase == KeyPhase::Idle {
                    *phase = KeyPhase::ArmedShort {
                        fires_at: now + LONG_PRESS_DELAY,
                    };
                }
            }
            PlayerKey::Up | PlayerKey::Down => {
                let (held, step) = match key {
                    PlayerKey::Up => (&mut self.up_down, VOLUME_STEP),
                    _ => (&mut self.down_down, -VOLUME_STEP),
                };
                if !*held {
                    *held = true;
                    // replaces any ramp still owned by the opposite key
                    self.volume_ramp = Some(VolumeRamp {
                        key,
                        next_tick: now + REPEAT_INTERVAL,
                    });
                    actions.push(InputAction::AdjustVolume(step));
                }
            }
            PlayerKey::Space => actions.push(InputAction::TogglePlayback),
        }

        actions
    }

    pub fn release(&mut self, key: PlayerKey, now: Instant) -> Vec<InputAction> {
        let mut actions = self.tick(now);

        match key {
            PlayerKey::Left | PlayerKey::Right => {
                let phase = std::mem::take(self.phase_mut(key));
                match (key, phase) {
                    (_, KeyPhase::Idle) => {}
                    (PlayerKey::Left, KeyPhase::ArmedShort { .. }) => {
                        actions.push(InputAction::PreviousTrack)
                    }
                    (_, KeyPhase::ArmedShort { .. }) => actions.push(InputAction::NextTrack),
                    (PlayerKey::Right, KeyPhase::HoldActive { .. }) => {
                        actions.push(InputAction::ResetSpeed)
                    }
                    (_, KeyPhase::HoldActive { .. }) => {}
                }
            }
            PlayerKey::Up | PlayerKey::Down => {
                self.volume_ramp = None;
                self.up_down = false;
                self.down_down = false;
            }
            PlayerKey::Space => {}
        }

        actions
    }

    /// Fire every deadline up to `now`, in order.
    pub fn tick(&mut self, now: Instant) -> Vec<InputAction> {
        let mut actions = Vec::new();
        advance_hold(&mut self.left, now, InputAction::Rewind(REWIND_STEP_SECS), &mut actions);
        advance_hold(&mut self.right, now, InputAction::SpeedUp(SPEED_STEP), &mut actions);

        if let Some(ramp) = self.volume_ramp.as_mut() {
            let step = match ramp.key {
                PlayerKey::Up => VOLUME_STEP,
                _ => -VOLUME_STEP,
            };
            while ramp.next_tick <= now {
                actions.push(InputAction::AdjustVolume(step));
                ramp.next_tick += REPEAT_INTERVAL;
            }
        }

        actions
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        let phase_deadline = |phase: &KeyPhase| match *phase {
            KeyPhase::Idle => None,
            KeyPhase::ArmedShort { fires_at } => Some(fires_at),
            KeyPhase::HoldActive { next_tick } => Some(next_tick),
        };

        [
            phase_deadline(&self.left),
            phase_deadline(&self.right),
            self.volume_ramp.map(|ramp| ramp.next_tick),
        ]
        .into_iter()
        .flatten()
        .min()
    }

    #[cfg(test)]
    pub fn is_long_press(&self, key: PlayerKey) -> bool {
        match key {
            PlayerKey::Left => matches!(self.left, KeyPhase::HoldActive { .. }),
            PlayerKey::Right => matches!(self.right, KeyPhase::HoldActive { .. }),
            _ => false,
        }
    }

    /// Drop every pending timer and held key.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn phase_mut(&mut self, key: PlayerKey) -> &mut KeyPhase {
        match key {
            PlayerKey::Left => &mut self.left,
            _ => &mut self.right,
        }
    }
}

fn advance_hold(phase: &mut KeyPhase, now: Instant, repeat: InputAction, actions: &mut Vec<InputAction>) {
    if let KeyPhase::ArmedShort { fires_at } = *phase {
        if fires_at > now {
            return;
        }
        *phase = KeyPhase::HoldActive {
            next_tick: fires_at + REPEAT_INTERVAL,
        };
    }

    if let KeyPhase::HoldActive { next_tick } = phase {
        while *next_tick <= now {
            actions.push(repeat);
            *next_tick += REPEAT_INTERVAL;
        }
    }
}
