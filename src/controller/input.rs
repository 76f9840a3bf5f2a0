//! Key and mouse event handling

use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::{Position, Rect};

use crate::audio::PlaybackEngine;
use crate::view::PlayerAreas;

use super::AppController;
use super::keyboard::PlayerKey;

impl<E: PlaybackEngine> AppController<E> {
    pub fn handle_key_event(&mut self, key: KeyEvent, now: Instant) {
        if key.kind == KeyEventKind::Repeat {
            return;
        }

        if let Some(player_key) = player_key(key.code) {
            // releases always reach the state machine so no key is left held
            let actions = match key.kind {
                KeyEventKind::Release => self.keyboard.release(player_key, now),
                _ if self.model.ui_state().show_help_popup => return,
                _ if self.release_events => self.keyboard.press(player_key, now),
                _ => {
                    // no release events from this terminal: every press is a tap
                    let mut actions = self.keyboard.press(player_key, now);
                    actions.extend(self.keyboard.release(player_key, now));
                    actions
                }
            };
            self.apply_actions(actions);
            return;
        }

        if key.kind != KeyEventKind::Press {
            return;
        }

        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.model.set_should_quit(true);
            return;
        }

        // Handle help popup
        if self.model.ui_state().show_help_popup {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('h' | 'H' | '?')) {
                self.model.hide_help_popup();
            }
            return;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.model.set_should_quit(true);
            }
            KeyCode::Char('m') | KeyCode::Char('M') => {
                self.toggle_mute();
            }
            KeyCode::Char('t') | KeyCode::Char('T') => {
                self.model.toggle_time_display();
            }
            KeyCode::Char('h') | KeyCode::Char('H') | KeyCode::Char('?') => {
                self.model.toggle_help_popup();
            }
            _ => {}
        }
    }

    /// Left clicks on the bars, the transport buttons, the mute icon and the
    /// time label; `area` is the full frame.
    pub fn handle_mouse_event(&mut self, mouse: MouseEvent, area: Rect) {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) || self.model.ui_state().show_help_popup {
            return;
        }

        let areas = PlayerAreas::new(area);
        let position = Position::new(mouse.column, mouse.row);

        if let Some(fraction) = click_fraction(areas.progress_bar, position) {
            self.seek_to_fraction(fraction);
        } else if let Some(fraction) = click_fraction(areas.volume_bar, position) {
            self.set_volume(fraction);
        } else if areas.time_label.contains(position) {
            self.model.toggle_time_display();
        } else if areas.mute_icon.contains(position) {
            self.toggle_mute();
        } else if areas.prev_button.contains(position) {
            self.previous_track();
        } else if areas.play_button.contains(position) {
            self.toggle_playback();
        } else if areas.next_button.contains(position) {
            self.next_track();
        }
    }
}

fn player_key(code: KeyCode) -> Option<PlayerKey> {
    match code {
        KeyCode::Left => Some(PlayerKey::Left),
        KeyCode::Right => Some(PlayerKey::Right),
        KeyCode::Up => Some(PlayerKey::Up),
        KeyCode::Down => Some(PlayerKey::Down),
        KeyCode::Char(' ') => Some(PlayerKey::Space),
        _ => None,
    }
}

/// Horizontal position of a click inside `bar`, from 0 at the left edge to 1
/// at the right edge.
fn click_fraction(bar: Rect, position: Position) -> Option<f64> {
    if bar.width == 0 || !bar.contains(position) {
        return None;
    }
    let span = bar.width.saturating_sub(1).max(1) as f64;
    Some(((position.x - bar.x) as f64 / span).clamp(0.0, 1.0))
}
