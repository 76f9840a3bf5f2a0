//! Layout structure and the track list panel

use ratatui::{
    layout::{Constraint, Direction, Flex, Layout, Margin, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, List, ListItem, ListState, Padding},
    Frame,
};

use crate::catalog::Catalog;
use super::utils::truncate_string;

/// Room for "-MM:SS" plus a little padding
const TIME_LABEL_WIDTH: u16 = 7;
const MUTE_ICON_WIDTH: u16 = 2;
const BUTTON_WIDTH: u16 = 3;

/// Screen regions of the player, shared by rendering and mouse hit-testing
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlayerAreas {
    pub artist: Rect,
    pub cover: Rect,
    pub track_list: Rect,
    pub progress: Rect,
    /// Seekable part of the progress block
    pub progress_bar: Rect,
    /// Remaining or total time, toggled on click
    pub time_label: Rect,
    pub volume: Rect,
    pub mute_icon: Rect,
    pub volume_bar: Rect,
    pub controls: Rect,
    pub prev_button: Rect,
    pub play_button: Rect,
    pub next_button: Rect,
}

impl PlayerAreas {
    pub fn new(area: Rect) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Artist pill
                Constraint::Min(0),    // Cover + track list
                Constraint::Length(3), // Progress bar
                Constraint::Length(3), // Volume + transport
            ])
            .split(area);

        let middle = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(chunks[1]);

        let bottom = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(chunks[3]);

        let border = Margin::new(1, 1);

        let [progress_bar, time_label] = Layout::horizontal([
            Constraint::Min(0),
            Constraint::Length(TIME_LABEL_WIDTH),
        ])
        .spacing(1)
        .areas(chunks[2].inner(border));

        let [mute_icon, volume_bar] = Layout::horizontal([
            Constraint::Length(MUTE_ICON_WIDTH),
            Constraint::Min(0),
        ])
        .spacing(1)
        .areas(bottom[0].inner(border));

        let [prev_button, play_button, next_button] = Layout::horizontal([Constraint::Length(BUTTON_WIDTH); 3])
            .spacing(2)
            .flex(Flex::Center)
            .areas(bottom[1].inner(border));

        Self {
            artist: chunks[0],
            cover: middle[0],
            track_list: middle[1],
            progress: chunks[2],
            progress_bar,
            time_label,
            volume: bottom[0],
            mute_icon,
            volume_bar,
            controls: bottom[1],
            prev_button,
            play_button,
            next_button,
        }
    }
}

pub fn render_track_list(frame: &mut Frame, area: Rect, catalog: &Catalog, current_index: usize, is_playing: bool) {
    let title_width = area.width.saturating_sub(8) as usize;

    let items: Vec<ListItem> = catalog
        .tracks()
        .iter()
        .enumerate()
        .map(|(i, track)| {
            let marker = match (i == current_index, is_playing) {
                (true, true) => "▶ ",
                (true, false) => "⏸ ",
                _ => "  ",
            };
            let style = if i == current_index {
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            ListItem::new(format!("{}{}", marker, truncate_string(&track.title, title_width))).style(style)
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Tracks ")
                .padding(Padding::horizontal(1)),
        )
        .highlight_style(Style::default()); // Highlight handled by item styles

    let mut list_state = ListState::default();
    list_state.select(Some(current_index));

    frame.render_stateful_widget(list, area, &mut list_state);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clickable_bars_sit_inside_their_blocks() {
        let areas = PlayerAreas::new(Rect::new(0, 0, 100, 30));

        assert_eq!(areas.progress, Rect::new(0, 24, 100, 3));
        assert_eq!(areas.progress_bar, Rect::new(1, 25, 90, 1));
        assert_eq!(areas.time_label, Rect::new(92, 25, 7, 1));
        assert_eq!(areas.mute_icon, Rect::new(1, 28, 2, 1));
        assert_eq!(areas.volume_bar, Rect::new(4, 28, 45, 1));
        assert_eq!(areas.controls.x, 50);
    }

    #[test]
    fn transport_buttons_are_centered_and_disjoint() {
        let areas = PlayerAreas::new(Rect::new(0, 0, 100, 30));
        let buttons = [areas.prev_button, areas.play_button, areas.next_button];

        for button in buttons {
            assert_eq!(button.y, 28);
            assert_eq!(button.width, 3);
            assert!(areas.controls.contains(button.as_position()));
        }
        assert!(buttons.windows(2).all(|pair| pair[0].right() < pair[1].x));

        let inner = areas.controls.inner(Margin::new(1, 1));
        let left_gap = areas.prev_button.x - inner.x;
        let right_gap = inner.right() - areas.next_button.right();
        assert!(left_gap.abs_diff(right_gap) <= 1);
    }
}
