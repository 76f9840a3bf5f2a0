//! Progress, volume and transport rendering

use ratatui::{
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

use crate::model::{PlaybackState, TimeDisplay};
use super::layout::PlayerAreas;
use super::utils::{format_remaining, format_time};

pub fn render_progress_bar(frame: &mut Frame, areas: &PlayerAreas, playback: &PlaybackState, time_display: TimeDisplay) {
    frame.render_widget(Block::default().borders(Borders::ALL).title(" Progress "), areas.progress);

    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(Color::Green))
        .ratio(playback.progress_ratio())
        .label(format_time(playback.current_time));
    frame.render_widget(gauge, areas.progress_bar);

    let duration = playback.duration.unwrap_or(f64::NAN);
    let time_label = match time_display {
        TimeDisplay::Remaining => format_remaining(playback.current_time, duration),
        TimeDisplay::Total => format_time(duration),
    };
    frame.render_widget(
        Paragraph::new(time_label).alignment(Alignment::Right),
        areas.time_label,
    );
}

pub fn render_volume_bar(frame: &mut Frame, areas: &PlayerAreas, playback: &PlaybackState) {
    frame.render_widget(Block::default().borders(Borders::ALL).title(" Volume "), areas.volume);

    let icon = if playback.volume == 0.0 { "🔇" } else { "🔊" };
    frame.render_widget(Paragraph::new(icon), areas.mute_icon);

    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(Color::Cyan))
        .ratio(playback.volume.clamp(0.0, 1.0))
        .label(format!("{:.0}%", playback.volume * 100.0));
    frame.render_widget(gauge, areas.volume_bar);
}

pub fn render_controls(frame: &mut Frame, areas: &PlayerAreas, playback: &PlaybackState) {
    let mut block = Block::default()
        .borders(Borders::ALL)
        .title_bottom(Line::from(" h: help ").right_aligned());
    if playback.playback_rate > 1.0 {
        block = block.title(
            Line::from(Span::styled(
                format!(" {:.1}× ", playback.playback_rate),
                Style::default().fg(Color::Yellow),
            ))
            .right_aligned(),
        );
    }
    frame.render_widget(block, areas.controls);

    let play_pause = if playback.is_playing { "⏸" } else { "▶" };
    let buttons = [
        (areas.prev_button, "⏮", Style::default().fg(Color::White)),
        (
            areas.play_button,
            play_pause,
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ),
        (areas.next_button, "⏭", Style::default().fg(Color::White)),
    ];
    for (area, icon, style) in buttons {
        frame.render_widget(
            Paragraph::new(Span::styled(icon, style)).alignment(Alignment::Center),
            area,
        );
    }
}
