//! Utility functions for rendering UI components

use ratatui::style::Color;

/// `M:SS`; anything that is not a finite number reads as `0:00`.
pub fn format_time(seconds: f64) -> String {
    if !seconds.is_finite() {
        return "0:00".to_string();
    }
    let total_seconds = seconds.max(0.0).floor() as u64;
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;
    format!("{}:{:02}", minutes, seconds)
}

/// `-M:SS` counting down from `duration`.
pub fn format_remaining(seconds: f64, duration: f64) -> String {
    if !seconds.is_finite() || !duration.is_finite() {
        return "-0:00".to_string();
    }
    format!("-{}", format_time((duration - seconds).max(0.0)))
}

/// `@` handle derived from the artist: lowercase, whitespace removed.
pub fn artist_handle(artist: &str) -> String {
    let handle: String = artist
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect();
    if handle.is_empty() {
        "@artist".to_string()
    } else {
        format!("@{}", handle)
    }
}

pub fn rgb(color: [u8; 3]) -> Color {
    Color::Rgb(color[0], color[1], color[2])
}

pub fn truncate_string(s: &str, max_width: usize) -> String {
    if s.chars().count() > max_width {
        let truncated: String = s.chars().take(max_width.saturating_sub(3)).collect();
        format!("{}...", truncated)
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_elapsed_time() {
        assert_eq!(format_time(f64::NAN), "0:00");
        assert_eq!(format_time(65.0), "1:05");
        assert_eq!(format_time(59.9), "0:59");
        assert_eq!(format_time(3600.0), "60:00");
        assert_eq!(format_time(f64::INFINITY), "0:00");
    }

    #[test]
    fn formats_remaining_time() {
        assert_eq!(format_remaining(f64::NAN, 90.0), "-0:00");
        assert_eq!(format_remaining(30.0, 90.0), "-1:00");
        assert_eq!(format_remaining(10.0, f64::NAN), "-0:00");
        assert_eq!(format_remaining(95.0, 90.0), "-0:00");
    }

    #[test]
    fn handle_strips_whitespace_and_lowercases() {
        assert_eq!(artist_handle("Nils Frahm"), "@nilsfrahm");
        assert_eq!(artist_handle("  The\tXX "), "@thexx");
        assert_eq!(artist_handle(""), "@artist");
    }

    #[test]
    fn truncates_long_titles() {
        assert_eq!(truncate_string("abcdefgh", 6), "abc...");
        assert_eq!(truncate_string("abc", 6), "abc");
    }
}
