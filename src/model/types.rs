//! UI-only state that does not affect playback

/// What the right-hand time label shows
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimeDisplay {
    Remaining,
    Total,
}

impl TimeDisplay {
    pub fn toggle(self) -> Self {
        match self {
            TimeDisplay::Remaining => TimeDisplay::Total,
            TimeDisplay::Total => TimeDisplay::Remaining,
        }
    }
}

#[derive(Clone, Debug)]
pub struct UiState {
    pub time_display: TimeDisplay,
    pub show_help_popup: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            time_display: TimeDisplay::Remaining,
            show_help_popup: false,
        }
    }
}
