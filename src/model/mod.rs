//! Model module - Application state and data types
//!
//! - `types`: UI-only state
//! - `playback`: Transport state and wraparound rules
//! - `metadata`: Track metadata, cover transition and stale-result guard
//! - `app_model`: Main application model combining the above

mod types;
mod playback;
mod metadata;
mod app_model;

pub use types::{TimeDisplay, UiState};

pub use playback::PlaybackState;

pub use metadata::{
    CoverArt, CoverTransition, Metadata, MetadataRequest, MetadataState, Thumbnail, UNKNOWN_ARTIST,
};

pub use app_model::AppModel;
