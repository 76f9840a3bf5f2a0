//! Track metadata and the cover transition it drives

use std::sync::Arc;
use std::time::Instant;

pub const UNKNOWN_ARTIST: &str = "Unknown Artist";

/// Small decoded RGB grid of a cover image
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Thumbnail {
    width: u32,
    height: u32,
    pixels: Vec<[u8; 3]>,
}

impl Thumbnail {
    pub fn new(width: u32, height: u32, pixels: Vec<[u8; 3]>) -> Option<Self> {
        if width == 0 || height == 0 || pixels.len() != (width * height) as usize {
            return None;
        }
        Some(Self { width, height, pixels })
    }

    /// Nearest pixel for normalized coordinates in [0, 1).
    pub fn sample(&self, u: f32, v: f32) -> [u8; 3] {
        let x = ((u.clamp(0.0, 1.0) * self.width as f32) as u32).min(self.width - 1);
        let y = ((v.clamp(0.0, 1.0) * self.height as f32) as u32).min(self.height - 1);
        self.pixels[(y * self.width + x) as usize]
    }

    pub fn average(&self) -> [u8; 3] {
        let mut sum = [0u64; 3];
        for pixel in &self.pixels {
            for (acc, channel) in sum.iter_mut().zip(pixel) {
                *acc += *channel as u64;
            }
        }
        let count = self.pixels.len() as u64;
        sum.map(|channel| (channel / count) as u8)
    }
}

/// An embedded cover, identified by its data URI
#[derive(Clone, Debug)]
pub struct CoverArt {
    pub reference: Arc<str>,
    pub thumbnail: Option<Arc<Thumbnail>>,
}

impl PartialEq for CoverArt {
    fn eq(&self, other: &Self) -> bool {
        self.reference == other.reference
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Metadata {
    pub artist: String,
    pub cover: Option<CoverArt>,
}

impl Metadata {
    pub fn fallback() -> Self {
        Self {
            artist: UNKNOWN_ARTIST.to_string(),
            cover: None,
        }
    }
}

/// Two-slot cover state: the outgoing cover stays until the next switch
#[derive(Clone, Debug, Default)]
pub struct CoverTransition {
    previous: Option<CoverArt>,
    current: Option<CoverArt>,
    entered_at: Option<Instant>,
}

impl CoverTransition {
    /// Called when the selection moves; the current cover becomes the backdrop.
    pub fn begin_switch(&mut self) {
        if let Some(current) = &self.current {
            self.previous = Some(current.clone());
        }
    }

    pub fn resolve(&mut self, cover: Option<CoverArt>, now: Instant) {
        let changed = self.current.as_ref().map(|c| &c.reference) != cover.as_ref().map(|c| &c.reference);
        self.current = cover;
        if changed {
            self.entered_at = Some(now);
        }
    }

    pub fn previous(&self) -> Option<&CoverArt> {
        self.previous.as_ref()
    }

    pub fn current(&self) -> Option<&CoverArt> {
        self.current.as_ref()
    }

    /// When the current layer's key last changed
    pub fn entered_at(&self) -> Option<Instant> {
        self.entered_at
    }
}

/// Identifies one metadata fetch
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MetadataRequest {
    pub id: u64,
    pub track_index: usize,
}

#[derive(Clone, Debug, Default)]
pub struct MetadataState {
    latest: Option<MetadataRequest>,
    loading: bool,
    resolved: Option<Metadata>,
    covers: CoverTransition,
}

impl MetadataState {
    pub fn begin(&mut self, track_index: usize) -> MetadataRequest {
        let id = self.latest.map(|r| r.id + 1).unwrap_or(0);
        let request = MetadataRequest { id, track_index };
        self.latest = Some(request);
        self.loading = true;
        self.covers.begin_switch();
        request
    }

    /// Applies `metadata` if `request` is still the one for `current_index`.
    pub fn resolve(
        &mut self,
        request: MetadataRequest,
        current_index: usize,
        metadata: Metadata,
        now: Instant,
    ) -> bool {
        if self.latest != Some(request) || request.track_index != current_index {
            tracing::debug!(
                request_id = request.id,
                request_track = request.track_index,
                current_index,
                "Discarding stale metadata"
            );
            return false;
        }

        self.covers.resolve(metadata.cover.clone(), now);
        self.resolved = Some(metadata);
        self.loading = false;
        true
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Last applied metadata; kept while the next one is loading.
    pub fn resolved(&self) -> Option<&Metadata> {
        self.resolved.as_ref()
    }

    pub fn covers(&self) -> &CoverTransition {
        &self.covers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn cover(reference: &str) -> CoverArt {
        CoverArt {
            reference: Arc::from(reference),
            thumbnail: None,
        }
    }

    fn metadata(artist: &str, reference: Option<&str>) -> Metadata {
        Metadata {
            artist: artist.to_string(),
            cover: reference.map(cover),
        }
    }

    #[test]
    fn thumbnail_rejects_mismatched_buffer() {
        assert!(Thumbnail::new(2, 2, vec![[0, 0, 0]; 3]).is_none());
        assert!(Thumbnail::new(0, 1, vec![]).is_none());
    }

    #[test]
    fn thumbnail_sample_and_average() {
        let thumb = Thumbnail::new(2, 1, vec![[0, 0, 0], [200, 100, 50]]).unwrap();
        assert_eq!(thumb.sample(0.0, 0.0), [0, 0, 0]);
        assert_eq!(thumb.sample(0.99, 0.5), [200, 100, 50]);
        assert_eq!(thumb.sample(1.0, 1.0), [200, 100, 50]);
        assert_eq!(thumb.average(), [100, 50, 25]);
    }

    #[test]
    fn previous_cover_is_captured_on_switch_and_retained() {
        let now = Instant::now();
        let mut state = MetadataState::default();

        let first = state.begin(0);
        assert!(state.resolve(first, 0, metadata("A", Some("data:a")), now));
        assert!(state.covers().previous().is_none());

        let second = state.begin(1);
        assert_eq!(state.covers().previous(), Some(&cover("data:a")));
        // old cover stays current until the new one lands
        assert_eq!(state.covers().current(), Some(&cover("data:a")));

        assert!(state.resolve(second, 1, metadata("B", None), now));
        assert!(state.covers().current().is_none());

        // no current cover: previous is left alone
        let third = state.begin(2);
        assert_eq!(state.covers().previous(), Some(&cover("data:a")));
        assert!(state.resolve(third, 2, metadata("C", Some("data:c")), now));
        assert_eq!(state.covers().previous(), Some(&cover("data:a")));
    }

    #[test]
    fn stale_results_are_discarded() {
        let now = Instant::now();
        let mut state = MetadataState::default();

        let for_a = state.begin(0);
        let for_b = state.begin(1);

        assert!(!state.resolve(for_a, 1, metadata("A", None), now));
        assert!(state.is_loading());
        assert!(state.resolve(for_b, 1, metadata("B", None), now));
        assert_eq!(state.resolved().map(|m| m.artist.as_str()), Some("B"));
        assert!(!state.is_loading());
    }

    #[test]
    fn result_for_moved_selection_is_discarded() {
        let now = Instant::now();
        let mut state = MetadataState::default();
        let request = state.begin(0);
        assert!(!state.resolve(request, 2, metadata("A", None), now));
    }

    #[test]
    fn enter_transition_restarts_only_on_key_change() {
        let start = Instant::now();
        let later = start + Duration::from_millis(900);
        let mut covers = CoverTransition::default();

        covers.resolve(Some(cover("data:x")), start);
        assert_eq!(covers.entered_at(), Some(start));

        covers.begin_switch();
        covers.resolve(Some(cover("data:x")), later);
        assert_eq!(covers.entered_at(), Some(start));

        covers.resolve(None, later);
        assert_eq!(covers.entered_at(), Some(later));
    }
}
