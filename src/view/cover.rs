//! Cover art crossfade and the artist pill
//!
//! The cover panel is three layers painted bottom to top: a default gradient,
//! the previous cover (static), and the current cover fading in. Which layers
//! exist and how opaque they are is a pure function of the cover transition
//! and the current instant.

use std::time::{Duration, Instant};

use ratatui::{
    buffer::Buffer,
    layout::{Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
    Frame,
};

use crate::model::{CoverArt, CoverTransition, MetadataState, Thumbnail, UNKNOWN_ARTIST};
use super::utils::{artist_handle, rgb};

pub const CROSSFADE_DURATION: Duration = Duration::from_millis(600);

const GRADIENT_FROM: [u8; 3] = [0x44, 0x44, 0x44];
const GRADIENT_TO: [u8; 3] = [0x22, 0x22, 0x22];

#[derive(Clone, Copy, Debug)]
pub struct CurrentLayer<'a> {
    pub cover: &'a CoverArt,
    pub opacity: f32,
}

/// Layers above the always-present gradient
#[derive(Clone, Copy, Debug, Default)]
pub struct CoverLayers<'a> {
    pub previous: Option<&'a CoverArt>,
    /// `None` renders as an empty (transparent) layer
    pub current: Option<CurrentLayer<'a>>,
}

pub fn cover_layers(covers: &CoverTransition, now: Instant) -> CoverLayers<'_> {
    let opacity = covers
        .entered_at()
        .map(|entered| {
            now.saturating_duration_since(entered).as_secs_f32() / CROSSFADE_DURATION.as_secs_f32()
        })
        .unwrap_or(1.0)
        .clamp(0.0, 1.0);

    CoverLayers {
        previous: covers.previous(),
        current: covers.current().map(|cover| CurrentLayer { cover, opacity }),
    }
}

impl CoverLayers<'_> {
    /// Composited color at normalized coordinates.
    pub fn pixel(&self, u: f32, v: f32) -> [u8; 3] {
        let mut color = gradient(u, v);

        if let Some(previous) = self.previous.and_then(thumbnail) {
            color = previous.sample(u, v);
        }

        if let Some(current) = self.current {
            if let Some(thumb) = thumbnail(current.cover) {
                color = blend(color, thumb.sample(u, v), current.opacity);
            }
        }

        color
    }

    pub fn is_transitioning(&self) -> bool {
        self.current.is_some_and(|layer| layer.opacity < 1.0)
    }
}

/// Half-block canvas: every cell shows two vertically stacked pixels.
pub struct CoverCanvas<'a> {
    layers: CoverLayers<'a>,
}

impl<'a> CoverCanvas<'a> {
    pub fn new(layers: CoverLayers<'a>) -> Self {
        Self { layers }
    }
}

impl Widget for CoverCanvas<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.is_empty() {
            return;
        }
        let width = area.width as f32;
        let rows = (area.height * 2) as f32;

        for y in 0..area.height {
            for x in 0..area.width {
                let u = (x as f32 + 0.5) / width;
                let top = self.layers.pixel(u, (2 * y) as f32 / rows);
                let bottom = self.layers.pixel(u, (2 * y + 1) as f32 / rows);

                if let Some(cell) = buf.cell_mut(Position::new(area.x + x, area.y + y)) {
                    cell.set_char('▀').set_fg(rgb(top)).set_bg(rgb(bottom));
                }
            }
        }
    }
}

pub fn render_cover(frame: &mut Frame, area: Rect, covers: &CoverTransition, now: Instant) {
    let block = Block::default().borders(Borders::ALL).title(" Cover ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    frame.render_widget(CoverCanvas::new(cover_layers(covers, now)), square(inner));
}

/// Largest centered rect that renders as a square with half-block pixels.
fn square(area: Rect) -> Rect {
    let width = area.width.min(area.height.saturating_mul(2));
    let height = width / 2;
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArtistPill {
    pub name: String,
    pub handle: String,
    pub avatar: [u8; 3],
}

pub fn artist_pill(metadata: &MetadataState) -> ArtistPill {
    if metadata.is_loading() {
        return ArtistPill {
            name: "Loading...".to_string(),
            handle: "@...".to_string(),
            avatar: gradient(0.5, 0.5),
        };
    }

    let resolved = metadata.resolved();
    let name = resolved
        .map(|m| m.artist.clone())
        .unwrap_or_else(|| UNKNOWN_ARTIST.to_string());
    let avatar = resolved
        .and_then(|m| m.cover.as_ref())
        .and_then(thumbnail)
        .map(Thumbnail::average)
        .unwrap_or_else(|| gradient(0.5, 0.5));

    ArtistPill {
        handle: artist_handle(&name),
        name,
        avatar,
    }
}

pub fn render_artist_pill(frame: &mut Frame, area: Rect, metadata: &MetadataState, track_title: &str) {
    let pill = artist_pill(metadata);

    let line = Line::from(vec![
        Span::styled("██", Style::default().fg(rgb(pill.avatar))),
        Span::raw(" "),
        Span::styled(pill.name, Style::default().fg(Color::White).add_modifier(Modifier::BOLD)),
        Span::raw("  "),
        Span::styled(pill.handle, Style::default().fg(Color::DarkGray)),
    ]);

    let widget = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", track_title)),
    );
    frame.render_widget(widget, area);
}

fn thumbnail(cover: &CoverArt) -> Option<&Thumbnail> {
    cover.thumbnail.as_deref()
}

/// 135° linear gradient from the top-left corner.
fn gradient(u: f32, v: f32) -> [u8; 3] {
    blend(GRADIENT_FROM, GRADIENT_TO, ((u + v) / 2.0).clamp(0.0, 1.0))
}

fn blend(from: [u8; 3], to: [u8; 3], t: f32) -> [u8; 3] {
    let t = t.clamp(0.0, 1.0);
    std::array::from_fn(|i| (from[i] as f32 + (to[i] as f32 - from[i] as f32) * t).round() as u8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Metadata, MetadataState};
    use std::sync::Arc;

    fn solid_cover(reference: &str, color: [u8; 3]) -> CoverArt {
        CoverArt {
            reference: Arc::from(reference),
            thumbnail: Thumbnail::new(1, 1, vec![color]).map(Arc::new),
        }
    }

    fn with_cover(cover: Option<CoverArt>) -> Metadata {
        Metadata {
            artist: "Nils Frahm".to_string(),
            cover,
        }
    }

    #[test]
    fn blend_interpolates_each_channel() {
        assert_eq!(blend([0, 100, 200], [200, 100, 0], 0.0), [0, 100, 200]);
        assert_eq!(blend([0, 100, 200], [200, 100, 0], 0.5), [100, 100, 100]);
        assert_eq!(blend([0, 100, 200], [200, 100, 0], 2.0), [200, 100, 0]);
    }

    #[test]
    fn gradient_is_the_only_layer_without_covers() {
        let covers = CoverTransition::default();
        let layers = cover_layers(&covers, Instant::now());
        assert!(layers.previous.is_none());
        assert!(layers.current.is_none());
        assert_eq!(layers.pixel(0.0, 0.0), GRADIENT_FROM);
        assert_eq!(layers.pixel(1.0, 1.0), GRADIENT_TO);
    }

    #[test]
    fn new_cover_fades_in_over_previous() {
        let t0 = Instant::now();
        let mut state = MetadataState::default();

        let first = state.begin(0);
        state.resolve(first, 0, with_cover(Some(solid_cover("data:red", [200, 0, 0]))), t0);
        let second = state.begin(1);
        state.resolve(second, 1, with_cover(Some(solid_cover("data:blue", [0, 0, 200]))), t0);

        let start = cover_layers(state.covers(), t0);
        assert_eq!(start.pixel(0.5, 0.5), [200, 0, 0]);
        assert!(start.is_transitioning());

        let halfway = cover_layers(state.covers(), t0 + CROSSFADE_DURATION / 2);
        assert_eq!(halfway.pixel(0.5, 0.5), [100, 0, 100]);

        let done = cover_layers(state.covers(), t0 + CROSSFADE_DURATION * 2);
        assert_eq!(done.pixel(0.5, 0.5), [0, 0, 200]);
        assert!(!done.is_transitioning());
    }

    #[test]
    fn missing_new_cover_leaves_previous_visible() {
        let t0 = Instant::now();
        let mut state = MetadataState::default();

        let first = state.begin(0);
        state.resolve(first, 0, with_cover(Some(solid_cover("data:red", [200, 0, 0]))), t0);
        let second = state.begin(1);
        state.resolve(second, 1, with_cover(None), t0);

        let layers = cover_layers(state.covers(), t0 + CROSSFADE_DURATION);
        assert!(layers.current.is_none());
        assert_eq!(layers.pixel(0.3, 0.3), [200, 0, 0]);
    }

    #[test]
    fn pill_shows_loading_then_artist() {
        let mut state = MetadataState::default();
        let request = state.begin(0);
        let pill = artist_pill(&state);
        assert_eq!(pill.name, "Loading...");
        assert_eq!(pill.handle, "@...");

        state.resolve(request, 0, with_cover(Some(solid_cover("data:x", [10, 20, 30]))), Instant::now());
        let pill = artist_pill(&state);
        assert_eq!(pill.name, "Nils Frahm");
        assert_eq!(pill.handle, "@nilsfrahm");
        assert_eq!(pill.avatar, [10, 20, 30]);
    }

    #[test]
    fn canvas_paints_half_blocks() {
        let covers = CoverTransition::default();
        let area = Rect::new(0, 0, 4, 2);
        let mut buf = Buffer::empty(area);
        CoverCanvas::new(cover_layers(&covers, Instant::now())).render(area, &mut buf);

        let cell = buf.cell(Position::new(0, 0)).unwrap();
        assert_eq!(cell.symbol(), "▀");
    }

    #[test]
    fn square_fits_inside_area() {
        let rect = square(Rect::new(0, 0, 40, 10));
        assert_eq!((rect.width, rect.height), (20, 10));
        assert_eq!(rect.x, 10);
    }
}
