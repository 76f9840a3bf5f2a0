//! Metadata loading: artist name and embedded cover art from audio tags
//!
//! Loading never fails from the caller's point of view. Any problem along the
//! way (no tag reader, unreadable file, unparsable tags) resolves to
//! [`Metadata::fallback`].

use std::io::Cursor;
use std::path::PathBuf;
use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use image::imageops::FilterType;
use lofty::file::TaggedFileExt;
use lofty::picture::PictureType;
use lofty::probe::Probe;
use lofty::tag::Accessor;
use thiserror::Error;

use crate::catalog::Track;
use crate::model::{CoverArt, Metadata, Thumbnail, UNKNOWN_ARTIST};

const THUMBNAIL_SIZE: u32 = 32;
const DEFAULT_PICTURE_MIME: &str = "image/jpeg";

#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("tag reader unavailable")]
    Unavailable,
    #[error("failed to read {path}: {source}")]
    Fetch {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse tags: {0}")]
    Parse(String),
}

/// Embedded picture as found in the tag
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawPicture {
    pub data: Vec<u8>,
    pub format: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawTags {
    pub artist: Option<String>,
    pub picture: Option<RawPicture>,
}

/// Reads tag data out of a complete audio file
pub trait TagReader: Send + Sync {
    fn read(&self, bytes: &[u8]) -> Result<RawTags, MetadataError>;
}

/// Tag reader backed by lofty (ID3v2/ID3v1, Vorbis comments, MP4, ...)
pub struct LoftyTagReader;

impl TagReader for LoftyTagReader {
    fn read(&self, bytes: &[u8]) -> Result<RawTags, MetadataError> {
        let tagged_file = Probe::new(Cursor::new(bytes))
            .guess_file_type()
            .map_err(|e| MetadataError::Parse(e.to_string()))?
            .read()
            .map_err(|e| MetadataError::Parse(e.to_string()))?;

        let Some(tag) = tagged_file.primary_tag().or_else(|| tagged_file.first_tag()) else {
            tracing::debug!("No tags found in audio file");
            return Ok(RawTags::default());
        };

        let picture = tag
            .get_picture_type(PictureType::CoverFront)
            .or_else(|| tag.pictures().first())
            .map(|picture| RawPicture {
                data: picture.data().to_vec(),
                format: picture
                    .mime_type()
                    .map(|mime| mime.as_str().to_string())
                    .unwrap_or_else(|| DEFAULT_PICTURE_MIME.to_string()),
            });

        Ok(RawTags {
            artist: tag.artist().map(|artist| artist.to_string()),
            picture,
        })
    }
}

#[derive(Clone)]
pub struct MetadataLoader {
    reader: Option<Arc<dyn TagReader>>,
}

impl MetadataLoader {
    pub fn new(reader: Arc<dyn TagReader>) -> Self {
        Self { reader: Some(reader) }
    }

    /// Loader without tag support; every load resolves to the fallback.
    #[cfg(test)]
    pub fn unavailable() -> Self {
        Self { reader: None }
    }

    pub async fn load(&self, track: &Track) -> Metadata {
        match self.try_load(track).await {
            Ok(metadata) => {
                tracing::debug!(
                    track = %track.title,
                    artist = %metadata.artist,
                    has_cover = metadata.cover.is_some(),
                    "Metadata loaded"
                );
                metadata
            }
            Err(MetadataError::Unavailable) => {
                tracing::debug!(track = %track.title, "Tag reader unavailable, using defaults");
                Metadata::fallback()
            }
            Err(e) => {
                tracing::warn!(track = %track.title, error = %e, "Metadata extraction failed");
                Metadata::fallback()
            }
        }
    }

    async fn try_load(&self, track: &Track) -> Result<Metadata, MetadataError> {
        let reader = self.reader.clone().ok_or(MetadataError::Unavailable)?;

        let bytes = tokio::fs::read(&track.source)
            .await
            .map_err(|source| MetadataError::Fetch {
                path: track.source.clone(),
                source,
            })?;

        tokio::task::spawn_blocking(move || reader.read(&bytes).map(metadata_from_tags))
            .await
            .map_err(|e| MetadataError::Parse(e.to_string()))?
    }
}

pub fn metadata_from_tags(tags: RawTags) -> Metadata {
    let artist = tags
        .artist
        .filter(|artist| !artist.is_empty())
        .unwrap_or_else(|| UNKNOWN_ARTIST.to_string());

    Metadata {
        artist,
        cover: tags.picture.map(cover_from_picture),
    }
}

pub fn cover_from_picture(picture: RawPicture) -> CoverArt {
    let reference = format!("data:{};base64,{}", picture.format, STANDARD.encode(&picture.data));
    let thumbnail = decode_thumbnail(&picture.data).map(Arc::new);

    CoverArt {
        reference: Arc::from(reference),
        thumbnail,
    }
}

fn decode_thumbnail(data: &[u8]) -> Option<Thumbnail> {
    let image = match image::load_from_memory(data) {
        Ok(image) => image,
        Err(e) => {
            tracing::debug!(error = %e, "Cover image could not be decoded");
            return None;
        }
    };

    let rgb = image
        .resize_exact(THUMBNAIL_SIZE, THUMBNAIL_SIZE, FilterType::Triangle)
        .to_rgb8();
    let pixels = rgb.pixels().map(|pixel| pixel.0).collect();

    Thumbnail::new(rgb.width(), rgb.height(), pixels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb, RgbImage};
    use std::fs;

    struct FixedReader(Result<RawTags, String>);

    impl TagReader for FixedReader {
        fn read(&self, _bytes: &[u8]) -> Result<RawTags, MetadataError> {
            self.0.clone().map_err(MetadataError::Parse)
        }
    }

    fn png_bytes() -> Vec<u8> {
        let image = RgbImage::from_pixel(4, 4, Rgb([200, 40, 10]));
        let mut bytes = Cursor::new(Vec::new());
        image.write_to(&mut bytes, ImageFormat::Png).unwrap();
        bytes.into_inner()
    }

    fn track_file() -> (tempfile::TempDir, Track) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Song.mp3");
        fs::write(&path, b"not really audio").unwrap();
        (dir, Track::from_path(path))
    }

    #[test]
    fn missing_or_empty_artist_falls_back() {
        assert_eq!(metadata_from_tags(RawTags::default()).artist, UNKNOWN_ARTIST);

        let tags = RawTags {
            artist: Some(String::new()),
            picture: None,
        };
        assert_eq!(metadata_from_tags(tags).artist, UNKNOWN_ARTIST);
    }

    #[test]
    fn picture_becomes_data_uri_with_thumbnail() {
        let data = png_bytes();
        let cover = cover_from_picture(RawPicture {
            data: data.clone(),
            format: "image/png".to_string(),
        });

        let expected = format!("data:image/png;base64,{}", STANDARD.encode(&data));
        assert_eq!(&*cover.reference, expected.as_str());

        let thumbnail = cover.thumbnail.expect("png should decode");
        let [r, g, b] = thumbnail.average();
        assert!(r.abs_diff(200) <= 2 && g.abs_diff(40) <= 2 && b.abs_diff(10) <= 2);
    }

    #[test]
    fn undecodable_picture_keeps_reference() {
        let cover = cover_from_picture(RawPicture {
            data: vec![1, 2, 3],
            format: "image/jpeg".to_string(),
        });
        assert_eq!(&*cover.reference, "data:image/jpeg;base64,AQID");
        assert!(cover.thumbnail.is_none());
    }

    #[test]
    fn lofty_rejects_garbage() {
        assert!(LoftyTagReader.read(b"definitely not an audio file").is_err());
    }

    /// One second of 8 kHz mono 16-bit silence
    fn silent_wav() -> Vec<u8> {
        let data_len: u32 = 16_000;
        let mut wav = Vec::new();
        wav.extend_from_slice(b"RIFF");
        wav.extend_from_slice(&(36 + data_len).to_le_bytes());
        wav.extend_from_slice(b"WAVEfmt ");
        wav.extend_from_slice(&16u32.to_le_bytes());
        wav.extend_from_slice(&1u16.to_le_bytes()); // PCM
        wav.extend_from_slice(&1u16.to_le_bytes());
        wav.extend_from_slice(&8_000u32.to_le_bytes());
        wav.extend_from_slice(&16_000u32.to_le_bytes());
        wav.extend_from_slice(&2u16.to_le_bytes());
        wav.extend_from_slice(&16u16.to_le_bytes());
        wav.extend_from_slice(b"data");
        wav.extend_from_slice(&data_len.to_le_bytes());
        wav.resize(wav.len() + data_len as usize, 0);
        wav
    }

    #[test]
    fn lofty_reads_artist_and_front_cover() {
        use lofty::config::WriteOptions;
        use lofty::picture::{MimeType, Picture};
        use lofty::tag::{Tag, TagExt, TagType};

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Says.wav");
        fs::write(&path, silent_wav()).unwrap();

        let front = png_bytes();
        let mut tag = Tag::new(TagType::Id3v2);
        tag.set_artist("Nils Frahm".to_string());
        tag.push_picture(Picture::new_unchecked(
            PictureType::Artist,
            Some(MimeType::Jpeg),
            None,
            vec![1, 2, 3],
        ));
        tag.push_picture(Picture::new_unchecked(
            PictureType::CoverFront,
            Some(MimeType::Png),
            None,
            front.clone(),
        ));
        tag.save_to_path(&path, WriteOptions::default()).unwrap();

        let tags = LoftyTagReader.read(&fs::read(&path).unwrap()).unwrap();
        assert_eq!(tags.artist.as_deref(), Some("Nils Frahm"));
        assert_eq!(
            tags.picture,
            Some(RawPicture {
                data: front,
                format: "image/png".to_string(),
            })
        );
    }

    #[test]
    fn lofty_untagged_file_has_no_tags() {
        let tags = LoftyTagReader.read(&silent_wav()).unwrap();
        assert_eq!(tags, RawTags::default());
    }

    #[tokio::test]
    async fn load_uses_reader_result() {
        let (_dir, track) = track_file();
        let loader = MetadataLoader::new(Arc::new(FixedReader(Ok(RawTags {
            artist: Some("Nils Frahm".to_string()),
            picture: None,
        }))));

        let metadata = loader.load(&track).await;
        assert_eq!(metadata.artist, "Nils Frahm");
        assert!(metadata.cover.is_none());
    }

    #[tokio::test]
    async fn parse_failure_resolves_to_fallback() {
        let (_dir, track) = track_file();
        let loader = MetadataLoader::new(Arc::new(FixedReader(Err("bad frame".to_string()))));
        assert_eq!(loader.load(&track).await, Metadata::fallback());
    }

    #[tokio::test]
    async fn fetch_failure_resolves_to_fallback() {
        let loader = MetadataLoader::new(Arc::new(LoftyTagReader));
        let track = Track::from_path("/nonexistent/dir/Song.mp3");
        assert_eq!(loader.load(&track).await, Metadata::fallback());
    }

    #[tokio::test]
    async fn unavailable_reader_resolves_to_fallback() {
        let (_dir, track) = track_file();
        let loader = MetadataLoader::unavailable();
        assert_eq!(loader.load(&track).await, Metadata::fallback());
    }
}
