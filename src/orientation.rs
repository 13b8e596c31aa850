use image::ImageReader;
use reqwest::Client;
use serde::Serialize;
use std::fmt;
use std::io::Cursor;
use std::time::Duration;

const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// Photos larger than this are not downloaded for probing.
pub const MAX_PHOTO_BYTES: usize = 8 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Landscape,
    Portrait,
    Square,
}

impl Orientation {
    /// Classifies by aspect ratio `width / height`; `None` for a zero height.
    pub fn classify(width: u32, height: u32) -> Option<Self> {
        if height == 0 {
            return None;
        }
        Some(match width.cmp(&height) {
            std::cmp::Ordering::Greater => Orientation::Landscape,
            std::cmp::Ordering::Less => Orientation::Portrait,
            std::cmp::Ordering::Equal => Orientation::Square,
        })
    }

    pub fn background_size(self) -> &'static str {
        match self {
            Orientation::Landscape => "cover",
            Orientation::Portrait | Orientation::Square => "contain",
        }
    }

    pub fn padding(self) -> &'static str {
        match self {
            Orientation::Portrait => "16px 9px",
            Orientation::Landscape | Orientation::Square => "8px",
        }
    }
}

#[derive(Debug)]
pub enum ProbeError {
    UnsupportedUrl(String),
    Fetch(reqwest::Error),
    Decode(image::ImageError),
    Io(std::io::Error),
    ZeroHeight,
    TooLarge,
}

impl fmt::Display for ProbeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeError::UnsupportedUrl(url) => write!(f, "not an http(s) photo url: '{url}'"),
            ProbeError::Fetch(err) => write!(f, "photo download failed: {err}"),
            ProbeError::Decode(err) => write!(f, "photo could not be decoded: {err}"),
            ProbeError::Io(err) => write!(f, "photo could not be read: {err}"),
            ProbeError::ZeroHeight => f.write_str("photo has zero height"),
            ProbeError::TooLarge => write!(f, "photo exceeds {MAX_PHOTO_BYTES} bytes"),
        }
    }
}

impl std::error::Error for ProbeError {}

pub fn is_probeable(url: &str) -> bool {
    let url = url.trim();
    url.starts_with("http://") || url.starts_with("https://")
}

/// Reads the pixel dimensions from encoded image bytes without decoding
/// the whole image.
pub fn dimensions(bytes: &[u8]) -> Result<(u32, u32), ProbeError> {
    ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(ProbeError::Io)?
        .into_dimensions()
        .map_err(ProbeError::Decode)
}

/// Appends `chunk` unless that would take `buf` past `limit` bytes.
fn append_capped(buf: &mut Vec<u8>, chunk: &[u8], limit: usize) -> Result<(), ProbeError> {
    if buf.len() + chunk.len() > limit {
        return Err(ProbeError::TooLarge);
    }
    buf.extend_from_slice(chunk);
    Ok(())
}

pub async fn probe_photo(client: &Client, url: &str) -> Result<Orientation, ProbeError> {
    if !is_probeable(url) {
        return Err(ProbeError::UnsupportedUrl(url.to_string()));
    }
    let mut response = client
        .get(url.trim())
        .timeout(PROBE_TIMEOUT)
        .send()
        .await
        .and_then(|response| response.error_for_status())
        .map_err(ProbeError::Fetch)?;
    if response
        .content_length()
        .is_some_and(|len| len > MAX_PHOTO_BYTES as u64)
    {
        return Err(ProbeError::TooLarge);
    }

    let mut bytes = Vec::new();
    while let Some(chunk) = response.chunk().await.map_err(ProbeError::Fetch)? {
        append_capped(&mut bytes, &chunk, MAX_PHOTO_BYTES)?;
    }
    let (width, height) = dimensions(&bytes)?;
    Orientation::classify(width, height).ok_or(ProbeError::ZeroHeight)
}
