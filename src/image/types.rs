//! Core types passed into and out of the transform adapter.

use crate::error::{RestyleError, Result};
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Image formats accepted as input and returned by the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    /// PNG format (lossless).
    Png,
    /// JPEG format (lossy).
    Jpeg,
    /// WebP format.
    WebP,
    /// HEIC (HEVC-coded HEIF), common for phone photos.
    Heic,
    /// Generic HEIF container.
    Heif,
}

impl ImageFormat {
    /// Returns the file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::WebP => "webp",
            Self::Heic => "heic",
            Self::Heif => "heif",
        }
    }

    /// Returns the MIME type for this format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::WebP => "image/webp",
            Self::Heic => "image/heic",
            Self::Heif => "image/heif",
        }
    }

    /// Looks up a format by MIME type.
    pub fn from_mime_type(mime: &str) -> Option<Self> {
        match mime.trim().to_lowercase().as_str() {
            "image/png" => Some(Self::Png),
            "image/jpeg" | "image/jpg" => Some(Self::Jpeg),
            "image/webp" => Some(Self::WebP),
            "image/heic" => Some(Self::Heic),
            "image/heif" => Some(Self::Heif),
            _ => None,
        }
    }

    /// Attempts to detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "webp" => Some(Self::WebP),
            "heic" => Some(Self::Heic),
            "heif" => Some(Self::Heif),
            _ => None,
        }
    }

    /// Detects image format from magic bytes.
    pub fn from_magic_bytes(data: &[u8]) -> Option<Self> {
        if data.len() < 12 {
            return None;
        }

        // PNG: 89 50 4E 47 0D 0A 1A 0A
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
            return Some(Self::Png);
        }

        // JPEG: FF D8 FF
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(Self::Jpeg);
        }

        // WebP: RIFF....WEBP
        if data.starts_with(b"RIFF") && &data[8..12] == b"WEBP" {
            return Some(Self::WebP);
        }

        // ISO-BMFF: ....ftyp<brand>
        if &data[4..8] == b"ftyp" {
            return match &data[8..12] {
                b"heic" | b"heix" | b"hevc" | b"hevx" => Some(Self::Heic),
                b"mif1" | b"msf1" | b"heif" => Some(Self::Heif),
                _ => None,
            };
        }

        None
    }
}

impl std::fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.mime_type())
    }
}

/// An input image ready for transport: base64 text plus its declared media type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    data: String,
    mime_type: String,
}

impl ImagePayload {
    /// Wraps already-encoded base64 data.
    ///
    /// Fails if the data is empty or not valid base64.
    pub fn new(data: impl Into<String>, mime_type: impl Into<String>) -> Result<Self> {
        let data: String = data.into();
        let mime_type: String = mime_type.into();

        let cleaned: String = data.chars().filter(|c| !c.is_ascii_whitespace()).collect();
        if cleaned.is_empty() {
            return Err(RestyleError::InvalidRequest("image data is empty".into()));
        }
        if mime_type.trim().is_empty() {
            return Err(RestyleError::InvalidRequest("image media type is empty".into()));
        }
        base64::engine::general_purpose::STANDARD
            .decode(&cleaned)
            .map_err(|e| RestyleError::Decode(e.to_string()))?;

        Ok(Self {
            data: cleaned,
            mime_type,
        })
    }

    /// Encodes raw image bytes with the given format.
    pub fn from_bytes(bytes: &[u8], format: ImageFormat) -> Result<Self> {
        if bytes.is_empty() {
            return Err(RestyleError::InvalidRequest("image data is empty".into()));
        }
        Ok(Self {
            data: base64::engine::general_purpose::STANDARD.encode(bytes),
            mime_type: format.mime_type().to_string(),
        })
    }

    /// Encodes raw image bytes, detecting the format from magic bytes.
    pub fn from_bytes_detect(bytes: &[u8]) -> Result<Self> {
        if bytes.is_empty() {
            return Err(RestyleError::InvalidRequest("image data is empty".into()));
        }
        let format = ImageFormat::from_magic_bytes(bytes).ok_or_else(|| {
            RestyleError::InvalidRequest("unrecognized image format".into())
        })?;
        Self::from_bytes(bytes, format)
    }

    /// Reads an image file. The format comes from its contents, or from the
    /// extension when the contents are not recognized.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let format = ImageFormat::from_magic_bytes(&bytes)
            .or_else(|| {
                path.extension()
                    .and_then(|e| e.to_str())
                    .and_then(ImageFormat::from_extension)
            })
            .ok_or_else(|| {
                RestyleError::InvalidRequest(format!(
                    "unrecognized image format: {}",
                    path.display()
                ))
            })?;
        Self::from_bytes(&bytes, format)
    }

    /// Parses a `data:<media type>;base64,<data>` URI, as produced by a
    /// browser file reader.
    pub fn from_data_uri(uri: &str) -> Result<Self> {
        let (mime_type, data) = split_data_uri(uri)?;
        Self::new(data, mime_type)
    }

    /// Returns the base64-encoded image data.
    pub fn data(&self) -> &str {
        &self.data
    }

    /// Returns the declared media type.
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Returns the format matching the declared media type, if known.
    pub fn format(&self) -> Option<ImageFormat> {
        ImageFormat::from_mime_type(&self.mime_type)
    }
}

/// An image extracted from a model response.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "transformed image should be saved or displayed"]
pub struct TransformedImage {
    mime_type: String,
    data: String,
}

impl TransformedImage {
    /// Creates a result from a media type and base64 data, as returned inline by the model.
    pub fn new(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }

    /// Returns the media type declared by the model.
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Returns the base64-encoded image data.
    pub fn data(&self) -> &str {
        &self.data
    }

    /// Returns the format matching the media type, if known.
    pub fn format(&self) -> Option<ImageFormat> {
        ImageFormat::from_mime_type(&self.mime_type)
    }

    /// Returns the image as `data:<media type>;base64,<data>`.
    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }

    /// Decodes the image data to raw bytes.
    pub fn decode(&self) -> Result<Vec<u8>> {
        base64::engine::general_purpose::STANDARD
            .decode(&self.data)
            .map_err(|e| RestyleError::Decode(e.to_string()))
    }

    /// Decodes and saves the image to the specified path.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, self.decode()?)?;
        Ok(())
    }
}

impl std::fmt::Display for TransformedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "data:{};base64,{}", self.mime_type, self.data)
    }
}

fn split_data_uri(uri: &str) -> Result<(&str, &str)> {
    let rest = uri
        .trim()
        .strip_prefix("data:")
        .ok_or_else(|| RestyleError::InvalidRequest("not a data URI".into()))?;
    let (header, data) = rest
        .split_once(',')
        .ok_or_else(|| RestyleError::InvalidRequest("data URI has no payload".into()))?;
    let params = header.strip_suffix(";base64").ok_or_else(|| {
        RestyleError::InvalidRequest("data URI is not base64-encoded".into())
    })?;
    // Drop parameters such as `;name=photo.png`
    let mime_type = params.split(';').next().unwrap_or_default();
    Ok((mime_type, data))
}
