//! Storage for base64-encoded image uploads.

use std::path::{Path, PathBuf};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::ImageFormat;

const INVALID_IMAGE: &str =
    "Upload a valid image. The file you uploaded was either not an image or a corrupted image.";

/// Subdirectory of the media root holding post images.
const POSTS_DIR: &str = "posts";

/// A decoded image ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub extension: &'static str,
    pub bytes: Vec<u8>,
}

impl DecodedImage {
    /// Accepts `data:image/<ext>;base64,<data>` or bare base64. The image type
    /// is taken from the file signature, not from the declared media type, and
    /// the whole image must decode.
    pub fn from_base64(payload: &str) -> Result<Self, &'static str> {
        let data = match payload.split_once(";base64,") {
            Some((header, data)) if header.starts_with("data:") => data,
            Some(_) => return Err(INVALID_IMAGE),
            None => payload,
        };
        let bytes = STANDARD.decode(data.trim()).map_err(|_| INVALID_IMAGE)?;
        let format = image::guess_format(&bytes).map_err(|_| INVALID_IMAGE)?;
        let extension = extension_for(format).ok_or(INVALID_IMAGE)?;
        if let Err(err) = image::load_from_memory_with_format(&bytes, format) {
            tracing::debug!(error = %err, "rejected undecodable image");
            return Err(INVALID_IMAGE);
        }
        Ok(Self { extension, bytes })
    }
}

fn extension_for(format: ImageFormat) -> Option<&'static str> {
    match format {
        ImageFormat::Png => Some("png"),
        ImageFormat::Jpeg => Some("jpg"),
        ImageFormat::Gif => Some("gif"),
        ImageFormat::WebP => Some("webp"),
        _ => None,
    }
}

#[derive(Debug, Clone)]
pub struct MediaStore {
    root: PathBuf,
    base_url: String,
}

impl MediaStore {
    pub fn new(root: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            base_url: base_url.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Writes a post image and returns its path relative to the media root.
    pub async fn save_post_image(&self, image: &DecodedImage) -> std::io::Result<String> {
        let name = format!("{}/{}.{}", POSTS_DIR, uuid::Uuid::new_v4(), image.extension);
        tokio::fs::create_dir_all(self.root.join(POSTS_DIR)).await?;
        tokio::fs::write(self.root.join(&name), &image.bytes).await?;
        tracing::debug!(path = %name, size = image.bytes.len(), "stored post image");
        Ok(name)
    }

    pub fn url(&self, relative: &str) -> String {
        format!("{}{}", self.base_url, relative)
    }
}
