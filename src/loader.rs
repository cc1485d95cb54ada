use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::{DynamicImage, GenericImageView, ImageReader};

use crate::error::DecodeError;
use crate::models::Size;

/// Extensions offered by the file picker
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "webp", "tif", "tiff"];

/// A fully decoded image, ready to display and to hand to a detector
#[derive(Clone)]
pub struct LoadedImage {
    pub path: PathBuf,
    /// Encoded file contents, kept for widgets that decode on their own
    pub bytes: Arc<Vec<u8>>,
    pub image: Arc<DynamicImage>,
    pub natural: Size,
}

impl std::fmt::Debug for LoadedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedImage")
            .field("path", &self.path)
            .field("bytes", &self.bytes.len())
            .field("natural", &self.natural)
            .finish()
    }
}

/// Read and decode an image file.
///
/// Dimensions are only reported once decoding has finished, so callers
/// never see a size for a half-loaded image.
pub async fn load(path: impl AsRef<Path>) -> Result<LoadedImage, DecodeError> {
    let path = path.as_ref().to_path_buf();
    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|source| DecodeError::Read {
            path: path.clone(),
            source,
        })?;
    decode_owned(path, bytes).await
}

/// Decode an in-memory buffer with the same rules as [`load`]
pub async fn load_bytes(bytes: Vec<u8>) -> Result<LoadedImage, DecodeError> {
    decode_owned(PathBuf::from("<memory>"), bytes).await
}

async fn decode_owned(path: PathBuf, bytes: Vec<u8>) -> Result<LoadedImage, DecodeError> {
    let (path, bytes, image) = tokio::task::spawn_blocking(move || {
        let image = decode_bytes(&path, &bytes)?;
        Ok::<_, DecodeError>((path, bytes, image))
    })
    .await
    .map_err(|e| DecodeError::Worker(e.to_string()))??;

    let (width, height) = image.dimensions();
    log::debug!("decoded {} at {}x{}", path.display(), width, height);

    Ok(LoadedImage {
        path,
        bytes: Arc::new(bytes),
        image: Arc::new(image),
        natural: Size::new(width, height),
    })
}

/// Decode synchronously. The format is sniffed from content, not the extension.
pub fn decode_bytes(path: &Path, bytes: &[u8]) -> Result<DynamicImage, DecodeError> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|source| DecodeError::Read {
            path: path.to_path_buf(),
            source,
        })?;

    if reader.format().is_none() {
        return Err(DecodeError::Unsupported {
            path: path.to_path_buf(),
        });
    }

    let image = reader.decode().map_err(|source| DecodeError::Decode {
        path: path.to_path_buf(),
        source,
    })?;

    if image.width() == 0 || image.height() == 0 {
        return Err(DecodeError::Empty {
            path: path.to_path_buf(),
        });
    }

    Ok(image)
}
