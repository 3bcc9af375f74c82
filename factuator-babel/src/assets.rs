//! Files referenced from pages (images and attachments).
//!
//! The destination fetches inline images by URI, so an asset has to be
//! published somewhere reachable before the image can be inserted. How that
//! happens is up to the [`AssetSource`] implementation.

use crate::common::links::prefixed_url;
use crate::error::ConvertError;
use std::path::{Path, PathBuf};

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "svg", "webp", "bmp", "tif", "tiff"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Image,
    Other,
}

impl AssetKind {
    pub fn from_extension(extension: &str) -> Self {
        if IMAGE_EXTENSIONS.contains(&extension.to_ascii_lowercase().as_str()) {
            AssetKind::Image
        } else {
            AssetKind::Other
        }
    }

    pub fn from_file_name(file_name: &str) -> Self {
        Path::new(file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map_or(AssetKind::Other, AssetKind::from_extension)
    }
}

/// Makes a wiki file reachable by the destination.
pub trait AssetSource {
    /// Returns a publicly reachable URI for `file_name`.
    fn publish(&self, file_name: &str) -> Result<String, ConvertError>;
}

/// Serves files already downloaded into a directory that is exposed under
/// `http_prefix`.
#[derive(Debug, Clone)]
pub struct DirectoryAssets {
    directory: PathBuf,
    http_prefix: String,
}

impl DirectoryAssets {
    pub fn new(directory: impl Into<PathBuf>, http_prefix: impl Into<String>) -> Self {
        DirectoryAssets {
            directory: directory.into(),
            http_prefix: http_prefix.into(),
        }
    }

    fn local_name(file_name: &str) -> String {
        file_name.trim().replace(' ', "_")
    }
}

impl AssetSource for DirectoryAssets {
    fn publish(&self, file_name: &str) -> Result<String, ConvertError> {
        let local = Self::local_name(file_name);
        let path = self.directory.join(&local);
        if !path.is_file() {
            return Err(ConvertError::Asset(format!(
                "{file_name} not found in {}",
                self.directory.display()
            )));
        }
        Ok(prefixed_url(&self.http_prefix, &local))
    }
}

/// Publishes nothing; every embed degrades to a link.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAssets;

impl AssetSource for NoAssets {
    fn publish(&self, file_name: &str) -> Result<String, ConvertError> {
        Err(ConvertError::Asset(format!(
            "no asset source configured for {file_name}"
        )))
    }
}
