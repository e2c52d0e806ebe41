//! Image selections handed to the extraction endpoint.

use crate::constants::ACCEPTED_IMAGE_MIME_TYPES;
use crate::error::CatalogError;
use std::path::{Path, PathBuf};

#[derive(Clone, PartialEq, Eq)]
enum ImageContent {
    Loaded(Vec<u8>),
    OnDisk(PathBuf),
}

/// A file the user picked for extraction, before or after validation.
///
/// `size` always comes from the bytes held or from the file's metadata, so
/// it cannot disagree with what is eventually uploaded. Candidates built
/// from a path read their bytes only when [`ImageCandidate::read_content`]
/// is called.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageCandidate {
    file_name: String,
    mime_type: String,
    size: u64,
    content: ImageContent,
}

impl std::fmt::Debug for ImageCandidate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageCandidate")
            .field("file_name", &self.file_name)
            .field("mime_type", &self.mime_type)
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}

impl ImageCandidate {
    /// Build a candidate from in-memory content; `size` is the content length.
    pub fn new(file_name: impl Into<String>, mime_type: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            size: content.len() as u64,
            content: ImageContent::Loaded(content),
        }
    }

    /// Describe a local file without reading it.
    ///
    /// The MIME type is guessed from the extension and the size is taken
    /// from the file's metadata.
    ///
    /// # Errors
    /// Returns [`CatalogError::Io`] when the metadata cannot be read, and a
    /// validation error when `path` is not a regular file.
    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let metadata = std::fs::metadata(path)?;
        if !metadata.is_file() {
            return Err(CatalogError::validation(format!(
                "{} is not a file.",
                path.display()
            )));
        }
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| "image".to_string());
        Ok(Self {
            file_name,
            mime_type: mime_type_for_path(path).to_string(),
            size: metadata.len(),
            content: ImageContent::OnDisk(path.to_path_buf()),
        })
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Size in bytes used by the upload limit.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Bytes to upload, reading the file now for path-backed candidates.
    ///
    /// # Errors
    /// Returns [`CatalogError::Io`] when the file cannot be read, and a
    /// validation error when it no longer matches the size it was selected with.
    pub fn read_content(&self) -> Result<Vec<u8>, CatalogError> {
        match &self.content {
            ImageContent::Loaded(bytes) => Ok(bytes.clone()),
            ImageContent::OnDisk(path) => {
                let bytes = std::fs::read(path)?;
                if bytes.len() as u64 != self.size {
                    return Err(CatalogError::validation(format!(
                        "{} changed after it was selected. Please select it again.",
                        self.file_name
                    )));
                }
                Ok(bytes)
            }
        }
    }

    /// `true` when the MIME type is on the upload whitelist.
    pub fn has_accepted_type(&self) -> bool {
        is_accepted_image_type(&self.mime_type)
    }
}

/// `true` when `mime_type` is one of the accepted image types.
pub fn is_accepted_image_type(mime_type: &str) -> bool {
    let normalized = mime_type.trim().to_ascii_lowercase();
    ACCEPTED_IMAGE_MIME_TYPES.contains(&normalized.as_str())
}

/// MIME type a file picker would report for `path`, keyed on its extension.
pub fn mime_type_for_path(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "tif" | "tiff" => "image/tiff",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "pdf" => "application/pdf",
        _ => "application/octet-stream",
    }
}
