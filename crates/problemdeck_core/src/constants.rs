//! Shared constants used across ProblemDeck crates.

/// Remote endpoint root used when no base URL is configured.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000/api";

/// Default transport timeout handed to HTTP clients, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Largest image accepted by the upload workflow (5 MiB, inclusive).
pub const MAX_UPLOAD_BYTES: u64 = 5 * 1024 * 1024;

/// MIME types the upload workflow accepts.
pub const ACCEPTED_IMAGE_MIME_TYPES: [&str; 5] = [
    "image/jpeg",
    "image/png",
    "image/gif",
    "image/bmp",
    "image/tiff",
];

/// Multipart field name the extraction endpoint reads the image from.
pub const UPLOAD_FIELD_NAME: &str = "image";

/// Upper bound on queued notices per controller.
pub const NOTICE_LIMIT: usize = 8;

/// Rejection shown for images outside [`ACCEPTED_IMAGE_MIME_TYPES`].
pub const UNSUPPORTED_IMAGE_MESSAGE: &str =
    "Unsupported file type. Please upload a JPEG, PNG, GIF, BMP, or TIFF image.";
/// Rejection shown for images larger than [`MAX_UPLOAD_BYTES`].
pub const OVERSIZED_IMAGE_MESSAGE: &str = "File size exceeds 5MB. Please upload a smaller image.";
/// Shown when submission is attempted without a selected image.
pub const NO_IMAGE_SELECTED_MESSAGE: &str = "Please select an image to upload.";
/// Validation failure for the problem form.
pub const REQUIRED_FIELDS_MESSAGE: &str = "Title and Difficulty are required.";
