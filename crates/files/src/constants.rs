/// Image extensions accepted for upload, compared case-insensitively.
pub const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp"];

/// Default upload directory when none is configured.
pub const DEFAULT_UPLOAD_DIR: &str = "uploads";

/// `chrono` format for the timestamp inserted into stored filenames.
pub(crate) const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Number of candidate names tried before giving up on a same-second collision.
pub(crate) const MAX_NAME_ATTEMPTS: u32 = 5;

/// Longest file name, in bytes, accepted by common filesystems.
pub(crate) const MAX_FILE_NAME_BYTES: usize = 255;
