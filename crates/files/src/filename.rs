//! Upload filename sanitisation.
//!
//! Client-supplied filenames are untrusted: they may carry directory components, reserved or
//! control characters, or a leading dot. [`sanitize_upload_name`] reduces a proposed name to a
//! flat, ASCII-only file name, checks its extension against [`ALLOWED_EXTENSIONS`] and stamps
//! it with the upload time so that two uploads of `photo.jpg` do not collide.
//!
//! Extension case is preserved: `photo.PNG` is stored as `photo_<timestamp>.PNG`.

use crate::constants::{
    ALLOWED_EXTENSIONS, MAX_FILE_NAME_BYTES, MAX_NAME_ATTEMPTS, TIMESTAMP_FORMAT,
};
use chrono::NaiveDateTime;

/// An accepted upload name, split into the parts used to build on-disk names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadName {
    base: String,
    stamp: String,
    extension: String,
}

impl UploadName {
    /// The primary on-disk name: `<base>_<timestamp>.<ext>`.
    pub fn file_name(&self) -> String {
        format!("{}_{}.{}", self.base, self.stamp, self.extension)
    }

    /// Alternative name used when the primary name is already taken:
    /// `<base>_<timestamp>_<n>.<ext>`.
    pub fn file_name_with_suffix(&self, n: u32) -> String {
        format!("{}_{}_{}.{}", self.base, self.stamp, n, self.extension)
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }
}

/// Sanitises `proposed` and stamps it with `now`.
///
/// Returns `None` when nothing usable remains: no base name, no extension, or an extension
/// outside [`ALLOWED_EXTENSIONS`]. Callers treat `None` as "no file was uploaded".
///
/// The base is shortened so that every candidate name, suffixed ones included, stays within
/// [`MAX_FILE_NAME_BYTES`].
pub fn sanitize_upload_name(proposed: &str, now: NaiveDateTime) -> Option<UploadName> {
    let cleaned = secure_filename(proposed);
    let (base, extension) = split_extension(&cleaned)?;

    if !is_allowed_extension(extension) {
        return None;
    }

    let stamp = now.format(TIMESTAMP_FORMAT).to_string();
    // `_<stamp>_<n>.<ext>`
    let reserved = 1 + stamp.len() + 1 + MAX_NAME_ATTEMPTS.to_string().len() + 1 + extension.len();
    let base = truncate_at_char_boundary(base, MAX_FILE_NAME_BYTES.saturating_sub(reserved));
    if base.is_empty() {
        return None;
    }

    Some(UploadName {
        base: base.to_owned(),
        stamp,
        extension: extension.to_owned(),
    })
}

fn truncate_at_char_boundary(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Reduces an arbitrary filename to a flat name made of ASCII letters, digits, `_`, `-` and `.`.
///
/// Only the last path component survives (both `/` and `\` count as separators). Reserved and
/// control characters are removed, runs of whitespace become a single `_`, and leading dots or
/// underscores are stripped so the result can never be hidden or refer to a parent directory.
pub fn secure_filename(proposed: &str) -> String {
    let last = proposed
        .rsplit(|c| c == '/' || c == '\\')
        .next()
        .unwrap_or_default();

    let cleaned = sanitize_filename::sanitize_with_options(
        last,
        sanitize_filename::Options {
            truncate: true,
            windows: true,
            replacement: "",
        },
    );

    let joined = cleaned.split_whitespace().collect::<Vec<_>>().join("_");
    let ascii: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
        .collect();

    ascii.trim_start_matches(|c| c == '.' || c == '_').to_owned()
}

/// Splits `name` at its last dot. Both halves must be non-empty.
fn split_extension(name: &str) -> Option<(&str, &str)> {
    let (base, extension) = name.rsplit_once('.')?;
    if base.is_empty() || extension.is_empty() {
        return None;
    }
    Some((base, extension))
}

fn is_allowed_extension(extension: &str) -> bool {
    ALLOWED_EXTENSIONS
        .iter()
        .any(|allowed| allowed.eq_ignore_ascii_case(extension))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn fixed_now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(10, 30, 45)
            .unwrap()
    }

    fn stamped(name: &str) -> Option<String> {
        sanitize_upload_name(name, fixed_now()).map(|n| n.file_name())
    }

    #[test]
    fn test_accepts_plain_image_name() {
        assert_eq!(
            stamped("photo.jpg").as_deref(),
            Some("photo_20240115_103045.jpg")
        );
    }

    #[test]
    fn test_extension_case_is_preserved() {
        assert_eq!(
            stamped("photo.PNG").as_deref(),
            Some("photo_20240115_103045.PNG")
        );
        assert_eq!(
            stamped("Banner.WebP").as_deref(),
            Some("Banner_20240115_103045.WebP")
        );
    }

    #[test]
    fn test_rejects_disallowed_or_missing_extension() {
        assert_eq!(stamped("setup.exe"), None);
        assert_eq!(stamped("install.sh"), None);
        assert_eq!(stamped("README"), None);
        assert_eq!(stamped("trailing."), None);
        assert_eq!(stamped(""), None);
    }

    #[test]
    fn test_rejects_names_without_base() {
        assert_eq!(stamped(".png"), None);
        assert_eq!(stamped("..png"), None);
        assert_eq!(stamped("/"), None);
    }

    #[test]
    fn test_strips_directory_components() {
        assert_eq!(
            stamped("../../etc/passwd.png").as_deref(),
            Some("passwd_20240115_103045.png")
        );
        assert_eq!(
            stamped("C:\\Users\\me\\cat.gif").as_deref(),
            Some("cat_20240115_103045.gif")
        );
    }

    #[test]
    fn test_secure_filename_cleans_unsafe_characters() {
        assert_eq!(secure_filename("my holiday  photo.jpg"), "my_holiday_photo.jpg");
        assert_eq!(secure_filename(".hidden.png"), "hidden.png");
        assert_eq!(secure_filename("a\0b<c>d.png"), "abcd.png");
        assert_eq!(secure_filename("café.jpeg"), "caf.jpeg");
        assert_eq!(secure_filename("__init__.png"), "init__.png");
    }

    #[test]
    fn test_long_names_fit_the_file_name_limit() {
        let proposed = format!("{}.png", "a".repeat(250));
        let name = sanitize_upload_name(&proposed, fixed_now()).unwrap();

        assert!(name.file_name().len() <= MAX_FILE_NAME_BYTES);
        assert!(name.file_name_with_suffix(MAX_NAME_ATTEMPTS).len() <= MAX_FILE_NAME_BYTES);
        assert!(name.file_name().starts_with("aaaa"));
        assert!(name.file_name().ends_with("_20240115_103045.png"));
    }

    #[test]
    fn test_truncate_at_char_boundary() {
        assert_eq!(truncate_at_char_boundary("abc", 5), "abc");
        assert_eq!(truncate_at_char_boundary("abcdef", 3), "abc");
        assert_eq!(truncate_at_char_boundary("aé", 2), "a");
    }

    #[test]
    fn test_multi_dot_names_split_on_last_dot() {
        let name = sanitize_upload_name("archive.tar.jpeg", fixed_now()).unwrap();
        assert_eq!(name.extension(), "jpeg");
        assert_eq!(name.file_name(), "archive.tar_20240115_103045.jpeg");
        assert_eq!(
            name.file_name_with_suffix(2),
            "archive.tar_20240115_103045_2.jpeg"
        );
    }
}
