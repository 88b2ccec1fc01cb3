//! Utility functions for temp paths, filename handling, and hashing

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use rand::Rng;
use regex::Regex;

/// Default byte budget for a single filename component
///
/// Most filesystems cap names at 255 bytes; staying a little under leaves
/// room for suffixes added later (e.g. a temporary extension).
pub const FILENAME_BYTE_LIMIT: usize = 250;

/// Characters that are stripped from filenames outright
#[allow(clippy::expect_used)]
static ILLEGAL_NAME_CHARS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"[\\/*?"<>|$]"#).expect("illegal-character class is a valid regex")
});

/// Generate a unique path for a temporary file
///
/// The name is 16 random bytes rendered as 32 hex characters, optionally
/// suffixed with `.extension`. The path is only generated — neither the file
/// nor `temp_dir` itself is created, so callers writing to it directly must
/// create the directory first.
///
/// # Examples
///
/// ```
/// use media_dl::utils::temp_file_path;
/// use std::path::Path;
///
/// let path = temp_file_path(Path::new("temp"), Some("flac"));
/// let name = path.file_name().unwrap().to_str().unwrap();
/// assert_eq!(name.len(), 32 + ".flac".len());
/// assert!(name.ends_with(".flac"));
/// ```
pub fn temp_file_path(temp_dir: &Path, extension: Option<&str>) -> PathBuf {
    let mut bytes = [0u8; 16];
    rand::thread_rng().fill(&mut bytes);

    let name = match extension {
        Some(ext) => format!("{}.{ext}", hex::encode(bytes)),
        None => hex::encode(bytes),
    };
    temp_dir.join(name)
}

/// Remove a file, treating "already gone" as success
///
/// Any other error (permissions, path is a directory) is propagated.
pub fn remove_file_if_exists(path: &Path) -> std::io::Result<()> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

/// Make a track or album title safe to use as a filename
///
/// Trailing whitespace is trimmed, the characters `\ / * ? " < > | $` are
/// removed, and `:` becomes ` - ` so "Title: Subtitle" keeps a separator.
/// The replacement happens after stripping, so the output never contains a
/// path separator.
///
/// # Examples
///
/// ```
/// use media_dl::utils::sanitize_filename;
///
/// assert_eq!(sanitize_filename("What Is Love?"), "What Is Love");
/// assert_eq!(sanitize_filename("AC/DC"), "ACDC");
/// ```
#[must_use]
pub fn sanitize_filename(name: &str) -> String {
    let trimmed = name.trim_end();
    let stripped = ILLEGAL_NAME_CHARS.replace_all(trimmed, "");
    stripped.replace(':', " - ")
}

/// Truncate the filename component of `path` to at most `byte_limit` bytes
///
/// The cut lands on a UTF-8 character boundary, so a multi-byte character
/// straddling the limit is dropped whole rather than split. Directory
/// components are left untouched.
///
/// # Examples
///
/// ```
/// use media_dl::utils::{truncate_filename_bytes, FILENAME_BYTE_LIMIT};
/// use std::path::Path;
///
/// let long_name = format!("downloads/{}.flac", "a".repeat(300));
/// let fixed = truncate_filename_bytes(Path::new(&long_name), FILENAME_BYTE_LIMIT);
/// assert!(fixed.file_name().unwrap().len() <= FILENAME_BYTE_LIMIT);
/// ```
#[must_use]
pub fn truncate_filename_bytes(path: &Path, byte_limit: usize) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_default();

    let mut end = byte_limit.min(name.len());
    while end > 0 && !name.is_char_boundary(end) {
        end -= 1;
    }
    let truncated = &name[..end];

    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.join(truncated),
        _ => PathBuf::from(truncated),
    }
}

/// MD5 digest of a text as lowercase hex
///
/// Catalog modules use this for cache keys and request signatures; it is not
/// a security boundary.
#[must_use]
pub fn hash_text(input: &str) -> String {
    format!("{:x}", md5::compute(input.as_bytes()))
}
