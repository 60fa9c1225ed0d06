//! Output file naming and PNG writing

use crate::error::Result;
use image::{DynamicImage, ImageFormat};
use std::path::{Path, PathBuf};

/// Longest sanitized name kept in a file name, in characters
pub const NAME_LIMIT: usize = 40;

/// Prefix of every generated file name
pub const FILE_PREFIX: &str = "qr_";

/// Extension of every generated file
pub const FILE_EXTENSION: &str = "png";

fn is_allowed(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '(' | ')' | ' ')
}

/// Reduce a display name to the characters allowed in file names.
///
/// Disallowed characters are dropped before the result is cut to
/// [`NAME_LIMIT`] characters.
pub fn sanitize_name(display_name: &str) -> String {
    display_name
        .trim()
        .chars()
        .filter(|c| is_allowed(*c))
        .take(NAME_LIMIT)
        .collect()
}

/// Path of the image generated for `display_name` inside `dir`.
///
/// Names that sanitize identically map to the same path.
pub fn output_path(dir: &Path, display_name: &str) -> PathBuf {
    dir.join(format!(
        "{FILE_PREFIX}{}.{FILE_EXTENSION}",
        sanitize_name(display_name)
    ))
}

/// Save `image` as PNG, replacing any existing file.
pub fn write_png(image: &DynamicImage, path: &Path) -> Result<()> {
    image.save_with_format(path, ImageFormat::Png)?;
    tracing::debug!(path = %path.display(), "Wrote QR image");
    Ok(())
}
