//! Input discovery.

use std::path::{Path, PathBuf};

use tracing::warn;

use odr_vision::is_valid_image;

use crate::error::{BatchError, BatchResult};

/// File extensions picked up by a batch run, compared case-insensitively.
pub const IMAGE_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "bmp"];

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
        .unwrap_or(false)
}

/// List decodable images directly inside `dir`, sorted by path.
///
/// Subdirectories are not descended into. Files with an image extension
/// that fail to decode are skipped with a warning.
pub fn get_image_files(dir: impl AsRef<Path>) -> BatchResult<Vec<PathBuf>> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(BatchError::InputMissing(dir.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() || !has_image_extension(&path) {
            continue;
        }
        if is_valid_image(&path) {
            files.push(path);
        } else {
            warn!(path = %path.display(), "Skipping invalid image file");
        }
    }

    files.sort();
    Ok(files)
}
