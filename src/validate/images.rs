use std::path::Path;
use rayon::prelude::*;
use tracing::instrument;
use crate::{ImageRef, IssueKind, LoadedTileset, Report};

/// Opens every image a tileset loaded from the file system references
/// and compares the real pixel size with the declared one.
#[instrument(skip_all, fields(path = %loaded.path))]
pub fn check_images(loaded: &LoadedTileset) -> Report {
    let findings: Vec<(Option<u32>, IssueKind)> = loaded
        .image_refs()
        .par_iter()
        .filter_map(check_image_file)
        .collect();
    let mut report = Report::default();
    for (tile, kind) in findings {
        report.push(tile, kind);
    }
    report
}

fn check_image_file(image: &ImageRef) -> Option<(Option<u32>, IssueKind)> {
    let path = image.path.clone();
    if !Path::new(&path).exists() {
        return Some((image.tile_id, IssueKind::ImageNotFound { path }));
    }
    let (actual_width, actual_height) = match image::image_dimensions(&path) {
        Ok(dimensions) => dimensions,
        Err(err) => {
            log::warn!("Failed to read {path}: {err}");
            return Some((image.tile_id, IssueKind::ImageUnreadable { path, error: err.to_string() }));
        },
    };
    let declared_width = image.width.unwrap_or(actual_width);
    let declared_height = image.height.unwrap_or(actual_height);
    if (declared_width, declared_height) != (actual_width, actual_height) {
        return Some((image.tile_id, IssueKind::ImageSizeMismatch {
            path,
            declared_width,
            declared_height,
            actual_width,
            actual_height,
        }));
    }
    None
}
