mod report;
mod checks;
mod images;

pub use report::*;
pub use checks::*;
pub use images::*;

use crate::{LoadedTileset, ValidationConfig};

/// Validates a loaded tileset, opening its images when the configuration asks for it.
pub fn validate_loaded(loaded: &LoadedTileset, config: &ValidationConfig) -> Report {
    let mut report = validate(&loaded.tileset, config);
    if config.check_images {
        report.extend(check_images(loaded));
    }
    report
}
