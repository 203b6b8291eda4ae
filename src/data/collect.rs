use std::path::{Path, PathBuf};

use glob::{MatchOptions, Pattern};

use super::error::{Result, ThfError};

/// Extension of through-focus MTF files, matched case-insensitively.
pub const THF_EXTENSION: &str = "thf";

/// Every `*.thf` file under `directory`, recursively, sorted by path.
///
/// Finding nothing is not an error. Entries that cannot be read while
/// walking are logged and skipped.
pub fn collect(directory: &Path) -> Result<Vec<PathBuf>> {
    let root = directory
        .to_str()
        .ok_or_else(|| ThfError::NonUtf8Path(directory.to_path_buf()))?;
    let pattern = format!("{}/**/*.{THF_EXTENSION}", Pattern::escape(root));

    let options = MatchOptions {
        case_sensitive: false,
        require_literal_separator: true,
        require_literal_leading_dot: false,
    };

    let mut paths: Vec<PathBuf> = glob::glob_with(&pattern, options)?
        .filter_map(|entry| match entry {
            Ok(path) => Some(path),
            Err(e) => {
                log::warn!("skipping unreadable entry: {e}");
                None
            }
        })
        .filter(|path| path.is_file())
        .collect();
    paths.sort();

    log::info!("found {} .thf files under {}", paths.len(), directory.display());
    Ok(paths)
}
