use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_EXTENSION: &str = "c";

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IoError: could not read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("NoTargets: no .{extension} files in {}", .dir.display())]
    NoTargets { dir: PathBuf, extension: String },
    #[error("UnknownTarget: {0} is neither a listed target, an index nor an existing file")]
    UnknownTarget(String),
    #[error("IndexOutOfRange: index {index} is not between 1 and {count}")]
    IndexOutOfRange { index: usize, count: usize },
}

/// Lists the regular files in `dir` with the given extension, sorted by name.
pub fn list_targets(dir: &Path, extension: &str) -> Result<Vec<PathBuf>, Error> {
    let io_error = |source: std::io::Error| Error::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut targets = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_error)? {
        let path = entry.map_err(io_error)?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == extension) {
            targets.push(path);
        }
    }
    targets.sort();

    Ok(targets)
}

/// Resolves a user selection to a target file.
///
/// A selection matches, in order: a listed file name, a listed file stem, an
/// existing path, then a 1-based index into [`list_targets`].
pub fn resolve(selection: &str, dir: &Path, extension: &str) -> Result<PathBuf, Error> {
    let targets = list_targets(dir, extension)?;

    let by_name = |target: &&PathBuf| {
        target.file_name().is_some_and(|name| name == selection)
            || target.file_stem().is_some_and(|stem| stem == selection)
    };
    if let Some(target) = targets.iter().find(by_name) {
        return Ok(target.clone());
    }

    let path = Path::new(selection);
    if path.is_file() {
        return Ok(path.to_path_buf());
    }

    let index: usize = selection
        .parse()
        .map_err(|_| Error::UnknownTarget(selection.to_string()))?;
    if targets.is_empty() {
        return Err(Error::NoTargets {
            dir: dir.to_path_buf(),
            extension: extension.to_string(),
        });
    }

    index
        .checked_sub(1)
        .and_then(|index| targets.get(index))
        .cloned()
        .ok_or(Error::IndexOutOfRange {
            index,
            count: targets.len(),
        })
}
