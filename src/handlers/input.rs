//! Reading input sources for the `score` command.

use crate::error::{Error, Result};
use crate::parser::InputSource;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Extensions picked up when walking a directory.
const MANIFEST_EXTENSIONS: &[&str] = &["yaml", "yml"];

fn is_manifest(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| MANIFEST_EXTENSIONS.contains(&e))
}

fn read_file(path: &Path) -> Result<InputSource> {
    let bytes = std::fs::read(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(InputSource::new(path.display().to_string(), bytes))
}

fn read_stdin() -> Result<InputSource> {
    let mut bytes = Vec::new();
    io::stdin()
        .read_to_end(&mut bytes)
        .map_err(|source| Error::Io {
            path: PathBuf::from("-"),
            source,
        })?;
    Ok(InputSource::new("-", bytes))
}

/// Read every named file, every manifest below every named directory, and
/// stdin for `-`. Directory entries are read in file name order.
pub fn collect_sources(paths: &[PathBuf]) -> Result<Vec<InputSource>> {
    let mut sources = Vec::new();

    for path in paths {
        if path.as_os_str() == "-" {
            sources.push(read_stdin()?);
            continue;
        }

        if !path.is_dir() {
            sources.push(read_file(path)?);
            continue;
        }

        for entry in WalkDir::new(path).sort_by_file_name() {
            let entry = entry.map_err(|e| Error::Io {
                path: path.clone(),
                source: io::Error::from(e),
            })?;
            if entry.file_type().is_file() && is_manifest(entry.path()) {
                log::debug!("Reading {}", entry.path().display());
                sources.push(read_file(entry.path())?);
            }
        }
    }

    log::info!("Read {} input source(s)", sources.len());
    Ok(sources)
}
