use std::fs::File;
use std::path::Path;

use log::debug;
#[cfg(unix)]
use log::warn;
use memmap2::Mmap;

use crate::error::{Error, Result};

/// Read-only view of an input file. Empty files are not mapped.
#[derive(Debug)]
pub struct MappedFile {
    map: Option<Mmap>,
}

impl MappedFile {
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|source| Error::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let len = file
            .metadata()
            .map_err(|source| Error::Stat {
                path: path.to_path_buf(),
                source,
            })?
            .len();
        if len == 0 {
            return Ok(Self { map: None });
        }

        // SAFETY: the mapping is read-only; the input must not be modified
        // while the process runs.
        let map = unsafe { Mmap::map(&file) }.map_err(|source| Error::Map {
            path: path.to_path_buf(),
            source,
        })?;

        advise_sequential(&map);
        debug!("mapped {} bytes from {}", map.len(), path.display());
        Ok(Self { map: Some(map) })
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.map.as_deref().unwrap_or(&[])
    }
}

#[cfg(unix)]
fn advise_sequential(map: &Mmap) {
    if let Err(err) = map.advise(memmap2::Advice::Sequential) {
        warn!("madvise(sequential) failed: {err}");
    }
}

#[cfg(not(unix))]
fn advise_sequential(_map: &Mmap) {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn maps_file_contents() {
        let content = "Hamburg;12.5\n北京;-3.7\n東京;25.0\n".as_bytes();
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(content).expect("Failed to write to temp file");
        file.flush().expect("Failed to flush");

        let mapped = MappedFile::open(file.path()).unwrap();
        assert_eq!(mapped.as_bytes(), content);
    }

    #[test]
    fn empty_file_is_empty_slice() {
        let file = NamedTempFile::new().expect("Failed to create temp file");
        let mapped = MappedFile::open(file.path()).unwrap();
        assert!(mapped.as_bytes().is_empty());
    }

    #[test]
    fn missing_file_is_open_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = MappedFile::open(&dir.path().join("missing.txt")).unwrap_err();
        assert!(matches!(err, Error::Open { .. }));
    }
}
