use std::collections::BTreeSet;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{AppError, Result};

/// Directory the playlist lives in. A bare file name resolves to `.`.
pub fn playlist_dir(playlist: &Path) -> PathBuf {
    match playlist.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Names of the top-level, non-directory entries of `dir`.
pub fn list_files(dir: &Path) -> Result<BTreeSet<OsString>> {
    let read_err = |source| AppError::ReadDir {
        path: dir.to_path_buf(),
        source,
    };

    let mut files = BTreeSet::new();
    for entry in fs::read_dir(dir).map_err(read_err)? {
        let entry = entry.map_err(read_err)?;
        if entry.file_type().map_err(read_err)?.is_dir() {
            continue;
        }
        files.insert(entry.file_name());
    }

    tracing::debug!(dir = %dir.display(), count = files.len(), "listed directory");
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn playlist_dir_of_nested_path() {
        assert_eq!(
            playlist_dir(Path::new("/videos/E3-2021.m3u")),
            PathBuf::from("/videos")
        );
    }

    #[test]
    fn playlist_dir_of_bare_name_is_current_dir() {
        assert_eq!(playlist_dir(Path::new("E3-2021.m3u")), PathBuf::from("."));
    }

    #[test]
    fn lists_every_non_directory_entry() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("a.mp4"), b"aaaa").unwrap();
        fs::write(tmp.path().join("b.MP4"), b"bb").unwrap();
        fs::write(tmp.path().join("notes.txt"), b"x").unwrap();
        fs::write(tmp.path().join(".hidden"), b"").unwrap();
        fs::create_dir(tmp.path().join("nested.mp4")).unwrap();
        fs::write(tmp.path().join("nested.mp4").join("deep.mp4"), b"d").unwrap();

        let files = list_files(tmp.path()).unwrap();
        let names: Vec<_> = files.iter().map(|n| n.to_string_lossy().into_owned()).collect();
        assert_eq!(names, vec![".hidden", "a.mp4", "b.MP4", "notes.txt"]);
    }

    #[test]
    fn missing_directory_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("gone");
        match list_files(&missing) {
            Err(AppError::ReadDir { path, .. }) => assert_eq!(path, missing),
            other => panic!("expected ReadDir error, got {:?}", other),
        }
    }
}
