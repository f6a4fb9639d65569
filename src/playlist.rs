use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Component, Path, PathBuf};

use m3u8_rs::{MediaPlaylist, Playlist};

use crate::error::{AppError, Result};
use crate::query;

/// Read and decode a media playlist. Master playlists are rejected.
pub fn load(path: &Path) -> Result<MediaPlaylist> {
    let file = File::open(path).map_err(|source| AppError::OpenPlaylist {
        path: path.to_path_buf(),
        source,
    })?;
    let mut bytes = Vec::new();
    BufReader::new(file)
        .read_to_end(&mut bytes)
        .map_err(|err| AppError::DecodePlaylist {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })?;

    let playlist = match m3u8_rs::parse_playlist_res(&bytes) {
        Ok(Playlist::MediaPlaylist(playlist)) => playlist,
        Ok(Playlist::MasterPlaylist(_)) => return Err(AppError::UnexpectedPlaylistType("master")),
        Err(err) => {
            return Err(AppError::DecodePlaylist {
                path: path.to_path_buf(),
                reason: describe(err),
            })
        }
    };

    tracing::debug!(
        path = %path.display(),
        segments = playlist.segments.len(),
        "decoded playlist"
    );
    Ok(playlist)
}

fn describe(err: nom::Err<nom::error::Error<&[u8]>>) -> String {
    match err {
        nom::Err::Incomplete(_) => "unexpected end of playlist".to_string(),
        nom::Err::Error(e) | nom::Err::Failure(e) => {
            let near = String::from_utf8_lossy(e.input);
            let line = near.lines().next().unwrap_or("");
            format!("{:?} error near {:?}", e.code, line)
        }
    }
}

/// Every file a segment URI names, joined onto `dir`. A segment whose URI
/// yields no keys contributes nothing; `#EXT-X-GAP` segments still count.
pub fn referenced_files(playlist: &MediaPlaylist, dir: &Path) -> Result<HashSet<PathBuf>> {
    let mut referenced = HashSet::new();

    for segment in &playlist.segments {
        let keys = query::query_keys(&segment.uri).map_err(|source| AppError::SegmentUri {
            uri: segment.uri.clone(),
            source,
        })?;
        for key in keys {
            referenced.insert(join_clean(dir, Path::new(&key)));
        }
    }

    Ok(referenced)
}

/// Lexically cleaned `dir/name`. `.` is dropped and `..` pops the previous
/// component, including components of `dir`. A root in `name` is ignored.
pub fn join_clean(dir: &Path, name: &Path) -> PathBuf {
    let tail = name
        .components()
        .filter(|c| !matches!(c, Component::RootDir | Component::Prefix(_)));

    let mut cleaned = PathBuf::new();
    let mut depth = 0usize;
    for component in dir.components().chain(tail) {
        match component {
            Component::Normal(part) => {
                cleaned.push(part);
                depth += 1;
            }
            Component::ParentDir if depth > 0 => {
                cleaned.pop();
                depth -= 1;
            }
            Component::ParentDir if cleaned.has_root() => {}
            Component::ParentDir => cleaned.push(".."),
            Component::CurDir => {}
            Component::RootDir | Component::Prefix(_) => cleaned.push(component),
        }
    }
    if cleaned.as_os_str().is_empty() {
        cleaned.push(".");
    }
    cleaned
}
