use std::path::PathBuf;

use thiserror::Error;

use crate::query::QueryError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("error reading directory '{}': {source}", .path.display())]
    ReadDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("error opening playlist '{}': {source}", .path.display())]
    OpenPlaylist {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("error decoding playlist '{}': {reason}", .path.display())]
    DecodePlaylist { path: PathBuf, reason: String },
    #[error("unknown list type '{0}'")]
    UnexpectedPlaylistType(&'static str),
    #[error("error parsing URI '{uri}': {source}")]
    SegmentUri { uri: String, source: QueryError },
    #[error("could not stat file '{}': {source}", .path.display())]
    Stat {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("error deleting file '{}': {source}", .path.display())]
    Delete {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("error writing report: {0}")]
    Output(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;
