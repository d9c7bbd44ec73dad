use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("error reading file at {path:?}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("error reading filestat for {path:?}: {source}")]
    Stat {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("error mmapping {path:?}: {source}")]
    Map {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("aggregate table full: more than {} distinct names", .capacity - 1)]
    CapacityExceeded { capacity: usize },

    #[error("incomplete record before byte {end}")]
    UnterminatedRecord { end: usize },

    #[error("malformed record at byte {offset}: {reason}")]
    Malformed { offset: usize, reason: &'static str },

    #[error("a worker exited without returning its table")]
    WorkerLost,

    #[error("failed to write summary: {0}")]
    Output(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
