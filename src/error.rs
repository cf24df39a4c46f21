//! Error type shared by the data sources and state persistence.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("could not find gh. Is it installed? error: {0}")]
    GhMissing(#[source] io::Error),

    #[error("failed to run gh. stderr: {stderr}")]
    GhFailed { stderr: String },

    #[error("Try running this command from inside a git repository or with the -R flag")]
    NotARepository,

    #[error("can only play in repositories with issues enabled")]
    IssuesDisabled,

    #[error("repository must look like OWNER/NAME, got {0:?}")]
    InvalidRepository(String),

    #[error("unexpected output from gh: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("could not read {path:?}: {source}")]
    StateRead { path: PathBuf, source: io::Error },

    #[error("malformed state file {path:?}: {source}")]
    StateFormat {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("could not write {path:?}: {source}")]
    StateWrite { path: PathBuf, source: io::Error },

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
