// src/error.rs
//
// One error type for the whole pipeline. Row-level data problems are not
// errors; they are collected as `ingest::DataWarning`s and the run goes on.

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

/// Broad class of a failure, used to decide how a frontend reports it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing credential, input file, column, bad stage map or range.
    Configuration,
    /// The CRM API failed or refused the request.
    Upstream,
    /// Local filesystem or encoding failure.
    Io,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{0} is not set; export it before refreshing")]
    MissingCredential(&'static str),

    #[error("no deals file found in {}; use Refresh (or `cli extract`) first", .0.display())]
    NoInput(PathBuf),

    #[error("input file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("{}: missing required column `{column}`", .path.display())]
    MissingColumn { path: PathBuf, column: String },

    #[error("stage map {}: {source}", .path.display())]
    StageMapParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("cannot read stage map {}: {source}", .path.display())]
    StageMapRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write stage map: {0}")]
    StageMapWrite(#[from] toml::ser::Error),

    #[error("invalid stage map: {0}")]
    StageMap(String),

    #[error("invalid analysis range: {0}")]
    Range(String),

    #[error("unrecognized timestamp `{0}`")]
    Timestamp(String),

    #[error("HubSpot rejected the access token (HTTP {0})")]
    Unauthorized(u16),

    #[error("HubSpot API error (HTTP {status}): {body}")]
    Api { status: u16, body: String },

    #[error("network error: {0}")]
    Network(String),

    #[error("unexpected API response: {0}")]
    Decode(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::MissingCredential(_)
            | Error::NoInput(_)
            | Error::InputNotFound(_)
            | Error::MissingColumn { .. }
            | Error::StageMapParse { .. }
            | Error::StageMapRead { .. }
            | Error::StageMap(_)
            | Error::Range(_)
            | Error::Timestamp(_) => ErrorKind::Configuration,

            Error::Unauthorized(_)
            | Error::Api { .. }
            | Error::Network(_)
            | Error::Decode(_) => ErrorKind::Upstream,

            Error::Io(_) | Error::Json(_) | Error::StageMapWrite(_) => ErrorKind::Io,
        }
    }
}

impl From<ureq::Error> for Error {
    fn from(e: ureq::Error) -> Self {
        match e {
            ureq::Error::Status(code @ (401 | 403), _) => Error::Unauthorized(code),
            ureq::Error::Status(status, resp) => {
                let body = resp.into_string().unwrap_or_default();
                Error::Api { status, body }
            }
            ureq::Error::Transport(t) => Error::Network(t.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_the_three_classes() {
        assert_eq!(Error::MissingCredential("X").kind(), ErrorKind::Configuration);
        assert_eq!(Error::NoInput(PathBuf::from("data")).kind(), ErrorKind::Configuration);
        assert_eq!(Error::Unauthorized(401).kind(), ErrorKind::Upstream);
        assert_eq!(Error::Network(s!("down")).kind(), ErrorKind::Upstream);
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk");
        assert_eq!(Error::from(io).kind(), ErrorKind::Io);
    }
}
