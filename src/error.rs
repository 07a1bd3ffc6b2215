use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;
use crate::types::StreamId;

#[derive(Debug, Error)]
pub enum TraceError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("could not open output file {}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not write to {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("stream {stream} stopped after an output failure on {}", path.display())]
    Halted { stream: StreamId, path: PathBuf },
    #[error("stream {0} was never started")]
    UnknownStream(StreamId),
    #[error("stream {0} is already running")]
    DuplicateStream(StreamId),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("empty line")]
    Empty,
    #[error("bad hex address {0:?}")]
    Address(String),
    #[error("bad stream id {0:?}")]
    Stream(String),
    #[error("unexpected token {0:?}")]
    Token(String),
    #[error("{0} is missing its address")]
    MissingAddress(char),
}
