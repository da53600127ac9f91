use concord_recon::ConcordError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("cannot parse {path}: {message}")]
    Parse { path: String, message: String },

    /// The file parsed but is not a valid reviewer table.
    #[error(transparent)]
    Table(#[from] ConcordError),
}

#[derive(Debug, Error)]
pub enum WriteError {
    #[error("cannot write {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("cannot serialize {path}: {message}")]
    Serialize { path: String, message: String },
}
