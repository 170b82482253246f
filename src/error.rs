use crate::parsers::error::{FetchError, ParseError};
use crate::types::provider::ProviderFormat;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("No input source was provided")]
    EmptyInput,

    #[error("Project coordinates are required to fetch PVGIS data")]
    MissingGeo,

    #[error("Unsupported data provider '{0}'")]
    UnsupportedProvider(String),

    #[error("Failed to read '{0}'")]
    FileAccess(PathBuf, #[source] std::io::Error),

    #[error("Could not read {format} data")]
    Format {
        format: ProviderFormat,
        #[source]
        source: ParseError,
    },

    #[error("Could not download {format} data")]
    Connectivity {
        format: ProviderFormat,
        #[source]
        source: FetchError,
    },

    #[error("Parsing task did not complete")]
    TaskJoin(#[from] tokio::task::JoinError),

    #[error("Failed to build HTTP client")]
    ClientBuild(#[source] reqwest::Error),
}

/// The externally visible classes of [`ResourceError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Nothing to load; callers skip silently.
    EmptyInput,
    FileAccess,
    Format,
    Connectivity,
}

impl ErrorKind {
    /// Short label shown next to a failed data source.
    pub fn status_label(&self) -> &'static str {
        match self {
            ErrorKind::EmptyInput => "No input",
            ErrorKind::FileAccess => "File error",
            ErrorKind::Format => "Format error",
            ErrorKind::Connectivity => "Connection error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.status_label())
    }
}

impl ResourceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ResourceError::EmptyInput | ResourceError::MissingGeo => ErrorKind::EmptyInput,
            ResourceError::FileAccess(..) => ErrorKind::FileAccess,
            ResourceError::UnsupportedProvider(_)
            | ResourceError::Format { .. }
            | ResourceError::TaskJoin(_) => ErrorKind::Format,
            ResourceError::Connectivity { .. } | ResourceError::ClientBuild(_) => {
                ErrorKind::Connectivity
            }
        }
    }
}
