use thiserror::Error;

/// Why the province dataset could not be loaded. The message is what the
/// map view shows in its error state.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("request failed: {0}")]
    Http(String),

    #[error("server answered HTTP {0}")]
    Status(u16),

    #[error("could not read dataset: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed GeoJSON: {0}")]
    Malformed(String),

    #[error("dataset is not a feature collection")]
    NotACollection,
}

impl From<ureq::Error> for LoadError {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::Status(code, _) => LoadError::Status(code),
            ureq::Error::Transport(transport) => LoadError::Http(transport.to_string()),
        }
    }
}

impl From<simd_json::Error> for LoadError {
    fn from(err: simd_json::Error) -> Self {
        LoadError::Malformed(err.to_string())
    }
}
