use thiserror::Error;

/// Failure to obtain tabular data from a source.
#[derive(Debug, Error)]
pub enum IoError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{backend} backend error: {message}")]
    Backend { backend: String, message: String },

    #[error("unsupported {feature}: {context}")]
    Unsupported { feature: String, context: String },
}

impl IoError {
    /// Wrap an arbitrary backend error, keeping only its rendered message.
    pub fn from_backend<E: std::error::Error>(backend: &str, err: E) -> Self {
        IoError::Backend {
            backend: backend.to_string(),
            message: err.to_string(),
        }
    }
}

#[cfg(feature = "calamine")]
impl From<calamine::Error> for IoError {
    fn from(err: calamine::Error) -> Self {
        IoError::from_backend("calamine", err)
    }
}
