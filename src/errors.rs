use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    /// Network request failed or returned a non-success status
    #[error("Network error: {0}")]
    NetworkError(String),
    /// Failed to parse the source XML document
    #[error("Parse error: {0}")]
    ParseError(String),
    /// Invalid URL format
    #[error("Invalid URL: {0}")]
    UrlError(String),
    /// A source entry lacks one of the required child elements
    #[error("Malformed entry #{index}: missing element '{element}'")]
    MalformedEntry { index: usize, element: String },
    /// The export file or its directory could not be written
    #[error("Export error: {0}")]
    ExportError(String),
    /// Invalid input format
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// IO operation failed
    #[error("IO error: {0}")]
    IoError(String),
}

// Conversion implementations for common errors
impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::NetworkError(err.to_string())
    }
}

impl From<quick_xml::Error> for AppError {
    fn from(err: quick_xml::Error) -> Self {
        AppError::ParseError(err.to_string())
    }
}

impl From<url::ParseError> for AppError {
    fn from(err: url::ParseError) -> Self {
        AppError::UrlError(err.to_string())
    }
}

// Custom type alias for Results in this application
pub type AppResult<T> = Result<T, AppError>;
