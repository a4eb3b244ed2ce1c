use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to parse specification: {0}")]
    Parse(String),

    #[error("Invalid specification document: {0}")]
    InvalidDocument(String),

    #[error("Unresolved schema reference: {0}")]
    UnresolvedRef(String),

    #[error("Tool '{0}' not found in catalog")]
    ToolNotFound(String),

    #[error("No specification loaded")]
    CatalogNotLoaded,

    #[error("Unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    #[error("HTTP transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    /// Helper for creating parse errors
    ///
    /// # Example
    /// ```
    /// use rtk_core::Error;
    /// let err = Error::parse_error("unexpected end of input");
    /// ```
    pub fn parse_error(msg: impl Into<String>) -> Self {
        Error::Parse(msg.into())
    }

    /// Helper for creating invalid-document errors
    ///
    /// # Example
    /// ```
    /// use rtk_core::Error;
    /// let err = Error::invalid_document("missing info.title");
    /// ```
    pub fn invalid_document(msg: impl Into<String>) -> Self {
        Error::InvalidDocument(msg.into())
    }
}
