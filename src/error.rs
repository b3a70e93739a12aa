/// Error types for building and inspecting slide decks.
use thiserror::Error;

/// Result type for deck operations.
pub type Result<T> = std::result::Result<T, DeckError>;

/// Error types for deck operations.
#[derive(Error, Debug)]
pub enum DeckError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// ZIP container error
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// XML parsing or generation error
    #[error("XML error: {0}")]
    Xml(String),

    /// Deck content could not be parsed
    #[error("YAML error: {0}")]
    Yaml(String),

    /// Deck content parsed but does not have the expected shape
    #[error("Invalid deck: {0}")]
    InvalidDeck(String),

    /// Part not found in the package
    #[error("Part not found: {0}")]
    PartNotFound(String),

    /// Invalid relationship
    #[error("Invalid relationship: {0}")]
    InvalidRelationship(String),
}

impl From<quick_xml::Error> for DeckError {
    fn from(err: quick_xml::Error) -> Self {
        DeckError::Xml(err.to_string())
    }
}

impl From<std::fmt::Error> for DeckError {
    fn from(err: std::fmt::Error) -> Self {
        DeckError::Xml(err.to_string())
    }
}

