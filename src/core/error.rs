use thiserror::Error;

use crate::catalog::CatalogError;

/// Failures that abort a whole read. Everything else is a diagnostic.
#[derive(Error, Debug)]
pub enum MusterError {
    #[error("Error parsing unit list document: {0}")]
    Document(#[from] roxmltree::Error),

    #[error("Root element isn't a record, unit, or entity tag (found <{0}>); nothing to parse")]
    UnrecognizedRoot(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, MusterError>;
