use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BundleCheckError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("No transfer records to analyze")]
    EmptyInput,

    #[error("Invalid token address: {0}")]
    InvalidAddress(String),

    #[error("Malformed transfer record: {0}")]
    MalformedRecord(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Indexer API error: {0}")]
    Api(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl BundleCheckError {
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn api_error(msg: impl Into<String>) -> Self {
        Self::Api(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, BundleCheckError>;
