use crate::core::name::Name;
use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NfdError {
    #[error("Malformed TLV: {0}")]
    MalformedTlv(String),
    #[error("Invalid name: {0}")]
    InvalidName(String),
    #[error("Strategy {0} is not installed")]
    UnknownStrategy(Name),
    #[error("Strategy {0} is already installed")]
    DuplicateStrategy(Name),
    #[error("Cannot unset root prefix strategy")]
    CannotUnsetRoot,
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Signature error: {0}")]
    Signature(String),
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),
    #[error("Regex error: {0}")]
    RegexError(#[from] regex::Error),
    #[error("Hex error: {0}")]
    HexError(#[from] hex::FromHexError),
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),
}
