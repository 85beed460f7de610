use std::error::Error as _;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LogoGuardError {
    #[error("Cannot read reference directory {}", path.display())]
    ReferenceDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode image: {0}")]
    Decode(String),

    #[error("Invalid perceptual hash: {0}")]
    InvalidHash(String),

    #[error("Unsupported upload: {0}")]
    UnsupportedUpload(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl LogoGuardError {
    /// This error followed by its sources, separated by `: `.
    pub fn describe(&self) -> String {
        let mut text = self.to_string();
        let mut source = self.source();
        while let Some(cause) = source {
            text.push_str(": ");
            text.push_str(&cause.to_string());
            source = cause.source();
        }
        text
    }
}

pub type Result<T> = std::result::Result<T, LogoGuardError>;
