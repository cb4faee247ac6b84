use obsidian_core::stl::StlError;
use std::{fmt, io};

use crate::config::ConfigError;

/// Errors surfaced by the terminal viewer
#[derive(Debug)]
pub enum AppError {
    Io(io::Error),
    Render(obsidian_core::Error),
    Model(StlError),
    Config(ConfigError),
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Io(err) => Some(err),
            AppError::Render(err) => Some(err),
            AppError::Model(err) => Some(err),
            AppError::Config(err) => Some(err),
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Io(err) => write!(f, "terminal I/O failed: {}", err),
            AppError::Render(err) => write!(f, "rendering failed: {}", err),
            AppError::Model(err) => write!(f, "could not load model: {}", err),
            AppError::Config(err) => write!(f, "{}", err),
        }
    }
}

impl From<io::Error> for AppError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<obsidian_core::Error> for AppError {
    fn from(e: obsidian_core::Error) -> Self {
        Self::Render(e)
    }
}

impl From<StlError> for AppError {
    fn from(e: StlError) -> Self {
        Self::Model(e)
    }
}

impl From<ConfigError> for AppError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}
