//! Error types for lotto operations.

use thiserror::Error;

/// Primary error type for lotto operations.
#[derive(Error, Debug)]
pub enum LottoError {
    // Ticket errors
    #[error("Invalid ticket: {0}")]
    InvalidTicket(String),

    #[error("Number {value} is outside the drawable range 1-45")]
    NumberOutOfRange { value: u8 },

    // Theme errors
    #[error("Unknown theme '{value}': expected 'light' or 'dark'")]
    InvalidTheme { value: String },

    // Configuration errors
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    #[error("Configuration parse error: {0}")]
    ConfigParse(String),

    #[error("Invalid configuration: {0}")]
    ConfigInvalid(String),

    #[error("Preference file is corrupt: {0}")]
    StateParse(String),

    // Web server errors
    #[error("Web server failed to start on {addr}: {reason}")]
    WebServerFailed { addr: String, reason: String },

    // Classification errors
    #[error("Failed to load classification model: {0}")]
    ModelLoad(String),

    #[error("Camera unavailable: {0}")]
    CameraUnavailable(String),

    #[error("Image file not found: {path}")]
    ImageNotFound { path: String },

    #[error("Image processing failed: {0}")]
    ImageProcessing(String),

    #[error("Classification failed: {0}")]
    Classification(String),

    // General errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl LottoError {
    /// Returns true if the error is recoverable by the user.
    pub const fn is_user_recoverable(&self) -> bool {
        matches!(
            self,
            Self::InvalidTicket(_)
                | Self::NumberOutOfRange { .. }
                | Self::InvalidTheme { .. }
                | Self::ConfigNotFound { .. }
                | Self::ConfigInvalid(_)
                | Self::ImageNotFound { .. }
                | Self::CameraUnavailable(_)
                | Self::ModelLoad(_)
        )
    }

    /// Returns a suggestion for how to fix the error.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::InvalidTheme { .. } => Some("Use: lotto theme light | lotto theme dark"),
            Self::NumberOutOfRange { .. } => Some("Pick numbers between 1 and 45"),
            Self::ConfigNotFound { .. } => Some("Run: lotto config --path"),
            Self::StateParse(_) => Some("Delete preferences.json to reset saved preferences"),
            Self::WebServerFailed { .. } => Some("Try another port with --port"),
            Self::ModelLoad(_) => Some("Check your network connection and load the model again"),
            Self::CameraUnavailable(_) => Some("Allow camera access and start the camera again"),
            _ => None,
        }
    }
}

/// Convenience type alias for Results using LottoError.
pub type Result<T> = std::result::Result<T, LottoError>;
