//! Error types for the Converso session controller
//!
//! Every failure here resolves to a well-defined call status; none of these
//! errors are expected to take the UI down.

use thiserror::Error;

/// Converso errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConversoError {
    /// The voice client rejected a start request
    #[error("Call start failed: {0}")]
    StartFailed(String),

    /// The voice client failed to stop the call
    #[error("Call stop failed: {0}")]
    StopFailed(String),

    /// Registering or removing an event listener failed
    #[error("Listener error: {0}")]
    ListenerError(String),

    /// All automatic reconnection attempts were used up
    #[error("Connection failed after {0} retries")]
    RetriesExhausted(u8),

    /// A reply or event channel was dropped by the other side
    #[error("Channel error: {0}")]
    ChannelError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl ConversoError {
    /// Check if this error is recoverable
    ///
    /// Recoverable errors leave the session usable; the user can simply try
    /// again. Non-recoverable errors need a restart or a config fix.
    pub fn is_recoverable(&self) -> bool {
        match self {
            // The retry loop handles these
            ConversoError::StartFailed(_) => true,
            // The call is considered finished regardless
            ConversoError::StopFailed(_) => true,
            // Missing listeners degrade the view but never block it
            ConversoError::ListenerError(_) => true,
            // User has to start again by hand
            ConversoError::RetriesExhausted(_) => true,
            ConversoError::ChannelError(_) => false,
            ConversoError::ConfigError(_) => false,
        }
    }

    /// Get a user-friendly description of the error
    ///
    /// Returns a message suitable for the alert banner.
    pub fn user_message(&self) -> String {
        match self {
            ConversoError::StartFailed(_) => {
                "Could not connect to your companion. Retrying...".to_string()
            }
            ConversoError::StopFailed(_) => {
                "The session could not be closed cleanly.".to_string()
            }
            ConversoError::ListenerError(_) => {
                "Some live updates are unavailable for this session.".to_string()
            }
            ConversoError::RetriesExhausted(_) => {
                "Unable to connect after multiple attempts. Please check your connection and try again.".to_string()
            }
            ConversoError::ChannelError(_) => {
                "Internal communication error. Please restart the application.".to_string()
            }
            ConversoError::ConfigError(_) => {
                "Configuration error. Please check settings.".to_string()
            }
        }
    }
}

/// Result type alias for Converso operations
pub type Result<T> = std::result::Result<T, ConversoError>;
