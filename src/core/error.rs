// Centralized error types for the admin client

use crate::core::messages::Message;
use serde_json::Value;
use thiserror::Error;

/// Failure of a single HTTP round-trip, classified the way callers need to
/// report it
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransportError {
    /// The server answered with a non-2xx status
    #[error("Server responded with status {status}")]
    Response { status: u16, body: Value },

    /// The request went out but nothing came back (connect failure, timeout)
    #[error("No response from server: {0}")]
    NoResponse(String),

    /// The request could not be built or sent
    #[error("Request setup failed: {0}")]
    Setup(String),
}

impl TransportError {
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_builder() {
            TransportError::Setup(err.to_string())
        } else {
            TransportError::NoResponse(err.to_string())
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Response { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Errors from the client-side key/value stores
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Store contents are not valid JSON: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Local, pre-submit form validation failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Name is required")]
    NameRequired,

    #[error("Username is required")]
    UsernameRequired,

    #[error("Role is required")]
    RoleRequired,

    #[error("Selected role does not exist")]
    RoleInvalid,

    #[error("Password is required")]
    PasswordRequired,

    #[error("Password must be at least {min} characters")]
    PasswordTooShort { min: usize },

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Role name is required")]
    RoleNameRequired,

    #[error("Role description is required")]
    RoleDescriptionRequired,

    #[error("Image too large: {size} bytes > {max} bytes")]
    ImageTooLarge { size: usize, max: usize },

    #[error("Form is read-only")]
    ReadOnly,
}

impl ValidationError {
    pub fn message(&self) -> Message {
        match self {
            ValidationError::NameRequired => Message::NameRequired,
            ValidationError::UsernameRequired => Message::UsernameRequired,
            ValidationError::RoleRequired => Message::RoleRequired,
            ValidationError::RoleInvalid => Message::RoleInvalid,
            ValidationError::PasswordRequired => Message::PasswordRequired,
            ValidationError::PasswordTooShort { min } => Message::PasswordTooShort(*min),
            ValidationError::PasswordMismatch => Message::PasswordMismatch,
            ValidationError::RoleNameRequired => Message::RoleNameRequired,
            ValidationError::RoleDescriptionRequired => Message::RoleDescriptionRequired,
            ValidationError::ImageTooLarge { .. } => Message::ImageTooLarge,
            ValidationError::ReadOnly => Message::ReadOnly,
        }
    }
}
