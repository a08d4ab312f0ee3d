//! Error types for the alfabank library

use crate::messages::{Language, MessageKind};
use crate::types::GatewayResponse;
use thiserror::Error;

/// Result type alias for alfabank operations
pub type Result<T> = std::result::Result<T, AlfabankError>;

/// Main error type for alfabank operations
#[derive(Error, Debug)]
pub enum AlfabankError {
    /// Client misconfiguration detected at construction time
    #[error("{message}")]
    Config {
        message: String,
        kind: Option<MessageKind>,
    },

    /// A convenience method received a missing or mistyped argument
    #[error("{message}")]
    InvalidArgument {
        kind: MessageKind,
        field: String,
        message: String,
    },

    /// Local validation of the operation or its parameters failed
    #[error("{message}")]
    Validation { kind: MessageKind, message: String },

    /// The gateway answered with a truthy `errorCode`
    #[error("Gateway error {}", gateway_summary(.0))]
    Gateway(GatewayResponse),

    /// The gateway answered with something other than a JSON object
    #[error("Invalid gateway response: {message}")]
    InvalidResponse { message: String },

    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AlfabankError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            kind: None,
        }
    }

    /// Create the localized "no usable credentials" error
    pub fn auth_invalid(language: Language) -> Self {
        Self::Config {
            message: MessageKind::AuthInvalid.text(language).to_string(),
            kind: Some(MessageKind::AuthInvalid),
        }
    }

    /// Create a localized argument error naming the offending field
    pub fn invalid_argument(kind: MessageKind, language: Language, field: impl Into<String>) -> Self {
        let field = field.into();
        Self::InvalidArgument {
            message: kind.with_field(language, &field),
            kind,
            field,
        }
    }

    /// Create a localized validation error
    pub fn validation(kind: MessageKind, language: Language) -> Self {
        Self::Validation {
            kind,
            message: kind.text(language).to_string(),
        }
    }

    /// Create an invalid response error
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            message: message.into(),
        }
    }

    /// The message identifier behind a localized error, if any
    pub fn message_kind(&self) -> Option<MessageKind> {
        match self {
            Self::Config { kind, .. } => *kind,
            Self::InvalidArgument { kind, .. } | Self::Validation { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    /// The gateway payload carried by a remote failure
    pub fn gateway_response(&self) -> Option<&GatewayResponse> {
        match self {
            Self::Gateway(response) => Some(response),
            _ => None,
        }
    }

    /// Whether the error was raised before any request was sent
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            Self::Config { .. } | Self::InvalidArgument { .. } | Self::Validation { .. }
        )
    }
}

fn gateway_summary(response: &GatewayResponse) -> String {
    format!(
        "{}: {}",
        response.error_code_display(),
        response.error_message().unwrap_or("no message")
    )
}
