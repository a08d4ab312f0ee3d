//! Localized error messages
//!
//! Every user-facing validation failure is identified by a [`MessageKind`] and
//! rendered through the table for the client's [`Language`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Language of the messages produced by the client
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Ru,
    En,
}

impl Language {
    /// Get the language code
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Ru => "ru",
            Language::En => "en",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = crate::AlfabankError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ru" => Ok(Language::Ru),
            "en" => Ok(Language::En),
            other => Err(crate::AlfabankError::config(format!(
                "Unsupported language: {other}"
            ))),
        }
    }
}

/// Identifier of a localized message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    /// The operation is not in the gateway's allow-list
    OperationError,
    /// Parameters are not a flat key/value mapping
    ParamsInvalid,
    /// No callable completion callback was supplied
    CallbackInvalid,
    /// A required value is missing or empty
    ValueInvalid,
    /// A value has the wrong type (e.g. a non-numeric amount)
    ValueTypeInvalid,
    /// Neither a token nor a username/password pair was configured
    AuthInvalid,
}

impl MessageKind {
    /// All message identifiers
    pub const ALL: [MessageKind; 6] = [
        MessageKind::OperationError,
        MessageKind::ParamsInvalid,
        MessageKind::CallbackInvalid,
        MessageKind::ValueInvalid,
        MessageKind::ValueTypeInvalid,
        MessageKind::AuthInvalid,
    ];

    /// Stable identifier of the message
    pub fn id(&self) -> &'static str {
        match self {
            MessageKind::OperationError => "operation_error",
            MessageKind::ParamsInvalid => "params_invalid",
            MessageKind::CallbackInvalid => "callback_invalid",
            MessageKind::ValueInvalid => "value_invalid",
            MessageKind::ValueTypeInvalid => "value_type_invalid",
            MessageKind::AuthInvalid => "auth_invalid",
        }
    }

    /// Message text in the given language
    pub fn text(&self, language: Language) -> &'static str {
        match language {
            Language::Ru => ru(*self),
            Language::En => en(*self),
        }
    }

    /// Message text followed by the name of the offending field
    pub fn with_field(&self, language: Language, field: &str) -> String {
        format!("{}: {}", self.text(language), field)
    }
}

fn ru(kind: MessageKind) -> &'static str {
    match kind {
        MessageKind::OperationError => "Указанная операция не определена в документации банка",
        MessageKind::ParamsInvalid => "Параметры должны быть переданы в виде объекта",
        MessageKind::CallbackInvalid => "Требуется функция обратного вызова",
        MessageKind::ValueInvalid => "Не задано обязательное значение",
        MessageKind::ValueTypeInvalid => "Значение должно быть числом",
        MessageKind::AuthInvalid => "Требуется токен или пара логин и пароль",
    }
}

fn en(kind: MessageKind) -> &'static str {
    match kind {
        MessageKind::OperationError => {
            "The specified operation is not defined in the banks documentation"
        }
        MessageKind::ParamsInvalid => "Parameters must be passed as an object",
        MessageKind::CallbackInvalid => "Callback function required",
        MessageKind::ValueInvalid => "Required value is missing",
        MessageKind::ValueTypeInvalid => "Value must be a number",
        MessageKind::AuthInvalid => "Either a token or a username and password is required",
    }
}
