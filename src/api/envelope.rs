// Uniform result shape returned by every resource operation

use crate::core::error::TransportError;
use crate::core::messages::{Locale, Message};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, warn};

/// `{success, message?, data?, error?}`
///
/// `success` is the single discriminant callers branch on. On success `data`
/// holds the backend payload verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
}

impl Envelope {
    /// Wrap a 2xx payload. A payload that itself says `"success": false` is
    /// still a failure.
    pub fn from_payload(payload: Value) -> Self {
        let success = payload
            .get("success")
            .and_then(Value::as_bool)
            .unwrap_or(true);
        let message = payload
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string);
        let error = if success {
            None
        } else {
            payload.get("error").cloned()
        };

        Self {
            success,
            message,
            data: Some(payload),
            error,
        }
    }

    pub fn failure(message: String, error: Value) -> Self {
        Self {
            success: false,
            message: Some(message),
            data: None,
            error: Some(error),
        }
    }

    /// Classify a transport failure. `fallback` is used when the server
    /// answered without a message of its own.
    pub fn from_error(err: TransportError, fallback: Message, locale: Locale) -> Self {
        match err {
            TransportError::Response { body, .. } => {
                let message = body
                    .get("message")
                    .and_then(Value::as_str)
                    .filter(|m| !m.is_empty())
                    .map(str::to_string)
                    .unwrap_or_else(|| fallback.text(locale));
                Self::failure(message, body)
            }
            TransportError::NoResponse(_) => Self::failure(
                Message::CannotConnect.text(locale),
                Value::String("Network error".to_string()),
            ),
            TransportError::Setup(reason) => {
                Self::failure(Message::InternalError.text(locale), Value::String(reason))
            }
        }
    }

    /// Best message to show the operator, falling back to a string `error`
    /// and then to `fallback`
    pub fn display_message(&self, fallback: Message, locale: Locale) -> String {
        self.message
            .clone()
            .filter(|m| !m.is_empty())
            .or_else(|| self.error.as_ref().and_then(Value::as_str).map(str::to_string))
            .unwrap_or_else(|| fallback.text(locale))
    }

    pub fn data(&self) -> Option<&Value> {
        self.data.as_ref()
    }

    /// First array found under one of `keys`, or the payload itself when it
    /// is a bare array
    pub fn collection(&self, keys: &[&str]) -> Option<&Vec<Value>> {
        let data = self.data.as_ref()?;
        if let Some(found) = keys.iter().find_map(|key| data.get(*key).and_then(Value::as_array)) {
            return Some(found);
        }
        data.as_array()
    }

    /// Entity nested under one of `keys`, or the payload itself when it looks
    /// like a bare entity (an object carrying an `id`)
    pub fn entity(&self, keys: &[&str]) -> Option<&Value> {
        let data = self.data.as_ref()?;
        if let Some(found) = keys
            .iter()
            .find_map(|key| data.get(*key).filter(|value| value.is_object()))
        {
            return Some(found);
        }
        data.get("id").map(|_| data)
    }

    /// First numeric value among `keys`
    pub fn count(&self, keys: &[&str]) -> Option<u64> {
        let data = self.data.as_ref()?;
        keys.iter()
            .find_map(|key| data.get(*key).and_then(Value::as_u64))
    }
}

/// Turn a transport result into an envelope, logging failures under the
/// operation name
pub(crate) fn normalize(
    operation: &str,
    result: Result<Value, TransportError>,
    fallback: Message,
    locale: Locale,
) -> Envelope {
    match result {
        Ok(payload) => Envelope::from_payload(payload),
        Err(e) => {
            error!(operation, error = %e, "API call failed");
            Envelope::from_error(e, fallback, locale)
        }
    }
}

pub fn decode<T: DeserializeOwned>(value: &Value) -> Option<T> {
    serde_json::from_value(value.clone()).ok()
}

pub fn decode_all<T: DeserializeOwned>(values: &[Value]) -> Option<Vec<T>> {
    values.iter().map(decode).collect()
}

/// Decode each record on its own, skipping the ones that do not fit `T`
pub fn decode_each<T: DeserializeOwned>(values: &[Value]) -> Vec<T> {
    values
        .iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value(value.clone()) {
            Ok(item) => Some(item),
            Err(e) => {
                warn!(index, error = %e, "Skipping undecodable record");
                None
            }
        })
        .collect()
}
