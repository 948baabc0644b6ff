//! Decoding of the backend's response envelopes.
//!
//! The backend is not consistent about wrapping. A body is one of
//!
//! * `{"IndeAPIResponse": {"ErrorCode": "00", "Message": "...", "Result": T}}`
//! * `{"Result": T}`
//! * `T`
//!
//! and the shapes are tried in that order.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ApiError;

pub const WRAPPER_KEY: &str = "IndeAPIResponse";
pub const RESULT_KEY: &str = "Result";
pub const SUCCESS_CODE: &str = "00";

/// The fully wrapped form, with status code and message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(rename = "ErrorCode")]
    pub error_code: String,
    #[serde(rename = "Message", default)]
    pub message: String,
    #[serde(rename = "Result")]
    pub result: Option<T>,
}

impl<T: DeserializeOwned> ApiResponse<T> {
    /// Decodes a body that must carry the wrapper object.
    pub fn from_body(mut body: Value) -> Result<Self, ApiError> {
        match body.get_mut(WRAPPER_KEY).map(Value::take) {
            Some(inner) if inner.is_object() => Ok(serde_json::from_value(inner)?),
            _ => Err(ApiError::Malformed(format!("missing {WRAPPER_KEY}"))),
        }
    }

    /// Checks the code and takes the result, mapping both failure modes to errors.
    ///
    /// A `"Result": null` satisfies callers that expect an optional payload.
    pub fn into_result(self) -> Result<T, ApiError> {
        if !self.is_success() {
            return Err(ApiError::Envelope {
                code: self.error_code,
                message: self.message,
            });
        }
        match self.result {
            Some(result) => Ok(result),
            None => serde_json::from_value(Value::Null)
                .map_err(|_| ApiError::Malformed("envelope has no Result".to_string())),
        }
    }
}

impl<T> ApiResponse<T> {
    pub fn is_success(&self) -> bool {
        self.error_code == SUCCESS_CODE
    }
}

/// Which of the three shapes a body arrived in.
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope<T> {
    Wrapped(ApiResponse<T>),
    Bare(T),
    Raw(T),
}

impl<T: DeserializeOwned> Envelope<T> {
    /// Tries the wrapped, bare and raw shapes in turn.
    ///
    /// A wrapper counts when it carries a `Result` or a failure code. The
    /// `Result` of a failed call is dropped, since it need not look like `T`.
    pub fn decode(mut body: Value) -> Result<Self, ApiError> {
        if let Some(inner) = body.get_mut(WRAPPER_KEY).and_then(Value::as_object_mut) {
            let failed = inner
                .get("ErrorCode")
                .and_then(Value::as_str)
                .is_some_and(|code| code != SUCCESS_CODE);
            if failed {
                inner.remove(RESULT_KEY);
            }
            if failed || inner.contains_key(RESULT_KEY) {
                return ApiResponse::from_body(body).map(Envelope::Wrapped);
            }
        }
        if let Some(result) = body.as_object_mut().and_then(|o| o.remove(RESULT_KEY)) {
            return Ok(Envelope::Bare(serde_json::from_value(result)?));
        }
        Ok(Envelope::Raw(serde_json::from_value(body)?))
    }

    /// The payload, whatever shape carried it. A wrapped failure code is an error.
    pub fn into_payload(self) -> Result<T, ApiError> {
        match self {
            Envelope::Wrapped(resp) => resp.into_result(),
            Envelope::Bare(v) | Envelope::Raw(v) => Ok(v),
        }
    }
}

/// Decodes a response body and checks the wrapper's code when there is one.
pub fn decode_checked<T: DeserializeOwned>(body: Value) -> Result<T, ApiError> {
    Envelope::decode(body)?.into_payload()
}

/// Extracts the domain payload from any envelope shape.
///
/// Shape selection itself never fails; only a payload that does not match
/// `T` is reported, as [`ApiError::Decode`].
pub fn unwrap_result<T: DeserializeOwned>(mut body: Value) -> Result<T, ApiError> {
    if let Some(result) = body
        .get_mut(WRAPPER_KEY)
        .and_then(Value::as_object_mut)
        .and_then(|o| o.remove(RESULT_KEY))
    {
        return Ok(serde_json::from_value(result)?);
    }
    if let Some(result) = body.as_object_mut().and_then(|o| o.remove(RESULT_KEY)) {
        return Ok(serde_json::from_value(result)?);
    }
    Ok(serde_json::from_value(body)?)
}

/// Best-effort message from an error body, used for non-2xx responses.
pub fn message_of(body: &Value) -> Option<String> {
    body.get(WRAPPER_KEY)
        .and_then(|w| w.get("Message"))
        .or_else(|| body.get("Message"))
        .or_else(|| body.get("detail"))
        .and_then(Value::as_str)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}
