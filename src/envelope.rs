//! The wire envelopes shared by client and server.
//!
//! A request is `{"method": <name>, "params": [<arg>, ...]}`; a response is
//! either `{"result": <value>}` or `{"error": {"message": ..., "stack": ...}}`,
//! never both. Encoding and decoding here is pure translation, no I/O.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// One remote call: a method name and its positional arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    pub method: String,
    #[serde(default)]
    pub params: Vec<Value>,
}

impl Request {
    pub fn new(method: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            method: method.into(),
            params,
        }
    }
}

/// The error payload carried by a failure envelope.
///
/// One type serves both ends of the wire: the server encodes it and the
/// client decodes it and raises it as an ordinary error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Error)]
#[error("{message}")]
pub struct Fault {
    pub message: String,
    #[serde(default)]
    pub stack: String,
}

impl Fault {
    /// A fault with the given message and an empty stack.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            stack: String::new(),
        }
    }

    pub fn with_stack(message: impl Into<String>, stack: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            stack: stack.into(),
        }
    }

    /// Builds a fault from any error, rendering its source chain into the
    /// stack field.
    pub fn from_error(err: &(dyn std::error::Error + 'static)) -> Self {
        let message = err.to_string();
        let mut stack = message.clone();
        let mut source = err.source();
        while let Some(cause) = source {
            stack.push_str("\ncaused by: ");
            stack.push_str(&cause.to_string());
            source = cause.source();
        }
        Self { message, stack }
    }
}

/// A response envelope: exactly one of `result` or `error`.
///
/// Field presence is what distinguishes the variants, so `{"result": null}`
/// is a success carrying `null`. An object with neither field does not
/// decode. If a peer ever sends both, `result` wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Response {
    Success { result: Value },
    Failure { error: Fault },
}

impl Response {
    pub fn success(result: Value) -> Self {
        Self::Success { result }
    }

    pub fn failure(error: Fault) -> Self {
        Self::Failure { error }
    }

    /// Splits the envelope into the outcome it reports.
    pub fn into_outcome(self) -> Result<Value, Fault> {
        match self {
            Self::Success { result } => Ok(result),
            Self::Failure { error } => Err(error),
        }
    }

    /// Serializes the envelope to its wire form.
    ///
    /// `Value` and `Fault` payloads always serialize; should that contract
    /// ever break, a constant failure envelope is returned so the server
    /// side can still answer.
    pub fn render(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| FALLBACK_FAILURE.to_owned())
    }
}

const FALLBACK_FAILURE: &str =
    r#"{"error":{"message":"failed to serialize response envelope","stack":""}}"#;

#[derive(Debug, Error)]
pub enum EnvelopeError {
    #[error("malformed request: {0}")]
    MalformedRequest(#[source] serde_json::Error),

    #[error("malformed response: {0}")]
    MalformedResponse(#[source] serde_json::Error),

    #[error("encoding request: {0}")]
    Encode(#[source] serde_json::Error),
}

pub fn encode_request(method: &str, params: &[Value]) -> Result<String, EnvelopeError> {
    #[derive(Serialize)]
    struct RequestRef<'a> {
        method: &'a str,
        params: &'a [Value],
    }
    serde_json::to_string(&RequestRef { method, params }).map_err(EnvelopeError::Encode)
}

/// Decodes a complete request payload.
///
/// A missing `params` field decodes as the empty sequence; a missing
/// `method` field or invalid JSON is a [`EnvelopeError::MalformedRequest`].
pub fn decode_request(payload: &[u8]) -> Result<Request, EnvelopeError> {
    serde_json::from_slice(payload).map_err(EnvelopeError::MalformedRequest)
}

pub fn encode_success(result: Value) -> String {
    Response::success(result).render()
}

pub fn encode_failure(fault: Fault) -> String {
    Response::failure(fault).render()
}

pub fn decode_response(text: &str) -> Result<Response, EnvelopeError> {
    serde_json::from_str(text).map_err(EnvelopeError::MalformedResponse)
}
