//! Request and Response message types for the secure transport.
//!
//! Requests are node RPC calls tunnelled through the background process.

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::identifiers::RequestId;

// ============================================================================
// Request
// ============================================================================

/// A call from the bar to the node.
///
/// # Format
///
/// ```json
/// {
///   "id": "uuid",
///   "method": "parity_defaultAccount",
///   "params": []
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    /// Unique identifier for request/response correlation.
    pub id: RequestId,

    /// RPC method name.
    pub method: String,

    /// RPC parameters.
    #[serde(default)]
    pub params: Value,
}

impl Request {
    /// Creates a new request with auto-generated ID.
    #[inline]
    #[must_use]
    pub fn new(method: impl Into<String>, params: Value) -> Self {
        Self {
            id: RequestId::generate(),
            method: method.into(),
            params,
        }
    }
}

// ============================================================================
// Response
// ============================================================================

/// The node's answer to a [`Request`].
///
/// # Format
///
/// Success:
/// ```json
/// { "id": "uuid", "result": "0x..." }
/// ```
///
/// Error:
/// ```json
/// { "id": "uuid", "error": { "code": -32601, "message": "Method not found" } }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    /// Matches the request `id`.
    pub id: RequestId,

    /// Result data (if success).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,

    /// Error payload (if error).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
}

impl Response {
    /// Creates a success response.
    #[inline]
    #[must_use]
    pub fn success(id: RequestId, result: Value) -> Self {
        Self {
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Creates an error response.
    #[inline]
    #[must_use]
    pub fn failure(id: RequestId, error: Value) -> Self {
        Self {
            id,
            result: None,
            error: Some(error),
        }
    }

    /// Returns `true` if this is an error response.
    #[inline]
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Extracts the result value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Rpc`] if the response carries an error.
    pub fn into_result(self) -> Result<Value> {
        match self.error {
            None => Ok(self.result.unwrap_or(Value::Null)),
            Some(error) => {
                let message = error
                    .get("message")
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .unwrap_or_else(|| error.to_string());
                Err(Error::rpc(message))
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
