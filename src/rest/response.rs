use serde::Serialize;
use serde_json::Value;

use crate::error::Error;

/// Body returned by create calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdResponse {
    /// Identifier the entity was stored under
    pub id: String,
}

impl IdResponse {
    /// Wraps an id.
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// Body returned for failed calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorResponse {
    /// HTTP status code
    pub status: u16,
    /// Human-readable failure description
    pub message: String,
}

impl From<&Error> for ErrorResponse {
    fn from(err: &Error) -> Self {
        let status = err.status_code();
        // collaborator internals stay out of server error bodies
        let message = if status >= 500 {
            "internal server error".to_string()
        } else {
            err.to_string()
        };
        Self { status, message }
    }
}

/// Status code plus JSON body, ready to be written by the HTTP framework.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    /// HTTP status code
    pub status: u16,
    /// JSON body
    pub body: Value,
}

impl ApiResponse {
    /// Builds the response for the outcome of a REST call.
    ///
    /// # Examples
    ///
    /// ```
    /// use content_aggregator::Error;
    /// use content_aggregator::rest::{ApiResponse, IdResponse};
    ///
    /// let ok = ApiResponse::from_result(Ok::<_, Error>(IdResponse::new("p1")));
    /// assert_eq!(ok.status, 200);
    /// assert_eq!(ok.body["id"], "p1");
    ///
    /// let missing = ApiResponse::from_result(Err::<IdResponse, _>(Error::required_field("code")));
    /// assert_eq!(missing.status, 400);
    /// ```
    pub fn from_result<T: Serialize>(result: Result<T, Error>) -> Self {
        match result {
            Ok(body) => match serde_json::to_value(body) {
                Ok(body) => Self { status: 200, body },
                Err(e) => {
                    tracing::error!(error = %e, "response serialization failed");
                    Self::error(&Error::Serialization(e))
                }
            },
            Err(err) => Self::error(&err),
        }
    }

    /// Builds the response for a failed call.
    pub fn error(err: &Error) -> Self {
        let body = ErrorResponse::from(err);
        Self {
            status: body.status,
            body: serde_json::json!({ "status": body.status, "message": body.message }),
        }
    }
}
