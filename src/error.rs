//! Error types.
//!
//! [`Error`] surfaces infrastructure failures: binding to a port or
//! accepting a connection. Application-level failures (404, 422, ...) are
//! [`ApiError`]s, which handlers return and which render as HTTP responses.

use serde_json::json;

use crate::method::Method;
use crate::response::{IntoResponse, Json, Response};
use crate::status::Status;
use crate::validation::ValidationErrors;

/// The error type returned by the server's fallible operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

/// A request the service refuses, rendered as `{"detail": ...}`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// One or more inputs violated their constraints.
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    /// A lookup missed.
    #[error("not found: {0}")]
    NotFound(String),

    /// The path exists under other methods only.
    #[error("method not allowed")]
    MethodNotAllowed { allow: Vec<Method> },

    /// The body could not be framed (unreadable stream, broken multipart).
    #[error("malformed body: {0}")]
    MalformedBody(String),

    /// A response could not be built.
    #[error("internal: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> Status {
        match self {
            Self::Validation(_)           => Status::UnprocessableContent,
            Self::NotFound(_)             => Status::NotFound,
            Self::MethodNotAllowed { .. } => Status::MethodNotAllowed,
            Self::MalformedBody(_)        => Status::BadRequest,
            Self::Internal(_)             => Status::InternalServerError,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            Self::Validation(errors) => json!({ "detail": errors }),
            Self::NotFound(message) => json!({ "detail": message }),
            Self::MethodNotAllowed { .. } => json!({ "detail": "Method Not Allowed" }),
            Self::MalformedBody(_) => json!({ "detail": "There was an error parsing the body" }),
            Self::Internal(_) => json!({ "detail": "Internal Server Error" }),
        };
        let mut res = (status, Json(body)).into_response();
        if let Self::MethodNotAllowed { allow } = self {
            let allow: Vec<&str> = allow.iter().map(|m| m.as_str()).collect();
            res.headers.push(("allow".to_owned(), allow.join(", ")));
        }
        res
    }
}

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use super::*;
    use crate::validation::{FieldError, Loc};

    fn body(res: &Response) -> Value {
        serde_json::from_slice(res.body()).unwrap()
    }

    #[test]
    fn validation_renders_422_with_detail_list() {
        let mut errors = ValidationErrors::new();
        errors.push(FieldError::missing(Loc::new("query").child("age")));
        let res = ApiError::from(errors).into_response();
        assert_eq!(res.status_code(), 422);
        assert_eq!(body(&res)["detail"][0]["loc"], serde_json::json!(["query", "age"]));
    }

    #[test]
    fn not_found_carries_its_message() {
        let res = ApiError::NotFound("gone".into()).into_response();
        assert_eq!(res.status_code(), 404);
        assert_eq!(body(&res), serde_json::json!({"detail": "gone"}));
    }

    #[test]
    fn method_not_allowed_lists_allowed_methods() {
        let res = ApiError::MethodNotAllowed { allow: vec![Method::Get, Method::Put] }.into_response();
        assert_eq!(res.status_code(), 405);
        assert_eq!(res.header("allow"), Some("GET, PUT"));
    }

    #[test]
    fn malformed_body_hides_parser_details() {
        let res = ApiError::MalformedBody("boundary missing".into()).into_response();
        assert_eq!(res.status_code(), 400);
        assert_eq!(body(&res)["detail"], "There was an error parsing the body");
    }
}
