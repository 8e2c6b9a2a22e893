use hyper::StatusCode;
use poem::IntoResponse;
use serde::Serialize;
use tracing::{event, Level};

use crate::Error;

/// Registry api error codes returned by the listing endpoints,
///
/// ```markdown
/// | Code                      | Status | Message                                |
/// | ------------------------- | ------ | -------------------------------------- |
/// | UNKNOWN                   | 500    | unknown error                          |
/// | NAME_UNKNOWN              | 404    | repository name not known to registry  |
/// | NAME_INVALID              | 400    | invalid repository name                |
/// | PAGINATION_NUMBER_INVALID | 400    | invalid number of results requested    |
/// | UNSUPPORTED               | 405    | The operation is unsupported.          |
/// ```
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    Unknown,
    NameUnknown,
    NameInvalid,
    PaginationNumberInvalid,
    Unsupported,
}

impl ErrorCode {
    /// Returns the message clients see for this code,
    ///
    pub fn message(&self) -> &'static str {
        match self {
            ErrorCode::Unknown => "unknown error",
            ErrorCode::NameUnknown => "repository name not known to registry",
            ErrorCode::NameInvalid => "invalid repository name",
            ErrorCode::PaginationNumberInvalid => "invalid number of results requested",
            ErrorCode::Unsupported => "The operation is unsupported.",
        }
    }

    /// Returns the http status code this error is rendered with,
    ///
    pub fn status(&self) -> StatusCode {
        match self {
            ErrorCode::Unknown => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorCode::NameUnknown => StatusCode::NOT_FOUND,
            ErrorCode::NameInvalid | ErrorCode::PaginationNumberInvalid => StatusCode::BAD_REQUEST,
            ErrorCode::Unsupported => StatusCode::METHOD_NOT_ALLOWED,
        }
    }

    /// Returns a registry error w/ this code and no detail,
    ///
    pub fn into_error(self) -> RegistryError {
        RegistryError {
            code: self,
            message: self.message().to_string(),
            detail: None,
        }
    }

    /// Returns a registry error w/ this code and a structured detail,
    ///
    pub fn with_detail(self, detail: impl Serialize) -> RegistryError {
        let detail = match serde_json::to_value(detail) {
            Ok(detail) => Some(detail),
            Err(err) => {
                event!(Level::WARN, "Could not serialize error detail, {err}");
                None
            }
        };

        RegistryError {
            detail,
            ..self.into_error()
        }
    }
}

/// A single error entry of an error response,
///
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegistryError {
    code: ErrorCode,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<serde_json::Value>,
}

impl RegistryError {
    /// Returns the error code,
    ///
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Returns the detail attached to this error, if any,
    ///
    pub fn detail(&self) -> Option<&serde_json::Value> {
        self.detail.as_ref()
    }
}

impl From<Error> for RegistryError {
    fn from(value: Error) -> Self {
        ErrorCode::Unknown.with_detail(value.to_string())
    }
}

/// Errors recorded while handling a single request,
///
/// Rendered as `{"errors": [...]}` w/ the status of the first error,
///
#[derive(Debug, Default, Serialize)]
pub struct Errors {
    errors: Vec<RegistryError>,
}

impl Errors {
    /// Records an error,
    ///
    pub fn push(&mut self, error: impl Into<RegistryError>) {
        self.errors.push(error.into());
    }

    /// Returns the recorded errors,
    ///
    pub fn errors(&self) -> &[RegistryError] {
        self.errors.as_slice()
    }

    /// Returns the status code for this response,
    ///
    pub fn status(&self) -> StatusCode {
        self.errors
            .first()
            .map(|e| e.code.status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl From<RegistryError> for Errors {
    fn from(value: RegistryError) -> Self {
        Errors {
            errors: vec![value],
        }
    }
}

impl From<Error> for Errors {
    fn from(value: Error) -> Self {
        RegistryError::from(value).into()
    }
}

impl IntoResponse for Errors {
    fn into_response(self) -> poem::Response {
        let status = self.status();
        event!(Level::DEBUG, "Responding w/ errors, {status} {:?}", self.errors);

        let body = serde_json::to_vec(&self).unwrap_or_else(|err| {
            event!(Level::ERROR, "Could not serialize errors, {err}");
            br#"{"errors":[{"code":"UNKNOWN","message":"unknown error"}]}"#.to_vec()
        });

        poem::Response::builder()
            .status(status)
            .content_type(crate::JSON_CONTENT_TYPE)
            .body(body)
    }
}
