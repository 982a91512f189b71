//! Status-plus-body results returned by every operation.

use crate::error::ApiError;

/// Body of an API response: decoded JSON on 200, raw text otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseBody<T> {
    Parsed(T),
    Raw(String),
}

/// The `(status, body)` pair produced by one API call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse<T> {
    pub status: u16,
    pub body: ResponseBody<T>,
}

impl<T> ApiResponse<T> {
    pub fn parsed(status: u16, value: T) -> Self {
        Self {
            status,
            body: ResponseBody::Parsed(value),
        }
    }

    pub fn raw(status: u16, text: impl Into<String>) -> Self {
        Self {
            status,
            body: ResponseBody::Raw(text.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == 200
    }

    /// The decoded body, if the call succeeded.
    pub fn value(&self) -> Option<&T> {
        match &self.body {
            ResponseBody::Parsed(value) => Some(value),
            ResponseBody::Raw(_) => None,
        }
    }

    /// The raw error text, if the call did not succeed.
    pub fn text(&self) -> Option<&str> {
        match &self.body {
            ResponseBody::Parsed(_) => None,
            ResponseBody::Raw(text) => Some(text),
        }
    }

    /// Whether the raw error text contains `needle`. Always false on success.
    pub fn body_contains(&self, needle: &str) -> bool {
        self.text().is_some_and(|text| text.contains(needle))
    }

    /// Unwrap the decoded body, turning any other outcome into
    /// [`ApiError::Http`].
    pub fn into_parsed(self) -> Result<T, ApiError> {
        match self.body {
            ResponseBody::Parsed(value) => Ok(value),
            ResponseBody::Raw(body) => Err(ApiError::Http {
                status: self.status,
                body,
            }),
        }
    }
}
