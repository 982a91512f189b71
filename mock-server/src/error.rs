use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Rejections produced by the service. Bodies are plain text, like the live
/// service's error pages.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("This user wasn't found in database")]
    UnknownUser,

    #[error("Please provide 'auth_key' Header")]
    MissingAuthKey,

    #[error("The provided auth_key is incorrect")]
    InvalidAuthKey,

    #[error("Filter value is incorrect: '{0}'. Allowed values are '' and 'my_pets'")]
    BadFilter(String),

    #[error("Pet with this id wasn't found!")]
    PetNotFound,

    #[error("{0}")]
    BadRequest(String),

    #[error("malformed multipart body: {}", .0.body_text())]
    Multipart(#[from] MultipartError),
}

impl ServiceError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServiceError::UnknownUser
            | ServiceError::MissingAuthKey
            | ServiceError::InvalidAuthKey => StatusCode::FORBIDDEN,
            ServiceError::BadFilter(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ServiceError::PetNotFound | ServiceError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServiceError::Multipart(err) => err.status(),
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        tracing::debug!(status = %self.status(), reason = %self, "request rejected");
        (self.status(), self.to_string()).into_response()
    }
}
