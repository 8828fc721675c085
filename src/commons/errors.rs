use actix_web::{
    error::{InternalError, PathError},
    http::StatusCode,
    HttpRequest, HttpResponse,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Every error the API can surface. The messages are part of the HTTP contract.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("reservation not found")]
    ReservationNotFound,

    #[error("user not found")]
    UserNotFound,

    #[error("hotel not found")]
    HotelNotFound,

    #[error("amenity not found")]
    AmenityNotFound,

    #[error("image not found")]
    ImageNotFound,

    #[error("a reservation cant end before it starts")]
    InvalidDateRange,

    #[error("there are no rooms available")]
    NoRoomsAvailable,

    #[error("can't delete a reservation 48hs before it starts")]
    CancellationWindowClosed,

    #[error("error creating {0}")]
    CreationFailed(&'static str),

    #[error("error updating {0}")]
    UpdateFailed(&'static str),

    #[error("user not registered")]
    UserNotRegistered,

    #[error("incorrect password")]
    IncorrectPassword,

    #[error("failed to insert images")]
    ImagesInsertFailed,

    #[error("failed to delete reservation")]
    ReservationDeleteFailed,

    #[error("failed to delete hotel")]
    HotelDeleteFailed,

    #[error("failed to fetch {0}")]
    FetchFailed(&'static str),

    #[error("invalid path parameter")]
    InvalidPath,
}

impl ServiceError {
    pub fn respond(&self, status: StatusCode) -> HttpResponse {
        HttpResponse::build(status).json(ErrorResponse::from(self))
    }
}

/// `web::PathConfig` handler: malformed ids get the JSON error body too.
pub fn path_error_handler(err: PathError, _req: &HttpRequest) -> actix_web::Error {
    let response = ServiceError::InvalidPath.respond(StatusCode::BAD_REQUEST);
    InternalError::from_response(err, response).into()
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub error: String,
}

impl From<&ServiceError> for ErrorResponse {
    fn from(e: &ServiceError) -> Self {
        Self { error: e.to_string() }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}
