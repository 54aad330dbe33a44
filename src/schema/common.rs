use poem_openapi::Object;
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::core::error::ErrorKind;

#[derive(Object, Deserialize, Serialize)]
pub struct BadRequestResponse {
    pub message: String,
}

#[derive(Object, Deserialize, Serialize)]
pub struct UnauthorizedResponse {
    pub message: String,
}

impl Default for UnauthorizedResponse {
    fn default() -> Self {
        Self {
            message: "Unauthorized".to_string(),
        }
    }
}

#[derive(Object, Deserialize, Serialize)]
pub struct NotFoundResponse {
    pub message: String,
}

#[derive(Object, Deserialize, Serialize)]
pub struct ConflictResponse {
    pub message: String,
}

#[derive(Object, Deserialize, Serialize)]
pub struct InternalServerErrorResponse {
    pub message: String,
}

impl InternalServerErrorResponse {
    /// Logs where the failure happened and hides the details from the client.
    pub fn new(module: &str, function: &str, step: &str, err: &str) -> Self {
        error!("{}.{} failed at {}: {}", module, function, step, err);
        Self {
            message: "Internal Server Error".to_string(),
        }
    }
}

/// Response enums that can carry every failure a facade reports.
pub trait FailureResponses: Sized {
    fn bad_request(message: String) -> Self;
    fn unauthorized() -> Self;
    fn not_found(message: String) -> Self;
    fn conflict(message: String) -> Self;
    fn internal_server_error(body: InternalServerErrorResponse) -> Self;

    /// Map a facade failure onto the matching status.
    fn from_failure(
        kind: Option<ErrorKind>,
        message: String,
        module: &str,
        function: &str,
    ) -> Self {
        match kind {
            Some(ErrorKind::InvalidInput) => Self::bad_request(message),
            Some(ErrorKind::Unauthenticated) => Self::unauthorized(),
            Some(ErrorKind::NotFound) => Self::not_found(message),
            Some(ErrorKind::InFlight) => Self::conflict(message),
            _ => Self::internal_server_error(InternalServerErrorResponse::new(
                module, function, "run", &message,
            )),
        }
    }
}

/// Implements [`FailureResponses`] for an `ApiResponse` enum with
/// `BadRequest`, `Unauthorized`, `NotFound`, `Conflict` and
/// `InternalServerError` variants.
#[macro_export]
macro_rules! impl_failure_responses {
    ($name:ident) => {
        impl $crate::schema::common::FailureResponses for $name {
            fn bad_request(message: String) -> Self {
                $name::BadRequest(poem_openapi::payload::Json(
                    $crate::schema::common::BadRequestResponse { message },
                ))
            }

            fn unauthorized() -> Self {
                $name::Unauthorized(poem_openapi::payload::Json(
                    $crate::schema::common::UnauthorizedResponse::default(),
                ))
            }

            fn not_found(message: String) -> Self {
                $name::NotFound(poem_openapi::payload::Json(
                    $crate::schema::common::NotFoundResponse { message },
                ))
            }

            fn conflict(message: String) -> Self {
                $name::Conflict(poem_openapi::payload::Json(
                    $crate::schema::common::ConflictResponse { message },
                ))
            }

            fn internal_server_error(
                body: $crate::schema::common::InternalServerErrorResponse,
            ) -> Self {
                $name::InternalServerError(poem_openapi::payload::Json(body))
            }
        }
    };
}
