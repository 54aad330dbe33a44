use uuid::Uuid;

use crate::{
    core::security::{get_request_user, BearerAuthorization},
    model::user::User,
    schema::common::{FailureResponses, InternalServerErrorResponse},
    AppState,
};

pub mod auth;
pub mod essay;
#[cfg(test)]
mod essay_test;
pub mod lab;
pub mod outreach;
pub mod profile;

/// The user behind the bearer token, or the 401/500 response to return.
pub(crate) async fn authenticate<R: FailureResponses>(
    state: &AppState,
    auth: BearerAuthorization,
    module: &str,
    function: &str,
) -> Result<User, R> {
    match get_request_user(state, auth.0.token).await {
        Ok(Some(user)) => Ok(user),
        Ok(None) => Err(R::unauthorized()),
        Err(err) => Err(R::internal_server_error(InternalServerErrorResponse::new(
            module,
            function,
            "get user from token",
            &err.to_string(),
        ))),
    }
}

pub(crate) fn parse_id<R: FailureResponses>(field: &str, value: &str) -> Result<Uuid, R> {
    Uuid::parse_str(value.trim())
        .map_err(|_| R::bad_request(format!("{} is not a valid id", field)))
}
