use axum::{
    http::header,
    response::{IntoResponse, Response},
};
use lectern_api::Error as ApiError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),

    #[error(transparent)]
    Api(#[from] ApiError),
}

impl Error {
    pub fn forbidden() -> Error {
        Error::Api(ApiError::Forbidden)
    }

    /// What the client gets to see, internal failures being logged here
    fn into_api(self) -> ApiError {
        match self {
            Error::Api(err) => {
                tracing::info!(kind = ?err.kind(), "refusing request: {err}");
                err
            }
            Error::Anyhow(err) => {
                tracing::error!(?err, "internal server error");
                ApiError::Unknown(internal_message(&err))
            }
        }
    }
}

#[cfg(not(test))]
fn internal_message(_err: &anyhow::Error) -> String {
    String::from("Internal server error, see logs for details")
}

#[cfg(test)]
fn internal_message(err: &anyhow::Error) -> String {
    format!("Internal server error: {err:?}")
}

fn json_response(err: &ApiError) -> Response {
    let content_type = [(header::CONTENT_TYPE, "application/json")];
    (err.status_code(), content_type, err.contents()).into_response()
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        json_response(&self.into_api())
    }
}
