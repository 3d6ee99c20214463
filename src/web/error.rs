use std::sync::Arc;

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use strum_macros::AsRefStr;

use crate::{model::ModelError, store::StoreError};

pub type WebResult<T> = core::result::Result<T, Error>;

#[derive(Debug, AsRefStr, thiserror::Error)]
pub enum Error {
    #[error("invalid subscriber: {0}")]
    InvalidSubscriber(#[from] ModelError),
    #[error("request body rejected: {0}")]
    BodyRejected(#[from] JsonRejection),

    /// Every failure on the read path, the client only ever sees a 404.
    #[error("subscriber lookup failed: {0}")]
    SubscriberLookup(#[source] StoreError),
    #[error("subscriber write failed: {0}")]
    SubscriberWrite(#[source] StoreError),

    #[error("operation not implemented: {0}")]
    NotImplemented(&'static str),

    #[error("error awaiting a blocking tokio task: {0}")]
    TokioJoin(#[from] tokio::task::JoinError),
}

impl Error {
    pub fn status_code_and_client_error(&self) -> (StatusCode, ClientError) {
        use ClientError::*;

        match self {
            Error::InvalidSubscriber(er) => (StatusCode::BAD_REQUEST, InvalidInput(er.to_string())),
            Error::BodyRejected(er) => (StatusCode::BAD_REQUEST, InvalidInput(er.body_text())),
            Error::SubscriberWrite(StoreError::AlreadyExists(_)) => {
                (StatusCode::BAD_REQUEST, AlreadySubscribed)
            }
            Error::SubscriberLookup(_) => (StatusCode::NOT_FOUND, NotFound),
            Error::NotImplemented(_) => (StatusCode::NOT_IMPLEMENTED, Unsupported),
            Error::SubscriberWrite(_) | Error::TokioJoin(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, ServiceError)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        tracing::debug!("{:<12} - into_response(Error: {self:?})", "INTO_RESP");

        // Error responses carry no body, only the status.
        let (status, _) = self.status_code_and_client_error();
        let mut res = status.into_response();

        // Insert the Error into response so that it can be retrieved later.
        res.extensions_mut().insert(Arc::new(self));

        res
    }
}

#[derive(Debug, AsRefStr, derive_more::Display)]
pub enum ClientError {
    #[display("Received invalid input: {_0}")]
    InvalidInput(String),
    #[display("Already subscribed")]
    AlreadySubscribed,
    #[display("Subscriber not found")]
    NotFound,
    #[display("Not implemented")]
    Unsupported,
    #[display("Service Error!")]
    ServiceError,
}
