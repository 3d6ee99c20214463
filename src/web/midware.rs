use std::sync::Arc;

use axum::{
    http::{HeaderMap, Method, Uri},
    response::Response,
};
use uuid::Uuid;

use crate::web::{log, Error, REQUEST_ID_HEADER};

pub async fn response_mapper(
    req_method: Method,
    uri: Uri,
    headers: HeaderMap,
    resp: Response,
) -> Response {
    let req_id = headers
        .get(REQUEST_ID_HEADER)
        .and_then(|id| id.to_str().ok())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let web_error = resp.extensions().get::<Arc<Error>>().map(Arc::as_ref);
    let client_status_and_error = web_error.map(Error::status_code_and_client_error);

    if let (Some(er), Some((status, _))) = (web_error, &client_status_and_error) {
        if status.is_server_error() {
            tracing::error!("SERVER ERROR: {er} ID: {req_id}");
        } else {
            tracing::warn!("CLIENT ERROR: {er} ID: {req_id}");
        }
    }
    let client_error = client_status_and_error.map(|(_, ce)| ce);

    log::log_request(
        req_id,
        req_method,
        uri,
        resp.status(),
        web_error,
        client_error,
    );

    resp
}
