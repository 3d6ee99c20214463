use std::time::Duration;

use axum::{
    body::Body,
    http::{HeaderName, Request, Response},
    middleware,
};
use tower::ServiceBuilder;
use tower_http::{
    classify::{ServerErrorsAsFailures, SharedClassifier},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{MakeSpan, OnRequest, OnResponse, TraceLayer},
};
use tracing::Span;

use super::{midware, routes::routes, REQUEST_ID_HEADER};
use crate::{App, Result};

/// Serves the subscriber API on the app's listener until it fails.
///
/// Layers, outermost first: request id assignment, tracing, the response mapper that logs web
/// errors, and request id propagation onto the response.
pub async fn serve(app: App) -> Result<()> {
    let App {
        app_state,
        listener,
    } = app;
    let request_id_header = HeaderName::from_static(REQUEST_ID_HEADER);

    let router = routes(app_state).layer(
        ServiceBuilder::new()
            .layer(SetRequestIdLayer::new(
                request_id_header.clone(),
                MakeRequestUuid,
            ))
            .layer(build_trace_layer())
            // Sees the response before the id is copied onto it, so it reads the request header.
            .layer(middleware::map_response(midware::response_mapper))
            .layer(PropagateRequestIdLayer::new(request_id_header)),
    );

    axum::serve(listener, router).await?;

    Ok(())
}

/// Every request gets a span named after the subscriber API, carrying the request id so the
/// store and handler logs of one request can be grouped.
fn build_trace_layer() -> TraceLayer<
    SharedClassifier<ServerErrorsAsFailures>,
    impl MakeSpan<Body> + Clone,
    impl OnRequest<Body> + Clone,
    impl OnResponse<Body> + Clone,
> {
    TraceLayer::new_for_http()
        .make_span_with(|req: &Request<Body>| {
            let req_id = req
                .headers()
                .get(REQUEST_ID_HEADER)
                .and_then(|id| id.to_str().ok())
                .unwrap_or_default();

            tracing::info_span!(
                "substore_request",
                req_id,
                method = %req.method(),
                route = req.uri().path()
            )
        })
        .on_request(|req: &Request<Body>, _s: &Span| {
            tracing::debug!("{:<20} - {} {}", "Subscriber API call:", req.method(), req.uri())
        })
        .on_response(|res: &Response<Body>, latency: Duration, _s: &Span| {
            let status = res.status();

            if status.is_server_error() {
                tracing::error!("{:<20} - {status} after {latency:?}", "Server error:")
            } else {
                tracing::info!("{:<20} - {status} after {latency:?}", "Answered:")
            }
        })
}
