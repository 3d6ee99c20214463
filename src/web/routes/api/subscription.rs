use axum::{
    body::Bytes,
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use tracing::{error, info, warn};

use crate::{
    model::{DeserSubscriber, Subscriber},
    web::{Error, WebResult},
    AppState,
};

#[tracing::instrument(name = "Getting a subscriber", skip(app_state))]
pub async fn get_subscriber(
    State(app_state): State<AppState>,
    Path(email): Path<String>,
) -> WebResult<Json<Subscriber>> {
    // File access blocks, keep it off the async workers.
    let read_email = email.clone();
    let subscriber = tokio::task::spawn_blocking(move || app_state.store.read(&read_email))
        .await?
        .map_err(|er| {
            if er.is_not_found() {
                warn!("Failed getting subscriber with email: {email}");
            } else {
                error!("Failed reading subscriber with email: {email}: {er}");
            }
            Error::SubscriberLookup(er)
        })?;

    info!("Got subscriber: {subscriber}");
    Ok(Json(subscriber))
}

#[tracing::instrument(name = "Adding a new subscriber", skip_all)]
pub async fn create_subscriber(
    State(app_state): State<AppState>,
    payload: Result<Json<DeserSubscriber>, JsonRejection>,
) -> WebResult<(StatusCode, Json<Subscriber>)> {
    let Json(record) = payload?;
    let subscriber = Subscriber::try_from(record)?;

    let to_store = subscriber.clone();
    tokio::task::spawn_blocking(move || app_state.store.write(&to_store))
        .await?
        .map_err(Error::SubscriberWrite)?;

    info!("Added subscriber: {subscriber}");
    Ok((StatusCode::CREATED, Json(subscriber)))
}

#[tracing::instrument(name = "Updating a subscriber", skip_all)]
pub async fn update_subscriber(body: Bytes) -> WebResult<StatusCode> {
    warn!(
        "Tried to update subscriber: {}",
        String::from_utf8_lossy(&body)
    );
    Err(Error::NotImplemented("update subscriber"))
}

#[tracing::instrument(name = "Deleting a subscriber")]
pub async fn delete_subscriber(Path(email): Path<String>) -> WebResult<StatusCode> {
    warn!("Tried to remove subscriber with email: {email}");
    Err(Error::NotImplemented("delete subscriber"))
}
