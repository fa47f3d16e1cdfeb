use axum::{
    extract::{Path, State},
    response::Response,
};
use std::sync::Arc;

use gate_core::error::AppError;

use crate::services::listing_client::ListingClient;

pub async fn posts(State(listings): State<Arc<ListingClient>>) -> Result<Response, AppError> {
    listings.list("posts").await
}

pub async fn post(
    State(listings): State<Arc<ListingClient>>,
    Path(id): Path<u64>,
) -> Result<Response, AppError> {
    listings.fetch("posts", id).await
}

pub async fn videos(State(listings): State<Arc<ListingClient>>) -> Result<Response, AppError> {
    listings.list("videos").await
}

pub async fn video(
    State(listings): State<Arc<ListingClient>>,
    Path(id): Path<u64>,
) -> Result<Response, AppError> {
    listings.fetch("videos", id).await
}

pub async fn models(State(listings): State<Arc<ListingClient>>) -> Result<Response, AppError> {
    listings.list("models").await
}

pub async fn model(
    State(listings): State<Arc<ListingClient>>,
    Path(id): Path<u64>,
) -> Result<Response, AppError> {
    listings.fetch("models", id).await
}
