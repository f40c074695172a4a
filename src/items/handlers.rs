use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::Value;
use tracing::{info, instrument, warn};

use super::{
    dto::{CreatedItemResponse, ItemDetailsResponse, ItemFilterParams},
    repo_types::{EmailCount, Item, ItemFields, ItemFilter},
};
use crate::{
    dates,
    error::{ApiError, ApiResult},
    id::RecordId,
    responses::{FilterResponse, MessageResponse},
    state::AppState,
};

pub const ITEM_NOT_FOUND: &str = "Item not found";
pub const INVALID_ITEM_ID: &str = "Invalid item id provided.";

pub fn item_routes() -> Router<AppState> {
    Router::new()
        .route("/items", post(create_item))
        .route("/items/filter", get(filter_items))
        .route("/items/aggregate", get(aggregate_items))
        .route(
            "/items/:item_id",
            get(get_item).put(update_item).delete(delete_item),
        )
}

fn parse_item_id(raw: &str) -> ApiResult<RecordId> {
    RecordId::parse(raw).map_err(|e| {
        warn!(error = %e, "rejecting item id");
        ApiError::InvalidId(INVALID_ITEM_ID)
    })
}

#[instrument(skip(state, payload))]
pub async fn create_item(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<CreatedItemResponse>)> {
    let Json(payload) = payload?;
    let fields = ItemFields::from_payload(&payload)?;
    let item_id = state.items.insert(fields, dates::now_utc().date()).await?;

    info!(%item_id, "item created");
    Ok((
        StatusCode::CREATED,
        Json(CreatedItemResponse {
            created: true,
            item_id,
        }),
    ))
}

#[instrument(skip(state))]
pub async fn filter_items(
    State(state): State<AppState>,
    Query(params): Query<ItemFilterParams>,
) -> ApiResult<Json<FilterResponse<Item>>> {
    let filter = ItemFilter::try_from(params)?;
    let items = state.items.find(&filter).await?;
    Ok(Json(items.into()))
}

#[instrument(skip(state))]
pub async fn aggregate_items(State(state): State<AppState>) -> ApiResult<Json<Vec<EmailCount>>> {
    Ok(Json(state.items.count_by_email().await?))
}

#[instrument(skip(state))]
pub async fn get_item(
    State(state): State<AppState>,
    Path(item_id): Path<String>,
) -> ApiResult<Json<ItemDetailsResponse>> {
    let id = parse_item_id(&item_id)?;
    match state.items.find_by_id(id).await? {
        Some(item_details) => Ok(Json(ItemDetailsResponse { item_details })),
        None => Err(ApiError::NotFound(ITEM_NOT_FOUND)),
    }
}

#[instrument(skip(state, payload))]
pub async fn update_item(
    State(state): State<AppState>,
    Path(item_id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let Json(payload) = payload?;
    let fields = ItemFields::from_payload(&payload)?;
    let id = parse_item_id(&item_id)?;

    if !state.items.update(id, fields).await? {
        return Err(ApiError::NotFound(ITEM_NOT_FOUND));
    }
    info!(%id, "item updated");
    Ok(Json(MessageResponse {
        message: "Item updated successfully",
    }))
}

#[instrument(skip(state))]
pub async fn delete_item(
    State(state): State<AppState>,
    Path(item_id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let id = parse_item_id(&item_id)?;

    if !state.items.delete(id).await? {
        return Err(ApiError::NotFound(ITEM_NOT_FOUND));
    }
    info!(%id, "item deleted");
    Ok(Json(MessageResponse {
        message: "Item deleted successfully",
    }))
}
