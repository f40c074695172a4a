use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::Value;
use tracing::{info, instrument, warn};

use super::{
    dto::{ClockInDetailsResponse, ClockInFilterParams, ClockedInResponse},
    repo_types::{ClockInFields, ClockInFilter, ClockInRecord},
};
use crate::{
    dates,
    error::{ApiError, ApiResult},
    id::RecordId,
    responses::{FilterResponse, MessageResponse},
    state::AppState,
};

pub const CLOCK_IN_RECORD_NOT_FOUND: &str = "Clock-in record not found";
pub const INVALID_CLOCK_IN_RECORD_ID: &str = "Invalid clock-in record id provided.";

pub fn clock_in_routes() -> Router<AppState> {
    Router::new()
        .route("/clock-in", post(create_clock_in_record))
        .route("/clock-in/filter", get(filter_clock_in_records))
        .route(
            "/clock-in/:clock_in_record_id",
            get(get_clock_in_record)
                .put(update_clock_in_record)
                .delete(delete_clock_in_record),
        )
}

fn parse_record_id(raw: &str) -> ApiResult<RecordId> {
    RecordId::parse(raw).map_err(|e| {
        warn!(error = %e, "rejecting clock-in record id");
        ApiError::InvalidId(INVALID_CLOCK_IN_RECORD_ID)
    })
}

#[instrument(skip(state, payload))]
pub async fn create_clock_in_record(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<ClockedInResponse>)> {
    let Json(payload) = payload?;
    let fields = ClockInFields::from_payload(&payload)?;
    let clock_in_id = state.clock_ins.insert(fields, dates::now_utc()).await?;

    info!(%clock_in_id, "clocked in");
    Ok((
        StatusCode::CREATED,
        Json(ClockedInResponse {
            ok: "clock-in successful",
            clock_in_id,
        }),
    ))
}

#[instrument(skip(state))]
pub async fn filter_clock_in_records(
    State(state): State<AppState>,
    Query(params): Query<ClockInFilterParams>,
) -> ApiResult<Json<FilterResponse<ClockInRecord>>> {
    let filter = ClockInFilter::try_from(params)?;
    let records = state.clock_ins.find(&filter).await?;
    Ok(Json(records.into()))
}

#[instrument(skip(state))]
pub async fn get_clock_in_record(
    State(state): State<AppState>,
    Path(clock_in_record_id): Path<String>,
) -> ApiResult<Json<ClockInDetailsResponse>> {
    let id = parse_record_id(&clock_in_record_id)?;
    let record = state
        .clock_ins
        .find_by_id(id)
        .await?
        .ok_or(ApiError::NotFound(CLOCK_IN_RECORD_NOT_FOUND))?;
    Ok(Json(ClockInDetailsResponse {
        clock_in_record_details: record,
    }))
}

#[instrument(skip(state, payload))]
pub async fn update_clock_in_record(
    State(state): State<AppState>,
    Path(clock_in_record_id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let Json(payload) = payload?;
    let fields = ClockInFields::from_payload(&payload)?;
    let id = parse_record_id(&clock_in_record_id)?;

    if !state.clock_ins.update(id, fields).await? {
        return Err(ApiError::NotFound(CLOCK_IN_RECORD_NOT_FOUND));
    }
    info!(%id, "clock-in record updated");
    Ok(Json(MessageResponse {
        message: "Clock-in record updated successfully",
    }))
}

#[instrument(skip(state))]
pub async fn delete_clock_in_record(
    State(state): State<AppState>,
    Path(clock_in_record_id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let id = parse_record_id(&clock_in_record_id)?;

    if !state.clock_ins.delete(id).await? {
        return Err(ApiError::NotFound(CLOCK_IN_RECORD_NOT_FOUND));
    }
    info!(%id, "clock-in record deleted");
    Ok(Json(MessageResponse {
        message: "Clock-in record deleted successfully",
    }))
}
