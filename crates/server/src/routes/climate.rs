use axum::{
    extract::{Path, State},
    Json,
};
use service::climate::domain::{PrecipitationRecord, StationRecord, TemperatureRecord, TemperatureSummary};

use crate::errors::JsonApiError;
use crate::routes::ServerState;

#[utoipa::path(
    get, path = "/api/v1.0/precipitation", tag = "climate",
    responses(
        (status = 200, description = "Precipitation per date for the 12 months up to the latest measurement", body = [crate::openapi::PrecipitationDoc]),
        (status = 503, description = "Data store unavailable")
    )
)]
pub async fn precipitation(State(state): State<ServerState>) -> Result<Json<Vec<PrecipitationRecord>>, JsonApiError> {
    Ok(Json(state.climate.precipitation_last_year().await?))
}

#[utoipa::path(
    get, path = "/api/v1.0/stations", tag = "climate",
    responses(
        (status = 200, description = "All stations", body = [crate::openapi::StationDoc]),
        (status = 503, description = "Data store unavailable")
    )
)]
pub async fn stations(State(state): State<ServerState>) -> Result<Json<Vec<StationRecord>>, JsonApiError> {
    Ok(Json(state.climate.list_stations().await?))
}

#[utoipa::path(
    get, path = "/api/v1.0/tobs", tag = "climate",
    responses(
        (status = 200, description = "Temperature observations of the most active station", body = [crate::openapi::TemperatureDoc]),
        (status = 503, description = "Data store unavailable")
    )
)]
pub async fn tobs(State(state): State<ServerState>) -> Result<Json<Vec<TemperatureRecord>>, JsonApiError> {
    Ok(Json(state.climate.most_active_station_temperatures().await?))
}

/// `start` is compared lexically against `YYYY-MM-DD` dates; no format check is made.
#[utoipa::path(
    get, path = "/api/v1.0/{start}", tag = "climate",
    params(("start" = String, Path, description = "First date, YYYY-MM-DD")),
    responses(
        (status = 200, description = "Zero or one summary record", body = [crate::openapi::TemperatureSummaryDoc]),
        (status = 503, description = "Data store unavailable")
    )
)]
pub async fn stats_from(
    State(state): State<ServerState>,
    Path(start): Path<String>,
) -> Result<Json<Vec<TemperatureSummary>>, JsonApiError> {
    let summary = state.climate.temperature_stats_from(&start).await?;
    Ok(Json(summary.into_iter().collect()))
}

#[utoipa::path(
    get, path = "/api/v1.0/{start}/{end}", tag = "climate",
    params(
        ("start" = String, Path, description = "First date, YYYY-MM-DD (inclusive)"),
        ("end" = String, Path, description = "Last date, YYYY-MM-DD (inclusive)")
    ),
    responses(
        (status = 200, description = "Zero or one summary record", body = [crate::openapi::TemperatureSummaryDoc]),
        (status = 503, description = "Data store unavailable")
    )
)]
pub async fn stats_between(
    State(state): State<ServerState>,
    Path((start, end)): Path<(String, String)>,
) -> Result<Json<Vec<TemperatureSummary>>, JsonApiError> {
    let summary = state.climate.temperature_stats_between(&start, &end).await?;
    Ok(Json(summary.into_iter().collect()))
}
