pub mod climate;

use std::sync::Arc;

use axum::{
    http::Uri,
    response::Html,
    routing::get,
    Json, Router,
};
use sea_orm::DatabaseConnection;
use service::climate::repo::seaorm::{SeaOrmMeasurementRepository, SeaOrmStationRepository};
use service::ClimateService;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;

use common::types::Health;

use crate::errors::JsonApiError;
use crate::openapi::ApiDoc;

pub type ClimateApi = ClimateService<SeaOrmMeasurementRepository, SeaOrmStationRepository>;

/// Shared handler state. The connection inside is a pool; handlers only ever
/// hold a checked-out connection for the duration of one query.
#[derive(Clone)]
pub struct ServerState {
    pub climate: Arc<ClimateApi>,
}

impl ServerState {
    pub fn from_db(db: DatabaseConnection) -> Self {
        let measurements = Arc::new(SeaOrmMeasurementRepository { db: db.clone() });
        let stations = Arc::new(SeaOrmStationRepository { db });
        Self { climate: Arc::new(ClimateService::new(measurements, stations)) }
    }
}

pub const WELCOME_HTML: &str = concat!(
    "Welcome to the Climate App!<br/><br/>",
    "Available Routes:<br/><br/>",
    "Precipitation data for the most recent 12 months of data:<br/>",
    "/api/v1.0/precipitation<br/><br/>",
    "A list of stations in the database:<br/>",
    "/api/v1.0/stations<br/><br/>",
    "Temperature data for the most active station:<br/>",
    "/api/v1.0/tobs<br/><br/>",
    "Temperature statistics for all temperatures on or after the start date:<br/>",
    "/api/v1.0/start_date<start><br/><br/>",
    "Temperature statistics for all temperatures between the start and stop dates:<br/>",
    "/api/v1.0/start_date<start>/end_date<end>",
);

#[utoipa::path(get, path = "/", tag = "climate", responses((status = 200, description = "Route overview (HTML)")))]
pub async fn welcome() -> Html<&'static str> {
    Html(WELCOME_HTML)
}

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health::ok())
}

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

async fn not_found(uri: Uri) -> JsonApiError {
    JsonApiError::not_found(uri.path())
}

/// Build the full application router
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    let api = Router::new()
        .route("/api/v1.0/precipitation", get(climate::precipitation))
        .route("/api/v1.0/stations", get(climate::stations))
        .route("/api/v1.0/tobs", get(climate::tobs))
        .route("/api/v1.0/:start", get(climate::stats_from))
        .route("/api/v1.0/:start/:end", get(climate::stats_between));

    Router::new()
        .route("/", get(welcome))
        .route("/health", get(health))
        .route("/api-docs/openapi.json", get(openapi_json))
        .merge(api)
        .fallback(not_found)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
