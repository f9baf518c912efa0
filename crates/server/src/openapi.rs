use utoipa::OpenApi;
use utoipa::ToSchema;
use serde::Serialize;

#[derive(Serialize, ToSchema)]
pub struct HealthResponse { pub status: String }

/// Documentation mirror of the serialized record.
#[derive(Serialize, ToSchema)]
pub struct PrecipitationDoc {
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Precipitation")]
    pub precipitation: Option<f64>,
}

#[derive(Serialize, ToSchema)]
pub struct StationDoc {
    #[serde(rename = "Station ID")]
    pub station_id: String,
    #[serde(rename = "Station Name")]
    pub name: String,
}

#[derive(Serialize, ToSchema)]
pub struct TemperatureDoc {
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Temperature")]
    pub temperature: Option<f64>,
}

#[derive(Serialize, ToSchema)]
pub struct TemperatureSummaryDoc {
    #[serde(rename = "Min Temperature")]
    pub min: Option<f64>,
    #[serde(rename = "Max Temperature")]
    pub max: Option<f64>,
    #[serde(rename = "Average Temperature")]
    pub avg: Option<f64>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::welcome,
        crate::routes::health,
        crate::routes::climate::precipitation,
        crate::routes::climate::stations,
        crate::routes::climate::tobs,
        crate::routes::climate::stats_from,
        crate::routes::climate::stats_between,
    ),
    components(
        schemas(
            HealthResponse,
            PrecipitationDoc,
            StationDoc,
            TemperatureDoc,
            TemperatureSummaryDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "climate")
    )
)]
pub struct ApiDoc;
