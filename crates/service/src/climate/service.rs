use std::sync::Arc;

use chrono::{Days, NaiveDate};
use tracing::{debug, info, instrument};

use super::domain::{DateRange, PrecipitationRecord, StationRecord, TemperatureRecord, TemperatureSummary};
use super::repository::{MeasurementRepository, StationRepository};
use crate::errors::ServiceError;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
/// Length of the precipitation window, counted back from the latest date.
pub const YEAR_WINDOW_DAYS: u64 = 365;

/// First date of the trailing-year window ending at `latest` (calendar arithmetic).
pub fn year_window_start(latest: &str) -> Result<String, ServiceError> {
    let latest_day = NaiveDate::parse_from_str(latest, DATE_FORMAT)
        .map_err(|e| ServiceError::Validation(format!("latest date {latest:?} is not YYYY-MM-DD: {e}")))?;
    let start = latest_day
        .checked_sub_days(Days::new(YEAR_WINDOW_DAYS))
        .ok_or_else(|| ServiceError::Validation(format!("cannot go back {YEAR_WINDOW_DAYS} days from {latest}")))?;
    Ok(start.format(DATE_FORMAT).to_string())
}

/// Climate query service independent of web framework.
///
/// Every operation is a stateless read; the repositories own connection handling.
pub struct ClimateService<M: MeasurementRepository, S: StationRepository> {
    measurements: Arc<M>,
    stations: Arc<S>,
}

impl<M: MeasurementRepository, S: StationRepository> ClimateService<M, S> {
    pub fn new(measurements: Arc<M>, stations: Arc<S>) -> Self { Self { measurements, stations } }

    /// Precipitation for every date within 365 days of the most recent measurement.
    ///
    /// # Examples
    /// ```
    /// use service::climate::{repository::mock::MockClimateRepository, ClimateService};
    /// use std::sync::Arc;
    /// let repo = Arc::new(
    ///     MockClimateRepository::default()
    ///         .with_measurement("USC1", "2016-01-01", Some(1.0), Some(60.0))
    ///         .with_measurement("USC1", "2017-01-01", Some(0.5), Some(70.0)),
    /// );
    /// let svc = ClimateService::new(repo.clone(), repo);
    /// let rows = tokio_test::block_on(svc.precipitation_last_year()).unwrap();
    /// assert_eq!(rows.len(), 1);
    /// assert_eq!(rows[0].date, "2017-01-01");
    /// ```
    #[instrument(skip(self))]
    pub async fn precipitation_last_year(&self) -> Result<Vec<PrecipitationRecord>, ServiceError> {
        let Some(latest) = self.measurements.latest_date().await? else {
            debug!("no measurements; empty precipitation result");
            return Ok(Vec::new());
        };
        let from = year_window_start(&latest)?;
        let rows = self.measurements.daily_precipitation_since(&from).await?;
        info!(latest = %latest, from = %from, count = rows.len(), "precipitation_last_year");
        Ok(rows)
    }

    #[instrument(skip(self))]
    pub async fn list_stations(&self) -> Result<Vec<StationRecord>, ServiceError> {
        let rows = self.stations.list_stations().await?;
        info!(count = rows.len(), "list_stations");
        Ok(rows)
    }

    /// All temperature observations of the station with the most measurements.
    #[instrument(skip(self))]
    pub async fn most_active_station_temperatures(&self) -> Result<Vec<TemperatureRecord>, ServiceError> {
        let Some(top) = self.measurements.most_active_station().await? else {
            debug!("no measurements; no most active station");
            return Ok(Vec::new());
        };
        let rows = self.measurements.temperatures_for_station(&top.station_id).await?;
        info!(station = %top.station_id, observations = top.observations, count = rows.len(), "most_active_station_temperatures");
        Ok(rows)
    }

    /// Min/max/average temperature on or after `start`; `None` when nothing matches.
    pub async fn temperature_stats_from(&self, start: &str) -> Result<Option<TemperatureSummary>, ServiceError> {
        self.temperature_stats(&DateRange::starting(start)).await
    }

    /// Min/max/average temperature within `[start, end]`; `None` when nothing matches.
    pub async fn temperature_stats_between(&self, start: &str, end: &str) -> Result<Option<TemperatureSummary>, ServiceError> {
        self.temperature_stats(&DateRange::between(start, end)).await
    }

    #[instrument(skip(self), fields(start = %range.start, end = ?range.end))]
    pub async fn temperature_stats(&self, range: &DateRange) -> Result<Option<TemperatureSummary>, ServiceError> {
        let agg = self.measurements.temperature_aggregate(range).await?;
        info!(matched = agg.matched, "temperature_stats");
        if agg.matched == 0 {
            return Ok(None);
        }
        Ok(Some(TemperatureSummary { min: agg.min, max: agg.max, avg: agg.avg }))
    }
}
