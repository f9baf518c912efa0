use async_trait::async_trait;

use super::domain::{
    DateRange, PrecipitationRecord, StationActivity, StationRecord, TemperatureAggregate,
    TemperatureRecord,
};
use crate::errors::ServiceError;

/// Read-only queries over the `measurement` relation.
#[async_trait]
pub trait MeasurementRepository: Send + Sync {
    /// Greatest `date` across all rows, `None` for an empty table.
    async fn latest_date(&self) -> Result<Option<String>, ServiceError>;
    /// One row per distinct date `>= from`, precipitation averaged across stations, ascending by date.
    async fn daily_precipitation_since(&self, from: &str) -> Result<Vec<PrecipitationRecord>, ServiceError>;
    /// Station with the most rows; ties go to the lowest station id.
    async fn most_active_station(&self) -> Result<Option<StationActivity>, ServiceError>;
    async fn temperatures_for_station(&self, station_id: &str) -> Result<Vec<TemperatureRecord>, ServiceError>;
    async fn temperature_aggregate(&self, range: &DateRange) -> Result<TemperatureAggregate, ServiceError>;
}

/// Read-only queries over the `station` relation.
#[async_trait]
pub trait StationRepository: Send + Sync {
    async fn list_stations(&self) -> Result<Vec<StationRecord>, ServiceError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::collections::{BTreeMap, HashMap};

    #[derive(Debug, Clone)]
    struct Row {
        station: String,
        date: String,
        prcp: Option<f64>,
        tobs: Option<f64>,
    }

    /// Holds both relations in memory and answers the same queries as the SeaORM repositories.
    #[derive(Debug, Default, Clone)]
    pub struct MockClimateRepository {
        stations: Vec<StationRecord>,
        rows: Vec<Row>,
        /// When set, every query fails with `ServiceError::Db`.
        unavailable: bool,
    }

    impl MockClimateRepository {
        pub fn with_station(mut self, station_id: &str, name: &str) -> Self {
            self.stations.push(StationRecord { station_id: station_id.into(), name: name.into() });
            self
        }

        pub fn with_measurement(mut self, station: &str, date: &str, prcp: Option<f64>, tobs: Option<f64>) -> Self {
            self.rows.push(Row { station: station.into(), date: date.into(), prcp, tobs });
            self
        }

        pub fn unavailable() -> Self {
            Self { unavailable: true, ..Default::default() }
        }

        fn check(&self) -> Result<(), ServiceError> {
            if self.unavailable {
                return Err(ServiceError::Db("data store unavailable".into()));
            }
            Ok(())
        }
    }

    fn mean(values: &[f64]) -> Option<f64> {
        if values.is_empty() {
            return None;
        }
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }

    #[async_trait]
    impl MeasurementRepository for MockClimateRepository {
        async fn latest_date(&self) -> Result<Option<String>, ServiceError> {
            self.check()?;
            Ok(self.rows.iter().map(|r| r.date.clone()).max())
        }

        async fn daily_precipitation_since(&self, from: &str) -> Result<Vec<PrecipitationRecord>, ServiceError> {
            self.check()?;
            let mut by_date: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
            for r in self.rows.iter().filter(|r| r.date.as_str() >= from) {
                let values = by_date.entry(r.date.as_str()).or_default();
                values.extend(r.prcp);
            }
            Ok(by_date
                .into_iter()
                .map(|(date, values)| PrecipitationRecord { date: date.to_string(), precipitation: mean(&values) })
                .collect())
        }

        async fn most_active_station(&self) -> Result<Option<StationActivity>, ServiceError> {
            self.check()?;
            let mut counts: HashMap<&str, i64> = HashMap::new();
            for r in &self.rows {
                *counts.entry(r.station.as_str()).or_default() += 1;
            }
            Ok(counts
                .into_iter()
                .max_by(|a, b| a.1.cmp(&b.1).then_with(|| b.0.cmp(a.0)))
                .map(|(station_id, observations)| StationActivity { station_id: station_id.to_string(), observations }))
        }

        async fn temperatures_for_station(&self, station_id: &str) -> Result<Vec<TemperatureRecord>, ServiceError> {
            self.check()?;
            Ok(self
                .rows
                .iter()
                .filter(|r| r.station == station_id)
                .map(|r| TemperatureRecord { date: r.date.clone(), temperature: r.tobs })
                .collect())
        }

        async fn temperature_aggregate(&self, range: &DateRange) -> Result<TemperatureAggregate, ServiceError> {
            self.check()?;
            let matched: Vec<&Row> = self.rows.iter().filter(|r| range.contains(&r.date)).collect();
            let temps: Vec<f64> = matched.iter().filter_map(|r| r.tobs).collect();
            Ok(TemperatureAggregate {
                matched: matched.len() as i64,
                min: temps.iter().copied().reduce(f64::min),
                max: temps.iter().copied().reduce(f64::max),
                avg: mean(&temps),
            })
        }
    }

    #[async_trait]
    impl StationRepository for MockClimateRepository {
        async fn list_stations(&self) -> Result<Vec<StationRecord>, ServiceError> {
            self.check()?;
            Ok(self.stations.clone())
        }
    }
}
