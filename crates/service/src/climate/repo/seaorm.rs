use async_trait::async_trait;
use models::{measurement, station};
use sea_orm::{
    sea_query::{Expr, Func, SimpleExpr},
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
};

use crate::climate::domain::{
    DateRange, PrecipitationRecord, StationActivity, StationRecord, TemperatureAggregate,
    TemperatureRecord,
};
use crate::climate::repository::{MeasurementRepository, StationRepository};
use crate::errors::ServiceError;

fn avg(column: measurement::Column) -> SimpleExpr {
    SimpleExpr::from(Func::avg(Expr::col((measurement::Entity, column))))
}

/// SeaORM-backed measurement queries.
///
/// Holds a pooled connection; every query checks a connection out of the pool
/// for its own duration, so concurrent requests never share a cursor.
#[derive(Clone)]
pub struct SeaOrmMeasurementRepository {
    pub db: DatabaseConnection,
}

#[async_trait]
impl MeasurementRepository for SeaOrmMeasurementRepository {
    async fn latest_date(&self) -> Result<Option<String>, ServiceError> {
        let latest = measurement::Entity::find()
            .select_only()
            .column_as(measurement::Column::Date.max(), "latest")
            .into_tuple::<Option<String>>()
            .one(&self.db)
            .await?;
        Ok(latest.flatten())
    }

    async fn daily_precipitation_since(&self, from: &str) -> Result<Vec<PrecipitationRecord>, ServiceError> {
        let rows = measurement::Entity::find()
            .select_only()
            .column(measurement::Column::Date)
            .column_as(avg(measurement::Column::Prcp), "precipitation")
            .filter(measurement::Column::Date.gte(from))
            .group_by(measurement::Column::Date)
            .order_by_asc(measurement::Column::Date)
            .into_tuple::<(String, Option<f64>)>()
            .all(&self.db)
            .await?;
        Ok(rows
            .into_iter()
            .map(|(date, precipitation)| PrecipitationRecord { date, precipitation })
            .collect())
    }

    async fn most_active_station(&self) -> Result<Option<StationActivity>, ServiceError> {
        let top = measurement::Entity::find()
            .select_only()
            .column(measurement::Column::Station)
            .column_as(measurement::Column::Id.count(), "observations")
            .group_by(measurement::Column::Station)
            .order_by_desc(measurement::Column::Id.count())
            .order_by_asc(measurement::Column::Station)
            .into_tuple::<(String, i64)>()
            .one(&self.db)
            .await?;
        Ok(top.map(|(station_id, observations)| StationActivity { station_id, observations }))
    }

    async fn temperatures_for_station(&self, station_id: &str) -> Result<Vec<TemperatureRecord>, ServiceError> {
        let rows = measurement::Entity::find()
            .select_only()
            .column(measurement::Column::Date)
            .column(measurement::Column::Tobs)
            .filter(measurement::Column::Station.eq(station_id))
            .order_by_asc(measurement::Column::Id)
            .into_tuple::<(String, Option<f64>)>()
            .all(&self.db)
            .await?;
        Ok(rows
            .into_iter()
            .map(|(date, temperature)| TemperatureRecord { date, temperature })
            .collect())
    }

    async fn temperature_aggregate(&self, range: &DateRange) -> Result<TemperatureAggregate, ServiceError> {
        let mut query = measurement::Entity::find()
            .select_only()
            .column_as(measurement::Column::Id.count(), "matched")
            .column_as(measurement::Column::Tobs.min(), "min_tobs")
            .column_as(measurement::Column::Tobs.max(), "max_tobs")
            .column_as(avg(measurement::Column::Tobs), "avg_tobs")
            .filter(measurement::Column::Date.gte(range.start.as_str()));
        if let Some(end) = range.end.as_deref() {
            query = query.filter(measurement::Column::Date.lte(end));
        }
        let row = query
            .into_tuple::<(i64, Option<f64>, Option<f64>, Option<f64>)>()
            .one(&self.db)
            .await?;
        Ok(row
            .map(|(matched, min, max, avg)| TemperatureAggregate { matched, min, max, avg })
            .unwrap_or_default())
    }
}

#[derive(Clone)]
pub struct SeaOrmStationRepository {
    pub db: DatabaseConnection,
}

#[async_trait]
impl StationRepository for SeaOrmStationRepository {
    async fn list_stations(&self) -> Result<Vec<StationRecord>, ServiceError> {
        let rows = station::Entity::find()
            .select_only()
            .column(station::Column::Station)
            .column(station::Column::Name)
            .order_by_asc(station::Column::Id)
            .into_tuple::<(String, String)>()
            .all(&self.db)
            .await?;
        Ok(rows
            .into_iter()
            .map(|(station_id, name)| StationRecord { station_id, name })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{fixture_db, scenario_db};

    #[tokio::test]
    async fn latest_date_is_max_date() -> anyhow::Result<()> {
        let db = scenario_db().await?;
        let repo = SeaOrmMeasurementRepository { db };
        assert_eq!(repo.latest_date().await?, Some("2017-01-02".to_string()));
        Ok(())
    }

    #[tokio::test]
    async fn latest_date_on_empty_table_is_none() -> anyhow::Result<()> {
        let db = crate::test_support::empty_db().await?;
        let repo = SeaOrmMeasurementRepository { db };
        assert_eq!(repo.latest_date().await?, None);
        assert!(repo.most_active_station().await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn precipitation_averages_stations_per_date() -> anyhow::Result<()> {
        let db = scenario_db().await?;
        let repo = SeaOrmMeasurementRepository { db };
        let rows = repo.daily_precipitation_since("2017-01-01").await?;
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].date, "2017-01-01");
        let p = rows[0].precipitation.unwrap();
        assert!((p - 0.35).abs() < 1e-9, "got {p}");
        assert_eq!(rows[1], PrecipitationRecord { date: "2017-01-02".into(), precipitation: None });
        Ok(())
    }

    #[tokio::test]
    async fn most_active_matches_independent_count() -> anyhow::Result<()> {
        let db = fixture_db().await?;
        let repo = SeaOrmMeasurementRepository { db: db.clone() };
        let top = repo.most_active_station().await?.expect("non-empty fixture");

        let all = measurement::Entity::find().all(&db).await?;
        let mut counts = std::collections::HashMap::<String, i64>::new();
        for m in &all {
            *counts.entry(m.station.clone()).or_default() += 1;
        }
        let max = counts.values().copied().max().unwrap();
        assert_eq!(top.observations, max);
        assert_eq!(counts[&top.station_id], max);
        Ok(())
    }

    #[tokio::test]
    async fn aggregate_counts_matched_rows() -> anyhow::Result<()> {
        let db = scenario_db().await?;
        let repo = SeaOrmMeasurementRepository { db };

        let agg = repo.temperature_aggregate(&DateRange::starting("2017-01-01")).await?;
        assert_eq!(agg.matched, 3);
        assert_eq!(agg.min, Some(70.0));
        assert_eq!(agg.max, Some(72.0));

        let none = repo.temperature_aggregate(&DateRange::starting("2099-01-01")).await?;
        assert_eq!(none.matched, 0);
        assert_eq!(none.min, None);
        Ok(())
    }

    #[tokio::test]
    async fn stations_are_listed_once_per_row() -> anyhow::Result<()> {
        let db = scenario_db().await?;
        let repo = SeaOrmStationRepository { db };
        let mut stations = repo.list_stations().await?;
        stations.sort_by(|a, b| a.station_id.cmp(&b.station_id));
        assert_eq!(
            stations,
            vec![
                StationRecord { station_id: "USC1".into(), name: "Station A".into() },
                StationRecord { station_id: "USC2".into(), name: "Station B".into() },
            ]
        );
        Ok(())
    }

    fn climate(db: DatabaseConnection) -> crate::ClimateService<SeaOrmMeasurementRepository, SeaOrmStationRepository> {
        crate::ClimateService::new(
            std::sync::Arc::new(SeaOrmMeasurementRepository { db: db.clone() }),
            std::sync::Arc::new(SeaOrmStationRepository { db }),
        )
    }

    #[tokio::test]
    async fn precipitation_stays_inside_year_window() -> anyhow::Result<()> {
        let svc = climate(fixture_db().await?);
        let rows = svc.precipitation_last_year().await?;
        let bound = crate::climate::service::year_window_start(crate::test_support::FIXTURE_LAST_DATE)?;
        assert!(!rows.is_empty());
        assert!(rows.iter().all(|r| r.date >= bound));
        assert_eq!(rows.first().map(|r| r.date.as_str()), Some(bound.as_str()));
        assert_eq!(rows.last().map(|r| r.date.as_str()), Some(crate::test_support::FIXTURE_LAST_DATE));
        // one record per distinct date
        let mut dates: Vec<_> = rows.iter().map(|r| r.date.clone()).collect();
        dates.dedup();
        assert_eq!(dates.len(), rows.len());
        Ok(())
    }

    #[tokio::test]
    async fn summary_is_ordered_and_bounded_range_is_subset() -> anyhow::Result<()> {
        let db = fixture_db().await?;
        let repo = SeaOrmMeasurementRepository { db: db.clone() };
        let svc = climate(db);
        for (start, end) in [("2016-01-01", "2016-06-30"), ("2016-09-15", "2017-02-01"), ("2017-08-01", "2017-08-23")] {
            let stats = svc.temperature_stats_from(start).await?.expect("fixture has data");
            let (min, max, avg) = (stats.min.unwrap(), stats.max.unwrap(), stats.avg.unwrap());
            assert!(min <= avg && avg <= max, "{start}: {min} {avg} {max}");

            let open = repo.temperature_aggregate(&DateRange::starting(start)).await?;
            let bounded = repo.temperature_aggregate(&DateRange::between(start, end)).await?;
            assert!(bounded.matched <= open.matched);
            assert!(bounded.matched > 0);
        }
        Ok(())
    }

    #[tokio::test]
    async fn tobs_rows_belong_to_busiest_station() -> anyhow::Result<()> {
        let db = fixture_db().await?;
        let svc = climate(db.clone());
        let busiest = crate::test_support::FIXTURE_STATIONS[0].0;
        let expected = measurement::Entity::find()
            .filter(measurement::Column::Station.eq(busiest))
            .all(&db)
            .await?;
        let rows = svc.most_active_station_temperatures().await?;
        assert_eq!(rows.len(), expected.len());
        assert!(rows.iter().zip(&expected).all(|(r, m)| r.date == m.date && r.temperature == m.tobs));
        Ok(())
    }
}
