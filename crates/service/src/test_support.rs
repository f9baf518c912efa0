//! In-memory SQLite fixtures shared by this crate's tests and the server tests.

use chrono::{Days, NaiveDate};
use models::{measurement, station};
use sea_orm::{
    ActiveValue::NotSet, ConnectOptions, ConnectionTrait, Database, DatabaseConnection, EntityTrait,
    Schema, Set,
};

/// Stations of the larger fixture, busiest first.
pub const FIXTURE_STATIONS: [(&str, &str); 3] = [
    ("USC00519281", "WAIHEE 837.5, HI US"),
    ("USC00519397", "WAIKIKI 717.2, HI US"),
    ("USC00513117", "KANEOHE 838.1, HI US"),
];

pub const FIXTURE_FIRST_DATE: &str = "2016-01-01";
pub const FIXTURE_LAST_DATE: &str = "2017-08-23";

/// Empty tables with the declared schema.
pub async fn empty_db() -> anyhow::Result<DatabaseConnection> {
    let mut opts = ConnectOptions::new("sqlite::memory:");
    // one connection: a second in-memory connection would be a different database
    opts.max_connections(1).min_connections(1).sqlx_logging(false);
    let db = Database::connect(opts).await?;
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);
    db.execute(backend.build(&schema.create_table_from_entity(station::Entity))).await?;
    db.execute(backend.build(&schema.create_table_from_entity(measurement::Entity))).await?;
    Ok(db)
}

pub async fn insert_station(db: &DatabaseConnection, station_id: &str, name: &str) -> anyhow::Result<()> {
    station::Entity::insert(station::ActiveModel {
        id: NotSet,
        station: Set(station_id.into()),
        name: Set(name.into()),
        latitude: Set(None),
        longitude: Set(None),
        elevation: Set(None),
    })
    .exec(db)
    .await?;
    Ok(())
}

fn measurement_row(station_id: &str, date: &str, prcp: Option<f64>, tobs: Option<f64>) -> measurement::ActiveModel {
    measurement::ActiveModel {
        id: NotSet,
        station: Set(station_id.into()),
        date: Set(date.into()),
        prcp: Set(prcp),
        tobs: Set(tobs),
    }
}

pub async fn insert_measurement(
    db: &DatabaseConnection,
    station_id: &str,
    date: &str,
    prcp: Option<f64>,
    tobs: Option<f64>,
) -> anyhow::Result<()> {
    measurement::Entity::insert(measurement_row(station_id, date, prcp, tobs)).exec(db).await?;
    Ok(())
}

/// Two stations, three measurements:
/// `USC1 2017-01-01 0.5 70`, `USC2 2017-01-01 0.2 72`, `USC1 2017-01-02 null 71`.
pub async fn scenario_db() -> anyhow::Result<DatabaseConnection> {
    let db = empty_db().await?;
    insert_station(&db, "USC1", "Station A").await?;
    insert_station(&db, "USC2", "Station B").await?;
    insert_measurement(&db, "USC1", "2017-01-01", Some(0.5), Some(70.0)).await?;
    insert_measurement(&db, "USC2", "2017-01-01", Some(0.2), Some(72.0)).await?;
    insert_measurement(&db, "USC1", "2017-01-02", None, Some(71.0)).await?;
    Ok(db)
}

/// Roughly twenty months of readings from three stations reporting at different cadences
/// (daily, every second day, every fifth day), with occasional missing values.
pub async fn fixture_db() -> anyhow::Result<DatabaseConnection> {
    let db = empty_db().await?;
    for (id, name) in FIXTURE_STATIONS {
        insert_station(&db, id, name).await?;
    }

    let first = NaiveDate::parse_from_str(FIXTURE_FIRST_DATE, "%Y-%m-%d")?;
    let last = NaiveDate::parse_from_str(FIXTURE_LAST_DATE, "%Y-%m-%d")?;
    let mut rows = Vec::new();
    let mut day = first;
    let mut n: u64 = 0;
    while day <= last {
        let date = day.format("%Y-%m-%d").to_string();
        for (idx, (station_id, _)) in FIXTURE_STATIONS.iter().enumerate() {
            let cadence = [1, 2, 5][idx];
            if n % cadence != 0 {
                continue;
            }
            let prcp = if (n + idx as u64) % 7 == 0 { None } else { Some(((n * 13 + idx as u64) % 50) as f64 / 100.0) };
            let tobs = if (n + idx as u64) % 11 == 0 { None } else { Some(60.0 + ((n * 7 + idx as u64 * 3) % 25) as f64) };
            rows.push(measurement_row(station_id, &date, prcp, tobs));
        }
        n += 1;
        day = day
            .checked_add_days(Days::new(1))
            .ok_or_else(|| anyhow::anyhow!("date overflow"))?;
    }

    for chunk in rows.chunks(100) {
        measurement::Entity::insert_many(chunk.to_vec()).exec(&db).await?;
    }
    Ok(db)
}
