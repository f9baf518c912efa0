use sea_orm::{
    ActiveModelTrait, ConnectOptions, ConnectionTrait, Database, DatabaseConnection, EntityTrait,
    Schema, Set,
};

use crate::{db, measurement, station};

async fn memory_db() -> anyhow::Result<DatabaseConnection> {
    let mut opts = ConnectOptions::new("sqlite::memory:");
    opts.max_connections(1).min_connections(1);
    let db = Database::connect(opts).await?;
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);
    db.execute(backend.build(&schema.create_table_from_entity(station::Entity))).await?;
    db.execute(backend.build(&schema.create_table_from_entity(measurement::Entity))).await?;
    Ok(db)
}

#[tokio::test]
async fn entities_match_declared_schema() -> anyhow::Result<()> {
    let db = memory_db().await?;

    station::ActiveModel {
        station: Set("USC00519397".into()),
        name: Set("WAIKIKI 717.2, HI US".into()),
        latitude: Set(Some(21.2716)),
        longitude: Set(Some(-157.8168)),
        elevation: Set(Some(3.0)),
        ..Default::default()
    }
    .insert(&db)
    .await?;

    measurement::ActiveModel {
        station: Set("USC00519397".into()),
        date: Set("2010-01-01".into()),
        prcp: Set(None),
        tobs: Set(Some(65.0)),
        ..Default::default()
    }
    .insert(&db)
    .await?;

    let stations = station::Entity::find().all(&db).await?;
    assert_eq!(stations.len(), 1);
    assert_eq!(stations[0].name, "WAIKIKI 717.2, HI US");

    let rows = measurement::Entity::find().all(&db).await?;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].prcp, None);
    assert_eq!(rows[0].tobs, Some(65.0));
    Ok(())
}

#[tokio::test]
async fn connect_with_config_rejects_bad_url() {
    let cfg = configs::DatabaseConfig { url: "mysql://nope".into(), ..Default::default() };
    let err = db::connect_with_config(&cfg).await.unwrap_err();
    assert!(matches!(err, crate::errors::ModelError::Config(_)));
}

#[tokio::test]
async fn lazy_pool_connects_to_memory_sqlite() -> anyhow::Result<()> {
    let cfg = configs::DatabaseConfig {
        url: "sqlite::memory:".into(),
        max_connections: 1,
        ..Default::default()
    };
    let conn = db::connect_with_config(&cfg).await?;
    db::ping(&conn).await?;
    Ok(())
}
