use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One daily reading reported by a station.
///
/// `date` is stored as `YYYY-MM-DD` text, so lexical comparison is chronological.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "measurement")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub station: String,
    pub date: String,
    pub prcp: Option<f64>,
    pub tobs: Option<f64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
