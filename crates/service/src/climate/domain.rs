use serde::{Deserialize, Serialize};

/// Precipitation for one date inside the trailing-year window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrecipitationRecord {
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Precipitation")]
    pub precipitation: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationRecord {
    #[serde(rename = "Station ID")]
    pub station_id: String,
    #[serde(rename = "Station Name")]
    pub name: String,
}

/// A single temperature observation (tobs).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemperatureRecord {
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Temperature")]
    pub temperature: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemperatureSummary {
    #[serde(rename = "Min Temperature")]
    pub min: Option<f64>,
    #[serde(rename = "Max Temperature")]
    pub max: Option<f64>,
    #[serde(rename = "Average Temperature")]
    pub avg: Option<f64>,
}

/// Inclusive date range over `YYYY-MM-DD` strings; `end: None` is open-ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateRange {
    pub start: String,
    pub end: Option<String>,
}

impl DateRange {
    pub fn starting(start: impl Into<String>) -> Self {
        Self { start: start.into(), end: None }
    }

    pub fn between(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self { start: start.into(), end: Some(end.into()) }
    }

    pub fn contains(&self, date: &str) -> bool {
        date >= self.start.as_str() && self.end.as_deref().map_or(true, |end| date <= end)
    }
}

/// Measurement count of the busiest station.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StationActivity {
    pub station_id: String,
    pub observations: i64,
}

/// Raw MIN/MAX/AVG of `tobs` plus the number of rows the range matched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemperatureAggregate {
    pub matched: i64,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub avg: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn records_serialize_with_display_keys() {
        let station = StationRecord { station_id: "USC1".into(), name: "Station A".into() };
        assert_eq!(serde_json::to_value(&station).unwrap(), json!({"Station ID": "USC1", "Station Name": "Station A"}));

        let p = PrecipitationRecord { date: "2017-01-02".into(), precipitation: None };
        assert_eq!(serde_json::to_value(&p).unwrap(), json!({"Date": "2017-01-02", "Precipitation": null}));

        let s = TemperatureSummary { min: Some(71.0), max: Some(71.0), avg: Some(71.0) };
        assert_eq!(
            serde_json::to_value(&s).unwrap(),
            json!({"Min Temperature": 71.0, "Max Temperature": 71.0, "Average Temperature": 71.0})
        );
    }

    #[test]
    fn range_bounds_are_inclusive_and_lexical() {
        let open = DateRange::starting("2017-01-01");
        assert!(open.contains("2017-01-01"));
        assert!(open.contains("2099-12-31"));
        assert!(!open.contains("2016-12-31"));

        let closed = DateRange::between("2017-01-01", "2017-01-31");
        assert!(closed.contains("2017-01-31"));
        assert!(!closed.contains("2017-02-01"));
    }
}
