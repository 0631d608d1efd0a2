pub mod observation_store;
pub mod sqlite;

pub use observation_store::*;
pub use sqlite::SqliteObservationStore;

use crate::dates::iso_date;
use serde::{Deserialize, Serialize};
use time::Date;
use utoipa::ToSchema;

/// One station's reading for a single day.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct Observation {
    pub station_id: String,
    #[serde(with = "iso_date")]
    #[schema(value_type = String, format = Date, example = "2017-08-23")]
    pub date: Date,
    /// Rainfall in inches, absent when nothing was recorded (not the same as zero)
    pub precipitation: Option<f64>,
    /// Observed temperature in degrees Fahrenheit
    pub temperature: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct Station {
    pub station_id: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub elevation: f64,
}

/// Min/avg/max of the temperature over a filtered set of observations.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, ToSchema)]
pub struct TemperatureSummary {
    pub min: f64,
    pub avg: f64,
    pub max: f64,
}

/// Row filter shared by range scans and temperature aggregates.
///
/// Both date bounds are inclusive; a missing bound leaves that side open.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObservationFilter {
    pub station_id: Option<String>,
    pub from: Option<Date>,
    pub to: Option<Date>,
}

impl ObservationFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn station(mut self, station_id: impl Into<String>) -> Self {
        self.station_id = Some(station_id.into());
        self
    }

    pub fn from(mut self, from: Date) -> Self {
        self.from = Some(from);
        self
    }

    pub fn to(mut self, to: Option<Date>) -> Self {
        self.to = to;
        self
    }
}
