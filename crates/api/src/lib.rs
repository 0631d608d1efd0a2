pub mod climate;
pub mod dates;
pub mod db;
pub mod routes;
pub mod startup;
pub mod templates;
pub mod utils;

pub use climate::{
    ClimateQueryService, PrecipitationReading, StationTemperatureSummary,
    StationTemperatureTrend, TemperatureReading,
};
pub use db::{
    Observation, ObservationFilter, ObservationStore, SqliteObservationStore, Station,
    TemperatureSummary,
};
pub use routes::*;
pub use startup::*;
pub use utils::*;
