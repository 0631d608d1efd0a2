use super::{Error, Observation, ObservationFilter, ObservationStore, Station, TemperatureSummary};
use crate::dates::{format_date, parse_date};
use anyhow::{anyhow, Context};
use async_trait::async_trait;
use hawaii_climate_core::is_file;
use log::{debug, info};
use regex::Regex;
use scooby::postgres::{select, Aliasable, Orderable, Parameters, Select};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow},
    Row,
};
use std::{collections::BTreeMap, sync::LazyLock, time::Duration};
use time::Date;

const MEASUREMENT_TABLE: &str = "measurement";
const STATION_TABLE: &str = "station";

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$(\d+)").expect("placeholder pattern is valid"));

/// Observation store over the pre-populated SQLite dataset.
///
/// The file is opened read-only and immutable, so every query made while serving one request
/// sees the same snapshot.
pub struct SqliteObservationStore {
    pool: SqlitePool,
}

impl SqliteObservationStore {
    pub async fn open(path: &str, max_connections: u32) -> anyhow::Result<Self> {
        if !is_file(path) {
            return Err(anyhow!("observation dataset not found at {}", path));
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(false)
            .read_only(true)
            .immutable(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(30))
            .connect_with(options)
            .await
            .context("Failed to create dataset connection pool")?;

        let store = Self::from_pool(pool);
        store
            .health_check()
            .await
            .with_context(|| format!("Dataset at {} failed health check", path))?;
        info!("Observation dataset opened read-only at: {}", path);

        Ok(store)
    }

    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Check connectivity and that both collections exist.
    pub async fn health_check(&self) -> Result<(), Error> {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await?;

        let tables: Vec<String> = sqlx::query_scalar(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name IN (?, ?)",
        )
        .bind(MEASUREMENT_TABLE)
        .bind(STATION_TABLE)
        .fetch_all(&self.pool)
        .await?;

        for required in [MEASUREMENT_TABLE, STATION_TABLE] {
            if !tables.iter().any(|t| t == required) {
                return Err(Error::MissingTable(required));
            }
        }
        Ok(())
    }

    async fn query(&self, select: Select, params: Vec<String>) -> Result<Vec<SqliteRow>, Error> {
        let binding = select.to_string();
        let sql = PLACEHOLDER.replace_all(&binding, "?");
        debug!("dataset query: {}", sql);

        let mut query = sqlx::query(&sql);
        for param in &params {
            query = query.bind(param.as_str());
        }
        Ok(query.fetch_all(&self.pool).await?)
    }

    async fn max_date(&self, filter: &ObservationFilter) -> Result<Option<Date>, Error> {
        let mut placeholders = Parameters::new();
        let mut values = vec![];
        let query = apply_filter(
            select("MAX(date)".as_("max_date")).from(MEASUREMENT_TABLE),
            filter,
            &mut placeholders,
            &mut values,
        )?;

        let rows = self.query(query, values).await?;
        let max_date = match rows.first() {
            Some(row) => row.try_get::<Option<String>, _>("max_date")?,
            None => None,
        };
        Ok(max_date.as_deref().map(parse_date).transpose()?)
    }
}

#[async_trait]
impl ObservationStore for SqliteObservationStore {
    async fn max_observation_date(&self) -> Result<Date, Error> {
        self.max_date(&ObservationFilter::new())
            .await?
            .ok_or(Error::EmptyDataset)
    }

    async fn max_date_for_station(&self, station_id: &str) -> Result<Date, Error> {
        self.max_date(&ObservationFilter::new().station(station_id))
            .await?
            .ok_or_else(|| Error::NoObservationsForStation(station_id.to_owned()))
    }

    async fn observations_in_range(
        &self,
        filter: &ObservationFilter,
    ) -> Result<Vec<Observation>, Error> {
        let mut placeholders = Parameters::new();
        let mut values = vec![];
        let query = apply_filter(
            select((
                "station",
                "date",
                "CAST(prcp AS REAL)".as_("prcp"),
                "CAST(tobs AS REAL)".as_("tobs"),
            ))
            .from(MEASUREMENT_TABLE),
            filter,
            &mut placeholders,
            &mut values,
        )?
        .order_by("date".asc());

        self.query(query, values)
            .await?
            .iter()
            .map(|row| -> Result<Observation, Error> {
                let date: String = row.try_get("date")?;
                Ok(Observation {
                    station_id: row.try_get("station")?,
                    date: parse_date(&date)?,
                    precipitation: row.try_get("prcp")?,
                    temperature: row.try_get("tobs")?,
                })
            })
            .collect()
    }

    async fn station_observation_counts(&self) -> Result<BTreeMap<String, i64>, Error> {
        let query = select(("station", "COUNT(*)".as_("observation_count")))
            .from(MEASUREMENT_TABLE)
            .group_by("station");

        self.query(query, vec![])
            .await?
            .iter()
            .map(|row| -> Result<(String, i64), Error> {
                Ok((
                    row.try_get::<String, _>("station")?,
                    row.try_get::<i64, _>("observation_count")?,
                ))
            })
            .collect()
    }

    async fn temperature_summary(
        &self,
        filter: &ObservationFilter,
    ) -> Result<Option<TemperatureSummary>, Error> {
        let mut placeholders = Parameters::new();
        let mut values = vec![];
        let query = apply_filter(
            select((
                "CAST(MIN(tobs) AS REAL)".as_("temp_min"),
                "AVG(tobs)".as_("temp_avg"),
                "CAST(MAX(tobs) AS REAL)".as_("temp_max"),
                "COUNT(tobs)".as_("matched"),
            ))
            .from(MEASUREMENT_TABLE),
            filter,
            &mut placeholders,
            &mut values,
        )?;

        let rows = self.query(query, values).await?;
        let Some(row) = rows.first() else {
            return Ok(None);
        };
        if row.try_get::<i64, _>("matched")? == 0 {
            return Ok(None);
        }

        let min: Option<f64> = row.try_get("temp_min")?;
        let avg: Option<f64> = row.try_get("temp_avg")?;
        let max: Option<f64> = row.try_get("temp_max")?;
        Ok(match (min, avg, max) {
            (Some(min), Some(avg), Some(max)) => Some(TemperatureSummary { min, avg, max }),
            _ => None,
        })
    }

    async fn list_stations(&self) -> Result<Vec<Station>, Error> {
        let query = select((
            "station",
            "name",
            "CAST(latitude AS REAL)".as_("latitude"),
            "CAST(longitude AS REAL)".as_("longitude"),
            "CAST(elevation AS REAL)".as_("elevation"),
        ))
        .from(STATION_TABLE);

        self.query(query, vec![])
            .await?
            .iter()
            .map(|row| -> Result<Station, Error> {
                Ok(Station {
                    station_id: row.try_get("station")?,
                    name: row.try_get("name")?,
                    latitude: row.try_get("latitude")?,
                    longitude: row.try_get("longitude")?,
                    elevation: row.try_get("elevation")?,
                })
            })
            .collect()
    }
}

fn apply_filter(
    mut query: Select,
    filter: &ObservationFilter,
    placeholders: &mut Parameters,
    values: &mut Vec<String>,
) -> Result<Select, Error> {
    if let Some(station_id) = &filter.station_id {
        query = query.where_(format!("station = {}", placeholders.next()));
        values.push(station_id.clone());
    }
    // dates are stored as YYYY-MM-DD text, so string comparison is calendar order
    if let Some(from) = filter.from {
        query = query.where_(format!("date >= {}", placeholders.next()));
        values.push(format_date(from)?);
    }
    if let Some(to) = filter.to {
        query = query.where_(format!("date <= {}", placeholders.next()));
        values.push(format_date(to)?);
    }
    Ok(query)
}
