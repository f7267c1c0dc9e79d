use log::debug;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

use super::{
    filter::{CityFilter, CityList},
    models::{City, CityComparison, ExportRow, Reading, Summary, SummaryRow},
    queries::{self, SeriesOptions},
    Error, Executor, Record,
};

/// The read operations the API exposes, run through an injected [`Executor`].
#[derive(Clone)]
pub struct WeatherAccess {
    executor: Arc<dyn Executor>,
    options: SeriesOptions,
}

impl WeatherAccess {
    pub fn new(executor: Arc<dyn Executor>, options: SeriesOptions) -> Self {
        Self { executor, options }
    }

    pub async fn cities(&self) -> Result<Vec<City>, Error> {
        let records = self.executor.execute(&queries::cities()).await?;
        from_records(records)
    }

    /// Latest reading for the city, `None` when the city has no observations.
    pub async fn current(&self, city: &str) -> Result<Option<Reading>, Error> {
        let records = self.executor.execute(&queries::current(city)).await?;
        Ok(from_records(records)?.into_iter().next())
    }

    pub async fn series(&self, filter: &CityFilter) -> Result<Vec<Reading>, Error> {
        let records = self
            .executor
            .execute(&queries::series(filter, self.options))
            .await?;
        debug!("series for {} returned {} row(s)", filter.city, records.len());
        from_records(records)
    }

    pub async fn summary(&self, filter: &CityFilter) -> Result<Summary, Error> {
        let records = self.executor.execute(&queries::summary(filter)).await?;
        let summary = from_records::<SummaryRow>(records)?
            .into_iter()
            .next()
            .map(Summary::from)
            .unwrap_or_else(Summary::empty);
        Ok(summary)
    }

    pub async fn compare(&self, cities: &CityList) -> Result<Vec<CityComparison>, Error> {
        let records = self.executor.execute(&queries::compare(cities)).await?;
        from_records(records)
    }

    pub async fn export_rows(&self, filter: &CityFilter) -> Result<Vec<ExportRow>, Error> {
        let records = self
            .executor
            .execute(&queries::export(filter, self.options))
            .await?;
        from_records(records)
    }
}

fn from_records<T: DeserializeOwned>(records: Vec<Record>) -> Result<Vec<T>, Error> {
    records
        .into_iter()
        .map(|record| serde_json::from_value(Value::Object(record)).map_err(Error::from))
        .collect()
}
