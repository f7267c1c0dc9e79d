//! SQL for each read the API serves. Every builder returns a [`SqlQuery`]
//! whose values travel separately from the statement text.

use scooby::postgres::{select, Aliasable, Orderable, Parameters, Select};

use super::{
    filter::{city_and_dates, city_equals, city_in, CityFilter, CityList},
    schema::{
        fact_with_dimensions, fact_with_location, CALENDAR_MONTH, CALENDAR_YEAR, CITY,
        DAY_OF_WEEK, FULL_DATE, HUMIDITY, LOADED_AT, LOCATION_TABLE, TEMPERATURE,
    },
    SqlQuery,
};

/// Knobs for the time-series shaped queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeriesOptions {
    /// Cap on rows returned by the series and export queries
    pub limit: Option<u32>,
    /// Also select the date dimension's derived attributes
    pub extended: bool,
}

pub fn cities() -> SqlQuery {
    let query = select("city")
        .distinct()
        .from(LOCATION_TABLE)
        .order_by("city".asc());
    SqlQuery::new(query, vec![])
}

pub fn current(city: &str) -> SqlQuery {
    let mut placeholders = Parameters::new();
    let (query, params) = city_equals(city, &mut placeholders).apply(reading_select(false));
    let query = query
        .order_by((FULL_DATE.desc(), LOADED_AT.desc()))
        .limit(1);
    SqlQuery::new(query, params)
}

pub fn series(filter: &CityFilter, options: SeriesOptions) -> SqlQuery {
    let mut placeholders = Parameters::new();
    let (query, params) =
        city_and_dates(filter, &mut placeholders).apply(reading_select(options.extended));
    SqlQuery::new(ascending_by_date(query, options.limit), params)
}

pub fn summary(filter: &CityFilter) -> SqlQuery {
    let mut placeholders = Parameters::new();
    let query = select((
        "COUNT(*)".as_("days"),
        format!("AVG({TEMPERATURE})").as_("avg_temp"),
        format!("MIN({TEMPERATURE})").as_("min_temp"),
        format!("MAX({TEMPERATURE})").as_("max_temp"),
        format!("AVG({HUMIDITY})").as_("avg_humidity"),
        format!("MIN({HUMIDITY})").as_("min_humidity"),
        format!("MAX({HUMIDITY})").as_("max_humidity"),
    ))
    .from(fact_with_dimensions());
    let (query, params) = city_and_dates(filter, &mut placeholders).apply(query);
    SqlQuery::new(query, params)
}

/// Cities without any observation produce no group, so they drop out of the result.
pub fn compare(cities: &CityList) -> SqlQuery {
    let mut placeholders = Parameters::new();
    let query = select((
        CITY.as_("city"),
        format!("AVG({TEMPERATURE})").as_("avg_temp"),
        format!("AVG({HUMIDITY})").as_("avg_humidity"),
    ))
    .from(fact_with_location());
    let (query, params) = city_in(cities, &mut placeholders).apply(query);
    SqlQuery::new(query.group_by(CITY), params)
}

pub fn export(filter: &CityFilter, options: SeriesOptions) -> SqlQuery {
    let mut placeholders = Parameters::new();
    let query = select((
        FULL_DATE.as_("date"),
        CITY.as_("city"),
        TEMPERATURE.as_("temperature"),
        HUMIDITY.as_("humidity"),
        LOADED_AT.as_("loaded_at"),
    ))
    .from(fact_with_dimensions());
    let (query, params) = city_and_dates(filter, &mut placeholders).apply(query);
    SqlQuery::new(ascending_by_date(query, options.limit), params)
}

fn reading_select(extended: bool) -> Select {
    let query = if extended {
        select((
            FULL_DATE.as_("date"),
            TEMPERATURE.as_("temperature"),
            HUMIDITY.as_("humidity"),
            LOADED_AT.as_("loaded_at"),
            DAY_OF_WEEK.as_("day_of_week"),
            CALENDAR_MONTH.as_("calendar_month"),
            CALENDAR_YEAR.as_("calendar_year"),
        ))
    } else {
        select((
            FULL_DATE.as_("date"),
            TEMPERATURE.as_("temperature"),
            HUMIDITY.as_("humidity"),
            LOADED_AT.as_("loaded_at"),
        ))
    };
    query.from(fact_with_dimensions())
}

fn ascending_by_date(query: Select, limit: Option<u32>) -> Select {
    let query = query.order_by(FULL_DATE.asc());
    match limit {
        Some(limit) => query.limit(limit as usize),
        None => query,
    }
}
