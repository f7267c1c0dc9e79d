use axum::{extract::FromRequestParts, extract::Query, http::request::Parts};
use log::debug;
use time::{macros::format_description, Date};

use crate::{
    db::{CityFilter, CityList, DateRange},
    ApiError,
};

/// Query-string inputs shared by every endpoint, validated once at the edge.
///
/// Empty values (`city=`) count as absent. `cities` may be one comma-separated
/// value or repeated keys; repeated values are kept as given.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeatherQuery {
    pub city: Option<String>,
    pub from: Option<Date>,
    pub to: Option<Date>,
    pub cities: Vec<String>,
}

impl WeatherQuery {
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Result<Self, ApiError> {
        let mut query = WeatherQuery::default();
        let mut cities = Vec::new();

        for (key, value) in pairs {
            match key.as_str() {
                "city" if query.city.is_none() && !value.is_empty() => query.city = Some(value),
                "from" if query.from.is_none() => query.from = parse_date("from", &value)?,
                "to" if query.to.is_none() => query.to = parse_date("to", &value)?,
                "cities" => cities.push(value),
                _ => {}
            }
        }

        query.cities = if cities.len() == 1 {
            let single = cities.remove(0);
            if single.is_empty() {
                Vec::new()
            } else {
                single.split(',').map(str::to_owned).collect()
            }
        } else {
            cities
        };

        debug!("parsed weather query: {:?}", query);
        Ok(query)
    }

    pub fn range(&self) -> DateRange {
        DateRange {
            from: self.from,
            to: self.to,
        }
    }

    pub fn require_city(&self) -> Result<CityFilter, ApiError> {
        let city = self
            .city
            .clone()
            .ok_or(ApiError::MissingParameter("city"))?;
        Ok(CityFilter {
            city,
            range: self.range(),
        })
    }

    pub fn require_cities(&self) -> Result<CityList, ApiError> {
        CityList::new(self.cities.clone()).ok_or(ApiError::MissingParameter("cities"))
    }
}

fn parse_date(name: &'static str, value: &str) -> Result<Option<Date>, ApiError> {
    if value.is_empty() {
        return Ok(None);
    }
    Date::parse(value, format_description!("[year]-[month]-[day]"))
        .map(Some)
        .map_err(|_| ApiError::InvalidParameter(name))
}

impl<S> FromRequestParts<S> for WeatherQuery
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Query(pairs) = Query::<Vec<(String, String)>>::try_from_uri(&parts.uri)
            .map_err(|_| ApiError::MalformedQuery)?;
        WeatherQuery::from_pairs(pairs)
    }
}
