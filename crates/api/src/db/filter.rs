use scooby::postgres::{Parameters, Select};
use time::Date;

use super::schema::{CITY, FULL_DATE};

/// Optional inclusive bounds on the observation date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub from: Option<Date>,
    pub to: Option<Date>,
}

/// A single city plus the date window to read for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CityFilter {
    pub city: String,
    pub range: DateRange,
}

/// Cities to compare, in the order they were requested. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CityList(Vec<String>);

impl CityList {
    pub fn new(cities: Vec<String>) -> Option<Self> {
        if cities.is_empty() {
            None
        } else {
            Some(Self(cities))
        }
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

/// WHERE conditions written with numbered placeholders, plus the values
/// bound to them in placeholder order. User input only ever lands in `params`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Conditions {
    pub clauses: Vec<String>,
    pub params: Vec<String>,
}

impl Conditions {
    fn push(&mut self, clause: String, values: impl IntoIterator<Item = String>) {
        self.clauses.push(clause);
        self.params.extend(values);
    }

    fn extend(&mut self, other: Conditions) {
        self.clauses.extend(other.clauses);
        self.params.extend(other.params);
    }

    /// ANDs every clause into the select and returns the values to bind.
    pub fn apply(self, select: Select) -> (Select, Vec<String>) {
        let select = self
            .clauses
            .into_iter()
            .fold(select, |select, clause| select.where_(clause));
        (select, self.params)
    }
}

pub fn city_equals(city: &str, placeholders: &mut Parameters) -> Conditions {
    let mut conditions = Conditions::default();
    conditions.push(
        format!("{} = {}", CITY, placeholders.next()),
        [city.to_owned()],
    );
    conditions
}

pub fn date_within(range: &DateRange, placeholders: &mut Parameters) -> Conditions {
    let mut conditions = Conditions::default();
    match (range.from, range.to) {
        (Some(from), Some(to)) => {
            let lower = placeholders.next();
            let upper = placeholders.next();
            conditions.push(
                format!("{} BETWEEN {} AND {}", FULL_DATE, lower, upper),
                [from.to_string(), to.to_string()],
            );
        }
        (Some(from), None) => conditions.push(
            format!("{} >= {}", FULL_DATE, placeholders.next()),
            [from.to_string()],
        ),
        (None, Some(to)) => conditions.push(
            format!("{} <= {}", FULL_DATE, placeholders.next()),
            [to.to_string()],
        ),
        (None, None) => {}
    }
    conditions
}

/// City equality followed by the date window.
pub fn city_and_dates(filter: &CityFilter, placeholders: &mut Parameters) -> Conditions {
    let mut conditions = city_equals(&filter.city, placeholders);
    conditions.extend(date_within(&filter.range, placeholders));
    conditions
}

/// One placeholder per requested city inside `IN (...)`.
pub fn city_in(cities: &CityList, placeholders: &mut Parameters) -> Conditions {
    let mut conditions = Conditions::default();
    conditions.push(
        format!(
            "{} IN ({})",
            CITY,
            placeholders.next_n(cities.as_slice().len())
        ),
        cities.as_slice().iter().cloned(),
    );
    conditions
}
