pub mod filter;
pub mod models;
pub mod queries;
pub mod schema;
pub mod warehouse;
pub mod weather_data;

pub use filter::{CityFilter, CityList, DateRange};
pub use models::*;
pub use queries::SeriesOptions;
pub use warehouse::{Error, Executor, MySqlWarehouse, Record, SqlQuery};
pub use weather_data::WeatherAccess;
