pub mod csv_export;
pub mod db;
pub mod demo;
mod error;
mod params;
pub mod routes;
mod startup;
mod utils;

pub use csv_export::CsvExport;
pub use db::*;
pub use error::*;
pub use params::WeatherQuery;
pub use routes::*;
pub use startup::*;
pub use utils::*;
