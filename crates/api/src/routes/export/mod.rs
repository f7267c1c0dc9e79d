pub mod csv_download;

pub use csv_download::*;
