//! CSV rendering for `/api/export/csv`.
//!
//! Dates and timestamps follow the Vietnamese (`vi-VN`) convention the
//! export has always used: `d/m/yyyy` with no zero padding, and
//! `HH:MM:SS d/m/yyyy` for load times.

use csv::{QuoteStyle, Terminator, WriterBuilder};
use time::{
    format_description::well_known::Rfc3339, macros::format_description, Date, OffsetDateTime,
    PrimitiveDateTime, UtcOffset,
};

use crate::db::ExportRow;

pub const HEADER: &str = "Ngày,Thành phố,Nhiệt độ (°C),Độ ẩm (%),Thời gian cập nhật";

/// Written in place of an absent value.
pub const MISSING_VALUE: &str = "N/A";

pub const CONTENT_TYPE: &str = "text/csv; charset=utf-8";

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Failed to write csv record: {0}")]
    Csv(#[from] csv::Error),
    #[error("Failed to flush csv output: {0}")]
    Flush(String),
    #[error("Csv output is not valid utf-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("Invalid attachment header: {0}")]
    Header(#[from] axum::http::header::InvalidHeaderValue),
}

#[derive(Debug, Clone, Copy)]
pub struct CsvExport {
    display_offset: UtcOffset,
}

impl CsvExport {
    /// `display_offset` applies to timestamps that carry a zone (TIMESTAMP
    /// columns); zoneless DATETIME values are written as stored.
    pub fn new(display_offset: UtcOffset) -> Self {
        Self { display_offset }
    }

    pub fn render(&self, rows: &[ExportRow]) -> Result<String, Error> {
        let mut writer = WriterBuilder::new()
            .has_headers(false)
            .quote_style(QuoteStyle::Always)
            .terminator(Terminator::Any(b'\n'))
            .from_writer(Vec::new());

        for row in rows {
            writer.write_record([
                vi_date(&row.date),
                row.city.clone(),
                number(row.temperature),
                number(row.humidity),
                self.vi_timestamp(row.loaded_at.as_deref()),
            ])?;
        }

        let body = writer
            .into_inner()
            .map_err(|err| Error::Flush(err.to_string()))?;

        let mut output = String::with_capacity(HEADER.len() + 1 + body.len());
        output.push_str(HEADER);
        output.push('\n');
        output.push_str(&String::from_utf8(body)?);
        Ok(output)
    }

    fn vi_timestamp(&self, value: Option<&str>) -> String {
        let Some(value) = value else {
            return MISSING_VALUE.to_string();
        };

        let local = match OffsetDateTime::parse(value, &Rfc3339) {
            Ok(instant) => {
                let shifted = instant.to_offset(self.display_offset);
                Some(PrimitiveDateTime::new(shifted.date(), shifted.time()))
            }
            Err(_) => PrimitiveDateTime::parse(
                value,
                format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
            )
            .or_else(|_| {
                PrimitiveDateTime::parse(
                    value,
                    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
                )
            })
            .ok(),
        };

        match local {
            Some(local) => format!(
                "{:02}:{:02}:{:02} {}",
                local.hour(),
                local.minute(),
                local.second(),
                day_month_year(local.date())
            ),
            None => value.to_string(),
        }
    }
}

/// `Content-Disposition` for the export. The plain `filename` is an ASCII
/// fallback, `filename*` carries the real city name.
pub fn attachment_disposition(city: &str) -> String {
    let fallback: String = city
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!(
        "attachment; filename=\"weather_data_{}.csv\"; filename*=UTF-8''weather_data_{}.csv",
        fallback,
        urlencoding::encode(city)
    )
}

fn vi_date(value: &str) -> String {
    value
        .get(..10)
        .and_then(|day| Date::parse(day, format_description!("[year]-[month]-[day]")).ok())
        .map(day_month_year)
        .unwrap_or_else(|| value.to_string())
}

fn day_month_year(date: Date) -> String {
    format!("{}/{}/{}", date.day(), u8::from(date.month()), date.year())
}

fn number(value: Option<f64>) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| MISSING_VALUE.to_string())
}
