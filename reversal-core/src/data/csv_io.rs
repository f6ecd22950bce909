//! `Date,Open,High,Low,Close[,Volume]` files.
//!
//! Dates are accepted as `%Y-%m-%d %H:%M:%S` (taken as UTC) or RFC 3339 and
//! written back in the first form. Volume is read if present and ignored.

use super::DataError;
use crate::domain::{BarError, BarSnapshot};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tracing::debug;

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Deserialize)]
struct InputRow {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Open")]
    open: f64,
    #[serde(rename = "High")]
    high: f64,
    #[serde(rename = "Low")]
    low: f64,
    #[serde(rename = "Close")]
    close: f64,
    #[serde(rename = "Volume", default)]
    #[allow(dead_code)]
    volume: Option<f64>,
}

#[derive(Debug, Serialize)]
struct OutputRow {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Open")]
    open: f64,
    #[serde(rename = "High")]
    high: f64,
    #[serde(rename = "Low")]
    low: f64,
    #[serde(rename = "Close")]
    close: f64,
}

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, DATE_FORMAT) {
        return Some(naive.and_utc());
    }
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Read bars from any CSV source with a header row.
///
/// Every row must pass the OHLC sanity check and come strictly after the row
/// before it. The first bad row aborts the read.
pub fn read_bars<R: Read>(reader: R) -> Result<Vec<BarSnapshot>, DataError> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut bars: Vec<BarSnapshot> = Vec::new();

    for (i, record) in rdr.deserialize::<InputRow>().enumerate() {
        let row = i + 1;
        let record = record.map_err(|source| DataError::Parse { row, source })?;
        let timestamp = parse_timestamp(&record.date).ok_or_else(|| DataError::BadDate {
            row,
            value: record.date.clone(),
        })?;

        let bar = BarSnapshot {
            index: i,
            timestamp,
            open: record.open,
            high: record.high,
            low: record.low,
            close: record.close,
        };
        bar.validate()
            .map_err(|source| DataError::InvalidBar { row, source })?;
        if let Some(prev) = bars.last() {
            if bar.timestamp <= prev.timestamp {
                return Err(DataError::InvalidBar {
                    row,
                    source: BarError::NonMonotonicTimestamp { index: i },
                });
            }
        }
        bars.push(bar);
    }

    debug!(bars = bars.len(), "read bar csv");
    Ok(bars)
}

pub fn load_bars_csv(path: &Path) -> Result<Vec<BarSnapshot>, DataError> {
    read_bars(File::open(path)?)
}

pub fn write_bars_csv<W: Write>(writer: W, bars: &[BarSnapshot]) -> Result<(), DataError> {
    let mut wtr = csv::Writer::from_writer(writer);
    for bar in bars {
        wtr.serialize(OutputRow {
            date: bar.timestamp.format(DATE_FORMAT).to_string(),
            open: bar.open,
            high: bar.high,
            low: bar.low,
            close: bar.close,
        })?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Date,Open,High,Low,Close,Volume
2025-10-07 00:00:00,1.1000,1.1004,1.0998,1.1002,120
2025-10-07 00:01:00,1.1002,1.1006,1.1001,1.1005,80
2025-10-07T00:02:00Z,1.1005,1.1005,1.0999,1.1000,95
";

    #[test]
    fn reads_both_date_formats() {
        let bars = read_bars(SAMPLE.as_bytes()).unwrap();
        assert_eq!(bars.len(), 3);
        assert_eq!(bars[2].index, 2);
        assert_eq!(bars[2].timestamp.format(DATE_FORMAT).to_string(), "2025-10-07 00:02:00");
        assert_eq!(bars[1].close, 1.1005);
    }

    #[test]
    fn volume_column_is_optional() {
        let data = "Date,Open,High,Low,Close\n2025-10-07 00:00:00,1.1,1.2,1.0,1.15\n";
        let bars = read_bars(data.as_bytes()).unwrap();
        assert_eq!(bars.len(), 1);
    }

    #[test]
    fn insane_row_reports_row_number() {
        let data = "\
Date,Open,High,Low,Close
2025-10-07 00:00:00,1.1,1.2,1.0,1.15
2025-10-07 00:01:00,1.1,1.0,1.2,1.15
";
        let err = read_bars(data.as_bytes()).unwrap_err();
        assert!(matches!(err, DataError::InvalidBar { row: 2, .. }));
    }

    #[test]
    fn infinite_prices_rejected() {
        let data = "\
Date,Open,High,Low,Close
2025-10-07 00:00:00,1.1,1.2,1.0,1.15
2025-10-07 00:01:00,1.15,inf,1.1,inf
";
        let err = read_bars(data.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            DataError::InvalidBar {
                row: 2,
                source: BarError::NonFinite { index: 1 }
            }
        ));
    }

    #[test]
    fn out_of_order_timestamps_rejected() {
        let data = "\
Date,Open,High,Low,Close
2025-10-07 00:01:00,1.1,1.2,1.0,1.15
2025-10-07 00:00:00,1.1,1.2,1.0,1.15
";
        let err = read_bars(data.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            DataError::InvalidBar {
                row: 2,
                source: BarError::NonMonotonicTimestamp { .. }
            }
        ));
    }

    #[test]
    fn bad_date_rejected() {
        let data = "Date,Open,High,Low,Close\nyesterday,1.1,1.2,1.0,1.15\n";
        let err = read_bars(data.as_bytes()).unwrap_err();
        assert!(matches!(err, DataError::BadDate { row: 1, .. }));
    }

    #[test]
    fn written_file_reads_back() {
        let bars = read_bars(SAMPLE.as_bytes()).unwrap();
        let mut out = Vec::new();
        write_bars_csv(&mut out, &bars).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("Date,Open,High,Low,Close\n"));
        assert_eq!(read_bars(text.as_bytes()).unwrap(), bars);
    }
}
