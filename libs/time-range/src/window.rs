//! Date-window filtering of time-series cells.
//!
//! A time-series cell is a JSON array of points stored as text, where each
//! point is itself an array whose first element is a timestamp:
//!
//! ```text
//! [["2024-01-01", 3.5], ["2024-01-02", 4.0, "note"]]
//! ```
//!
//! Timestamps may be ISO 8601 strings or numbers of epoch milliseconds.
//! Filtering is strict: a point that cannot be dated is an error.

use jiff::{Timestamp, Zoned, tz::TimeZone};
use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::{Error, SinceUntil, calendar::parse_datetime};

/// One row of a query result, keyed by column name.
pub type Row = Map<String, Value>;

/// Cheap structural check used before attempting a JSON parse.
pub fn looks_like_series(value: &str) -> bool {
    value.starts_with("[[") && value.ends_with("]]")
}

/// Whether a cell value holds a serialized time-series array.
pub fn is_time_series_cell(value: &str) -> bool {
    looks_like_series(value) && matches!(serde_json::from_str(value), Ok(Value::Array(_)))
}

/// Extracts the timestamp from a single point.
pub fn point_timestamp(point: &Value, tz: &TimeZone) -> Result<Timestamp, Error> {
    let mismatch = || Error::StructuralMismatch(point.to_string());
    let first = match point {
        Value::Array(items) => items.first().ok_or_else(mismatch)?,
        _ => return Err(mismatch()),
    };
    match first {
        Value::String(text) => parse_datetime(text, tz)
            .map(|at| at.timestamp())
            .map_err(|_| mismatch()),
        Value::Number(n) => {
            let millis = n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
                .ok_or_else(mismatch)?;
            Timestamp::from_millisecond(millis).map_err(|_| mismatch())
        }
        _ => Err(mismatch()),
    }
}

/// Keeps the points whose timestamp lies in `[since, until]`.
pub fn filter_points(points: &[Value], since: &Zoned, until: &Zoned) -> Result<Vec<Value>, Error> {
    let tz = since.time_zone();
    let (since, until) = (since.timestamp(), until.timestamp());
    let mut kept = Vec::with_capacity(points.len());
    for point in points {
        let at = point_timestamp(point, tz)?;
        if since <= at && at <= until {
            kept.push(point.clone());
        }
    }
    trace!(total = points.len(), kept = kept.len(), "filtered time series");
    Ok(kept)
}

/// Filters a serialized time-series cell and serializes the result back.
pub fn filter_cell(text: &str, since: &Zoned, until: &Zoned) -> Result<String, Error> {
    let points: Vec<Value> = serde_json::from_str(text)?;
    let kept = filter_points(&points, since, until)?;
    Ok(serde_json::to_string(&kept)?)
}

/// Applies the date window to every time-series cell of the named columns.
///
/// Rows are returned unchanged when the range is open on either side.
pub fn process_rows<S: AsRef<str>>(
    rows: &[Row],
    time_range_cols: &[S],
    range: &SinceUntil,
) -> Result<Vec<Row>, Error> {
    let Some((since, until)) = range.bounds() else {
        debug!("time range is not closed, skipping window filter");
        return Ok(rows.to_vec());
    };
    rows.iter()
        .map(|row| -> Result<Row, Error> {
            let mut row = row.clone();
            for col in time_range_cols {
                let Some(Value::String(text)) = row.get_mut(col.as_ref()) else {
                    continue;
                };
                if !looks_like_series(text) {
                    continue;
                }
                *text = filter_cell(text, since, until)?;
            }
            Ok(row)
        })
        .collect()
}
