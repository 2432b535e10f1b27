//! Calendar arithmetic that anchors parsed bounds to an evaluation instant.

use jiff::{
    Span, Timestamp, Zoned,
    civil::{Date, DateTime},
    tz::TimeZone,
};
use tracing::debug;

use crate::{
    Error,
    parse::{Bound, CalendarPeriod, Unit},
};

/// First day of the week used by `previous calendar week`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    #[default]
    Sunday,
    Monday,
}

impl Unit {
    pub fn span(self, n: i64) -> Result<Span, Error> {
        let span = Span::new();
        let span = match self {
            Unit::Second => span.try_seconds(n)?,
            Unit::Minute => span.try_minutes(n)?,
            Unit::Hour => span.try_hours(n)?,
            Unit::Day => span.try_days(n)?,
            Unit::Week => span.try_weeks(n)?,
            Unit::Month => span.try_months(n)?,
            Unit::Quarter => span.try_months(n.saturating_mul(3))?,
            Unit::Year => span.try_years(n)?,
        };
        Ok(span)
    }
}

pub fn shift(at: &Zoned, unit: Unit, delta: i64) -> Result<Zoned, Error> {
    Ok(at.checked_add(unit.span(delta)?)?)
}

pub fn start_of_week(at: &Zoned, week_start: WeekStart) -> Result<Zoned, Error> {
    let days_in = match week_start {
        WeekStart::Sunday => at.weekday().to_sunday_zero_offset(),
        WeekStart::Monday => at.weekday().to_monday_zero_offset(),
    };
    let first = at.checked_sub(Span::new().days(i64::from(days_in)))?;
    Ok(first.start_of_day()?)
}

pub fn start_of_month(at: &Zoned) -> Result<Zoned, Error> {
    Ok(at.first_of_month()?.start_of_day()?)
}

pub fn start_of_year(at: &Zoned) -> Result<Zoned, Error> {
    Ok(at.first_of_year()?.start_of_day()?)
}

/// Returns the start of the previous period and the start of the current one.
pub fn previous_calendar(
    now: &Zoned,
    period: CalendarPeriod,
    week_start: WeekStart,
) -> Result<(Zoned, Zoned), Error> {
    match period {
        CalendarPeriod::Week => Ok((
            start_of_week(&shift(now, Unit::Week, -1)?, week_start)?,
            start_of_week(now, week_start)?,
        )),
        CalendarPeriod::Month => Ok((
            start_of_month(&shift(now, Unit::Month, -1)?)?,
            start_of_month(now)?,
        )),
        CalendarPeriod::Year => Ok((
            start_of_year(&shift(now, Unit::Year, -1)?)?,
            start_of_year(now)?,
        )),
    }
}

/// Anchors a parsed bound to `now`.
pub fn resolve_bound(bound: &Bound, now: &Zoned) -> Result<Zoned, Error> {
    match bound {
        Bound::Offset { unit, delta } => shift(now, *unit, *delta),
        Bound::DateAdd {
            anchor,
            unit,
            delta,
        } => {
            let anchor = if anchor.eq_ignore_ascii_case("now") {
                now.clone()
            } else {
                match parse_datetime(&anchor.to_uppercase(), now.time_zone()) {
                    Ok(at) => at,
                    Err(err) => {
                        debug!(%anchor, %err, "unparseable DATEADD anchor, using now");
                        now.clone()
                    }
                }
            };
            shift(&anchor, *unit, *delta)
        }
        Bound::Today => Ok(now.start_of_day()?),
        Bound::Now => Ok(now.clone()),
        Bound::Literal(text) => parse_datetime(text, now.time_zone()),
    }
}

/// Parses an ISO 8601 style date or datetime.
///
/// Strings carrying an offset or a bracketed zone name keep their instant.
/// Civil dates and datetimes are placed in `tz`. A single space between the
/// date and the time is accepted in place of `T`.
pub fn parse_datetime(text: &str, tz: &TimeZone) -> Result<Zoned, Error> {
    let text = text.trim();
    let normalized = normalize_separator(text);
    for candidate in [text, normalized.as_str()] {
        if let Ok(zoned) = candidate.parse::<Zoned>() {
            return Ok(zoned.with_time_zone(tz.clone()));
        }
        if let Ok(ts) = candidate.parse::<Timestamp>() {
            return Ok(ts.to_zoned(tz.clone()));
        }
        if let Ok(dt) = candidate.parse::<DateTime>() {
            return Ok(dt.to_zoned(tz.clone())?);
        }
        if let Ok(date) = candidate.parse::<Date>() {
            return Ok(date.to_zoned(tz.clone())?);
        }
    }
    Err(Error::Parse(text.to_string()))
}

fn normalize_separator(text: &str) -> String {
    let mut out = text.to_uppercase();
    if out.len() > 10 && out.is_char_boundary(10) && out.as_bytes()[10] == b' ' {
        out.replace_range(10..11, "T");
    }
    out
}
