use jiff::Zoned;
use tracing::{debug, trace};

use crate::{
    Clock, Error, SEPARATOR,
    calendar::{self, WeekStart},
    parse::{self, Shortcut},
};

const DEFAULT_RELATIVE_ANCHOR: &str = "today";

/// A resolved `(since, until)` pair. Either side may be open.
///
/// Only [`SinceUntil::new`] and [`SinceUntil::unbounded`] build one, so a
/// closed range always has `since <= until`:
///
/// ```compile_fail
/// let range = time_range::SinceUntil { since: None, until: None };
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SinceUntil {
    since: Option<Zoned>,
    until: Option<Zoned>,
}

impl SinceUntil {
    pub fn new(since: Option<Zoned>, until: Option<Zoned>) -> Result<Self, Error> {
        if let (Some(since), Some(until)) = (&since, &until)
            && since.timestamp() > until.timestamp()
        {
            return Err(Error::Ordering {
                since: Box::new(since.clone()),
                until: Box::new(until.clone()),
            });
        }
        Ok(Self { since, until })
    }

    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn since(&self) -> Option<&Zoned> {
        self.since.as_ref()
    }

    pub fn until(&self) -> Option<&Zoned> {
        self.until.as_ref()
    }

    /// Both bounds, if the range is closed on both sides.
    pub fn bounds(&self) -> Option<(&Zoned, &Zoned)> {
        Some((self.since.as_ref()?, self.until.as_ref()?))
    }
}

/// Caller-level knobs for resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct ResolveOptions {
    /// Left bound paired with a bare `next ...` expression. Defaults to `today`.
    pub relative_start: Option<String>,
    /// Right bound paired with a bare `last ...` expression. Defaults to `today`.
    pub relative_end: Option<String>,
    pub week_start: WeekStart,
}

impl ResolveOptions {
    fn relative_start(&self) -> &str {
        effective_anchor(self.relative_start.as_deref())
    }

    fn relative_end(&self) -> &str {
        effective_anchor(self.relative_end.as_deref())
    }
}

fn effective_anchor(anchor: Option<&str>) -> &str {
    anchor
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .unwrap_or(DEFAULT_RELATIVE_ANCHOR)
}

/// Resolves expressions against a clock with a fixed set of options.
#[derive(Debug, Clone, Default)]
pub struct Resolver<C> {
    clock: C,
    options: ResolveOptions,
}

impl<C: Clock> Resolver<C> {
    pub fn new(clock: C, options: ResolveOptions) -> Self {
        Self { clock, options }
    }

    pub fn options(&self) -> &ResolveOptions {
        &self.options
    }

    pub fn resolve(&self, time_range: Option<&str>) -> Result<SinceUntil, Error> {
        resolve_with(time_range, &self.options, &self.clock.now())
    }
}

/// Resolves `time_range` relative to `now`.
///
/// `relative_start` and `relative_end` replace the implicit `today` bound
/// paired with bare `next ...` and `last ...` expressions.
pub fn since_until(
    time_range: Option<&str>,
    relative_start: Option<&str>,
    relative_end: Option<&str>,
    now: &Zoned,
) -> Result<SinceUntil, Error> {
    let options = ResolveOptions {
        relative_start: relative_start.map(str::to_string),
        relative_end: relative_end.map(str::to_string),
        ..Default::default()
    };
    resolve_with(time_range, &options, now)
}

pub fn resolve_with(
    time_range: Option<&str>,
    options: &ResolveOptions,
    now: &Zoned,
) -> Result<SinceUntil, Error> {
    let Some(time_range) = time_range.filter(|t| !t.trim().is_empty()) else {
        return Ok(SinceUntil::unbounded());
    };

    match parse::parse_shortcut(time_range) {
        Some(Shortcut::NoRange) => return Ok(SinceUntil::unbounded()),
        Some(Shortcut::PreviousCalendar(period)) => {
            let (since, until) = calendar::previous_calendar(now, period, options.week_start)?;
            debug!(%time_range, %since, %until, "resolved previous calendar period");
            return SinceUntil::new(Some(since), Some(until));
        }
        None => {}
    }

    let compound = pair_implicit_bound(time_range, options);
    trace!(%time_range, %compound, "split time range");
    let mut parts = compound.split(SEPARATOR).map(str::trim);
    let since = resolve_part(parts.next(), now)?;
    let until = resolve_part(parts.next(), now)?;
    if parts.next().is_some() {
        debug!(%time_range, "ignoring parts past the second separator");
    }

    let range = SinceUntil::new(since, until)?;
    debug!(%time_range, since = ?range.since, until = ?range.until, "resolved time range");
    Ok(range)
}

/// Compound expressions are returned as written; their parts are trimmed
/// after the split, so a leading `" : "` still marks an open left side.
fn pair_implicit_bound(time_range: &str, options: &ResolveOptions) -> String {
    if time_range.contains(SEPARATOR) {
        return time_range.to_string();
    }
    let time_range = time_range.trim();
    let lowered = time_range.to_lowercase();
    if lowered.starts_with("last") {
        format!("{time_range}{SEPARATOR}{}", options.relative_end())
    } else if lowered.starts_with("next") {
        format!("{}{SEPARATOR}{time_range}", options.relative_start())
    } else {
        time_range.to_string()
    }
}

fn resolve_part(part: Option<&str>, now: &Zoned) -> Result<Option<Zoned>, Error> {
    match part {
        Some(part) if !part.is_empty() => {
            let bound = parse::parse_bound(part);
            calendar::resolve_bound(&bound, now).map(Some)
        }
        _ => Ok(None),
    }
}
