//! Resolution of relative time-range expressions and date-window filtering
//! of serialized time-series cells.
//!
//! ```
//! use jiff::{Timestamp, tz::TimeZone};
//!
//! let now = "2024-03-15T10:30:00Z".parse::<Timestamp>()?.to_zoned(TimeZone::UTC);
//! let range = time_range::since_until(Some("last 7 days"), None, None, &now)?;
//! let (since, until) = range.bounds().expect("closed range");
//! assert_eq!(since.to_string(), "2024-03-08T10:30:00+00:00[UTC]");
//! assert_eq!(until.to_string(), "2024-03-15T00:00:00+00:00[UTC]");
//!
//! let cell = r#"[["2024-03-01",1],["2024-03-10",2]]"#;
//! assert_eq!(time_range::filter_cell(cell, since, until)?, r#"[["2024-03-10",2]]"#);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod calendar;
pub mod clock;
pub mod error;
pub mod format;
pub mod parse;
pub mod resolve;
pub mod window;

pub use calendar::WeekStart;
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::Error;
pub use resolve::{ResolveOptions, Resolver, SinceUntil, resolve_with, since_until};
pub use window::{Row, filter_cell, filter_points, is_time_series_cell, process_rows};

/// Separates the `since` and `until` halves of a compound expression.
pub const SEPARATOR: &str = " : ";
