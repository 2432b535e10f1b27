use jiff::Zoned;
use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("unrecognized time expression {0:?}")]
    #[diagnostic(
        code(time_range::parse),
        help("expected a relative expression such as \"last 7 days\", \"today\", \"now\" or an ISO 8601 date")
    )]
    Parse(String),
    #[error("from date cannot be larger than to date: {since} > {until}")]
    #[diagnostic(code(time_range::ordering))]
    Ordering { since: Box<Zoned>, until: Box<Zoned> },
    #[error("time series point is not date-indexed: {0}")]
    #[diagnostic(code(time_range::structural_mismatch))]
    StructuralMismatch(String),
    #[error("json {0}")]
    Json(#[from] serde_json::Error),
    #[error("time {0}")]
    Time(#[from] jiff::Error),
}
