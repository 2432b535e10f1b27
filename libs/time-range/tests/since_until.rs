use jiff::{Timestamp, Zoned, tz::TimeZone};
use time_range::{
    Error, FixedClock, ResolveOptions, Resolver, SinceUntil, WeekStart, since_until,
};

fn utc(s: &str) -> Zoned {
    s.parse::<Timestamp>().unwrap().to_zoned(TimeZone::UTC)
}

fn now() -> Zoned {
    utc("2024-03-15T10:30:00Z")
}

#[test]
fn last_n_units_pairs_with_today() {
    let cases = [
        ("last 7 days", "2024-03-08T10:30:00Z"),
        ("last 2 weeks", "2024-03-01T10:30:00Z"),
        ("last 1 month", "2024-02-15T10:30:00Z"),
        ("last 3 months", "2023-12-15T10:30:00Z"),
        ("last 1 year", "2023-03-15T10:30:00Z"),
    ];
    for (expr, since) in cases {
        let range = since_until(Some(expr), None, None, &now()).unwrap();
        assert_eq!(range.since(), Some(&utc(since)), "since of {expr}");
        assert_eq!(
            range.until(),
            Some(&utc("2024-03-15T00:00:00Z")),
            "until of {expr}"
        );
    }
}

#[test]
fn last_n_units_with_explicit_end() {
    let cases = [
        ("last 45 seconds : now", "2024-03-15T10:29:15Z"),
        ("last 10 minutes : now", "2024-03-15T10:20:00Z"),
        ("last 2 hours : now", "2024-03-15T08:30:00Z"),
    ];
    for (expr, since) in cases {
        let range = since_until(Some(expr), None, None, &now()).unwrap();
        assert_eq!(range.since(), Some(&utc(since)), "since of {expr}");
        assert_eq!(range.until(), Some(&now()), "until of {expr}");
    }
    let err = since_until(Some("last 30 seconds"), None, None, &now()).unwrap_err();
    match err {
        Error::Ordering { since, until } => {
            assert_eq!(*since, utc("2024-03-15T10:29:30Z"));
            assert_eq!(*until, utc("2024-03-15T00:00:00Z"));
        }
        err => panic!("expected an ordering error, got {err:?}"),
    }

    let range = since_until(Some("last 45 seconds"), None, Some("now"), &now()).unwrap();
    assert_eq!(range.since(), Some(&utc("2024-03-15T10:29:15Z")));
    assert_eq!(range.until(), Some(&now()));
}

#[test]
fn last_single_unit() {
    let range = since_until(Some("last quarter"), None, None, &now()).unwrap();
    assert_eq!(range.since(), Some(&utc("2023-12-15T10:30:00Z")));
    let range = since_until(Some("Last Week"), None, None, &now()).unwrap();
    assert_eq!(range.since(), Some(&utc("2024-03-08T10:30:00Z")));
    assert_eq!(range.until(), Some(&utc("2024-03-15T00:00:00Z")));
}

#[test]
fn next_n_units_pairs_with_start() {
    let range = since_until(Some("next 3 days"), None, None, &now()).unwrap();
    assert_eq!(range.since(), Some(&utc("2024-03-15T00:00:00Z")));
    assert_eq!(range.until(), Some(&utc("2024-03-18T10:30:00Z")));

    let range = since_until(Some("next 1 hour"), Some("now"), None, &now()).unwrap();
    assert_eq!(range.since(), Some(&now()));
    assert_eq!(range.until(), Some(&utc("2024-03-15T11:30:00Z")));
}

#[test]
fn no_time_range_is_unbounded() {
    for expr in ["NO_TIME_RANGE", "_(NO_TIME_RANGE)", "no_time_range"] {
        assert_eq!(
            since_until(Some(expr), None, None, &now()).unwrap(),
            SinceUntil::unbounded()
        );
    }
    assert_eq!(
        since_until(None, None, None, &now()).unwrap(),
        SinceUntil::unbounded()
    );
    assert_eq!(
        since_until(Some(""), None, None, &now()).unwrap(),
        SinceUntil::unbounded()
    );
}

#[test]
fn previous_calendar_month_ignores_day_of_month() {
    for day in ["2024-03-01T00:00:00Z", "2024-03-15T10:30:00Z", "2024-03-31T23:59:59Z"] {
        let range = since_until(Some("previous calendar month"), None, None, &utc(day)).unwrap();
        assert_eq!(range.since(), Some(&utc("2024-02-01T00:00:00Z")), "from {day}");
        assert_eq!(range.until(), Some(&utc("2024-03-01T00:00:00Z")), "from {day}");
    }
}

#[test]
fn previous_calendar_week_and_year() {
    // 2024-03-15 is a Friday
    let range = since_until(Some("previous calendar week"), None, None, &now()).unwrap();
    assert_eq!(range.since(), Some(&utc("2024-03-03T00:00:00Z")));
    assert_eq!(range.until(), Some(&utc("2024-03-10T00:00:00Z")));

    let resolver = Resolver::new(
        FixedClock(now()),
        ResolveOptions {
            week_start: WeekStart::Monday,
            ..Default::default()
        },
    );
    let range = resolver.resolve(Some("previous calendar week")).unwrap();
    assert_eq!(range.since(), Some(&utc("2024-03-04T00:00:00Z")));
    assert_eq!(range.until(), Some(&utc("2024-03-11T00:00:00Z")));

    let range = since_until(Some("previous calendar year"), None, None, &now()).unwrap();
    assert_eq!(range.since(), Some(&utc("2023-01-01T00:00:00Z")));
    assert_eq!(range.until(), Some(&utc("2024-01-01T00:00:00Z")));
}

#[test]
fn date_add_shifts_anchor() {
    let range = since_until(
        Some(r#"DATEADD(DATETIME("now"), -7, day) : now"#),
        None,
        None,
        &now(),
    )
    .unwrap();
    assert_eq!(range.since(), Some(&utc("2024-03-08T10:30:00Z")));
    assert_eq!(range.until(), Some(&now()));

    let range = since_until(
        Some(r#"DATEADD(DATETIME("2024-01-01T00:00:00"), 1, year)"#),
        None,
        None,
        &now(),
    )
    .unwrap();
    assert_eq!(range.since(), Some(&utc("2025-01-01T00:00:00Z")));
    assert_eq!(range.until(), None);
}

#[test]
fn literal_ranges() {
    let range = since_until(Some("2023-01-01 : 2024-06-01T12:00:00"), None, None, &now()).unwrap();
    assert_eq!(range.since(), Some(&utc("2023-01-01T00:00:00Z")));
    assert_eq!(range.until(), Some(&utc("2024-06-01T12:00:00Z")));
}

#[test]
fn out_of_order_literals_fail() {
    let err = since_until(Some("2024-06-01 : 2023-01-01"), None, None, &now()).unwrap_err();
    assert!(matches!(err, Error::Ordering { .. }), "got {err:?}");

    let err = since_until(Some("now : today"), None, None, &now()).unwrap_err();
    assert!(matches!(err, Error::Ordering { .. }), "got {err:?}");
}

#[test]
fn equal_bounds_are_allowed() {
    let range = since_until(Some("2024-01-01 : 2024-01-01"), None, None, &now()).unwrap();
    assert_eq!(range.since(), range.until());
}

#[test]
fn unknown_expressions_fail() {
    for expr in ["whenever", "last fortnight", "yesterday : now", "2024-13-45"] {
        let err = since_until(Some(expr), None, None, &now()).unwrap_err();
        assert!(matches!(err, Error::Parse(_)), "{expr} gave {err:?}");
    }
}

#[test]
fn resolution_follows_clock_zone() {
    let tz = TimeZone::get("America/New_York").unwrap();
    let now = utc("2024-03-15T10:30:00Z").with_time_zone(tz);
    let range = since_until(Some("today : now"), None, None, &now).unwrap();
    assert_eq!(
        range.since().map(|at| at.timestamp()),
        Some(utc("2024-03-15T04:00:00Z").timestamp())
    );
    let range = since_until(Some("2024-03-01 : now"), None, None, &now).unwrap();
    assert_eq!(
        range.since().map(|at| at.timestamp()),
        Some(utc("2024-03-01T05:00:00Z").timestamp())
    );
}
