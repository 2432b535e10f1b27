//! Grammar for time-range expressions.
//!
//! Parsing is split in two levels. [`parse_shortcut`] looks at a whole
//! expression and recognizes the forms that bypass bound-by-bound
//! resolution. [`parse_bound`] looks at one side of a `"<since> : <until>"`
//! pair. In both grammars the order of alternatives is the matching
//! priority. Inputs are matched case-insensitively.

/// Calendar unit used by relative offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Unit {
    Second,
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Quarter,
    Year,
}

impl Unit {
    /// Accepts a singular or plural unit name such as `day` or `Days`.
    pub fn from_name(name: &str) -> Option<Unit> {
        let name = name.trim().to_ascii_lowercase();
        let singular = name.strip_suffix('s').unwrap_or(&name);
        let unit = match singular {
            "second" => Unit::Second,
            "minute" => Unit::Minute,
            "hour" => Unit::Hour,
            "day" => Unit::Day,
            "week" => Unit::Week,
            "month" => Unit::Month,
            "quarter" => Unit::Quarter,
            "year" => Unit::Year,
            _ => return None,
        };
        Some(unit)
    }
}

/// Period covered by a `previous calendar ...` expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CalendarPeriod {
    Week,
    Month,
    Year,
}

/// Whole-expression forms recognized before splitting into bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    NoRange,
    PreviousCalendar(CalendarPeriod),
}

/// One side of a resolved range, before it is anchored to a clock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Bound {
    /// `delta` units away from now.
    Offset { unit: Unit, delta: i64 },
    /// `DATEADD(DATETIME("<anchor>"), <delta>, <unit>)`
    DateAdd {
        anchor: String,
        unit: Unit,
        delta: i64,
    },
    Today,
    Now,
    /// Anything else, handed to date literal parsing.
    Literal(String),
}

peg::parser! {
    grammar expr_parser() for str {
        rule _ = quiet!{[' ' | '\n' | '\t']*}
        rule __ = quiet!{[' ' | '\n' | '\t']+}
        rule end() = ![_]

        rule count() -> i64
            = n:$(['0'..='9']+) {? n.parse().or(Err("count")) }
        rule signed() -> i64
            = n:$("-"? ['0'..='9']+) {? n.parse().or(Err("signed integer")) }

        rule single_unit() -> Unit
            = "day" { Unit::Day }
            / "week" { Unit::Week }
            / "month" { Unit::Month }
            / "quarter" { Unit::Quarter }
            / "year" { Unit::Year }

        rule counted_unit() -> Unit
            = u:(
                "second" { Unit::Second }
                / "minute" { Unit::Minute }
                / "hour" { Unit::Hour }
                / "day" { Unit::Day }
                / "week" { Unit::Week }
                / "month" { Unit::Month }
                / "year" { Unit::Year }
            ) "s"? { u }

        rule named_unit() -> Unit
            = name:$((!")" [_])+) {? Unit::from_name(name).ok_or("unit") }

        rule period() -> CalendarPeriod
            = "week" { CalendarPeriod::Week }
            / "month" { CalendarPeriod::Month }
            / "year" { CalendarPeriod::Year }

        rule last_one() -> Bound
            = "last" __ unit:single_unit() end() { Bound::Offset { unit, delta: -1 } }
        rule last_n() -> Bound
            = "last" __ n:count() __ unit:counted_unit() end() { Bound::Offset { unit, delta: -n } }
        rule next_n() -> Bound
            = "next" __ n:count() __ unit:counted_unit() end() { Bound::Offset { unit, delta: n } }
        rule date_add() -> Bound
            = "dateadd(" _ "datetime(\"" anchor:$((!"\"" [_])+) "\")" _ "," _ delta:signed() _ "," _ unit:named_unit() ")" _ end() {
                Bound::DateAdd { anchor: anchor.to_string(), unit, delta }
            }
        rule today() -> Bound = "today" end() { Bound::Today }
        rule now() -> Bound = "now" end() { Bound::Now }

        pub rule bound() -> Bound
            = last_one() / last_n() / next_n() / date_add() / today() / now()

        pub rule shortcut() -> Shortcut
            = ("no_time_range" / "_(no_time_range)") end() { Shortcut::NoRange }
            / "previous calendar " p:period() [_]* { Shortcut::PreviousCalendar(p) }
    }
}

/// Parses one side of a range. Input that matches no relative form comes
/// back as [`Bound::Literal`] with its original casing.
pub fn parse_bound(part: &str) -> Bound {
    let part = part.trim();
    let lowered = part.to_lowercase();
    expr_parser::bound(&lowered).unwrap_or_else(|_| Bound::Literal(part.to_string()))
}

/// Recognizes whole-expression shortcuts. `previous calendar` forms only
/// apply when the expression carries no `" : "` separator.
pub fn parse_shortcut(expr: &str) -> Option<Shortcut> {
    let lowered = expr.trim().to_lowercase();
    match expr_parser::shortcut(&lowered).ok()? {
        Shortcut::PreviousCalendar(_) if lowered.contains(crate::SEPARATOR) => None,
        shortcut => Some(shortcut),
    }
}
