//! Deterministic date-range extraction.
//!
//! Rules are tried in a fixed priority order against the lowercased query.
//! Every rule resolves to an inclusive range: 00:00:00 on the first day
//! through 23:59:59 on the last. The reference instant is injected so the
//! relative rules ("yesterday", "last week") are testable.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;

const MONTHS: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

static BETWEEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"between\s+(.+?)\s+and\s+(.+)").expect("Invalid regex"));
static LAST_N_DAYS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"last\s+(\d+)\s+days").expect("Invalid regex"));
static SINCE_MONTH_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"since\s+(january|february|march|april|may|june|july|august|september|october|november|december)")
        .expect("Invalid regex")
});
static ON_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"on\s+([a-z]+)\s+(\d{1,2}),?\s*(\d{4})").expect("Invalid regex"));
static IN_MONTH_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"in\s+(january|february|march|april|may|june|july|august|september|october|november|december)")
        .expect("Invalid regex")
});
static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(19|20)\d{2}\b").expect("Invalid regex"));
static MONTH_DAY_YEAR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([a-z]+)\s+(\d{1,2}),?\s*(\d{4})$").expect("Invalid regex"));
static DAY_MONTH_YEAR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,2})\s+([a-z]+)\s+(\d{4})$").expect("Invalid regex"));
static MONTH_YEAR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([a-z]+)\s+(\d{4})$").expect("Invalid regex"));

/// Inclusive datetime range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl DateRange {
    fn days(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start: day_start(start),
            end: day_end(end),
        }
    }
}

/// Which side of a range a loose date expression anchors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edge {
    Start,
    End,
}

// ============================================================================
// Parser
// ============================================================================

/// Rule-based date-range parser.
pub struct DateRangeParser;

impl Default for DateRangeParser {
    fn default() -> Self {
        Self::new()
    }
}

impl DateRangeParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse a range out of a query, relative to `now`.
    pub fn parse(&self, query: &str, now: NaiveDateTime) -> Option<DateRange> {
        if query.trim().is_empty() {
            return None;
        }

        let q = query.to_lowercase();
        let today = now.date();

        // between <date> and <date>
        if let Some(caps) = BETWEEN_RE.captures(&q) {
            let d1 = parse_date_expr(caps.get(1)?.as_str(), today, Edge::Start);
            let d2 = parse_date_expr(caps.get(2)?.as_str(), today, Edge::End);
            if let (Some(start), Some(end)) = (d1, d2) {
                return Some(DateRange::days(start, end));
            }
        }

        // yesterday
        if q.contains("yesterday") {
            let d = today - Duration::days(1);
            return Some(DateRange::days(d, d));
        }

        // last week (previous Mon..Sun)
        if q.contains("last week") {
            let offset = today.weekday().num_days_from_monday() as i64 + 7;
            let start = today - Duration::days(offset);
            return Some(DateRange::days(start, start + Duration::days(6)));
        }

        // last N days
        if let Some(caps) = LAST_N_DAYS_RE.captures(&q) {
            let days: i64 = caps.get(1)?.as_str().parse().ok()?;
            return Some(DateRange::days(today - Duration::days(days), today));
        }

        // since <month>
        if let Some(caps) = SINCE_MONTH_RE.captures(&q) {
            let month = month_number(caps.get(1)?.as_str())?;
            let start = NaiveDate::from_ymd_opt(today.year(), month, 1)?;
            return Some(DateRange::days(start, today));
        }

        // on <month> <day>, <year>
        if let Some(caps) = ON_DATE_RE.captures(&q) {
            if let Some(d) = month_day_year(
                caps.get(1)?.as_str(),
                caps.get(2)?.as_str(),
                caps.get(3)?.as_str(),
            ) {
                return Some(DateRange::days(d, d));
            }
        }

        // last month
        if q.contains("last month") {
            let (year, month) = if today.month() == 1 {
                (today.year() - 1, 12)
            } else {
                (today.year(), today.month() - 1)
            };
            return full_month(year, month);
        }

        // this month
        if q.contains("this month") {
            return full_month(today.year(), today.month());
        }

        // this year / last year
        if q.contains("this year") {
            return full_year(today.year());
        }
        if q.contains("last year") {
            return full_year(today.year() - 1);
        }

        // in <month> (current year)
        if let Some(caps) = IN_MONTH_RE.captures(&q) {
            let month = month_number(caps.get(1)?.as_str())?;
            return full_month(today.year(), month);
        }

        // bare year
        if let Some(m) = YEAR_RE.find(&q) {
            let year: i32 = m.as_str().parse().ok()?;
            return full_year(year);
        }

        // fallback: the whole query is a single date expression
        let d = parse_date_expr(q.trim(), today, Edge::Start)?;
        Some(DateRange::days(d, d))
    }
}

// ============================================================================
// Date helpers
// ============================================================================

fn day_start(d: NaiveDate) -> NaiveDateTime {
    d.and_time(NaiveTime::MIN)
}

fn day_end(d: NaiveDate) -> NaiveDateTime {
    // 23:59:59 is always a valid wall-clock time
    d.and_time(NaiveTime::from_hms_opt(23, 59, 59).expect("valid time"))
}

fn month_number(name: &str) -> Option<u32> {
    MONTHS
        .iter()
        .position(|m| *m == name)
        .map(|idx| idx as u32 + 1)
}

fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let first_of_next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    first_of_next.pred_opt()
}

fn full_month(year: i32, month: u32) -> Option<DateRange> {
    let start = NaiveDate::from_ymd_opt(year, month, 1)?;
    let end = last_day_of_month(year, month)?;
    Some(DateRange::days(start, end))
}

fn full_year(year: i32) -> Option<DateRange> {
    let start = NaiveDate::from_ymd_opt(year, 1, 1)?;
    let end = NaiveDate::from_ymd_opt(year, 12, 31)?;
    Some(DateRange::days(start, end))
}

fn month_day_year(month_name: &str, day: &str, year: &str) -> Option<NaiveDate> {
    let month = month_number(month_name)?;
    let day: u32 = day.parse().ok()?;
    let year: i32 = year.parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Parse a loose single-date expression.
///
/// Month-only and month-year forms resolve to the first or last day of the
/// month depending on which edge of a range the expression anchors.
fn parse_date_expr(expr: &str, today: NaiveDate, edge: Edge) -> Option<NaiveDate> {
    let expr = expr.trim();

    if let Ok(d) = NaiveDate::parse_from_str(expr, "%Y-%m-%d") {
        return Some(d);
    }

    if let Some(caps) = MONTH_DAY_YEAR_RE.captures(expr) {
        return month_day_year(
            caps.get(1)?.as_str(),
            caps.get(2)?.as_str(),
            caps.get(3)?.as_str(),
        );
    }

    if let Some(caps) = DAY_MONTH_YEAR_RE.captures(expr) {
        return month_day_year(
            caps.get(2)?.as_str(),
            caps.get(1)?.as_str(),
            caps.get(3)?.as_str(),
        );
    }

    if let Some(caps) = MONTH_YEAR_RE.captures(expr) {
        let month = month_number(caps.get(1)?.as_str())?;
        let year: i32 = caps.get(2)?.as_str().parse().ok()?;
        return month_edge(year, month, edge);
    }

    if let Some(month) = month_number(expr) {
        return month_edge(today.year(), month, edge);
    }

    None
}

fn month_edge(year: i32, month: u32, edge: Edge) -> Option<NaiveDate> {
    match edge {
        Edge::Start => NaiveDate::from_ymd_opt(year, month, 1),
        Edge::End => last_day_of_month(year, month),
    }
}

// ============================================================================
// Tests
// ============================================================================
