//! Calendar helpers. All day/month boundaries are computed in the local
//! time zone and returned as half-open epoch-millisecond ranges `[start, end)`.

use crate::errors::{AppError, AppResult};
use chrono::{DateTime, Datelike, Local, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

/// Parse a date argument, accepting `today` as a shortcut.
pub fn parse_date_arg(s: &str) -> AppResult<NaiveDate> {
    if s.eq_ignore_ascii_case("today") {
        return Ok(today());
    }
    parse_date(s).ok_or_else(|| AppError::InvalidDate(s.to_string()))
}

/// Resolve a local wall-clock time to an absolute instant.
///
/// Ambiguous times (DST fold) resolve to the earliest instant; times that do
/// not exist (DST gap) are rejected.
pub fn local_instant(date: NaiveDate, time: NaiveTime) -> AppResult<DateTime<Local>> {
    let naive = NaiveDateTime::new(date, time);
    match Local.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Ok(dt),
        LocalResult::Ambiguous(earliest, _) => Ok(earliest),
        LocalResult::None => Err(AppError::InvalidTime(format!(
            "{} does not exist in the local time zone",
            naive.format("%Y-%m-%d %H:%M")
        ))),
    }
}

pub fn local_ms(date: NaiveDate, time: NaiveTime) -> AppResult<i64> {
    Ok(local_instant(date, time)?.timestamp_millis())
}

/// Epoch ms of local midnight for `date`.
///
/// Zones that switch to DST at midnight have no 00:00; the day then starts
/// at 01:00.
pub fn day_start_ms(date: NaiveDate) -> AppResult<i64> {
    local_ms(date, NaiveTime::MIN).or_else(|_| {
        let one_am = NaiveTime::from_hms_opt(1, 0, 0).unwrap_or(NaiveTime::MIN);
        local_ms(date, one_am)
    })
}

pub fn day_bounds(date: NaiveDate) -> AppResult<(i64, i64)> {
    let next = date
        .succ_opt()
        .ok_or_else(|| AppError::InvalidDate(date.to_string()))?;
    Ok((day_start_ms(date)?, day_start_ms(next)?))
}

pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

pub fn first_of_next_month(date: NaiveDate) -> AppResult<NaiveDate> {
    let (y, m) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(y, m, 1).ok_or_else(|| AppError::InvalidDate(date.to_string()))
}

pub fn month_bounds(date: NaiveDate) -> AppResult<(i64, i64)> {
    Ok((
        day_start_ms(first_of_month(date))?,
        day_start_ms(first_of_next_month(date)?)?,
    ))
}

pub fn days_of_month(date: NaiveDate) -> Vec<NaiveDate> {
    let mut out = Vec::new();
    let mut d = first_of_month(date);
    while d.month() == date.month() {
        out.push(d);
        match d.succ_opt() {
            Some(next) => d = next,
            None => break,
        }
    }
    out
}

/// Bounds of an inclusive date interval.
pub fn range_bounds(from: NaiveDate, to: NaiveDate) -> AppResult<(i64, i64)> {
    let (start, _) = day_bounds(from)?;
    let (_, end) = day_bounds(to)?;
    Ok((start, end))
}

pub fn from_ms(ms: i64) -> AppResult<DateTime<Local>> {
    Local
        .timestamp_millis_opt(ms)
        .single()
        .ok_or_else(|| AppError::InvalidDate(format!("timestamp {ms} out of range")))
}

pub fn format_ms(ms: i64, fmt: &str) -> String {
    match Local.timestamp_millis_opt(ms).single() {
        Some(dt) => dt.format(fmt).to_string(),
        None => "--".to_string(),
    }
}

/// Parse a period expression into an inclusive date interval.
///
/// Supports:
/// - YYYY
/// - YYYY-MM
/// - YYYY-MM-DD
/// - any of the above joined by `:` (e.g. `2025-01:2025-03`)
pub fn parse_range(r: &str) -> AppResult<(NaiveDate, NaiveDate)> {
    if let Some((start_raw, end_raw)) = r.split_once(':') {
        let (from, _) = parse_period(start_raw.trim())?;
        let (_, to) = parse_period(end_raw.trim())?;
        if to < from {
            return Err(AppError::InvalidDate(format!("range {r} ends before it starts")));
        }
        return Ok((from, to));
    }
    parse_period(r.trim())
}

fn parse_period(p: &str) -> AppResult<(NaiveDate, NaiveDate)> {
    let invalid = || AppError::InvalidDate(p.to_string());

    match p.len() {
        4 => {
            let y: i32 = p.parse().map_err(|_| invalid())?;
            let from = NaiveDate::from_ymd_opt(y, 1, 1).ok_or_else(invalid)?;
            let to = NaiveDate::from_ymd_opt(y, 12, 31).ok_or_else(invalid)?;
            Ok((from, to))
        }
        7 => {
            let from = NaiveDate::parse_from_str(&format!("{p}-01"), "%Y-%m-%d")
                .map_err(|_| invalid())?;
            let to = first_of_next_month(from)?.pred_opt().ok_or_else(invalid)?;
            Ok((from, to))
        }
        10 => {
            let d = parse_date(p).ok_or_else(invalid)?;
            Ok((d, d))
        }
        _ => Err(invalid()),
    }
}

pub fn now_ms() -> i64 {
    Local::now().timestamp_millis()
}
