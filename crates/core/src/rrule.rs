//! Recurrence rules for calendar events.
//!
//! Supports the RFC 5545 subset the calendar UI produces: `FREQ`
//! (DAILY/WEEKLY/MONTHLY/YEARLY), `INTERVAL`, `COUNT`, `UNTIL`, `BYDAY`
//! (weekly, plain weekday codes), `BYMONTHDAY` (monthly, negative values
//! count from the end of the month) and `WKST` (accepted, Monday assumed).

use std::str::FromStr;

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc, Weekday};

use crate::error::CoreError;
use crate::types::Timestamp;

/// Upper bound on occurrences returned by a single expansion.
pub const MAX_OCCURRENCES: usize = 1000;

/// Largest accepted `INTERVAL`.
pub const MAX_INTERVAL: u32 = 1000;

/// Largest accepted `COUNT`.
pub const MAX_COUNT: u32 = 10_000;

/// Upper bound on recurrence periods walked by a single expansion.
///
/// Open-ended and `UNTIL` series start walking at the period containing the
/// window start, so their age does not matter. `COUNT` series walk from the
/// series start; `MAX_COUNT` keeps even the sparsest of them (yearly on
/// February 29) inside this bound.
const MAX_PERIODS: u32 = 100_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

/// A parsed recurrence rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecurrenceRule {
    pub freq: Frequency,
    pub interval: u32,
    pub count: Option<u32>,
    pub until: Option<Timestamp>,
    /// Weekdays for weekly rules; empty means the start's weekday.
    pub by_day: Vec<Weekday>,
    /// Days of month for monthly rules; empty means the start's day.
    pub by_month_day: Vec<i8>,
}

fn invalid(message: impl Into<String>) -> CoreError {
    CoreError::Validation(format!("Invalid recurrence rule: {}", message.into()))
}

fn parse_weekday(code: &str) -> Result<Weekday, CoreError> {
    match code {
        "MO" => Ok(Weekday::Mon),
        "TU" => Ok(Weekday::Tue),
        "WE" => Ok(Weekday::Wed),
        "TH" => Ok(Weekday::Thu),
        "FR" => Ok(Weekday::Fri),
        "SA" => Ok(Weekday::Sat),
        "SU" => Ok(Weekday::Sun),
        other => Err(invalid(format!("unsupported BYDAY value '{other}'"))),
    }
}

/// `UNTIL` as a UTC date-time, a date (inclusive, end of day), or RFC 3339.
fn parse_until(value: &str) -> Result<Timestamp, CoreError> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y%m%dT%H%M%SZ") {
        return Ok(dt.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y%m%d") {
        return Ok(date.and_time(NaiveTime::from_hms_opt(23, 59, 59).unwrap_or_default()).and_utc());
    }
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| invalid(format!("UNTIL value '{value}' is not a UTC date-time")))
}

fn parse_positive(key: &str, value: &str, max: u32) -> Result<u32, CoreError> {
    match value.parse::<u32>() {
        Ok(n) if (1..=max).contains(&n) => Ok(n),
        _ => Err(invalid(format!("{key} must be an integer between 1 and {max}"))),
    }
}

impl FromStr for RecurrenceRule {
    type Err = CoreError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let body = raw.trim();
        let body = body.strip_prefix("RRULE:").unwrap_or(body);
        if body.is_empty() {
            return Err(invalid("empty rule"));
        }

        let mut freq = None;
        let mut interval = 1;
        let mut count = None;
        let mut until = None;
        let mut by_day = Vec::new();
        let mut by_month_day = Vec::new();

        for part in body.split(';').filter(|p| !p.is_empty()) {
            let (key, value) = part
                .split_once('=')
                .ok_or_else(|| invalid(format!("'{part}' is not KEY=VALUE")))?;
            match key.to_ascii_uppercase().as_str() {
                "FREQ" => {
                    freq = Some(match value.to_ascii_uppercase().as_str() {
                        "DAILY" => Frequency::Daily,
                        "WEEKLY" => Frequency::Weekly,
                        "MONTHLY" => Frequency::Monthly,
                        "YEARLY" => Frequency::Yearly,
                        other => return Err(invalid(format!("unsupported FREQ '{other}'"))),
                    })
                }
                "INTERVAL" => interval = parse_positive("INTERVAL", value, MAX_INTERVAL)?,
                "COUNT" => count = Some(parse_positive("COUNT", value, MAX_COUNT)?),
                "UNTIL" => until = Some(parse_until(value)?),
                "BYDAY" => {
                    by_day = value
                        .split(',')
                        .map(|code| parse_weekday(&code.trim().to_ascii_uppercase()))
                        .collect::<Result<_, _>>()?;
                }
                "BYMONTHDAY" => {
                    by_month_day = value
                        .split(',')
                        .map(|d| match d.trim().parse::<i8>() {
                            Ok(n) if n != 0 && (-31..=31).contains(&n) => Ok(n),
                            _ => Err(invalid(format!("BYMONTHDAY value '{d}' out of range"))),
                        })
                        .collect::<Result<_, _>>()?;
                }
                "WKST" => {
                    parse_weekday(&value.to_ascii_uppercase())?;
                }
                other => return Err(invalid(format!("unsupported part '{other}'"))),
            }
        }

        let freq = freq.ok_or_else(|| invalid("FREQ is required"))?;
        if count.is_some() && until.is_some() {
            return Err(invalid("COUNT and UNTIL are mutually exclusive"));
        }
        if !by_day.is_empty() && freq != Frequency::Weekly {
            return Err(invalid("BYDAY is only supported with FREQ=WEEKLY"));
        }
        if !by_month_day.is_empty() && freq != Frequency::Monthly {
            return Err(invalid("BYMONTHDAY is only supported with FREQ=MONTHLY"));
        }
        by_day.sort_by_key(|d: &Weekday| d.num_days_from_monday());
        by_day.dedup();

        Ok(Self {
            freq,
            interval,
            count,
            until,
            by_day,
            by_month_day,
        })
    }
}

/// Schema-level check for `rrule` DTO fields.
pub fn check_rrule(raw: &str) -> Result<(), String> {
    match raw.parse::<RecurrenceRule>() {
        Ok(_) => Ok(()),
        Err(CoreError::Validation(reason)) => Err(format!("must be a valid recurrence rule ({reason})")),
        Err(other) => Err(other.to_string()),
    }
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .map(|d| d.day())
        .unwrap_or(28)
}

fn month_index(date: NaiveDate) -> i64 {
    i64::from(date.year()) * 12 + i64::from(date.month0())
}

impl RecurrenceRule {
    /// Candidate occurrences of period `period` (0 = the period containing
    /// `start`), ascending, never earlier than `start`.
    ///
    /// `None` once the period lies outside the representable calendar.
    fn period_candidates(&self, start: Timestamp, period: u32) -> Option<Vec<Timestamp>> {
        let date = start.date_naive();
        let time = start.time();
        let step = i64::from(period) * i64::from(self.interval);

        let mut dates: Vec<NaiveDate> = match self.freq {
            Frequency::Daily => vec![date.checked_add_signed(Duration::try_days(step)?)?],
            Frequency::Weekly => {
                let offset = i64::from(date.weekday().num_days_from_monday());
                let week_start = date
                    .checked_sub_signed(Duration::try_days(offset)?)?
                    .checked_add_signed(Duration::try_weeks(step)?)?;
                let offsets: Vec<i64> = if self.by_day.is_empty() {
                    vec![offset]
                } else {
                    self.by_day
                        .iter()
                        .map(|d| i64::from(d.num_days_from_monday()))
                        .collect()
                };
                offsets
                    .into_iter()
                    .filter_map(|n| week_start.checked_add_signed(Duration::try_days(n)?))
                    .collect()
            }
            Frequency::Monthly => {
                let months = month_index(date).checked_add(step)?;
                let year = i32::try_from(months.div_euclid(12)).ok()?;
                let month = u32::try_from(months.rem_euclid(12) + 1).ok()?;
                NaiveDate::from_ymd_opt(year, month, 1)?;
                let last = days_in_month(year, month) as i8;
                let days: Vec<i8> = if self.by_month_day.is_empty() {
                    vec![date.day() as i8]
                } else {
                    self.by_month_day.clone()
                };
                let mut resolved: Vec<NaiveDate> = days
                    .into_iter()
                    .filter_map(|d| {
                        let day = if d < 0 { last + 1 + d } else { d };
                        if day < 1 || day > last {
                            return None;
                        }
                        NaiveDate::from_ymd_opt(year, month, day as u32)
                    })
                    .collect();
                resolved.sort();
                resolved.dedup();
                resolved
            }
            Frequency::Yearly => {
                let year = date.year().checked_add(i32::try_from(step).ok()?)?;
                NaiveDate::from_ymd_opt(year, 1, 1)?;
                NaiveDate::from_ymd_opt(year, date.month(), date.day())
                    .into_iter()
                    .collect()
            }
        };

        dates.retain(|d| *d >= date);
        Some(dates.into_iter().map(|d| d.and_time(time).and_utc()).collect())
    }

    /// First period that can hold an occurrence at or after `from`.
    ///
    /// `COUNT` series always start at period 0 because every earlier
    /// occurrence consumes a slot.
    fn first_period(&self, start: Timestamp, from: Timestamp) -> u32 {
        let date = start.date_naive();
        let from_date = from.date_naive();
        if self.count.is_some() || from_date <= date {
            return 0;
        }
        let elapsed = match self.freq {
            Frequency::Daily => from_date.signed_duration_since(date).num_days(),
            Frequency::Weekly => {
                let days = from_date.signed_duration_since(date).num_days();
                (days + i64::from(date.weekday().num_days_from_monday())
                    - i64::from(from_date.weekday().num_days_from_monday()))
                    / 7
            }
            Frequency::Monthly => month_index(from_date) - month_index(date),
            Frequency::Yearly => i64::from(from_date.year() - date.year()),
        };
        u32::try_from(elapsed / i64::from(self.interval.max(1))).unwrap_or(u32::MAX)
    }

    /// Occurrences of a series starting at `start` that fall in `[from, to)`.
    ///
    /// `COUNT` and `UNTIL` are measured from the series start; `exdates` are
    /// removed after counting, so an excluded date still consumes a slot.
    pub fn expand(
        &self,
        start: Timestamp,
        from: Timestamp,
        to: Timestamp,
        exdates: &[Timestamp],
    ) -> Vec<Timestamp> {
        let mut out = Vec::new();
        let mut produced: u32 = 0;

        let first = self.first_period(start, from);
        for period in first..first.saturating_add(MAX_PERIODS) {
            let Some(candidates) = self.period_candidates(start, period) else {
                return out;
            };
            for candidate in candidates {
                if candidate < start {
                    continue;
                }
                if self.until.is_some_and(|until| candidate > until) {
                    return out;
                }
                if self.count.is_some_and(|count| produced >= count) {
                    return out;
                }
                if candidate >= to {
                    return out;
                }
                produced += 1;
                if candidate >= from && !exdates.contains(&candidate) {
                    out.push(candidate);
                    if out.len() >= MAX_OCCURRENCES {
                        return out;
                    }
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::TimeZone;

    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32) -> Timestamp {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    fn rule(s: &str) -> RecurrenceRule {
        s.parse().unwrap()
    }

    #[test]
    fn parses_full_rule() {
        let r = rule("RRULE:FREQ=WEEKLY;INTERVAL=2;BYDAY=FR,MO;COUNT=4;WKST=MO");
        assert_eq!(r.freq, Frequency::Weekly);
        assert_eq!(r.interval, 2);
        assert_eq!(r.count, Some(4));
        assert_eq!(r.by_day, vec![Weekday::Mon, Weekday::Fri]);
    }

    #[test]
    fn rejects_bad_rules() {
        for bad in [
            "",
            "INTERVAL=2",
            "FREQ=HOURLY",
            "FREQ=DAILY;INTERVAL=0",
            "FREQ=DAILY;INTERVAL=1001",
            "FREQ=DAILY;INTERVAL=4294967295",
            "FREQ=DAILY;COUNT=10001",
            "FREQ=DAILY;COUNT=3;UNTIL=20260101",
            "FREQ=DAILY;BYDAY=MO",
            "FREQ=MONTHLY;BYMONTHDAY=32",
            "FREQ=WEEKLY;BYDAY=1MO",
            "FREQ=DAILY;BYHOUR=9",
            "FREQ",
        ] {
            assert_matches!(bad.parse::<RecurrenceRule>(), Err(CoreError::Validation(_)), "{bad}");
        }
    }

    #[test]
    fn daily_with_count() {
        let start = at(2026, 3, 2, 9);
        let got = rule("FREQ=DAILY;COUNT=3").expand(start, start, at(2027, 1, 1, 0), &[]);
        assert_eq!(got, vec![start, at(2026, 3, 3, 9), at(2026, 3, 4, 9)]);
    }

    #[test]
    fn window_bounds_are_half_open() {
        let start = at(2026, 3, 2, 9);
        let got = rule("FREQ=DAILY").expand(start, at(2026, 3, 3, 9), at(2026, 3, 5, 9), &[]);
        assert_eq!(got, vec![at(2026, 3, 3, 9), at(2026, 3, 4, 9)]);
    }

    #[test]
    fn count_is_measured_from_series_start() {
        let start = at(2026, 3, 2, 9);
        let got = rule("FREQ=DAILY;COUNT=5").expand(start, at(2026, 3, 5, 0), at(2026, 4, 1, 0), &[]);
        assert_eq!(got, vec![at(2026, 3, 5, 9), at(2026, 3, 6, 9)]);
    }

    #[test]
    fn weekly_by_day_skips_days_before_start() {
        // 2026-03-04 is a Wednesday.
        let start = at(2026, 3, 4, 10);
        let got = rule("FREQ=WEEKLY;BYDAY=MO,WE,FR;COUNT=4").expand(start, start, at(2027, 1, 1, 0), &[]);
        assert_eq!(
            got,
            vec![start, at(2026, 3, 6, 10), at(2026, 3, 9, 10), at(2026, 3, 11, 10)]
        );
    }

    #[test]
    fn biweekly_default_weekday() {
        let start = at(2026, 3, 4, 10);
        let got = rule("FREQ=WEEKLY;INTERVAL=2;COUNT=3").expand(start, start, at(2027, 1, 1, 0), &[]);
        assert_eq!(got, vec![start, at(2026, 3, 18, 10), at(2026, 4, 1, 10)]);
    }

    #[test]
    fn monthly_skips_short_months() {
        let start = at(2026, 1, 31, 8);
        let got = rule("FREQ=MONTHLY;COUNT=3").expand(start, start, at(2027, 1, 1, 0), &[]);
        assert_eq!(got, vec![start, at(2026, 3, 31, 8), at(2026, 5, 31, 8)]);
    }

    #[test]
    fn monthly_last_day() {
        let start = at(2026, 1, 31, 8);
        let got = rule("FREQ=MONTHLY;BYMONTHDAY=-1;COUNT=3").expand(start, start, at(2027, 1, 1, 0), &[]);
        assert_eq!(got, vec![start, at(2026, 2, 28, 8), at(2026, 3, 31, 8)]);
    }

    #[test]
    fn yearly_leap_day() {
        let start = at(2024, 2, 29, 12);
        let got = rule("FREQ=YEARLY;COUNT=2").expand(start, start, at(2040, 1, 1, 0), &[]);
        assert_eq!(got, vec![start, at(2028, 2, 29, 12)]);
    }

    #[test]
    fn until_is_inclusive() {
        let start = at(2026, 3, 2, 9);
        let got = rule("FREQ=DAILY;UNTIL=20260304T090000Z").expand(start, start, at(2027, 1, 1, 0), &[]);
        assert_eq!(got.len(), 3);
        let by_date = rule("FREQ=DAILY;UNTIL=20260304").expand(start, start, at(2027, 1, 1, 0), &[]);
        assert_eq!(by_date.len(), 3);
    }

    #[test]
    fn exdates_still_consume_count() {
        let start = at(2026, 3, 2, 9);
        let got = rule("FREQ=DAILY;COUNT=3").expand(start, start, at(2027, 1, 1, 0), &[at(2026, 3, 3, 9)]);
        assert_eq!(got, vec![start, at(2026, 3, 4, 9)]);
    }

    #[test]
    fn expansion_is_capped() {
        let start = at(2026, 1, 1, 0);
        let got = rule("FREQ=DAILY").expand(start, start, at(2100, 1, 1, 0), &[]);
        assert_eq!(got.len(), MAX_OCCURRENCES);
    }

    #[test]
    fn check_rrule_message() {
        assert!(check_rrule("FREQ=DAILY").is_ok());
        let reason = check_rrule("FREQ=SECONDLY").unwrap_err();
        assert!(reason.starts_with("must be a valid recurrence rule"), "{reason}");
    }

    fn unbounded(freq: Frequency, interval: u32) -> RecurrenceRule {
        RecurrenceRule {
            freq,
            interval,
            count: None,
            until: None,
            by_day: Vec::new(),
            by_month_day: Vec::new(),
        }
    }

    #[test]
    fn interval_is_capped_at_parse_time() {
        assert_eq!(rule("FREQ=DAILY;INTERVAL=1000").interval, MAX_INTERVAL);
        assert!(check_rrule("FREQ=DAILY;INTERVAL=4294967295").is_err());
        assert!(check_rrule("FREQ=WEEKLY;INTERVAL=100000000").is_err());
    }

    #[test]
    fn huge_interval_stops_at_calendar_edge() {
        let start = at(2026, 3, 2, 9);
        let to = at(2026, 4, 1, 0);
        for freq in [Frequency::Daily, Frequency::Weekly, Frequency::Monthly, Frequency::Yearly] {
            let got = unbounded(freq, u32::MAX).expand(start, start, to, &[]);
            assert_eq!(got, vec![start], "{freq:?}");
        }
        let weekly = unbounded(Frequency::Weekly, 100_000_000).expand(start, start, to, &[]);
        assert_eq!(weekly, vec![start]);
    }

    #[test]
    fn old_series_still_reach_the_window() {
        let start = at(1700, 1, 1, 9);
        let from = at(2026, 3, 2, 0);
        let got = rule("FREQ=DAILY").expand(start, from, at(2026, 3, 4, 0), &[]);
        assert_eq!(got, vec![at(2026, 3, 2, 9), at(2026, 3, 3, 9)]);

        // 1700-01-01 is a Friday.
        let weekly = rule("FREQ=WEEKLY;INTERVAL=2").expand(start, from, at(2026, 3, 31, 0), &[]);
        assert!(!weekly.is_empty());
        assert!(weekly.iter().all(|t| t.weekday() == Weekday::Fri));
        assert!(weekly.windows(2).all(|w| w[1] - w[0] == Duration::weeks(2)));

        let monthly = rule("FREQ=MONTHLY;BYMONTHDAY=-1").expand(start, from, at(2026, 5, 1, 0), &[]);
        assert_eq!(monthly, vec![at(2026, 3, 31, 9), at(2026, 4, 30, 9)]);
    }

    #[test]
    fn skip_ahead_matches_walking_from_the_start() {
        let start = at(2020, 5, 15, 7);
        let from = at(2026, 3, 2, 0);
        let to = at(2026, 9, 1, 0);
        for raw in [
            "FREQ=DAILY;INTERVAL=3",
            "FREQ=WEEKLY;INTERVAL=5;BYDAY=MO,TH",
            "FREQ=MONTHLY;INTERVAL=7",
            "FREQ=YEARLY",
        ] {
            let r = rule(raw);
            let walked: Vec<Timestamp> = r
                .expand(start, start, to, &[])
                .into_iter()
                .filter(|t| *t >= from)
                .collect();
            assert_eq!(r.expand(start, from, to, &[]), walked, "{raw}");
        }
    }
}
