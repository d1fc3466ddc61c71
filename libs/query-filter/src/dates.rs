//! Date-window builders.
//!
//! Windows are inclusive on both ends. Day boundaries are computed in the
//! clock's reference offset; `end` is the last millisecond of the day.

use chrono::{
    DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone, Utc,
};
use serde::Deserialize;

use crate::normalize::keyword;
use crate::predicate::{Bound, Condition, Predicate, Range};
use crate::{Error, Result};

/// Field that posting-date windows apply to.
pub const POSTING_DATE_FIELD: &str = "createdAt";

/// Field that two-date windows apply to, whatever the input key.
pub const DATE_RANGE_FIELD: &str = "date";

/// Reference instant and offset used to resolve relative windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Clock {
    pub now: DateTime<Utc>,
    pub offset: FixedOffset,
}

impl Clock {
    /// Wall clock, UTC day boundaries.
    pub fn system() -> Self {
        Self::at(Utc::now())
    }

    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            now,
            offset: utc_offset(),
        }
    }

    pub fn with_offset(mut self, offset: FixedOffset) -> Self {
        self.offset = offset;
        self
    }

    /// Calendar day of `now` in the reference offset.
    pub fn today(&self) -> NaiveDate {
        self.now.with_timezone(&self.offset).date_naive()
    }

    pub fn start_of_day(&self, date: NaiveDate) -> Result<DateTime<Utc>> {
        start_of_day_in(date, self.offset)
    }

    pub fn end_of_day(&self, date: NaiveDate) -> Result<DateTime<Utc>> {
        end_of_day_in(date, self.offset)
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::system()
    }
}

fn utc_offset() -> FixedOffset {
    Utc.fix()
}

fn start_of_day_in(date: NaiveDate, offset: FixedOffset) -> Result<DateTime<Utc>> {
    let local = date.and_time(NaiveTime::MIN);
    let utc = local
        .checked_sub_signed(Duration::seconds(i64::from(offset.local_minus_utc())))
        .ok_or_else(|| out_of_range(date))?;
    Ok(Utc.from_utc_datetime(&utc))
}

fn end_of_day_in(date: NaiveDate, offset: FixedOffset) -> Result<DateTime<Utc>> {
    start_of_day_in(date, offset)?
        .checked_add_signed(Duration::days(1))
        .and_then(|t| t.checked_sub_signed(Duration::milliseconds(1)))
        .ok_or_else(|| out_of_range(date))
}

/// `date` shifted by `days`, failing at the edges of the representable range.
fn shift_days(date: NaiveDate, days: i64) -> Result<NaiveDate> {
    date.checked_add_signed(Duration::days(days))
        .ok_or_else(|| out_of_range(date))
}

fn out_of_range(date: NaiveDate) -> Error {
    Error::InvalidDate(format!("{date} is out of range"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateWindow {
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant <= self.end
    }

    pub fn to_predicate(&self, path: impl Into<String>) -> Predicate {
        Predicate::field(
            path,
            Condition::Range(Range::between(
                Bound::Instant(self.start),
                Bound::Instant(self.end),
            )),
        )
    }
}

/// Parse a calendar date from `YYYY-MM-DD`, a naive `YYYY-MM-DDThh:mm[:ss]`,
/// or an RFC 3339 timestamp (whose UTC date is used).
pub fn parse_calendar_date(raw: &str) -> Result<NaiveDate> {
    let s = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc).date_naive());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(naive.date());
        }
    }
    Err(Error::InvalidDate(raw.to_string()))
}

/// The UTC calendar day containing `raw`.
pub fn single_day_window(raw: &str) -> Result<DateWindow> {
    let date = parse_calendar_date(raw)?;
    let offset = utc_offset();
    Ok(DateWindow {
        start: start_of_day_in(date, offset)?,
        end: end_of_day_in(date, offset)?,
    })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TwoDates {
    start_date: String,
    end_date: String,
}

/// Window from a `{"startDate": .., "endDate": ..}` JSON payload.
pub fn two_date_window(raw_json: &str, clock: &Clock) -> Result<DateWindow> {
    let dates: TwoDates =
        serde_json::from_str(raw_json).map_err(|e| Error::MalformedInput(e.to_string()))?;
    let start = parse_calendar_date(&dates.start_date)?;
    let end = parse_calendar_date(&dates.end_date)?;
    if start > end {
        return Err(Error::InvalidDate(format!(
            "startDate {} is after endDate {}",
            dates.start_date, dates.end_date
        )));
    }
    Ok(DateWindow {
        start: clock.start_of_day(start)?,
        end: clock.end_of_day(end)?,
    })
}

/// Named posting-date windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostingWindow {
    All,
    /// Rolling 24 hours ending now.
    Latest,
    Today,
    LastDays(u32),
}

impl PostingWindow {
    pub fn parse(field: &str, value: &str) -> Result<Self> {
        let kw = keyword(value);
        let window = match kw.as_str() {
            "all" => Self::All,
            "latest" => Self::Latest,
            "today" => Self::Today,
            other => match day_count(other, "last") {
                Some(n) => Self::LastDays(n),
                None => return Err(invalid(field, value)),
            },
        };
        Ok(window)
    }

    /// `None` for [`PostingWindow::All`].
    pub fn resolve(self, clock: &Clock) -> Result<Option<DateWindow>> {
        let today = clock.today();
        let window = match self {
            Self::All => return Ok(None),
            Self::Latest => DateWindow {
                start: clock
                    .now
                    .checked_sub_signed(Duration::hours(24))
                    .ok_or_else(|| out_of_range(today))?,
                end: clock.now,
            },
            Self::Today => DateWindow {
                start: clock.start_of_day(today)?,
                end: clock.end_of_day(today)?,
            },
            Self::LastDays(n) => DateWindow {
                start: clock.start_of_day(shift_days(today, -i64::from(n))?)?,
                end: clock.end_of_day(today)?,
            },
        };
        Ok(Some(window))
    }
}

/// Named deadline windows; all start at `now`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeadlineWindow {
    Today,
    NextDays(u32),
}

impl DeadlineWindow {
    pub fn parse(field: &str, value: &str) -> Result<Self> {
        let kw = keyword(value);
        if kw == "today" {
            return Ok(Self::Today);
        }
        day_count(&kw, "next")
            .map(Self::NextDays)
            .ok_or_else(|| invalid(field, value))
    }

    pub fn resolve(self, clock: &Clock) -> Result<DateWindow> {
        let days = match self {
            Self::Today => 0,
            Self::NextDays(n) => i64::from(n),
        };
        Ok(DateWindow {
            start: clock.now,
            end: clock.end_of_day(shift_days(clock.today(), days)?)?,
        })
    }
}

pub fn posting_date_window(field: &str, value: &str, clock: &Clock) -> Result<Option<DateWindow>> {
    PostingWindow::parse(field, value)?.resolve(clock)
}

pub fn deadline_window(field: &str, value: &str, clock: &Clock) -> Result<DateWindow> {
    DeadlineWindow::parse(field, value)?.resolve(clock)
}

/// `"<lead> N days"` with N in 2..=5.
fn day_count(kw: &str, lead: &str) -> Option<u32> {
    let rest = kw.strip_prefix(lead)?.strip_suffix("days")?;
    let n: u32 = rest.trim().parse().ok()?;
    (2..=5).contains(&n).then_some(n)
}

fn invalid(field: &str, value: &str) -> Error {
    Error::InvalidFilterValue {
        field: field.to_string(),
        value: value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clock() -> Clock {
        Clock::at(Utc.with_ymd_and_hms(2024, 5, 15, 13, 30, 0).unwrap())
    }

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32, ms: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap() + Duration::milliseconds(ms)
    }

    #[test]
    fn single_day_covers_whole_utc_day() {
        let w = single_day_window("2024-02-29").unwrap();
        assert_eq!(w.start, utc(2024, 2, 29, 0, 0, 0, 0));
        assert_eq!(w.end, utc(2024, 2, 29, 23, 59, 59, 999));
    }

    #[test]
    fn single_day_accepts_rfc3339() {
        let w = single_day_window("2024-02-29T22:15:00-05:00").unwrap();
        assert_eq!(w.start, utc(2024, 3, 1, 0, 0, 0, 0));
    }

    #[test]
    fn single_day_rejects_garbage() {
        assert!(matches!(
            single_day_window("yesterday"),
            Err(Error::InvalidDate(_))
        ));
    }

    #[test]
    fn two_dates_are_inclusive() {
        let w = two_date_window(
            r#"{"startDate":"2024-01-10","endDate":"2024-01-12"}"#,
            &clock(),
        )
        .unwrap();
        assert_eq!(w.start, utc(2024, 1, 10, 0, 0, 0, 0));
        assert_eq!(w.end, utc(2024, 1, 12, 23, 59, 59, 999));
    }

    #[test]
    fn two_dates_respect_reference_offset() {
        let offset = FixedOffset::east_opt(6 * 3600).unwrap();
        let w = two_date_window(
            r#"{"startDate":"2024-01-10","endDate":"2024-01-10"}"#,
            &clock().with_offset(offset),
        )
        .unwrap();
        assert_eq!(w.start, utc(2024, 1, 9, 18, 0, 0, 0));
        assert_eq!(w.end, utc(2024, 1, 10, 17, 59, 59, 999));
    }

    #[test]
    fn two_dates_malformed_json() {
        assert!(matches!(
            two_date_window("2024-01-10..2024-01-12", &clock()),
            Err(Error::MalformedInput(_))
        ));
    }

    #[test]
    fn posting_windows() {
        let c = clock();
        assert_eq!(posting_date_window("postingDate", "all", &c).unwrap(), None);

        let latest = posting_date_window("postingDate", "latest", &c)
            .unwrap()
            .unwrap();
        assert_eq!(latest.start, utc(2024, 5, 14, 13, 30, 0, 0));
        assert_eq!(latest.end, c.now);

        let today = posting_date_window("postingDate", "Today", &c)
            .unwrap()
            .unwrap();
        assert_eq!(today.start, utc(2024, 5, 15, 0, 0, 0, 0));
        assert_eq!(today.end, utc(2024, 5, 15, 23, 59, 59, 999));

        let last3 = posting_date_window("postingDate", "last  3 days", &c)
            .unwrap()
            .unwrap();
        assert_eq!(last3.start, utc(2024, 5, 12, 0, 0, 0, 0));
        assert_eq!(last3.end, utc(2024, 5, 15, 23, 59, 59, 999));
    }

    #[test]
    fn posting_window_rejects_unknown_keywords() {
        for bad in ["bogus", "last 6 days", "last 1 days", "next 2 days"] {
            assert!(
                matches!(
                    posting_date_window("postingDate", bad, &clock()),
                    Err(Error::InvalidFilterValue { .. })
                ),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn deadline_windows_start_now() {
        let c = clock();
        let today = deadline_window("deadline", "TODAY", &c).unwrap();
        assert_eq!(today.start, c.now);
        assert_eq!(today.end, utc(2024, 5, 15, 23, 59, 59, 999));

        let next5 = deadline_window("deadline", "next 5 days", &c).unwrap();
        assert_eq!(next5.start, c.now);
        assert_eq!(next5.end, utc(2024, 5, 20, 23, 59, 59, 999));
    }

    #[test]
    fn deadline_rejects_unknown_keywords() {
        let err = deadline_window("deadline", "someday", &clock()).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidFilterValue { ref field, ref value } if field == "deadline" && value == "someday"
        ));
    }

    #[test]
    fn single_day_at_calendar_edge_is_invalid() {
        assert!(matches!(
            single_day_window("+262142-12-31"),
            Err(Error::InvalidDate(_))
        ));
    }

    #[test]
    fn two_dates_at_calendar_edge_are_invalid() {
        let offset = FixedOffset::east_opt(6 * 3600).unwrap();
        let err = two_date_window(
            r#"{"startDate":"+262142-12-30","endDate":"+262142-12-31"}"#,
            &clock().with_offset(offset),
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidDate(_)));
    }

    #[test]
    fn relative_windows_near_calendar_edge_are_invalid() {
        let edge = Clock::at(DateTime::<Utc>::MAX_UTC);
        assert!(matches!(
            deadline_window("deadline", "next 5 days", &edge),
            Err(Error::InvalidDate(_))
        ));
        assert!(matches!(
            posting_date_window("postingDate", "today", &edge),
            Err(Error::InvalidDate(_))
        ));
    }

    #[test]
    fn window_contains_is_inclusive() {
        let w = single_day_window("2024-05-15").unwrap();
        assert!(w.contains(w.start));
        assert!(w.contains(w.end));
        assert!(!w.contains(w.end + Duration::milliseconds(1)));
    }
}
