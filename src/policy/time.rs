use std::collections::BTreeMap;

use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveTime, TimeZone, Utc, Weekday};
use chrono_tz::Tz;

/// Process-wide working-time policy: timezone, official start of day,
/// weekly-off weekdays and the holiday calendar. Every "is this check-in
/// late?" comparison goes through this single source of truth so that the
/// civil date and the official start are derived from the same zone.
#[derive(Debug, Clone)]
pub struct TimePolicy {
    pub tz: Tz,
    pub official_start: NaiveTime,
    pub weekly_off: Vec<Weekday>,
    pub holidays: BTreeMap<NaiveDate, String>,
}

impl TimePolicy {
    pub fn new(tz: Tz, official_start: NaiveTime, weekly_off: Vec<Weekday>) -> Self {
        Self {
            tz,
            official_start,
            weekly_off,
            holidays: BTreeMap::new(),
        }
    }

    pub fn with_holidays(&self, holidays: BTreeMap<NaiveDate, String>) -> Self {
        Self {
            holidays,
            ..self.clone()
        }
    }

    /// Civil date of an instant in the configured timezone.
    pub fn civil_date(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.tz).date_naive()
    }

    pub fn is_weekly_off(&self, date: NaiveDate) -> bool {
        use chrono::Datelike;
        self.weekly_off.contains(&date.weekday())
    }

    pub fn holiday_title(&self, date: NaiveDate) -> Option<&str> {
        self.holidays.get(&date).map(String::as_str)
    }

    /// Official start instant for a civil date. Ambiguous local times (DST
    /// fall-back) resolve to the earlier instant; skipped local times shift
    /// forward by an hour.
    pub fn official_start_on(&self, date: NaiveDate) -> DateTime<Utc> {
        let naive = date.and_time(self.official_start);
        let local = match self.tz.from_local_datetime(&naive) {
            LocalResult::Single(dt) => dt,
            LocalResult::Ambiguous(earliest, _) => earliest,
            LocalResult::None => match self.tz.from_local_datetime(&(naive + Duration::hours(1))) {
                LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => dt,
                LocalResult::None => return Utc.from_utc_datetime(&naive),
            },
        };
        local.with_timezone(&Utc)
    }

    #[cfg(test)]
    pub fn for_tests() -> Self {
        // Asia/Kolkata has no DST, which keeps test arithmetic simple.
        Self::new(
            chrono_tz::Asia::Kolkata,
            NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            vec![Weekday::Sun],
        )
    }
}
