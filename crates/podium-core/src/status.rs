//! Human status line for a resolved event window.
//!
//! Display screens show one short line under the current event: the time
//! window while something runs, a countdown before the start, or a
//! finished marker at the end. Times are venue-local and printed as
//! stored.

use chrono::{Datelike, Months, NaiveDateTime};
use podium_types::Locale;

/// Largest number of units shown in a duration.
const MAX_UNITS: usize = 4;

/// Calendar unit used in a duration breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Unit {
    Year,
    Month,
    Day,
    Hour,
    Minute,
}

impl Unit {
    const fn name(self, locale: Locale, plural: bool) -> &'static str {
        match (locale, self, plural) {
            (Locale::En, Self::Year, false) => "year",
            (Locale::En, Self::Year, true) => "years",
            (Locale::En, Self::Month, false) => "month",
            (Locale::En, Self::Month, true) => "months",
            (Locale::En, Self::Day, false) => "day",
            (Locale::En, Self::Day, true) => "days",
            (Locale::En, Self::Hour, false) => "hour",
            (Locale::En, Self::Hour, true) => "hours",
            (Locale::En, Self::Minute, false) => "minute",
            (Locale::En, Self::Minute, true) => "minutes",
            (Locale::De, Self::Year, false) => "Jahr",
            (Locale::De, Self::Year, true) => "Jahre",
            (Locale::De, Self::Month, false) => "Monat",
            (Locale::De, Self::Month, true) => "Monate",
            (Locale::De, Self::Day, false) => "Tag",
            (Locale::De, Self::Day, true) => "Tage",
            (Locale::De, Self::Hour, false) => "Stunde",
            (Locale::De, Self::Hour, true) => "Stunden",
            (Locale::De, Self::Minute, false) => "Minute",
            (Locale::De, Self::Minute, true) => "Minuten",
        }
    }
}

/// Build the status line for a window.
///
/// - no dates: empty string
/// - start and end: `HH:MM → HH:MM`
/// - start only: countdown to the start, or how late the start is
/// - end only: finished marker
pub fn format_status(
    start: Option<NaiveDateTime>,
    end: Option<NaiveDateTime>,
    now: NaiveDateTime,
    locale: Locale,
) -> String {
    match (start, end) {
        (None, None) => String::new(),
        (Some(start), Some(end)) => {
            format!("{} → {}", start.format("%H:%M"), end.format("%H:%M"))
        }
        (Some(start), None) => {
            let delta = format_duration(start, now, locale);
            match (locale, delta.is_empty(), now < start) {
                (Locale::En, true, _) => "starting now".to_owned(),
                (Locale::De, true, _) => "beginnt jetzt".to_owned(),
                (Locale::En, false, true) => format!("starts in {delta}"),
                (Locale::En, false, false) => format!("should have started {delta} ago"),
                (Locale::De, false, true) => format!("beginnt in {delta}"),
                (Locale::De, false, false) => format!("hätte vor {delta} beginnen sollen"),
            }
        }
        (None, Some(_)) => match locale {
            Locale::En => "finished".to_owned(),
            Locale::De => "beendet".to_owned(),
        },
    }
}

/// Describe the distance between two timestamps.
///
/// The distance is split into calendar years, months, days, hours and
/// minutes. Zero units are left out, seconds are dropped, and only the
/// four largest non-zero units are kept. The order of the arguments does
/// not matter. Returns an empty string for less than one minute.
pub fn format_duration(a: NaiveDateTime, b: NaiveDateTime, locale: Locale) -> String {
    let (earlier, later) = if a <= b { (a, b) } else { (b, a) };

    let months = whole_months_between(earlier, later);
    let anchor = earlier
        .checked_add_months(Months::new(months))
        .unwrap_or(earlier);
    let rest = later.signed_duration_since(anchor);

    let units = [
        (Unit::Year, i64::from(months / 12)),
        (Unit::Month, i64::from(months % 12)),
        (Unit::Day, rest.num_days()),
        (Unit::Hour, rest.num_hours() % 24),
        (Unit::Minute, rest.num_minutes() % 60),
    ];

    units
        .into_iter()
        .filter(|(_, value)| *value > 0)
        .take(MAX_UNITS)
        .map(|(unit, value)| format!("{value} {}", unit.name(locale, value != 1)))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Number of whole calendar months from `earlier` to `later`.
fn whole_months_between(earlier: NaiveDateTime, later: NaiveDateTime) -> u32 {
    let year_diff = i64::from(later.year()).saturating_sub(i64::from(earlier.year()));
    let month_diff = i64::from(later.month()).saturating_sub(i64::from(earlier.month()));
    let guess = year_diff.saturating_mul(12).saturating_add(month_diff).max(0);
    let mut months = u32::try_from(guess).unwrap_or(0);

    // The calendar guess overshoots by one when the day/time of `later`
    // falls before that of `earlier` within the month.
    while months > 0
        && earlier
            .checked_add_months(Months::new(months))
            .is_none_or(|shifted| shifted > later)
    {
        months = months.saturating_sub(1);
    }
    months
}
