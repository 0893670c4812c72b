use chrono::{Datelike, NaiveDate, TimeDelta};

/// The published lesson runs one week ahead of the calendar.
pub(crate) const LOOKAHEAD_DAYS: i64 = 7;
const DAYS_PER_QUARTER: i64 = 13 * 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct LessonCycle {
    pub(crate) year: i32,
    pub(crate) quarter: u32,
    pub(crate) lesson: u32,
}

impl LessonCycle {
    /// Lesson being prepared today, i.e. the one in effect a week from `today`.
    pub(crate) fn resolve(today: NaiveDate) -> Self {
        Self::for_date(today + TimeDelta::days(LOOKAHEAD_DAYS))
    }

    /// Lesson in effect on `date`, without any look-ahead.
    pub(crate) fn for_date(date: NaiveDate) -> Self {
        let mut year = date.year();
        let mut jan1 = start_of_year(date);
        let mut days_passed = (date - first_saturday_from(jan1)).num_days();

        if days_passed < 0 {
            // Still inside the previous year's fourth quarter.
            year -= 1;
            jan1 = start_of_year(jan1 - TimeDelta::days(1));
            days_passed = (date - first_saturday_from(jan1)).num_days();
        }

        let quarter = (days_passed / DAYS_PER_QUARTER + 1).min(4);
        let days_into_quarter = days_passed % DAYS_PER_QUARTER;
        let lesson = (days_into_quarter / 7 + 1).min(13);

        Self {
            year,
            quarter: quarter as u32,
            lesson: lesson as u32,
        }
    }
}

/// Most recent Saturday on or before `date`.
pub(crate) fn last_saturday(date: NaiveDate) -> NaiveDate {
    let back = (date.weekday().num_days_from_monday() + 2) % 7;
    date - TimeDelta::days(i64::from(back))
}

fn start_of_year(date: NaiveDate) -> NaiveDate {
    date - TimeDelta::days(i64::from(date.ordinal0()))
}

fn first_saturday_from(jan1: NaiveDate) -> NaiveDate {
    // Saturday is 5 when Monday is 0.
    let ahead = (5 + 7 - jan1.weekday().num_days_from_monday()) % 7;
    jan1 + TimeDelta::days(i64::from(ahead))
}
