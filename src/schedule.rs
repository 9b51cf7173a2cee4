//! Fire-time computation for the recurring sync.
//!
//! The routine runs three times a day at fixed local wall-clock times.
//! `next_run_after` is pure so the calendar arithmetic is testable; the
//! async loop in `app` only converts its result into a sleep duration.

use std::time::Duration;

use chrono::{DateTime, Local, NaiveDateTime, TimeDelta};

/// Local wall-clock hours at which a sync run fires.
pub const RUN_HOURS: [u32; 3] = [0, 7, 15];

/// The earliest fire time strictly after `now`.
pub fn next_run_after(now: NaiveDateTime) -> NaiveDateTime {
    let today = now.date();
    for hour in RUN_HOURS {
        if let Some(candidate) = today.and_hms_opt(hour, 0, 0) {
            if candidate > now {
                return candidate;
            }
        }
    }
    // All of today's fire times have passed; first slot tomorrow.
    (today + TimeDelta::days(1))
        .and_hms_opt(RUN_HOURS[0], 0, 0)
        .unwrap_or(now + TimeDelta::hours(8))
}

/// How long to sleep from `now` until the next fire time.
pub fn until_next_run(now: DateTime<Local>) -> Duration {
    let next = next_run_after(now.naive_local());
    (next - now.naive_local())
        .to_std()
        .unwrap_or(Duration::from_secs(60))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 8, 30)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn early_morning_fires_at_seven() {
        assert_eq!(next_run_after(at(3, 15, 0)), at(7, 0, 0));
    }

    #[test]
    fn midday_fires_at_fifteen() {
        assert_eq!(next_run_after(at(7, 0, 1)), at(15, 0, 0));
    }

    #[test]
    fn exactly_at_a_fire_time_moves_to_the_next_slot() {
        // "Strictly after" keeps the loop from firing twice in one second.
        assert_eq!(next_run_after(at(7, 0, 0)), at(15, 0, 0));
        assert_eq!(next_run_after(at(0, 0, 0)), at(7, 0, 0));
    }

    #[test]
    fn evening_rolls_over_to_midnight_tomorrow() {
        let next = next_run_after(at(23, 59, 59));
        let tomorrow_midnight = NaiveDate::from_ymd_opt(2026, 8, 31)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(next, tomorrow_midnight);
    }

    #[test]
    fn month_end_rolls_into_the_next_month() {
        let late = NaiveDate::from_ymd_opt(2026, 8, 31)
            .unwrap()
            .and_hms_opt(16, 0, 0)
            .unwrap();
        let next = next_run_after(late);
        assert_eq!(
            next,
            NaiveDate::from_ymd_opt(2026, 9, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
        );
    }
}
