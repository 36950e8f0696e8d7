//! Pregnancy-tracking widgets for the companion peer
//!
//! Pure local counters and date arithmetic backing the companion app's
//! dashboard. No persistence, no concurrency; a presentation layer owns
//! one of each and mutates it on user input.

use std::fmt;

use chrono::{Datelike, NaiveDate};

/// Full-term pregnancy length (40 weeks).
pub const TERM_DAYS: i64 = 280;

/// Milliliters added per hydration button press.
pub const GLASS_ML: u32 = 250;

const DAILY_TIPS: [&str; 5] = [
    "Stay hydrated and take short walks.",
    "Practice gentle stretches and deep breathing.",
    "Aim for balanced meals rich in protein and fiber.",
    "Monitor fetal movements and rest when needed.",
    "Keep prenatal vitamins consistent each day.",
];

/// Gestational progress derived from a due date.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GestationalAge {
    pub weeks: i64,
    pub days: i64,
    /// Days remaining until the due date, clamped at zero once overdue.
    pub days_to_due: i64,
}

impl GestationalAge {
    /// Progress as of `today`. A due date more than a term away clamps
    /// to zero elapsed; an overdue pregnancy reads as full term.
    pub fn at(due_date: NaiveDate, today: NaiveDate) -> Self {
        let days_to_due = (due_date - today).num_days().max(0);
        let elapsed = (TERM_DAYS - days_to_due).max(0);
        Self {
            weeks: elapsed / 7,
            days: elapsed % 7,
            days_to_due,
        }
    }
}

impl fmt::Display for GestationalAge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}w {}d ({} days to due)",
            self.weeks, self.days, self.days_to_due
        )
    }
}

/// Daily water-intake counter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HydrationTracker {
    total_ml: u32,
}

impl HydrationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_glass(&mut self) {
        self.total_ml += GLASS_ML;
    }

    pub fn reset(&mut self) {
        self.total_ml = 0;
    }

    pub fn total_ml(&self) -> u32 {
        self.total_ml
    }
}

/// Fetal kick counter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KickCounter {
    count: u32,
}

impl KickCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_kick(&mut self) {
        self.count += 1;
    }

    pub fn reset(&mut self) {
        self.count = 0;
    }

    pub fn count(&self) -> u32 {
        self.count
    }
}

/// The tip shown for a given calendar day, rotating by day of month.
pub fn daily_tip(date: NaiveDate) -> &'static str {
    DAILY_TIPS[date.day() as usize % DAILY_TIPS.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_gestational_age_mid_pregnancy() {
        // Due in 100 days: 180 days elapsed = 25 weeks 5 days.
        let age = GestationalAge::at(date(2026, 12, 3), date(2026, 8, 25));
        assert_eq!(age.weeks, 25);
        assert_eq!(age.days, 5);
        assert_eq!(age.days_to_due, 100);
        assert_eq!(age.to_string(), "25w 5d (100 days to due)");
    }

    #[test]
    fn test_overdue_reads_as_full_term() {
        let age = GestationalAge::at(date(2026, 8, 1), date(2026, 8, 25));
        assert_eq!(age.weeks, 40);
        assert_eq!(age.days, 0);
        assert_eq!(age.days_to_due, 0);
    }

    #[test]
    fn test_due_date_beyond_term_clamps_to_zero() {
        let age = GestationalAge::at(date(2027, 8, 25), date(2026, 8, 25));
        assert_eq!(age.weeks, 0);
        assert_eq!(age.days, 0);
    }

    #[test]
    fn test_hydration_counts_and_resets() {
        let mut hydration = HydrationTracker::new();
        hydration.add_glass();
        hydration.add_glass();
        assert_eq!(hydration.total_ml(), 500);
        hydration.reset();
        assert_eq!(hydration.total_ml(), 0);
    }

    #[test]
    fn test_kick_counter() {
        let mut kicks = KickCounter::new();
        for _ in 0..3 {
            kicks.record_kick();
        }
        assert_eq!(kicks.count(), 3);
        kicks.reset();
        assert_eq!(kicks.count(), 0);
    }

    #[test]
    fn test_daily_tip_rotates_by_day_of_month() {
        assert_eq!(daily_tip(date(2026, 8, 5)), DAILY_TIPS[0]);
        assert_eq!(daily_tip(date(2026, 8, 6)), DAILY_TIPS[1]);
        // Same day of month, same tip.
        assert_eq!(daily_tip(date(2026, 8, 7)), daily_tip(date(2026, 9, 7)));
    }
}
