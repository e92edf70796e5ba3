//! Daily check-in streak.
//!
//! Granularity is the local calendar day. A check-in is available whenever the
//! last one happened on a different day; skipping a whole day resets the streak.

use chrono::NaiveDate;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Streak {
    pub count: u32,
    pub last_check_in: Option<NaiveDate>,
    pub available: bool,
}

impl Streak {
    /// State at session start for `today`.
    pub fn evaluate(count: u32, last_check_in: Option<NaiveDate>, today: NaiveDate) -> Self {
        match last_check_in {
            None => Self {
                count,
                last_check_in,
                available: true,
            },
            // Same day, or the clock went backwards.
            Some(last) if last >= today => Self {
                count,
                last_check_in,
                available: false,
            },
            Some(last) => {
                let gap = (today - last).num_days();
                Self {
                    count: if gap > 1 { 0 } else { count },
                    last_check_in,
                    available: true,
                }
            }
        }
    }

    /// Record a check-in for `today`. Returns false when already checked in.
    pub fn check_in(&mut self, today: NaiveDate) -> bool {
        if !self.available || self.last_check_in == Some(today) {
            self.available = false;
            return false;
        }
        self.count = self.count.saturating_add(1);
        self.last_check_in = Some(today);
        self.available = false;
        true
    }
}

/// Today in the device's time zone.
pub fn local_today() -> NaiveDate {
    chrono::Local::now().date_naive()
}
