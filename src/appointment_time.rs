//! Appointment time editing on a 12-hour clock.
//!
//! The form edits date, hour ("01".."12"), minute ("00".."59") and AM/PM
//! independently. [`TimeDraft`] keeps those pieces and the composed 24-hour
//! timestamp in sync: each edit touches only its own component and every
//! composed timestamp has zero seconds.

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

pub use crate::models::enums::Period;

/// Converts a 12-hour clock reading to a 24-hour hour.
///
/// 12 AM is midnight (0) and 12 PM is noon (12).
pub fn to_hour24(hour12: u32, period: Period) -> u32 {
    match period {
        Period::Am if hour12 == 12 => 0,
        Period::Am => hour12,
        Period::Pm if hour12 == 12 => 12,
        Period::Pm => hour12 + 12,
    }
}

/// Inverse of [`to_hour24`]. The returned hour is never 0.
pub fn from_hour24(hour24: u32) -> (u32, Period) {
    let hour12 = match hour24 % 12 {
        0 => 12,
        h => h,
    };
    let period = if hour24 >= 12 { Period::Pm } else { Period::Am };
    (hour12, period)
}

/// Editable appointment time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeDraft {
    date: Option<NaiveDate>,
    hour: String,
    minute: String,
    period: Period,
    timestamp: Option<NaiveDateTime>,
}

impl Default for TimeDraft {
    fn default() -> Self {
        Self {
            date: None,
            hour: "09".into(),
            minute: "00".into(),
            period: Period::Am,
            timestamp: None,
        }
    }
}

impl TimeDraft {
    /// Empty draft: no date chosen, 09:00 AM preselected.
    pub fn new() -> Self {
        Self::default()
    }

    /// Draft for editing an existing appointment.
    pub fn from_timestamp(timestamp: Option<NaiveDateTime>) -> Self {
        let Some(ts) = timestamp else {
            return Self::new();
        };
        let (hour12, period) = from_hour24(ts.hour());
        Self {
            date: Some(ts.date()),
            hour: format!("{hour12:02}"),
            minute: format!("{:02}", ts.minute()),
            period,
            timestamp: truncate_seconds(ts),
        }
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    pub fn hour(&self) -> &str {
        &self.hour
    }

    pub fn minute(&self) -> &str {
        &self.minute
    }

    pub fn period(&self) -> Period {
        self.period
    }

    /// Composed timestamp; `None` until a date has been chosen.
    pub fn timestamp(&self) -> Option<NaiveDateTime> {
        self.timestamp
    }

    /// Picks a new calendar day, or clears the timestamp with `None`.
    /// The current hour, minute and period are applied to the new day. When
    /// those fields do not parse, an existing timestamp moves to the new day
    /// with its time of day unchanged.
    pub fn set_date(&mut self, new_date: Option<NaiveDate>) {
        self.date = new_date;
        let Some(date) = new_date else {
            self.timestamp = None;
            return;
        };
        let composed = match (parse_component(&self.hour), parse_component(&self.minute)) {
            (Some(h12), Some(min)) => date.and_hms_opt(to_hour24(h12, self.period), min, 0),
            _ => None,
        };
        let moved = self.timestamp.map(|ts| date.and_time(ts.time()));
        self.timestamp = composed.or(moved);
    }

    /// Changes the hour; date and minute of an existing timestamp are kept.
    pub fn set_hour(&mut self, hour12: &str) {
        self.hour = hour12.to_string();
        self.recompute_hour();
    }

    /// Changes the minute; date and hour of an existing timestamp are kept.
    pub fn set_minute(&mut self, minute: &str) {
        self.minute = minute.to_string();
        let (Some(ts), Some(min)) = (self.timestamp, parse_component(minute)) else {
            return;
        };
        if let Some(updated) = ts.with_minute(min).and_then(truncate_seconds) {
            self.timestamp = Some(updated);
        }
    }

    /// Switches AM/PM and re-derives the 24-hour hour from the current hour.
    pub fn set_period(&mut self, period: Period) {
        self.period = period;
        self.recompute_hour();
    }

    fn recompute_hour(&mut self) {
        let (Some(ts), Some(h12)) = (self.timestamp, parse_component(&self.hour)) else {
            return;
        };
        if let Some(updated) = ts
            .with_hour(to_hour24(h12, self.period))
            .and_then(truncate_seconds)
        {
            self.timestamp = Some(updated);
        }
    }
}

// Range checks are the form's job; anything unparseable leaves the
// timestamp as it was.
fn parse_component(raw: &str) -> Option<u32> {
    raw.trim().parse().ok()
}

fn truncate_seconds(ts: NaiveDateTime) -> Option<NaiveDateTime> {
    ts.with_second(0).and_then(|t| t.with_nanosecond(0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    #[test]
    fn twelve_am_is_midnight() {
        assert_eq!(to_hour24(12, Period::Am), 0);
    }

    #[test]
    fn twelve_pm_is_noon() {
        assert_eq!(to_hour24(12, Period::Pm), 12);
    }

    #[test]
    fn afternoon_hours_shift_by_twelve() {
        assert_eq!(to_hour24(5, Period::Pm), 17);
        assert_eq!(to_hour24(11, Period::Pm), 23);
        assert_eq!(to_hour24(1, Period::Am), 1);
    }

    #[test]
    fn from_hour24_examples() {
        assert_eq!(from_hour24(0), (12, Period::Am));
        assert_eq!(from_hour24(12), (12, Period::Pm));
        assert_eq!(from_hour24(17), (5, Period::Pm));
    }

    #[test]
    fn conversion_round_trips_every_hour() {
        for h24 in 0..24 {
            let (h12, period) = from_hour24(h24);
            assert!((1..=12).contains(&h12), "hour12 out of range for {h24}");
            assert_eq!(to_hour24(h12, period), h24);
        }
    }

    #[test]
    fn from_timestamp_derives_display_fields() {
        let draft = TimeDraft::from_timestamp(Some(ts(2026, 3, 2, 14, 30, 0)));
        assert_eq!(draft.hour(), "02");
        assert_eq!(draft.minute(), "30");
        assert_eq!(draft.period(), Period::Pm);
        assert_eq!(draft.date(), NaiveDate::from_ymd_opt(2026, 3, 2));
    }

    #[test]
    fn from_midnight_timestamp() {
        let draft = TimeDraft::from_timestamp(Some(ts(2026, 3, 2, 0, 5, 0)));
        assert_eq!(draft.hour(), "12");
        assert_eq!(draft.period(), Period::Am);
    }

    #[test]
    fn from_timestamp_drops_seconds() {
        let draft = TimeDraft::from_timestamp(Some(ts(2026, 3, 2, 9, 10, 42)));
        assert_eq!(draft.timestamp(), Some(ts(2026, 3, 2, 9, 10, 0)));
    }

    #[test]
    fn editing_minute_then_period() {
        let mut draft = TimeDraft::from_timestamp(Some(ts(2026, 3, 2, 14, 30, 0)));

        draft.set_minute("45");
        assert_eq!(draft.timestamp(), Some(ts(2026, 3, 2, 14, 45, 0)));

        draft.set_period(Period::Am);
        assert_eq!(draft.timestamp(), Some(ts(2026, 3, 2, 2, 45, 0)));
    }

    #[test]
    fn set_minute_keeps_date_and_hour() {
        let mut draft = TimeDraft::from_timestamp(Some(ts(2026, 12, 31, 23, 0, 0)));
        for m in ["00", "07", "59"] {
            draft.set_minute(m);
            let t = draft.timestamp().unwrap();
            assert_eq!(t.date(), NaiveDate::from_ymd_opt(2026, 12, 31).unwrap());
            assert_eq!(t.hour(), 23);
            assert_eq!(t.second(), 0);
        }
    }

    #[test]
    fn set_hour_keeps_minute_and_period() {
        let mut draft = TimeDraft::from_timestamp(Some(ts(2026, 3, 2, 14, 30, 0)));
        draft.set_hour("12");
        assert_eq!(draft.timestamp(), Some(ts(2026, 3, 2, 12, 30, 0)));
        draft.set_hour("07");
        assert_eq!(draft.timestamp(), Some(ts(2026, 3, 2, 19, 30, 0)));
    }

    #[test]
    fn set_date_applies_current_time_fields() {
        let mut draft = TimeDraft::new();
        draft.set_hour("03");
        draft.set_minute("15");
        draft.set_period(Period::Pm);
        assert_eq!(draft.timestamp(), None);

        draft.set_date(NaiveDate::from_ymd_opt(2026, 5, 20));
        assert_eq!(draft.timestamp(), Some(ts(2026, 5, 20, 15, 15, 0)));
    }

    #[test]
    fn set_date_keeps_time_of_existing_timestamp() {
        let mut draft = TimeDraft::from_timestamp(Some(ts(2026, 3, 2, 0, 10, 0)));
        draft.set_date(NaiveDate::from_ymd_opt(2026, 3, 9));
        assert_eq!(draft.timestamp(), Some(ts(2026, 3, 9, 0, 10, 0)));
    }

    #[test]
    fn clearing_date_clears_timestamp() {
        let mut draft = TimeDraft::from_timestamp(Some(ts(2026, 3, 2, 14, 30, 0)));
        draft.set_date(None);
        assert_eq!(draft.timestamp(), None);
        assert_eq!(draft.date(), None);

        // Later edits do not resurrect it
        draft.set_minute("10");
        assert_eq!(draft.timestamp(), None);
    }

    #[test]
    fn edits_without_date_only_update_fields() {
        let mut draft = TimeDraft::new();
        draft.set_hour("11");
        draft.set_period(Period::Pm);
        assert_eq!(draft.hour(), "11");
        assert_eq!(draft.period(), Period::Pm);
        assert_eq!(draft.timestamp(), None);
    }

    #[test]
    fn unparseable_hour_leaves_timestamp() {
        let mut draft = TimeDraft::from_timestamp(Some(ts(2026, 3, 2, 14, 30, 0)));
        draft.set_hour("");
        assert_eq!(draft.timestamp(), Some(ts(2026, 3, 2, 14, 30, 0)));
    }

    #[test]
    fn new_date_with_unparseable_hour_moves_timestamp() {
        let mut draft = TimeDraft::from_timestamp(Some(ts(2026, 3, 2, 14, 30, 0)));
        draft.set_hour("xx");
        draft.set_date(NaiveDate::from_ymd_opt(2026, 3, 9));

        assert_eq!(draft.date(), NaiveDate::from_ymd_opt(2026, 3, 9));
        assert_eq!(draft.timestamp(), Some(ts(2026, 3, 9, 14, 30, 0)));
        assert_eq!(draft.timestamp().map(|t| t.date()), draft.date());
    }

    #[test]
    fn new_date_with_unparseable_minute_and_no_timestamp_stays_empty() {
        let mut draft = TimeDraft::new();
        draft.set_minute("");
        draft.set_date(NaiveDate::from_ymd_opt(2026, 3, 9));
        assert_eq!(draft.timestamp(), None);
    }

    #[test]
    fn empty_draft_from_none() {
        assert_eq!(TimeDraft::from_timestamp(None), TimeDraft::new());
    }
}
