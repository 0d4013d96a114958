//! Shift time slots and duration arithmetic.
//!
//! Slots are written `"H:MM-H:MM"` in local care-home time. An end earlier
//! than the start means the shift runs past midnight.

use crate::model::{Shift, ShiftType};
use crate::scheduler::SchedError;
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

const MINUTES_PER_DAY: i64 = 24 * 60;

/// Parsed form of a named slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShiftTime {
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub shift_type: ShiftType,
}

impl ShiftTime {
    pub fn hours(&self) -> f64 {
        duration_hours(self.start, self.end)
    }
}

/// Parses `"7:30-14:30"` into start, end and shift type.
pub fn parse_shift_time(slot: &str) -> Result<ShiftTime, SchedError> {
    let invalid = || SchedError::InvalidTimeSlot(slot.to_string());
    let (start_raw, end_raw) = slot.split_once('-').ok_or_else(invalid)?;
    let start = parse_clock(start_raw).ok_or_else(invalid)?;
    let end = parse_clock(end_raw).ok_or_else(invalid)?;
    if start == end {
        return Err(invalid());
    }
    Ok(ShiftTime {
        start,
        end,
        shift_type: classify(start),
    })
}

fn parse_clock(raw: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(raw.trim(), "%H:%M").ok()
}

/// Morning from 05:00, afternoon from 12:00, night from 18:00 until 05:00.
pub fn classify(start: NaiveTime) -> ShiftType {
    match start.hour() {
        5..=11 => ShiftType::Morning,
        12..=17 => ShiftType::Afternoon,
        _ => ShiftType::Night,
    }
}

/// Hours from `start` to `end`, wrapping past midnight when `end < start`.
pub fn duration_hours(start: NaiveTime, end: NaiveTime) -> f64 {
    let start_min = i64::from(start.num_seconds_from_midnight()) / 60;
    let mut end_min = i64::from(end.num_seconds_from_midnight()) / 60;
    if end_min < start_min {
        end_min += MINUTES_PER_DAY;
    }
    (end_min - start_min) as f64 / 60.0
}

pub fn calculate_shift_hours(shift: &Shift) -> f64 {
    duration_hours(shift.start_time, shift.end_time)
}

pub fn shift_window(
    date: NaiveDate,
    start: NaiveTime,
    end: NaiveTime,
) -> (NaiveDateTime, NaiveDateTime) {
    let start_dt = NaiveDateTime::new(date, start);
    let end_dt = start_dt + Duration::minutes((duration_hours(start, end) * 60.0).round() as i64);
    (start_dt, end_dt)
}

/// Signed hours between two instants.
pub fn hours_between(from: NaiveDateTime, to: NaiveDateTime) -> f64 {
    (to - from).num_minutes() as f64 / 60.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn parses_standard_slots() {
        let morning = parse_shift_time("7:30-14:30").unwrap();
        assert_eq!(morning.start, t(7, 30));
        assert_eq!(morning.end, t(14, 30));
        assert_eq!(morning.shift_type, ShiftType::Morning);

        let afternoon = parse_shift_time("14:30 - 21:30").unwrap();
        assert_eq!(afternoon.shift_type, ShiftType::Afternoon);

        let night = parse_shift_time("21:30-7:30").unwrap();
        assert_eq!(night.shift_type, ShiftType::Night);
    }

    #[test]
    fn night_shift_wraps_midnight() {
        assert_eq!(duration_hours(t(21, 30), t(7, 30)), 10.0);
        assert_eq!(duration_hours(t(7, 30), t(14, 30)), 7.0);
    }

    #[test]
    fn rejects_malformed_slots() {
        assert!(parse_shift_time("morning").is_err());
        assert!(parse_shift_time("25:00-07:00").is_err());
        assert!(parse_shift_time("8:00-8:00").is_err());
    }

    #[test]
    fn window_rolls_end_to_next_day() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 3).unwrap();
        let (start, end) = shift_window(date, t(21, 30), t(7, 30));
        assert_eq!(start.date(), date);
        assert_eq!(end.date(), date.succ_opt().unwrap());
        assert_eq!(hours_between(start, end), 10.0);
    }
}
