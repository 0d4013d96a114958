use crate::model::{Shift, ShiftId};
use chrono::NaiveDateTime;

pub(super) fn overlaps(
    a_start: NaiveDateTime,
    a_end: NaiveDateTime,
    b_start: NaiveDateTime,
    b_end: NaiveDateTime,
) -> bool {
    a_start < b_end && b_start < a_end
}

/// Hours of rest between two shifts, `None` when they overlap.
pub(super) fn rest_between(a: &Shift, b: &Shift) -> Option<f64> {
    let (a_start, a_end) = a.window();
    let (b_start, b_end) = b.window();
    if overlaps(a_start, a_end, b_start, b_end) {
        return None;
    }
    if a_end <= b_start {
        Some(crate::time::hours_between(a_end, b_start))
    } else {
        Some(crate::time::hours_between(b_end, a_start))
    }
}

pub(super) fn find_shift_index(shifts: &[Shift], shift_id: &ShiftId) -> Option<usize> {
    shifts.iter().position(|s| &s.id == shift_id)
}
