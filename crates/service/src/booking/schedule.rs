//! Interval arithmetic for a stylist's working day.

use chrono::{Duration, NaiveTime};

use crate::errors::ServiceError;

/// Half-open intervals `[a_start, a_end)` and `[b_start, b_end)` intersect.
pub fn overlaps(a_start: NaiveTime, a_end: NaiveTime, b_start: NaiveTime, b_end: NaiveTime) -> bool {
    a_start < b_end && b_start < a_end
}

/// `start + minutes`, rejecting appointments that would run past midnight.
pub fn end_after(start: NaiveTime, minutes: i64) -> Result<NaiveTime, ServiceError> {
    let (end, wrapped) = start.overflowing_add_signed(Duration::minutes(minutes));
    if wrapped != 0 || end <= start {
        return Err(ServiceError::Validation("appointment must end on the same day".into()));
    }
    Ok(end)
}

pub fn label(t: NaiveTime) -> String { t.format("%H:%M").to_string() }

/// Opening window and slot width used for availability.
#[derive(Clone, Copy, Debug)]
pub struct BusinessHours {
    pub open: NaiveTime,
    pub close: NaiveTime,
    pub slot: Duration,
}

impl Default for BusinessHours {
    fn default() -> Self {
        Self {
            open: NaiveTime::from_hms_opt(9, 0, 0).unwrap_or_default(),
            close: NaiveTime::from_hms_opt(17, 0, 0).unwrap_or_default(),
            slot: Duration::minutes(30),
        }
    }
}

impl BusinessHours {
    /// Every slot boundary in `[open, close)`.
    pub fn slots(&self) -> SlotIter {
        SlotIter { next: Some(self.open), close: self.close, step: self.slot }
    }

    /// Boundaries that are not the start time of any booked appointment.
    pub fn free_slots<'a>(&self, booked_starts: &'a [NaiveTime]) -> impl Iterator<Item = NaiveTime> + 'a {
        self.slots().filter(move |t| !booked_starts.contains(t))
    }
}

pub struct SlotIter {
    next: Option<NaiveTime>,
    close: NaiveTime,
    step: Duration,
}

impl Iterator for SlotIter {
    type Item = NaiveTime;

    fn next(&mut self) -> Option<NaiveTime> {
        let current = self.next.filter(|t| *t < self.close)?;
        let (after, wrapped) = current.overflowing_add_signed(self.step);
        self.next = (wrapped == 0 && after > current).then_some(after);
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime { NaiveTime::from_hms_opt(h, m, 0).unwrap() }

    #[test]
    fn back_to_back_does_not_overlap() {
        assert!(!overlaps(t(10, 0), t(11, 0), t(11, 0), t(12, 0)));
        assert!(!overlaps(t(11, 0), t(12, 0), t(10, 0), t(11, 0)));
        assert!(overlaps(t(10, 0), t(11, 0), t(10, 30), t(11, 30)));
        assert!(overlaps(t(10, 0), t(12, 0), t(10, 30), t(11, 0)));
        assert!(overlaps(t(10, 0), t(11, 0), t(10, 0), t(11, 0)));
    }

    #[test]
    fn default_day_has_sixteen_slots() {
        let labels: Vec<String> = BusinessHours::default().slots().map(label).collect();
        assert_eq!(labels.len(), 16);
        assert_eq!(labels.first().map(String::as_str), Some("09:00"));
        assert_eq!(labels.last().map(String::as_str), Some("16:30"));
    }

    #[test]
    fn booked_start_is_excluded() {
        let hours = BusinessHours::default();
        let booked = [t(14, 0)];
        let free: Vec<String> = hours.free_slots(&booked).map(label).collect();
        assert_eq!(free.len(), 15);
        assert!(!free.contains(&"14:00".to_string()));
        assert!(free.contains(&"14:30".to_string()));
        // restartable: a second pass yields the same sequence
        let again: Vec<String> = hours.free_slots(&booked).map(label).collect();
        assert_eq!(free, again);
    }

    #[test]
    fn slot_iter_stops_at_midnight() {
        let hours = BusinessHours { open: t(23, 0), close: NaiveTime::from_hms_opt(23, 59, 59).unwrap(), slot: Duration::minutes(30) };
        assert_eq!(hours.slots().count(), 2);
    }

    #[test]
    fn end_after_rejects_wrap() {
        assert_eq!(end_after(t(9, 0), 90).unwrap(), t(10, 30));
        assert!(end_after(t(23, 30), 60).is_err());
        assert!(end_after(t(9, 0), 0).is_err());
    }
}
