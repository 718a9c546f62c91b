use tracing::warn;

use crate::{Availability, AvailabilitySlot, PreferredDays};

/// Comparable features extracted from either availability representation.
///
/// `specified` is false only when the volunteer gave no usable availability
/// at all; scoring treats that as a neutral signal rather than an error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AvailabilityFeatures {
    pub available_day_count: usize,
    pub weekly_hours: f64,
    pub has_weekend_availability: bool,
    pub specified: bool,
}

impl AvailabilityFeatures {
    pub fn unspecified() -> Self {
        Self {
            available_day_count: 0,
            weekly_hours: 0.0,
            has_weekend_availability: false,
            specified: false,
        }
    }
}

/// Normalize an availability value into comparable scalar features.
pub fn normalize_availability(availability: Option<&Availability>) -> AvailabilityFeatures {
    match availability {
        None => AvailabilityFeatures::unspecified(),
        Some(Availability::Weekly { schedule }) => normalize_weekly(schedule),
        Some(Availability::Monthly(monthly)) => AvailabilityFeatures {
            available_day_count: 0,
            weekly_hours: monthly.hours_per_week.unwrap_or(10.0),
            has_weekend_availability: monthly.preferred_days == PreferredDays::Weekends,
            specified: true,
        },
    }
}

fn normalize_weekly(schedule: &[AvailabilitySlot]) -> AvailabilityFeatures {
    if schedule.is_empty() {
        return AvailabilityFeatures::unspecified();
    }

    let mut available_day_count = 0;
    let mut weekly_hours = 0.0;
    let mut has_weekend = false;

    for slot in schedule {
        if !slot.is_open() {
            continue;
        }
        available_day_count += 1;
        weekly_hours += slot_hours(slot);
        if slot.is_weekend() {
            has_weekend = true;
        }
    }

    AvailabilityFeatures {
        available_day_count,
        weekly_hours,
        has_weekend_availability: has_weekend,
        specified: true,
    }
}

/// Whole-hour duration of a slot. An end time numerically earlier than the
/// start denotes an overnight slot and wraps by 24 hours. A slot with an
/// unparseable time still counts as an available day but contributes zero
/// hours.
fn slot_hours(slot: &AvailabilitySlot) -> f64 {
    let (Some(start), Some(end)) = (
        parse_minutes(&slot.start_time),
        parse_minutes(&slot.end_time),
    ) else {
        warn!(
            day_of_week = slot.day_of_week,
            start_time = %slot.start_time,
            end_time = %slot.end_time,
            "availability slot has invalid time format; counting zero hours"
        );
        return 0.0;
    };

    let end = if end < start { end + 24 * 60 } else { end };
    ((end - start) / 60) as f64
}

/// Parse `HH:MM` with hour in [0,23] and minute in [0,59], as minutes
/// since midnight.
fn parse_minutes(time: &str) -> Option<u32> {
    let (hour, minute) = time.split_once(':')?;
    let hour: u32 = hour.trim().parse().ok()?;
    let minute: u32 = minute.trim().parse().ok()?;
    if hour > 23 || minute > 59 {
        return None;
    }
    Some(hour * 60 + minute)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MonthlyAvailability, SlotStatus};

    fn slot(day: u8, start: &str, end: &str, status: SlotStatus) -> AvailabilitySlot {
        AvailabilitySlot {
            day_of_week: day,
            start_time: start.into(),
            end_time: end.into(),
            status: Some(status),
            available: None,
        }
    }

    #[test]
    fn missing_availability_is_neutral() {
        let features = normalize_availability(None);
        assert_eq!(features, AvailabilityFeatures::unspecified());
        assert!(!features.specified);
    }

    #[test]
    fn empty_schedule_is_neutral() {
        let features = normalize_availability(Some(&Availability::Weekly { schedule: vec![] }));
        assert!(!features.specified);
    }

    #[test]
    fn counts_open_slots_and_hours() {
        let schedule = vec![
            slot(1, "09:00", "17:00", SlotStatus::Available),
            slot(3, "10:00", "14:00", SlotStatus::Available),
            slot(4, "10:00", "14:00", SlotStatus::Busy),
        ];
        let features = normalize_availability(Some(&Availability::Weekly { schedule }));
        assert_eq!(features.available_day_count, 2);
        assert_eq!(features.weekly_hours, 12.0);
        assert!(!features.has_weekend_availability);
    }

    #[test]
    fn overnight_slot_wraps_instead_of_going_negative() {
        let schedule = vec![slot(2, "22:00", "02:00", SlotStatus::Available)];
        let features = normalize_availability(Some(&Availability::Weekly { schedule }));
        assert_eq!(features.weekly_hours, 4.0);
    }

    #[test]
    fn partial_hours_truncate_to_whole_hours() {
        let schedule = vec![slot(1, "09:00", "17:30", SlotStatus::Available)];
        let features = normalize_availability(Some(&Availability::Weekly { schedule }));
        assert_eq!(features.weekly_hours, 8.0);
    }

    #[test]
    fn weekend_flag_requires_open_weekend_slot() {
        let busy_weekend = vec![
            slot(5, "09:00", "12:00", SlotStatus::Busy),
            slot(1, "09:00", "12:00", SlotStatus::Available),
        ];
        let features =
            normalize_availability(Some(&Availability::Weekly { schedule: busy_weekend }));
        assert!(!features.has_weekend_availability);

        let open_weekend = vec![slot(6, "09:00", "12:00", SlotStatus::Available)];
        let features =
            normalize_availability(Some(&Availability::Weekly { schedule: open_weekend }));
        assert!(features.has_weekend_availability);
    }

    #[test]
    fn invalid_time_counts_day_but_zero_hours() {
        let schedule = vec![AvailabilitySlot {
            day_of_week: 2,
            start_time: "25:00".into(),
            end_time: "nope".into(),
            status: Some(SlotStatus::Available),
            available: None,
        }];
        let features = normalize_availability(Some(&Availability::Weekly { schedule }));
        assert_eq!(features.available_day_count, 1);
        assert_eq!(features.weekly_hours, 0.0);
    }

    #[test]
    fn monthly_defaults_to_ten_hours() {
        let features = normalize_availability(Some(&Availability::Monthly(
            MonthlyAvailability::default(),
        )));
        assert_eq!(features.weekly_hours, 10.0);
        assert_eq!(features.available_day_count, 0);
        assert!(features.specified);
    }

    #[test]
    fn monthly_weekend_preference_sets_flag() {
        let monthly = MonthlyAvailability {
            hours_per_week: Some(8.0),
            preferred_days: PreferredDays::Weekends,
            time_preference: None,
        };
        let features = normalize_availability(Some(&Availability::Monthly(monthly)));
        assert!(features.has_weekend_availability);
    }
}
