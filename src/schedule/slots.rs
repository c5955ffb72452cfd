use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::errors::ScheduleError;
use crate::tournament::models::FieldModel;

const TIME_FORMAT: &str = "%H:%M";

/// Validated date range and daily playing window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleConfig {
    pub start_date: NaiveDate,
    /// Inclusive
    pub end_date: NaiveDate,
    pub match_duration_minutes: u32,
    pub daily_start_time: NaiveTime,
    pub daily_end_time: NaiveTime,
}

/// One field at one start time
#[derive(Debug, Clone, PartialEq)]
pub struct Slot {
    pub field: FieldModel,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl ScheduleConfig {
    pub fn new(
        start_date: NaiveDate,
        end_date: NaiveDate,
        match_duration_minutes: i64,
        daily_start_time: &str,
        daily_end_time: &str,
    ) -> Result<Self, ScheduleError> {
        let invalid = |msg: String| ScheduleError::InvalidScheduleConfig(msg);

        if end_date < start_date {
            return Err(invalid("end date is before start date".to_string()));
        }
        let match_duration_minutes = u32::try_from(match_duration_minutes)
            .ok()
            .filter(|minutes| *minutes > 0)
            .ok_or_else(|| invalid("match duration must be positive".to_string()))?;
        let daily_start_time = NaiveTime::parse_from_str(daily_start_time, TIME_FORMAT)
            .map_err(|_| invalid(format!("daily start time {:?} is not HH:MM", daily_start_time)))?;
        let daily_end_time = NaiveTime::parse_from_str(daily_end_time, TIME_FORMAT)
            .map_err(|_| invalid(format!("daily end time {:?} is not HH:MM", daily_end_time)))?;

        if daily_end_time <= daily_start_time {
            return Err(invalid("daily end time must be after daily start time".to_string()));
        }

        let config = Self {
            start_date,
            end_date,
            match_duration_minutes,
            daily_start_time,
            daily_end_time,
        };
        if config.slots_per_day() == 0 {
            return Err(invalid(
                "match duration is longer than the daily window".to_string(),
            ));
        }
        Ok(config)
    }

    pub fn duration(&self) -> Duration {
        Duration::minutes(i64::from(self.match_duration_minutes))
    }

    pub fn slots_per_day(&self) -> u32 {
        let window = (self.daily_end_time - self.daily_start_time).num_minutes();
        u32::try_from(window / i64::from(self.match_duration_minutes)).unwrap_or(0)
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        std::iter::successors(Some(self.start_date), |day| day.succ_opt())
            .take_while(move |day| *day <= self.end_date)
    }

    /// Total (field, start) slots across the whole range
    pub fn capacity(&self, field_count: usize) -> usize {
        self.days().count() * self.slots_per_day() as usize * field_count
    }

    /// Every slot in day, then slot, then field order
    pub fn slots<'a>(&'a self, fields: &'a [FieldModel]) -> impl Iterator<Item = Slot> + 'a {
        let duration = self.duration();
        let slots_per_day = self.slots_per_day();
        let daily_start = self.daily_start_time;

        self.days().flat_map(move |day| {
            let day_start = Utc.from_utc_datetime(&day.and_time(daily_start));
            (0..slots_per_day).flat_map(move |slot| {
                let start = day_start + duration * slot as i32;
                fields.iter().map(move |field| Slot {
                    field: field.clone(),
                    start,
                    end: start + duration,
                })
            })
        })
    }

    /// Slots starting at or after `not_before`
    pub fn slots_from<'a>(
        &'a self,
        fields: &'a [FieldModel],
        not_before: Option<DateTime<Utc>>,
    ) -> impl Iterator<Item = Slot> + 'a {
        self.slots(fields)
            .filter(move |slot| not_before.map_or(true, |limit| slot.start >= limit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, day).unwrap()
    }

    fn field(name: &str) -> FieldModel {
        FieldModel {
            name: name.to_string(),
            field_number: None,
            location: None,
            capacity: None,
        }
    }

    #[rstest]
    #[case::end_before_start("10:00", "09:00", 60)]
    #[case::empty_window("09:00", "09:00", 60)]
    #[case::duration_longer_than_window("09:00", "10:00", 90)]
    #[case::zero_duration("09:00", "17:00", 0)]
    #[case::negative_duration("09:00", "17:00", -30)]
    #[case::malformed_time("9am", "17:00", 60)]
    fn rejects_invalid_windows(#[case] start: &str, #[case] end: &str, #[case] minutes: i64) {
        let result = ScheduleConfig::new(date(5), date(5), minutes, start, end);
        assert!(matches!(result, Err(ScheduleError::InvalidScheduleConfig(_))));
    }

    #[test]
    fn rejects_inverted_date_range() {
        let result = ScheduleConfig::new(date(6), date(5), 60, "09:00", "17:00");
        assert!(matches!(result, Err(ScheduleError::InvalidScheduleConfig(_))));
    }

    #[rstest]
    #[case(60, 8)]
    #[case(90, 5)]
    #[case(480, 1)]
    fn slots_per_day_floors(#[case] minutes: i64, #[case] expected: u32) {
        let config = ScheduleConfig::new(date(5), date(5), minutes, "09:00", "17:00").unwrap();
        assert_eq!(config.slots_per_day(), expected);
    }

    #[test]
    fn slots_walk_day_then_slot_then_field() {
        let config = ScheduleConfig::new(date(5), date(6), 60, "09:00", "11:00").unwrap();
        let fields = vec![field("North"), field("South")];

        let slots: Vec<(String, String)> = config
            .slots(&fields)
            .map(|slot| (slot.field.name, slot.start.format("%d %H:%M").to_string()))
            .collect();

        assert_eq!(config.capacity(fields.len()), 8);
        assert_eq!(
            slots,
            vec![
                ("North".to_string(), "05 09:00".to_string()),
                ("South".to_string(), "05 09:00".to_string()),
                ("North".to_string(), "05 10:00".to_string()),
                ("South".to_string(), "05 10:00".to_string()),
                ("North".to_string(), "06 09:00".to_string()),
                ("South".to_string(), "06 09:00".to_string()),
                ("North".to_string(), "06 10:00".to_string()),
                ("South".to_string(), "06 10:00".to_string()),
            ]
        );
    }

    #[test]
    fn slots_from_skips_earlier_starts() {
        let config = ScheduleConfig::new(date(5), date(5), 60, "09:00", "12:00").unwrap();
        let fields = vec![field("North")];
        let limit = Utc.with_ymd_and_hms(2025, 7, 5, 10, 30, 0).unwrap();

        let starts: Vec<u32> = config
            .slots_from(&fields, Some(limit))
            .map(|slot| chrono::Timelike::hour(&slot.start))
            .collect();

        assert_eq!(starts, vec![11]);
    }
}
