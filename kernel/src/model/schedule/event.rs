use crate::model::slot::SlotTime;
use chrono::NaiveDate;
use derive_new::new;

/// Partial schedule update submitted by an administrator. `None` keeps the
/// current value; `allowed_dates` replaces the whole allow-list when given.
#[derive(Debug, Default, new)]
pub struct ScheduleUpdate {
    pub open_time: Option<SlotTime>,
    pub close_time: Option<SlotTime>,
    pub slot_duration_minutes: Option<u32>,
    pub cabin_count: Option<u32>,
    pub people_per_cabin: Option<u32>,
    pub allowed_dates: Option<Vec<NaiveDate>>,
}
