use chrono::NaiveDate;
use kernel::model::location::LocationId;
use kernel::model::schedule::{event::ScheduleUpdate, ScheduleConfig, ScheduleState};
use kernel::model::slot::SlotTime;
use serde::{Deserialize, Serialize};

/// Partial per-service schedule update. Omitted fields keep their current
/// values.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateScheduleRequest {
    pub open_time: Option<SlotTime>,
    pub close_time: Option<SlotTime>,
    pub slot_duration_minutes: Option<u32>,
    pub cabin_count: Option<u32>,
    pub people_per_cabin: Option<u32>,
    pub allowed_dates: Option<Vec<NaiveDate>>,
}

impl From<UpdateScheduleRequest> for ScheduleUpdate {
    fn from(value: UpdateScheduleRequest) -> Self {
        let UpdateScheduleRequest {
            open_time,
            close_time,
            slot_duration_minutes,
            cabin_count,
            people_per_cabin,
            allowed_dates,
        } = value;
        Self {
            open_time,
            close_time,
            slot_duration_minutes,
            cabin_count,
            people_per_cabin,
            allowed_dates,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLocationsRequest {
    pub locations: Vec<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleStateResponse {
    pub locations: Vec<LocationId>,
    pub primary: ServiceScheduleResponse,
    pub secondary: ServiceScheduleResponse,
}

impl From<&ScheduleState> for ScheduleStateResponse {
    fn from(value: &ScheduleState) -> Self {
        Self {
            locations: value.locations.iter().cloned().collect(),
            primary: ServiceScheduleResponse::from(&value.primary),
            secondary: ServiceScheduleResponse::from(&value.secondary),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceScheduleResponse {
    pub open_time: SlotTime,
    pub close_time: SlotTime,
    pub slot_duration_minutes: u32,
    pub cabin_count: u32,
    pub people_per_cabin: u32,
    pub allowed_dates: Vec<NaiveDate>,
    /// The grid derived from the settings above, for display.
    pub slots: Vec<SlotTime>,
}

impl From<&ScheduleConfig> for ServiceScheduleResponse {
    fn from(value: &ScheduleConfig) -> Self {
        Self {
            open_time: value.open_time,
            close_time: value.close_time,
            slot_duration_minutes: value.slot_duration_minutes,
            cabin_count: value.cabin_count,
            people_per_cabin: value.people_per_cabin,
            allowed_dates: value.allowed_dates.iter().copied().collect(),
            slots: value.slots(),
        }
    }
}
