use kernel::model::slot::SlotTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityQuery {
    pub date: String,
    pub location: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrimarySlotQuery {
    pub date: String,
    pub location: String,
    pub cabin: u32,
}

/// Remaining whole-day seats keyed by cabin number.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CabinAvailabilityResponse {
    pub cabins: BTreeMap<u32, u32>,
}

impl From<BTreeMap<u32, u32>> for CabinAvailabilityResponse {
    fn from(cabins: BTreeMap<u32, u32>) -> Self {
        Self { cabins }
    }
}

/// Remaining seats keyed by slot label, in clock order.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotAvailabilityResponse {
    pub slots: BTreeMap<SlotTime, u32>,
}

impl From<BTreeMap<SlotTime, u32>> for SlotAvailabilityResponse {
    fn from(slots: BTreeMap<SlotTime, u32>) -> Self {
        Self { slots }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenSlotsResponse {
    pub slots: Vec<SlotTime>,
}

impl From<Vec<SlotTime>> for OpenSlotsResponse {
    fn from(slots: Vec<SlotTime>) -> Self {
        Self { slots }
    }
}
