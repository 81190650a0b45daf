pub mod event;

use crate::model::location::{validate_locations, LocationId};
use crate::model::schedule::event::ScheduleUpdate;
use crate::model::slot::{generate_slots, SlotTime};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use shared::config::{ScheduleSeed, ServiceSeed};
use shared::error::{AppError, AppResult};
use std::collections::BTreeSet;
use std::fmt;
use std::ops::RangeInclusive;

/// The two bookable services. Primary runs numbered cabins a guest picks;
/// secondary pools all cabins into one aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceKind {
    Primary,
    Secondary,
}

impl ServiceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ServiceKind::Primary => "primary",
            ServiceKind::Secondary => "secondary",
        }
    }

    fn duration_bounds(self) -> RangeInclusive<u32> {
        match self {
            ServiceKind::Primary => 5..=120,
            ServiceKind::Secondary => 15..=120,
        }
    }

    fn people_bounds(self) -> RangeInclusive<u32> {
        match self {
            ServiceKind::Primary => 1..=10,
            ServiceKind::Secondary => 1..=5,
        }
    }

    fn cabin_bounds(self) -> RangeInclusive<u32> {
        1..=20
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-service schedule settings. A value of this type is always valid:
/// both construction paths run the same checks and reject violations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleConfig {
    pub open_time: SlotTime,
    pub close_time: SlotTime,
    pub slot_duration_minutes: u32,
    pub cabin_count: u32,
    pub people_per_cabin: u32,
    pub allowed_dates: BTreeSet<NaiveDate>,
}

impl ScheduleConfig {
    pub fn slots(&self) -> Vec<SlotTime> {
        generate_slots(self.open_time, self.close_time, self.slot_duration_minutes)
    }

    pub fn has_slot(&self, slot: SlotTime) -> bool {
        self.slots().contains(&slot)
    }

    /// Cabins are numbered from 1.
    pub fn has_cabin(&self, cabin: u32) -> bool {
        (1..=self.cabin_count).contains(&cabin)
    }

    /// How many people fit into one slot: per cabin for primary, pooled
    /// across all cabins for secondary.
    pub fn slot_capacity(&self, kind: ServiceKind) -> u32 {
        match kind {
            ServiceKind::Primary => self.people_per_cabin,
            ServiceKind::Secondary => self.cabin_count.saturating_mul(self.people_per_cabin),
        }
    }

    /// Whole-day ceiling for a single primary cabin.
    pub fn cabin_capacity(&self) -> u32 {
        (self.slots().len() as u32).saturating_mul(self.people_per_cabin)
    }

    pub fn allows_date(&self, date: NaiveDate) -> bool {
        self.allowed_dates.contains(&date)
    }

    /// Date-window check shared by queries and submissions. Past dates and
    /// dates missing from the allow-list are rejected with distinct reasons.
    pub fn check_date(&self, kind: ServiceKind, date: NaiveDate, today: NaiveDate) -> AppResult<()> {
        if date < today {
            return Err(AppError::DateNotAllowed(format!("{date} is in the past")));
        }
        if !self.allows_date(date) {
            return Err(AppError::DateNotAllowed(format!(
                "{date} is not an offered {kind} date"
            )));
        }
        Ok(())
    }

    /// Merges a partial update onto this config and validates the result.
    /// Nothing is applied unless every check passes.
    pub fn apply(&self, kind: ServiceKind, update: ScheduleUpdate) -> AppResult<Self> {
        let mut violations = Vec::new();
        let mut next = self.clone();
        let ScheduleUpdate {
            open_time,
            close_time,
            slot_duration_minutes,
            cabin_count,
            people_per_cabin,
            allowed_dates,
        } = update;
        if let Some(value) = open_time {
            next.open_time = value;
        }
        if let Some(value) = close_time {
            next.close_time = value;
        }
        if let Some(value) = slot_duration_minutes {
            next.slot_duration_minutes = value;
        }
        if let Some(value) = cabin_count {
            next.cabin_count = value;
        }
        if let Some(value) = people_per_cabin {
            next.people_per_cabin = value;
        }
        if let Some(dates) = allowed_dates {
            let unique: BTreeSet<NaiveDate> = dates.iter().copied().collect();
            if unique.len() != dates.len() {
                violations.push("allowed dates must not contain duplicates".to_string());
            }
            next.allowed_dates = unique;
        }
        violations.extend(next.violations(kind));
        if violations.is_empty() {
            Ok(next)
        } else {
            Err(AppError::ConfigurationInvalid(violations))
        }
    }

    fn violations(&self, kind: ServiceKind) -> Vec<String> {
        let mut violations = Vec::new();
        if self.open_time >= self.close_time {
            violations.push("open time must be before close time".to_string());
        }
        let duration = kind.duration_bounds();
        if !duration.contains(&self.slot_duration_minutes) {
            violations.push(format!(
                "{kind} slot duration must be between {} and {} minutes",
                duration.start(),
                duration.end()
            ));
        }
        let cabins = kind.cabin_bounds();
        if !cabins.contains(&self.cabin_count) {
            violations.push(format!(
                "cabin count must be between {} and {}",
                cabins.start(),
                cabins.end()
            ));
        }
        let people = kind.people_bounds();
        if !people.contains(&self.people_per_cabin) {
            violations.push(format!(
                "{kind} people per cabin must be between {} and {}",
                people.start(),
                people.end()
            ));
        }
        if self.allowed_dates.is_empty() {
            violations.push(format!("{kind} needs at least one allowed date"));
        }
        violations
    }

    fn from_seed(kind: ServiceKind, seed: &ServiceSeed) -> Result<Self, Vec<String>> {
        let mut violations = Vec::new();
        let open_time = seed
            .open_time
            .parse::<SlotTime>()
            .map_err(|e| violations.push(e.to_string()))
            .ok();
        let close_time = seed
            .close_time
            .parse::<SlotTime>()
            .map_err(|e| violations.push(e.to_string()))
            .ok();
        let slot_duration_minutes =
            parse_u32(&seed.slot_duration_minutes, "slot duration", &mut violations);
        let cabin_count = parse_u32(&seed.cabin_count, "cabin count", &mut violations);
        let people_per_cabin =
            parse_u32(&seed.people_per_cabin, "people per cabin", &mut violations);
        let mut allowed_dates = BTreeSet::new();
        for raw in &seed.allowed_dates {
            match NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d") {
                Ok(date) => {
                    if !allowed_dates.insert(date) {
                        violations.push(format!("allowed date {date} is listed more than once"));
                    }
                }
                Err(_) => violations.push(format!("`{raw}` is not a valid calendar date")),
            }
        }
        let (
            Some(open_time),
            Some(close_time),
            Some(slot_duration_minutes),
            Some(cabin_count),
            Some(people_per_cabin),
        ) = (
            open_time,
            close_time,
            slot_duration_minutes,
            cabin_count,
            people_per_cabin,
        )
        else {
            return Err(violations);
        };
        let config = Self {
            open_time,
            close_time,
            slot_duration_minutes,
            cabin_count,
            people_per_cabin,
            allowed_dates,
        };
        violations.extend(config.violations(kind));
        if violations.is_empty() {
            Ok(config)
        } else {
            Err(violations)
        }
    }
}

/// Full schedule in effect: the location list plus one config per service.
#[derive(Debug, Clone)]
pub struct ScheduleState {
    pub locations: BTreeSet<LocationId>,
    pub primary: ScheduleConfig,
    pub secondary: ScheduleConfig,
}

impl ScheduleState {
    /// Builds the boot-time schedule from the environment seed. Failures
    /// carry the same `ConfigurationInvalid` detail an admin update would.
    pub fn from_seed(seed: &ScheduleSeed) -> AppResult<Self> {
        let mut violations = Vec::new();
        let locations = match validate_locations(&seed.locations) {
            Ok(set) => Some(set),
            Err(AppError::ConfigurationInvalid(list)) => {
                violations.extend(list);
                None
            }
            Err(other) => return Err(other),
        };
        let primary = ScheduleConfig::from_seed(ServiceKind::Primary, &seed.primary)
            .map_err(|list| violations.extend(list.into_iter().map(|m| format!("primary: {m}"))))
            .ok();
        let secondary = ScheduleConfig::from_seed(ServiceKind::Secondary, &seed.secondary)
            .map_err(|list| violations.extend(list.into_iter().map(|m| format!("secondary: {m}"))))
            .ok();
        match (locations, primary, secondary) {
            (Some(locations), Some(primary), Some(secondary)) if violations.is_empty() => {
                Ok(Self {
                    locations,
                    primary,
                    secondary,
                })
            }
            _ => Err(AppError::ConfigurationInvalid(violations)),
        }
    }

    pub fn service(&self, kind: ServiceKind) -> &ScheduleConfig {
        match kind {
            ServiceKind::Primary => &self.primary,
            ServiceKind::Secondary => &self.secondary,
        }
    }

    pub fn service_mut(&mut self, kind: ServiceKind) -> &mut ScheduleConfig {
        match kind {
            ServiceKind::Primary => &mut self.primary,
            ServiceKind::Secondary => &mut self.secondary,
        }
    }

    pub fn knows_location(&self, location: &LocationId) -> bool {
        self.locations.contains(location)
    }
}

/// Parses a client-supplied `YYYY-MM-DD` string. Malformed input is a
/// `DateNotAllowed` with its own reason, distinct from past/not-offered.
pub fn parse_date(raw: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::DateNotAllowed(format!("`{raw}` is not a valid calendar date")))
}

fn parse_u32(raw: &str, field: &str, violations: &mut Vec<String>) -> Option<u32> {
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            violations.push(format!("{field} must be a whole number, got `{raw}`"));
            None
        }
    }
}
