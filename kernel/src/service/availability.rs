use crate::model::location::LocationId;
use crate::model::schedule::{parse_date, ScheduleConfig, ServiceKind};
use crate::model::slot::SlotTime;
use crate::repository::reservation::{ReservationFilter, ReservationRepository};
use crate::repository::schedule::ScheduleRepository;
use crate::service::{ensure_location, Clock};
use chrono::NaiveDate;
use derive_new::new;
use shared::error::{AppError, AppResult};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Read-side availability queries.
///
/// Every call takes a fresh schedule snapshot, so an admin update is
/// visible to the very next request. Remaining counts are floored at zero:
/// bookings that outlive a capacity cut never produce negative numbers.
#[derive(Clone, new)]
pub struct AvailabilityService {
    reservation_repository: Arc<dyn ReservationRepository>,
    schedule_repository: Arc<dyn ScheduleRepository>,
    clock: Arc<dyn Clock>,
}

impl AvailabilityService {
    /// Remaining whole-day seats per primary cabin, keyed by cabin number.
    pub async fn cabin_summary(
        &self,
        date: &str,
        location: &LocationId,
    ) -> AppResult<BTreeMap<u32, u32>> {
        let state = self.schedule_repository.snapshot().await?;
        ensure_location(&state, location)?;
        let config = state.service(ServiceKind::Primary);
        let date = self.checked_date(config, ServiceKind::Primary, date)?;
        let ceiling = config.cabin_capacity();
        let mut summary = BTreeMap::new();
        for cabin in 1..=config.cabin_count {
            let booked = self
                .reservation_repository
                .count_matching(ReservationFilter::new(
                    ServiceKind::Primary,
                    location.clone(),
                    date,
                    None,
                    Some(cabin),
                ))
                .await?;
            summary.insert(cabin, ceiling.saturating_sub(booked));
        }
        Ok(summary)
    }

    /// Remaining seats per slot, keyed by slot start. Primary is asked per
    /// cabin; secondary pools all cabins and takes no cabin argument.
    pub async fn slot_detail(
        &self,
        kind: ServiceKind,
        date: &str,
        location: &LocationId,
        cabin: Option<u32>,
    ) -> AppResult<BTreeMap<SlotTime, u32>> {
        let state = self.schedule_repository.snapshot().await?;
        ensure_location(&state, location)?;
        let config = state.service(kind);
        match (kind, cabin) {
            (ServiceKind::Primary, None) => {
                return Err(AppError::InvalidInput(
                    "a cabin number is required for primary availability".to_string(),
                ))
            }
            (ServiceKind::Primary, Some(cabin)) if !config.has_cabin(cabin) => {
                return Err(AppError::InvalidInput(format!(
                    "cabin {cabin} does not exist; cabins run 1 to {}",
                    config.cabin_count
                )))
            }
            (ServiceKind::Secondary, Some(_)) => {
                return Err(AppError::InvalidInput(
                    "secondary availability is pooled across cabins and takes no cabin"
                        .to_string(),
                ))
            }
            _ => {}
        }
        let date = self.checked_date(config, kind, date)?;
        let capacity = config.slot_capacity(kind);
        let mut detail = BTreeMap::new();
        for slot in config.slots() {
            let booked = self
                .reservation_repository
                .count_matching(ReservationFilter::new(
                    kind,
                    location.clone(),
                    date,
                    Some(slot),
                    cabin,
                ))
                .await?;
            detail.insert(slot, capacity.saturating_sub(booked));
        }
        Ok(detail)
    }

    /// Slots with at least one seat left, in clock order.
    pub async fn open_slots(
        &self,
        kind: ServiceKind,
        date: &str,
        location: &LocationId,
        cabin: Option<u32>,
    ) -> AppResult<Vec<SlotTime>> {
        let detail = self.slot_detail(kind, date, location, cabin).await?;
        Ok(detail
            .into_iter()
            .filter(|(_, remaining)| *remaining > 0)
            .map(|(slot, _)| slot)
            .collect())
    }

    fn checked_date(
        &self,
        config: &ScheduleConfig,
        kind: ServiceKind,
        raw: &str,
    ) -> AppResult<NaiveDate> {
        let date = parse_date(raw)?;
        config.check_date(kind, date, self.clock.today())?;
        Ok(date)
    }
}
