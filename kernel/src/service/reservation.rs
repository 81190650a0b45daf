use crate::model::id::ReservationId;
use crate::model::reservation::event::{
    CommitReservation, CreateReservation, PrimaryCommit, SecondaryCommit,
};
use crate::model::schedule::ServiceKind;
use crate::repository::reservation::ReservationRepository;
use crate::repository::schedule::ScheduleRepository;
use crate::service::{ensure_location, Clock};
use derive_new::new;
use shared::error::{AppError, AppResult};
use std::sync::Arc;

/// Booking coordinator.
///
/// Validates a request against one schedule snapshot (location, date
/// window, cabin range, slot grid), then hands the store an atomic commit
/// carrying the capacities read from that same snapshot. The store is the
/// only place live counts are compared, inside its critical section.
#[derive(Clone, new)]
pub struct ReservationService {
    reservation_repository: Arc<dyn ReservationRepository>,
    schedule_repository: Arc<dyn ScheduleRepository>,
    clock: Arc<dyn Clock>,
}

impl ReservationService {
    pub async fn submit(&self, event: CreateReservation) -> AppResult<ReservationId> {
        let state = self.schedule_repository.snapshot().await?;
        ensure_location(&state, &event.location)?;
        let today = self.clock.today();

        let primary = match event.legs.primary() {
            Some(leg) => {
                let config = state.service(ServiceKind::Primary);
                config.check_date(ServiceKind::Primary, leg.date, today)?;
                if !config.has_cabin(leg.cabin) {
                    return Err(AppError::InvalidInput(format!(
                        "cabin {} does not exist; cabins run 1 to {}",
                        leg.cabin, config.cabin_count
                    )));
                }
                if !config.has_slot(leg.slot) {
                    return Err(AppError::InvalidInput(format!(
                        "{} is not a bookable primary slot",
                        leg.slot
                    )));
                }
                Some(PrimaryCommit::new(
                    *leg,
                    config.slot_capacity(ServiceKind::Primary),
                ))
            }
            None => None,
        };

        let secondary = match event.legs.secondary() {
            Some(leg) => {
                let config = state.service(ServiceKind::Secondary);
                config.check_date(ServiceKind::Secondary, leg.date, today)?;
                if !config.has_slot(leg.slot) {
                    return Err(AppError::InvalidInput(format!(
                        "{} is not a bookable secondary slot",
                        leg.slot
                    )));
                }
                Some(SecondaryCommit::new(
                    *leg,
                    config.slot_capacity(ServiceKind::Secondary),
                ))
            }
            None => None,
        };

        let location = event.location.clone();
        let commit = CommitReservation::new(
            event.guest,
            event.location,
            primary,
            secondary,
            self.clock.now(),
        );
        let reservation_id = self.reservation_repository.commit(commit).await?;
        tracing::info!(%reservation_id, %location, "reservation committed");
        Ok(reservation_id)
    }
}
