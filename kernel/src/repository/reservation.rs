use crate::model::{
    id::ReservationId,
    location::LocationId,
    reservation::{event::CommitReservation, Reservation},
    schedule::ServiceKind,
    slot::SlotTime,
};
use async_trait::async_trait;
use chrono::NaiveDate;
use derive_new::new;
use shared::error::AppResult;

/// Criteria for counting committed legs of one service on one day.
/// `None` fields match anything; a secondary filter never names a cabin.
#[derive(Debug, Clone, new)]
pub struct ReservationFilter {
    pub kind: ServiceKind,
    pub location: LocationId,
    pub date: NaiveDate,
    pub slot: Option<SlotTime>,
    pub cabin: Option<u32>,
}

#[async_trait]
pub trait ReservationRepository: Send + Sync {
    // Re-checks every leg against live counts and inserts the record.
    // All legs succeed or nothing is written.
    async fn commit(&self, event: CommitReservation) -> AppResult<ReservationId>;
    // Number of committed legs matching the filter.
    async fn count_matching(&self, filter: ReservationFilter) -> AppResult<u32>;
    async fn find_by_id(&self, reservation_id: ReservationId) -> AppResult<Option<Reservation>>;
    // Every reservation, newest first.
    async fn find_all(&self) -> AppResult<Vec<Reservation>>;
    // Frees the reservation's capacity. False when the id is unknown.
    async fn delete(&self, reservation_id: ReservationId) -> AppResult<bool>;
}
