use crate::model::availability::{
    AvailabilityQuery, CabinAvailabilityResponse, OpenSlotsResponse, PrimarySlotQuery,
    SlotAvailabilityResponse,
};
use axum::{
    extract::{Query, State},
    Json,
};
use kernel::model::location::LocationId;
use kernel::model::schedule::ServiceKind;
use registry::AppRegistry;
use shared::error::AppResult;

pub async fn primary_cabin_availability(
    Query(query): Query<AvailabilityQuery>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<CabinAvailabilityResponse>> {
    let location = LocationId::new(query.location);
    registry
        .availability_service()
        .cabin_summary(&query.date, &location)
        .await
        .map(CabinAvailabilityResponse::from)
        .map(Json)
}

pub async fn primary_slot_availability(
    Query(query): Query<PrimarySlotQuery>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<SlotAvailabilityResponse>> {
    let location = LocationId::new(query.location);
    registry
        .availability_service()
        .slot_detail(
            ServiceKind::Primary,
            &query.date,
            &location,
            Some(query.cabin),
        )
        .await
        .map(SlotAvailabilityResponse::from)
        .map(Json)
}

pub async fn secondary_slot_availability(
    Query(query): Query<AvailabilityQuery>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<SlotAvailabilityResponse>> {
    let location = LocationId::new(query.location);
    registry
        .availability_service()
        .slot_detail(ServiceKind::Secondary, &query.date, &location, None)
        .await
        .map(SlotAvailabilityResponse::from)
        .map(Json)
}

pub async fn secondary_open_slots(
    Query(query): Query<AvailabilityQuery>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<OpenSlotsResponse>> {
    let location = LocationId::new(query.location);
    registry
        .availability_service()
        .open_slots(ServiceKind::Secondary, &query.date, &location, None)
        .await
        .map(OpenSlotsResponse::from)
        .map(Json)
}
