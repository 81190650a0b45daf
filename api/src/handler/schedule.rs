use crate::{
    extractor::AdminUser,
    model::schedule::{ScheduleStateResponse, UpdateLocationsRequest, UpdateScheduleRequest},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use kernel::model::schedule::ServiceKind;
use registry::AppRegistry;
use shared::error::AppResult;

pub async fn show_schedule(
    _user: AdminUser,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<ScheduleStateResponse>> {
    let snapshot = registry.schedule_repository().snapshot().await?;
    Ok(Json(ScheduleStateResponse::from(snapshot.as_ref())))
}

pub async fn update_service_schedule(
    _user: AdminUser,
    Path(kind): Path<ServiceKind>,
    State(registry): State<AppRegistry>,
    Json(req): Json<UpdateScheduleRequest>,
) -> AppResult<StatusCode> {
    registry
        .schedule_repository()
        .update_service(kind, req.into())
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn update_locations(
    _user: AdminUser,
    State(registry): State<AppRegistry>,
    Json(req): Json<UpdateLocationsRequest>,
) -> AppResult<StatusCode> {
    registry
        .schedule_repository()
        .update_locations(req.locations)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
