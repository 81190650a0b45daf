use crate::{
    extractor::AdminUser,
    model::reservation::{
        CreateReservationRequest, CreatedReservationResponse, ReservationResponse,
        ReservationsResponse,
    },
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use garde::Validate;
use kernel::model::{id::ReservationId, reservation::event::CreateReservation};
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

pub async fn submit_reservation(
    State(registry): State<AppRegistry>,
    Json(req): Json<CreateReservationRequest>,
) -> AppResult<(StatusCode, Json<CreatedReservationResponse>)> {
    req.validate(&())?;
    let event = CreateReservation::try_from(req)?;
    let reservation_id = registry.reservation_service().submit(event).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreatedReservationResponse { reservation_id }),
    ))
}

pub async fn show_reservation(
    Path(reservation_id): Path<ReservationId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<ReservationResponse>> {
    registry
        .reservation_repository()
        .find_by_id(reservation_id)
        .await
        .and_then(|reservation| match reservation {
            Some(reservation) => Ok(Json(reservation.into())),
            None => Err(AppError::EntityNotFound(format!(
                "reservation {reservation_id} was not found"
            ))),
        })
}

pub async fn show_reservation_list(
    _user: AdminUser,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<ReservationsResponse>> {
    registry
        .reservation_repository()
        .find_all()
        .await
        .map(ReservationsResponse::from)
        .map(Json)
}

pub async fn delete_reservation(
    _user: AdminUser,
    Path(reservation_id): Path<ReservationId>,
    State(registry): State<AppRegistry>,
) -> AppResult<StatusCode> {
    let deleted = registry
        .reservation_repository()
        .delete(reservation_id)
        .await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::EntityNotFound(format!(
            "reservation {reservation_id} was not found"
        )))
    }
}
