use chrono::{DateTime, Local, NaiveDate};
use garde::Validate;
use kernel::model::{
    id::ReservationId,
    location::LocationId,
    reservation::{
        event::{CreateReservation, ReservationLegs},
        Guest, PrimaryLeg, Reservation, SecondaryLeg,
    },
    schedule::parse_date,
    slot::SlotTime,
};
use serde::{Deserialize, Serialize};
use shared::error::AppError;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateReservationRequest {
    #[garde(length(min = 1, max = 100))]
    pub name: String,
    #[garde(email)]
    pub email: String,
    #[garde(range(min = 0, max = 120))]
    pub age: i32,
    #[garde(length(min = 1, max = 20))]
    pub gender: String,
    #[garde(length(min = 1, max = 30))]
    pub phone: String,
    #[garde(length(min = 1))]
    pub location: String,
    #[garde(skip)]
    pub primary: Option<PrimaryLegRequest>,
    #[garde(skip)]
    pub secondary: Option<SecondaryLegRequest>,
}

/// Dates are kept as raw strings so a malformed one surfaces as a
/// date-window rejection rather than a body-parse failure.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrimaryLegRequest {
    pub date: String,
    pub slot: SlotTime,
    pub cabin: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecondaryLegRequest {
    pub date: String,
    pub slot: SlotTime,
}

impl TryFrom<CreateReservationRequest> for CreateReservation {
    type Error = AppError;

    fn try_from(value: CreateReservationRequest) -> Result<Self, Self::Error> {
        let CreateReservationRequest {
            name,
            email,
            age,
            gender,
            phone,
            location,
            primary,
            secondary,
        } = value;
        let primary = match primary {
            Some(leg) => Some(PrimaryLeg {
                date: parse_date(&leg.date)?,
                slot: leg.slot,
                cabin: leg.cabin,
            }),
            None => None,
        };
        let secondary = match secondary {
            Some(leg) => Some(SecondaryLeg {
                date: parse_date(&leg.date)?,
                slot: leg.slot,
            }),
            None => None,
        };
        let legs = ReservationLegs::from_parts(primary, secondary).ok_or_else(|| {
            AppError::InvalidInput(
                "at least one of primary or secondary must be requested".to_string(),
            )
        })?;
        Ok(CreateReservation::new(
            Guest::new(name, email, age, gender, phone),
            LocationId::new(location),
            legs,
        ))
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedReservationResponse {
    pub reservation_id: ReservationId,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationsResponse {
    pub items: Vec<ReservationResponse>,
}

impl From<Vec<Reservation>> for ReservationsResponse {
    fn from(value: Vec<Reservation>) -> Self {
        Self {
            items: value.into_iter().map(ReservationResponse::from).collect(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationResponse {
    pub reservation_id: ReservationId,
    pub name: String,
    pub email: String,
    pub age: i32,
    pub gender: String,
    pub phone: String,
    pub location: LocationId,
    pub primary: Option<PrimaryLegResponse>,
    pub secondary: Option<SecondaryLegResponse>,
    pub created_at: DateTime<Local>,
}

impl From<Reservation> for ReservationResponse {
    fn from(value: Reservation) -> Self {
        let Reservation {
            reservation_id,
            guest,
            location,
            primary,
            secondary,
            created_at,
        } = value;
        let Guest {
            name,
            email,
            age,
            gender,
            phone,
        } = guest;
        Self {
            reservation_id,
            name,
            email,
            age,
            gender,
            phone,
            location,
            primary: primary.map(PrimaryLegResponse::from),
            secondary: secondary.map(SecondaryLegResponse::from),
            created_at,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrimaryLegResponse {
    pub date: NaiveDate,
    pub slot: SlotTime,
    pub cabin: u32,
}

impl From<PrimaryLeg> for PrimaryLegResponse {
    fn from(value: PrimaryLeg) -> Self {
        let PrimaryLeg { date, slot, cabin } = value;
        Self { date, slot, cabin }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SecondaryLegResponse {
    pub date: NaiveDate,
    pub slot: SlotTime,
}

impl From<SecondaryLeg> for SecondaryLegResponse {
    fn from(value: SecondaryLeg) -> Self {
        let SecondaryLeg { date, slot } = value;
        Self { date, slot }
    }
}
