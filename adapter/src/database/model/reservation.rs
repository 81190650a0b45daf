use chrono::{DateTime, Local, NaiveDate};
use kernel::model::{
    id::ReservationId,
    location::LocationId,
    reservation::{Guest, PrimaryLeg, Reservation, SecondaryLeg},
    slot::SlotTime,
};

// Flat table shape of a reservation. Leg columns are nullable; a leg
// exists only when all of its columns are non-NULL.
#[derive(Debug, sqlx::FromRow)]
pub struct ReservationRow {
    pub reservation_id: ReservationId,
    pub name: String,
    pub email: String,
    pub age: i32,
    pub gender: String,
    pub phone: String,
    pub location: LocationId,
    pub primary_date: Option<NaiveDate>,
    pub primary_slot: Option<SlotTime>,
    pub primary_cabin: Option<i32>,
    pub secondary_date: Option<NaiveDate>,
    pub secondary_slot: Option<SlotTime>,
    pub created_at: DateTime<Local>,
}

impl From<ReservationRow> for Reservation {
    fn from(value: ReservationRow) -> Self {
        let ReservationRow {
            reservation_id,
            name,
            email,
            age,
            gender,
            phone,
            location,
            primary_date,
            primary_slot,
            primary_cabin,
            secondary_date,
            secondary_slot,
            created_at,
        } = value;
        let primary = match (primary_date, primary_slot, primary_cabin) {
            (Some(date), Some(slot), Some(cabin)) => Some(PrimaryLeg {
                date,
                slot,
                cabin: cabin.max(0) as u32,
            }),
            _ => None,
        };
        let secondary = match (secondary_date, secondary_slot) {
            (Some(date), Some(slot)) => Some(SecondaryLeg { date, slot }),
            _ => None,
        };
        Reservation {
            reservation_id,
            guest: Guest {
                name,
                email,
                age,
                gender,
                phone,
            },
            location,
            primary,
            secondary,
            created_at,
        }
    }
}
