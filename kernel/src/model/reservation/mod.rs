use crate::model::id::ReservationId;
use crate::model::location::LocationId;
use crate::model::slot::SlotTime;
use chrono::{DateTime, Local, NaiveDate};
use derive_new::new;

pub mod event;

/// A committed booking. At least one leg is present; a record with neither
/// is never constructed.
#[derive(Debug, Clone)]
pub struct Reservation {
    pub reservation_id: ReservationId,
    pub guest: Guest,
    pub location: LocationId,
    pub primary: Option<PrimaryLeg>,
    pub secondary: Option<SecondaryLeg>,
    pub created_at: DateTime<Local>,
}

/// Contact details captured with every booking.
#[derive(Debug, Clone, new)]
pub struct Guest {
    pub name: String,
    pub email: String,
    pub age: i32,
    pub gender: String,
    pub phone: String,
}

/// Primary-service leg: one seat in a numbered cabin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrimaryLeg {
    pub date: NaiveDate,
    pub slot: SlotTime,
    pub cabin: u32,
}

/// Secondary-service leg: one seat out of the pooled cabin capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SecondaryLeg {
    pub date: NaiveDate,
    pub slot: SlotTime,
}
