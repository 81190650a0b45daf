use crate::model::location::LocationId;
use crate::model::reservation::{Guest, PrimaryLeg, SecondaryLeg};
use chrono::{DateTime, Local};
use derive_new::new;

/// A booking request as submitted by a guest, before any schedule checks.
#[derive(Debug, new)]
pub struct CreateReservation {
    pub guest: Guest,
    pub location: LocationId,
    pub legs: ReservationLegs,
}

/// Which legs the guest asked for. The shape makes a zero-leg request
/// unrepresentable.
#[derive(Debug, Clone, Copy)]
pub enum ReservationLegs {
    Primary(PrimaryLeg),
    Secondary(SecondaryLeg),
    Both {
        primary: PrimaryLeg,
        secondary: SecondaryLeg,
    },
}

impl ReservationLegs {
    pub fn from_parts(primary: Option<PrimaryLeg>, secondary: Option<SecondaryLeg>) -> Option<Self> {
        match (primary, secondary) {
            (Some(primary), Some(secondary)) => Some(Self::Both { primary, secondary }),
            (Some(primary), None) => Some(Self::Primary(primary)),
            (None, Some(secondary)) => Some(Self::Secondary(secondary)),
            (None, None) => None,
        }
    }

    pub fn primary(&self) -> Option<&PrimaryLeg> {
        match self {
            Self::Primary(leg) | Self::Both { primary: leg, .. } => Some(leg),
            Self::Secondary(_) => None,
        }
    }

    pub fn secondary(&self) -> Option<&SecondaryLeg> {
        match self {
            Self::Secondary(leg) | Self::Both { secondary: leg, .. } => Some(leg),
            Self::Primary(_) => None,
        }
    }
}

/// A validated request handed to the store. Capacities were read from the
/// same schedule snapshot the legs were checked against; the store compares
/// live counts to them inside its commit critical section.
#[derive(Debug, new)]
pub struct CommitReservation {
    pub guest: Guest,
    pub location: LocationId,
    pub primary: Option<PrimaryCommit>,
    pub secondary: Option<SecondaryCommit>,
    pub created_at: DateTime<Local>,
}

#[derive(Debug, Clone, Copy, new)]
pub struct PrimaryCommit {
    pub leg: PrimaryLeg,
    pub slot_capacity: u32,
}

#[derive(Debug, Clone, Copy, new)]
pub struct SecondaryCommit {
    pub leg: SecondaryLeg,
    pub slot_capacity: u32,
}
