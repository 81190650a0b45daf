pub mod availability;
pub mod reservation;

use crate::model::location::LocationId;
use crate::model::schedule::ScheduleState;
use chrono::{DateTime, Local, NaiveDate};
use shared::error::{AppError, AppResult};

/// Source of the current date and time. Injected so tests can pin the
/// calendar instead of racing the wall clock.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
    fn now(&self) -> DateTime<Local>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

pub(crate) fn ensure_location(state: &ScheduleState, location: &LocationId) -> AppResult<()> {
    if state.knows_location(location) {
        Ok(())
    } else {
        Err(AppError::InvalidInput(format!(
            "unknown location: {location}"
        )))
    }
}
