pub mod id;
pub mod location;
pub mod reservation;
pub mod schedule;
pub mod slot;
