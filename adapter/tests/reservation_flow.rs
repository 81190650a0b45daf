//! End-to-end booking flows: kernel services wired to the in-memory
//! adapters, with a pinned clock so date-window checks are reproducible.

use adapter::repository::memory::InMemoryReservationRepository;
use adapter::repository::schedule::ScheduleRepositoryImpl;
use chrono::{DateTime, Local, NaiveDate};
use kernel::model::location::LocationId;
use kernel::model::reservation::event::{CreateReservation, ReservationLegs};
use kernel::model::reservation::{Guest, PrimaryLeg, SecondaryLeg};
use kernel::model::schedule::event::ScheduleUpdate;
use kernel::model::schedule::{ScheduleConfig, ScheduleState, ServiceKind};
use kernel::model::slot::SlotTime;
use kernel::repository::reservation::ReservationRepository;
use kernel::repository::schedule::ScheduleRepository;
use kernel::service::availability::AvailabilityService;
use kernel::service::reservation::ReservationService;
use kernel::service::Clock;
use shared::error::AppError;
use std::collections::BTreeMap;
use std::sync::Arc;

const TODAY: &str = "2025-08-19";

struct FixedClock(NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }

    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

struct Harness {
    reservations: ReservationService,
    availability: AvailabilityService,
    store: Arc<InMemoryReservationRepository>,
    schedule: Arc<ScheduleRepositoryImpl>,
}

fn harness(state: ScheduleState) -> Harness {
    let store = Arc::new(InMemoryReservationRepository::new());
    let schedule = Arc::new(ScheduleRepositoryImpl::new(state));
    let clock: Arc<dyn Clock> = Arc::new(FixedClock(d(TODAY)));
    Harness {
        reservations: ReservationService::new(store.clone(), schedule.clone(), clock.clone()),
        availability: AvailabilityService::new(store.clone(), schedule.clone(), clock),
        store,
        schedule,
    }
}

fn t(s: &str) -> SlotTime {
    s.parse().unwrap()
}

fn d(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

/// One cabin, one seat per slot, two primary slots (09:00, 09:15) and two
/// secondary slots (10:00, 10:30), all offered only on `TODAY`.
fn tight_state() -> ScheduleState {
    let primary = ScheduleConfig {
        open_time: t("09:00"),
        close_time: t("09:30"),
        slot_duration_minutes: 15,
        cabin_count: 1,
        people_per_cabin: 1,
        allowed_dates: [d(TODAY)].into(),
    };
    let secondary = ScheduleConfig {
        open_time: t("10:00"),
        close_time: t("11:00"),
        slot_duration_minutes: 30,
        cabin_count: 1,
        people_per_cabin: 1,
        allowed_dates: [d(TODAY)].into(),
    };
    ScheduleState {
        locations: [LocationId::new("central")].into(),
        primary,
        secondary,
    }
}

fn guest(name: &str) -> Guest {
    Guest::new(
        name.into(),
        format!("{}@example.com", name.to_lowercase()),
        29,
        "female".into(),
        "090-0000-0000".into(),
    )
}

fn primary_booking(name: &str, date: &str, slot: SlotTime, cabin: u32) -> CreateReservation {
    CreateReservation::new(
        guest(name),
        LocationId::new("central"),
        ReservationLegs::Primary(PrimaryLeg {
            date: d(date),
            slot,
            cabin,
        }),
    )
}

fn secondary_booking(name: &str, slot: SlotTime) -> CreateReservation {
    CreateReservation::new(
        guest(name),
        LocationId::new("central"),
        ReservationLegs::Secondary(SecondaryLeg {
            date: d(TODAY),
            slot,
        }),
    )
}

#[tokio::test]
async fn two_guests_race_for_two_slots() -> anyhow::Result<()> {
    let h = harness(tight_state());

    h.reservations
        .submit(primary_booking("Mei", TODAY, t("09:00"), 1))
        .await?;

    // The same seat again is a capacity conflict, not a validation error.
    let err = h
        .reservations
        .submit(primary_booking("Rin", TODAY, t("09:00"), 1))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::SlotUnavailable(ref leg) if leg == "primary"));

    let location = LocationId::new("central");
    let detail = h
        .availability
        .slot_detail(ServiceKind::Primary, TODAY, &location, Some(1))
        .await?;
    assert_eq!(detail, BTreeMap::from([(t("09:00"), 0), (t("09:15"), 1)]));

    // The displaced guest takes the remaining slot.
    h.reservations
        .submit(primary_booking("Rin", TODAY, t("09:15"), 1))
        .await?;
    let open = h
        .availability
        .open_slots(ServiceKind::Primary, TODAY, &location, Some(1))
        .await?;
    assert!(open.is_empty());
    Ok(())
}

#[tokio::test]
async fn remaining_is_floored_after_a_capacity_cut() -> anyhow::Result<()> {
    let mut state = tight_state();
    state.primary.people_per_cabin = 2;
    let h = harness(state);

    h.reservations
        .submit(primary_booking("Mei", TODAY, t("09:00"), 1))
        .await?;
    h.reservations
        .submit(primary_booking("Rin", TODAY, t("09:00"), 1))
        .await?;

    // Two seats are booked; an admin then cuts capacity to one per slot.
    h.schedule
        .update_service(
            ServiceKind::Primary,
            ScheduleUpdate {
                people_per_cabin: Some(1),
                ..Default::default()
            },
        )
        .await?;

    let location = LocationId::new("central");
    let detail = h
        .availability
        .slot_detail(ServiceKind::Primary, TODAY, &location, Some(1))
        .await?;
    assert_eq!(detail.get(&t("09:00")), Some(&0));

    let summary = h.availability.cabin_summary(TODAY, &location).await?;
    assert_eq!(summary.get(&1), Some(&0));
    Ok(())
}

#[tokio::test]
async fn date_rejections_carry_distinct_reasons() -> anyhow::Result<()> {
    let h = harness(tight_state());
    let location = LocationId::new("central");

    let past = h
        .availability
        .slot_detail(ServiceKind::Primary, "2025-08-18", &location, Some(1))
        .await
        .unwrap_err();
    assert!(matches!(past, AppError::DateNotAllowed(_)));
    assert!(past.to_string().contains("in the past"));

    let unlisted = h
        .availability
        .slot_detail(ServiceKind::Primary, "2025-12-01", &location, Some(1))
        .await
        .unwrap_err();
    assert!(matches!(unlisted, AppError::DateNotAllowed(_)));
    assert!(unlisted.to_string().contains("not an offered"));

    let malformed = h
        .availability
        .slot_detail(ServiceKind::Primary, "next tuesday", &location, Some(1))
        .await
        .unwrap_err();
    assert!(matches!(malformed, AppError::DateNotAllowed(_)));
    assert!(malformed.to_string().contains("not a valid calendar date"));

    // Submissions run the same window check per leg.
    let err = h
        .reservations
        .submit(primary_booking("Mei", "2025-08-18", t("09:00"), 1))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::DateNotAllowed(_)));
    Ok(())
}

#[tokio::test]
async fn structural_problems_are_invalid_input() -> anyhow::Result<()> {
    let h = harness(tight_state());
    let location = LocationId::new("central");

    let unknown = CreateReservation::new(
        guest("Mei"),
        LocationId::new("atlantis"),
        ReservationLegs::Primary(PrimaryLeg {
            date: d(TODAY),
            slot: t("09:00"),
            cabin: 1,
        }),
    );
    let err = h.reservations.submit(unknown).await.unwrap_err();
    assert!(matches!(err, AppError::InvalidInput(_)));
    assert!(err.to_string().contains("unknown location"));

    let err = h
        .reservations
        .submit(primary_booking("Mei", TODAY, t("09:00"), 2))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("cabin 2 does not exist"));

    let err = h
        .reservations
        .submit(primary_booking("Mei", TODAY, t("09:07"), 1))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("not a bookable primary slot"));

    // Availability has shape rules of its own.
    let err = h
        .availability
        .slot_detail(ServiceKind::Primary, TODAY, &location, None)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("cabin number is required"));

    let err = h
        .availability
        .slot_detail(ServiceKind::Secondary, TODAY, &location, Some(1))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("pooled across cabins"));
    Ok(())
}

#[tokio::test]
async fn schedule_update_applies_to_the_next_request() -> anyhow::Result<()> {
    let h = harness(tight_state());

    let err = h
        .reservations
        .submit(primary_booking("Mei", "2025-08-20", t("09:00"), 1))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::DateNotAllowed(_)));

    h.schedule
        .update_service(
            ServiceKind::Primary,
            ScheduleUpdate {
                allowed_dates: Some(vec![d(TODAY), d("2025-08-20")]),
                ..Default::default()
            },
        )
        .await?;

    // No restart, no cache: the very next submission sees the new window.
    h.reservations
        .submit(primary_booking("Mei", "2025-08-20", t("09:00"), 1))
        .await?;
    Ok(())
}

#[tokio::test]
async fn both_leg_submission_is_atomic() -> anyhow::Result<()> {
    let h = harness(tight_state());

    // Fill the only pooled seat at 10:00.
    h.reservations
        .submit(secondary_booking("Mei", t("10:00")))
        .await?;

    let both = CreateReservation::new(
        guest("Rin"),
        LocationId::new("central"),
        ReservationLegs::Both {
            primary: PrimaryLeg {
                date: d(TODAY),
                slot: t("09:00"),
                cabin: 1,
            },
            secondary: SecondaryLeg {
                date: d(TODAY),
                slot: t("10:00"),
            },
        },
    );
    let err = h.reservations.submit(both).await.unwrap_err();
    assert!(matches!(err, AppError::SlotUnavailable(ref leg) if leg == "secondary"));

    // The failed request consumed nothing: the primary slot is still free.
    let location = LocationId::new("central");
    let detail = h
        .availability
        .slot_detail(ServiceKind::Primary, TODAY, &location, Some(1))
        .await?;
    assert_eq!(detail.get(&t("09:00")), Some(&1));
    assert_eq!(h.store.find_all().await?.len(), 1);

    // With a free secondary slot the same request lands as one record.
    let both = CreateReservation::new(
        guest("Rin"),
        LocationId::new("central"),
        ReservationLegs::Both {
            primary: PrimaryLeg {
                date: d(TODAY),
                slot: t("09:00"),
                cabin: 1,
            },
            secondary: SecondaryLeg {
                date: d(TODAY),
                slot: t("10:30"),
            },
        },
    );
    let id = h.reservations.submit(both).await?;
    let stored = h.store.find_by_id(id).await?.expect("stored reservation");
    assert!(stored.primary.is_some());
    assert!(stored.secondary.is_some());
    Ok(())
}

#[tokio::test]
async fn deleting_a_reservation_frees_its_seat() -> anyhow::Result<()> {
    let h = harness(tight_state());

    let id = h
        .reservations
        .submit(primary_booking("Mei", TODAY, t("09:00"), 1))
        .await?;
    assert!(h
        .reservations
        .submit(primary_booking("Rin", TODAY, t("09:00"), 1))
        .await
        .is_err());

    assert!(h.store.delete(id).await?);

    h.reservations
        .submit(primary_booking("Rin", TODAY, t("09:00"), 1))
        .await?;
    Ok(())
}

#[tokio::test]
async fn repeated_queries_are_identical() -> anyhow::Result<()> {
    let h = harness(tight_state());
    let location = LocationId::new("central");

    h.reservations
        .submit(primary_booking("Mei", TODAY, t("09:00"), 1))
        .await?;

    let first = h
        .availability
        .slot_detail(ServiceKind::Primary, TODAY, &location, Some(1))
        .await?;
    let second = h
        .availability
        .slot_detail(ServiceKind::Primary, TODAY, &location, Some(1))
        .await?;
    assert_eq!(first, second);

    let first = h.availability.cabin_summary(TODAY, &location).await?;
    let second = h.availability.cabin_summary(TODAY, &location).await?;
    assert_eq!(first, second);
    Ok(())
}
