use async_trait::async_trait;
use kernel::model::id::ReservationId;
use kernel::model::reservation::{event::CommitReservation, Reservation};
use kernel::model::schedule::ServiceKind;
use kernel::repository::health::HealthCheckRepository;
use kernel::repository::reservation::{ReservationFilter, ReservationRepository};
use shared::error::{AppError, AppResult};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Reservation store backed by a process-local map. Used for development
/// and tests; state is lost on restart.
///
/// The write lock is the commit critical section: counts are re-read and
/// the record inserted under one exclusive guard, so concurrent commits
/// cannot both take the last seat.
#[derive(Default)]
pub struct InMemoryReservationRepository {
    table: RwLock<HashMap<ReservationId, Reservation>>,
}

impl InMemoryReservationRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ReservationRepository for InMemoryReservationRepository {
    async fn commit(&self, event: CommitReservation) -> AppResult<ReservationId> {
        let mut table = self.table.write().await;

        // Leg checks run in a fixed order: primary first, then secondary.
        if let Some(primary) = &event.primary {
            let filter = ReservationFilter::new(
                ServiceKind::Primary,
                event.location.clone(),
                primary.leg.date,
                Some(primary.leg.slot),
                Some(primary.leg.cabin),
            );
            if count_in(&table, &filter) >= primary.slot_capacity {
                return Err(AppError::SlotUnavailable(ServiceKind::Primary.to_string()));
            }
        }
        if let Some(secondary) = &event.secondary {
            let filter = ReservationFilter::new(
                ServiceKind::Secondary,
                event.location.clone(),
                secondary.leg.date,
                Some(secondary.leg.slot),
                None,
            );
            if count_in(&table, &filter) >= secondary.slot_capacity {
                return Err(AppError::SlotUnavailable(
                    ServiceKind::Secondary.to_string(),
                ));
            }
        }

        let reservation_id = ReservationId::new();
        table.insert(
            reservation_id,
            Reservation {
                reservation_id,
                guest: event.guest,
                location: event.location,
                primary: event.primary.map(|p| p.leg),
                secondary: event.secondary.map(|s| s.leg),
                created_at: event.created_at,
            },
        );
        Ok(reservation_id)
    }

    async fn count_matching(&self, filter: ReservationFilter) -> AppResult<u32> {
        let table = self.table.read().await;
        Ok(count_in(&table, &filter))
    }

    async fn find_by_id(&self, reservation_id: ReservationId) -> AppResult<Option<Reservation>> {
        Ok(self.table.read().await.get(&reservation_id).cloned())
    }

    async fn find_all(&self) -> AppResult<Vec<Reservation>> {
        let table = self.table.read().await;
        let mut all: Vec<Reservation> = table.values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(all)
    }

    async fn delete(&self, reservation_id: ReservationId) -> AppResult<bool> {
        Ok(self.table.write().await.remove(&reservation_id).is_some())
    }
}

fn count_in(table: &HashMap<ReservationId, Reservation>, filter: &ReservationFilter) -> u32 {
    let matched = table.values().filter(|r| matches(r, filter)).count();
    u32::try_from(matched).unwrap_or(u32::MAX)
}

fn matches(reservation: &Reservation, filter: &ReservationFilter) -> bool {
    if reservation.location != filter.location {
        return false;
    }
    match filter.kind {
        ServiceKind::Primary => reservation.primary.is_some_and(|leg| {
            leg.date == filter.date
                && filter.slot.map_or(true, |slot| leg.slot == slot)
                && filter.cabin.map_or(true, |cabin| leg.cabin == cabin)
        }),
        ServiceKind::Secondary => reservation.secondary.is_some_and(|leg| {
            leg.date == filter.date && filter.slot.map_or(true, |slot| leg.slot == slot)
        }),
    }
}

/// Health probe for the in-memory backend. There is no external storage
/// to reach, so it always reports healthy.
#[derive(Debug, Default)]
pub struct InMemoryHealthCheckRepository;

impl InMemoryHealthCheckRepository {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl HealthCheckRepository for InMemoryHealthCheckRepository {
    async fn check_db(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, NaiveDate};
    use kernel::model::location::LocationId;
    use kernel::model::reservation::event::{PrimaryCommit, SecondaryCommit};
    use kernel::model::reservation::{Guest, PrimaryLeg, SecondaryLeg};
    use kernel::model::slot::SlotTime;
    use std::sync::Arc;

    fn guest() -> Guest {
        Guest::new(
            "Mei Sato".into(),
            "mei@example.com".into(),
            31,
            "female".into(),
            "090-1234-5678".into(),
        )
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 9, 1).unwrap()
    }

    fn slot(hour: u32, minute: u32) -> SlotTime {
        SlotTime::from_hm(hour, minute).unwrap()
    }

    fn primary_commit(cabin: u32, capacity: u32, at: SlotTime) -> CommitReservation {
        CommitReservation::new(
            guest(),
            LocationId::new("central"),
            Some(PrimaryCommit::new(
                PrimaryLeg {
                    date: date(),
                    slot: at,
                    cabin,
                },
                capacity,
            )),
            None,
            Local::now(),
        )
    }

    fn secondary_commit(capacity: u32, at: SlotTime) -> CommitReservation {
        CommitReservation::new(
            guest(),
            LocationId::new("central"),
            None,
            Some(SecondaryCommit::new(
                SecondaryLeg {
                    date: date(),
                    slot: at,
                },
                capacity,
            )),
            Local::now(),
        )
    }

    #[tokio::test]
    async fn commit_and_read_back() -> anyhow::Result<()> {
        let repo = InMemoryReservationRepository::new();
        let id = repo.commit(primary_commit(1, 4, slot(9, 0))).await?;

        let found = repo.find_by_id(id).await?.expect("reservation should exist");
        assert_eq!(found.guest.name, "Mei Sato");
        assert_eq!(found.primary.map(|leg| leg.cabin), Some(1));
        assert!(found.secondary.is_none());

        assert!(repo.find_by_id(ReservationId::new()).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn slot_capacity_is_enforced_per_cabin_and_slot() -> anyhow::Result<()> {
        let repo = InMemoryReservationRepository::new();
        repo.commit(primary_commit(1, 1, slot(9, 0))).await?;

        let err = repo
            .commit(primary_commit(1, 1, slot(9, 0)))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::SlotUnavailable(ref leg) if leg == "primary"));

        // The next slot of the same cabin is unaffected.
        assert!(repo.commit(primary_commit(1, 1, slot(9, 15))).await.is_ok());
        // The same slot of another cabin is unaffected.
        assert!(repo.commit(primary_commit(2, 1, slot(9, 0))).await.is_ok());
        Ok(())
    }

    #[tokio::test]
    async fn secondary_capacity_pools_across_cabins() -> anyhow::Result<()> {
        let repo = InMemoryReservationRepository::new();
        repo.commit(secondary_commit(2, slot(10, 0))).await?;
        repo.commit(secondary_commit(2, slot(10, 0))).await?;

        let err = repo
            .commit(secondary_commit(2, slot(10, 0)))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::SlotUnavailable(ref leg) if leg == "secondary"));
        Ok(())
    }

    #[tokio::test]
    async fn failed_multi_leg_commit_writes_nothing() -> anyhow::Result<()> {
        let repo = InMemoryReservationRepository::new();
        // Fill the only secondary seat.
        repo.commit(secondary_commit(1, slot(10, 0))).await?;

        // Primary has room, secondary does not: the whole request fails.
        let both = CommitReservation::new(
            guest(),
            LocationId::new("central"),
            Some(PrimaryCommit::new(
                PrimaryLeg {
                    date: date(),
                    slot: slot(9, 0),
                    cabin: 1,
                },
                4,
            )),
            Some(SecondaryCommit::new(
                SecondaryLeg {
                    date: date(),
                    slot: slot(10, 0),
                },
                1,
            )),
            Local::now(),
        );
        let err = repo.commit(both).await.unwrap_err();
        assert!(matches!(err, AppError::SlotUnavailable(ref leg) if leg == "secondary"));

        // The primary seat was not consumed by the failed attempt.
        let filter = ReservationFilter::new(
            ServiceKind::Primary,
            LocationId::new("central"),
            date(),
            Some(slot(9, 0)),
            Some(1),
        );
        assert_eq!(repo.count_matching(filter).await?, 0);
        assert_eq!(repo.find_all().await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn counts_are_partitioned_by_location() -> anyhow::Result<()> {
        let repo = InMemoryReservationRepository::new();
        repo.commit(primary_commit(1, 4, slot(9, 0))).await?;

        let here = ReservationFilter::new(
            ServiceKind::Primary,
            LocationId::new("central"),
            date(),
            Some(slot(9, 0)),
            Some(1),
        );
        let elsewhere = ReservationFilter::new(
            ServiceKind::Primary,
            LocationId::new("north"),
            date(),
            Some(slot(9, 0)),
            Some(1),
        );
        assert_eq!(repo.count_matching(here).await?, 1);
        assert_eq!(repo.count_matching(elsewhere).await?, 0);
        Ok(())
    }

    #[tokio::test]
    async fn delete_frees_the_seat() -> anyhow::Result<()> {
        let repo = InMemoryReservationRepository::new();
        let id = repo.commit(primary_commit(1, 1, slot(9, 0))).await?;
        assert!(repo.commit(primary_commit(1, 1, slot(9, 0))).await.is_err());

        assert!(repo.delete(id).await?);
        assert!(!repo.delete(id).await?);

        assert!(repo.commit(primary_commit(1, 1, slot(9, 0))).await.is_ok());
        Ok(())
    }

    #[tokio::test]
    async fn find_all_lists_newest_first() -> anyhow::Result<()> {
        let repo = InMemoryReservationRepository::new();
        let mut early = primary_commit(1, 4, slot(9, 0));
        early.created_at = Local::now() - chrono::Duration::minutes(5);
        let early_id = repo.commit(early).await?;
        let late_id = repo.commit(primary_commit(2, 4, slot(9, 0))).await?;

        let all = repo.find_all().await?;
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].reservation_id, late_id);
        assert_eq!(all[1].reservation_id, early_id);
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn concurrent_commits_never_oversubscribe() -> anyhow::Result<()> {
        let repo = Arc::new(InMemoryReservationRepository::new());
        let capacity = 3_u32;
        let attempts = 40;

        let mut handles = Vec::new();
        for _ in 0..attempts {
            let repo = Arc::clone(&repo);
            handles.push(tokio::spawn(async move {
                repo.commit(primary_commit(1, capacity, slot(9, 0))).await
            }));
        }

        let mut successes = 0;
        let mut conflicts = 0;
        for result in futures::future::join_all(handles).await {
            match result? {
                Ok(_) => successes += 1,
                Err(AppError::SlotUnavailable(_)) => conflicts += 1,
                Err(other) => panic!("unexpected error: {other}"),
            }
        }
        assert_eq!(successes, 3);
        assert_eq!(conflicts, 37);

        let filter = ReservationFilter::new(
            ServiceKind::Primary,
            LocationId::new("central"),
            date(),
            Some(slot(9, 0)),
            Some(1),
        );
        assert_eq!(repo.count_matching(filter).await?, 3);
        Ok(())
    }
}
