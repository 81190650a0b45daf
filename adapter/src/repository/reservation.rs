use crate::database::{model::reservation::ReservationRow, ConnectionPool};
use async_trait::async_trait;
use derive_new::new;
use kernel::model::id::ReservationId;
use kernel::model::reservation::{event::CommitReservation, Reservation};
use kernel::model::schedule::ServiceKind;
use kernel::repository::reservation::{ReservationFilter, ReservationRepository};
use shared::error::{AppError, AppResult};

#[derive(new)]
pub struct ReservationRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl ReservationRepository for ReservationRepositoryImpl {
    // Commits a booking after re-checking every leg inside a single
    // SERIALIZABLE transaction. Early returns drop the transaction and
    // roll it back, so a failed leg never leaves partial rows behind.
    async fn commit(&self, event: CommitReservation) -> AppResult<ReservationId> {
        let mut tx = self.db.begin().await?;

        self.set_transaction_serializable(&mut tx).await?;

        // Leg checks run in a fixed order: primary first, then secondary.
        if let Some(primary) = &event.primary {
            let booked: i64 = sqlx::query_scalar(
                r#"
                SELECT COUNT(*) FROM reservations
                WHERE location = $1
                  AND primary_date = $2
                  AND primary_slot = $3
                  AND primary_cabin = $4
                "#,
            )
            .bind(&event.location)
            .bind(primary.leg.date)
            .bind(primary.leg.slot)
            .bind(primary.leg.cabin as i32)
            .fetch_one(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?;

            if booked >= i64::from(primary.slot_capacity) {
                return Err(AppError::SlotUnavailable(ServiceKind::Primary.to_string()));
            }
        }

        if let Some(secondary) = &event.secondary {
            let booked: i64 = sqlx::query_scalar(
                r#"
                SELECT COUNT(*) FROM reservations
                WHERE location = $1
                  AND secondary_date = $2
                  AND secondary_slot = $3
                "#,
            )
            .bind(&event.location)
            .bind(secondary.leg.date)
            .bind(secondary.leg.slot)
            .fetch_one(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?;

            if booked >= i64::from(secondary.slot_capacity) {
                return Err(AppError::SlotUnavailable(
                    ServiceKind::Secondary.to_string(),
                ));
            }
        }

        let reservation_id = ReservationId::new();
        let res = sqlx::query(
            r#"
            INSERT INTO reservations
            (reservation_id, name, email, age, gender, phone, location,
             primary_date, primary_slot, primary_cabin,
             secondary_date, secondary_slot, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(reservation_id)
        .bind(&event.guest.name)
        .bind(&event.guest.email)
        .bind(event.guest.age)
        .bind(&event.guest.gender)
        .bind(&event.guest.phone)
        .bind(&event.location)
        .bind(event.primary.map(|p| p.leg.date))
        .bind(event.primary.map(|p| p.leg.slot))
        .bind(event.primary.map(|p| p.leg.cabin as i32))
        .bind(event.secondary.map(|s| s.leg.date))
        .bind(event.secondary.map(|s| s.leg.slot))
        .bind(event.created_at)
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "no reservation record has been created".into(),
            ));
        }

        tx.commit().await.map_err(AppError::TransactionError)?;

        Ok(reservation_id)
    }

    async fn count_matching(&self, filter: ReservationFilter) -> AppResult<u32> {
        let booked: i64 = match filter.kind {
            ServiceKind::Primary => {
                sqlx::query_scalar(
                    r#"
                    SELECT COUNT(*) FROM reservations
                    WHERE location = $1
                      AND primary_date = $2
                      AND ($3::time IS NULL OR primary_slot = $3)
                      AND ($4::int IS NULL OR primary_cabin = $4)
                    "#,
                )
                .bind(&filter.location)
                .bind(filter.date)
                .bind(filter.slot)
                .bind(filter.cabin.map(|c| c as i32))
                .fetch_one(self.db.inner_ref())
                .await
            }
            ServiceKind::Secondary => {
                sqlx::query_scalar(
                    r#"
                    SELECT COUNT(*) FROM reservations
                    WHERE location = $1
                      AND secondary_date = $2
                      AND ($3::time IS NULL OR secondary_slot = $3)
                    "#,
                )
                .bind(&filter.location)
                .bind(filter.date)
                .bind(filter.slot)
                .fetch_one(self.db.inner_ref())
                .await
            }
        }
        .map_err(AppError::SpecificOperationError)?;

        Ok(booked.max(0) as u32)
    }

    async fn find_by_id(&self, reservation_id: ReservationId) -> AppResult<Option<Reservation>> {
        let row: Option<ReservationRow> = sqlx::query_as(
            r#"
            SELECT reservation_id, name, email, age, gender, phone, location,
                   primary_date, primary_slot, primary_cabin,
                   secondary_date, secondary_slot, created_at
            FROM reservations
            WHERE reservation_id = $1
            "#,
        )
        .bind(reservation_id)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(row.map(Reservation::from))
    }

    async fn find_all(&self) -> AppResult<Vec<Reservation>> {
        sqlx::query_as::<_, ReservationRow>(
            r#"
            SELECT reservation_id, name, email, age, gender, phone, location,
                   primary_date, primary_slot, primary_cabin,
                   secondary_date, secondary_slot, created_at
            FROM reservations
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(self.db.inner_ref())
        .await
        .map(|rows| rows.into_iter().map(Reservation::from).collect())
        .map_err(AppError::SpecificOperationError)
    }

    async fn delete(&self, reservation_id: ReservationId) -> AppResult<bool> {
        let res = sqlx::query("DELETE FROM reservations WHERE reservation_id = $1")
            .bind(reservation_id)
            .execute(self.db.inner_ref())
            .await
            .map_err(AppError::SpecificOperationError)?;

        Ok(res.rows_affected() > 0)
    }
}

impl ReservationRepositoryImpl {
    // Raises the isolation level for the commit transaction. Two commits
    // racing for the last seat then serialize or abort instead of both
    // passing the count check.
    async fn set_transaction_serializable(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    ) -> AppResult<()> {
        sqlx::query("SET TRANSACTION ISOLATION LEVEL SERIALIZABLE")
            .execute(&mut **tx)
            .await
            .map_err(AppError::SpecificOperationError)?;
        Ok(())
    }
}
