use std::sync::Arc;

use adapter::database::ConnectionPool;
use adapter::repository::health::HealthCheckRepositoryImpl;
use adapter::repository::memory::{InMemoryHealthCheckRepository, InMemoryReservationRepository};
use adapter::repository::reservation::ReservationRepositoryImpl;
use adapter::repository::schedule::ScheduleRepositoryImpl;
use kernel::model::schedule::ScheduleState;
use kernel::repository::health::HealthCheckRepository;
use kernel::repository::reservation::ReservationRepository;
use kernel::repository::schedule::ScheduleRepository;
use kernel::service::availability::AvailabilityService;
use kernel::service::reservation::ReservationService;
use kernel::service::{Clock, SystemClock};
use shared::config::AppConfig;

/// Wires concrete repositories to the kernel traits and hands out the
/// services built on them.
#[derive(Clone)]
pub struct AppRegistry {
    reservation_repository: Arc<dyn ReservationRepository>,
    schedule_repository: Arc<dyn ScheduleRepository>,
    health_check_repository: Arc<dyn HealthCheckRepository>,
    clock: Arc<dyn Clock>,
    admin_token: Arc<String>,
}

impl AppRegistry {
    /// Postgres-backed wiring.
    pub fn new(pool: ConnectionPool, schedule: ScheduleState, app_config: &AppConfig) -> Self {
        Self::build(
            Arc::new(ReservationRepositoryImpl::new(pool.clone())),
            Arc::new(HealthCheckRepositoryImpl::new(pool)),
            schedule,
            app_config,
        )
    }

    /// Process-local wiring for development and tests.
    pub fn in_memory(schedule: ScheduleState, app_config: &AppConfig) -> Self {
        Self::build(
            Arc::new(InMemoryReservationRepository::new()),
            Arc::new(InMemoryHealthCheckRepository::new()),
            schedule,
            app_config,
        )
    }

    fn build(
        reservation_repository: Arc<dyn ReservationRepository>,
        health_check_repository: Arc<dyn HealthCheckRepository>,
        schedule: ScheduleState,
        app_config: &AppConfig,
    ) -> Self {
        Self {
            reservation_repository,
            schedule_repository: Arc::new(ScheduleRepositoryImpl::new(schedule)),
            health_check_repository,
            clock: Arc::new(SystemClock),
            admin_token: Arc::new(app_config.auth.admin_token.clone()),
        }
    }

    pub fn reservation_repository(&self) -> Arc<dyn ReservationRepository> {
        self.reservation_repository.clone()
    }

    pub fn schedule_repository(&self) -> Arc<dyn ScheduleRepository> {
        self.schedule_repository.clone()
    }

    pub fn health_check_repository(&self) -> Arc<dyn HealthCheckRepository> {
        self.health_check_repository.clone()
    }

    pub fn reservation_service(&self) -> ReservationService {
        ReservationService::new(
            self.reservation_repository.clone(),
            self.schedule_repository.clone(),
            self.clock.clone(),
        )
    }

    pub fn availability_service(&self) -> AvailabilityService {
        AvailabilityService::new(
            self.reservation_repository.clone(),
            self.schedule_repository.clone(),
            self.clock.clone(),
        )
    }

    pub fn admin_token(&self) -> &str {
        &self.admin_token
    }
}
