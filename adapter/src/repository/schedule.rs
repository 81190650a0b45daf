use async_trait::async_trait;
use kernel::model::location::validate_locations;
use kernel::model::schedule::{event::ScheduleUpdate, ScheduleState, ServiceKind};
use kernel::repository::schedule::ScheduleRepository;
use shared::error::AppResult;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Holds the schedule currently in effect and swaps it atomically on
/// update. Validation runs before the swap, so a rejected update leaves
/// the old schedule untouched and readers never observe a half-applied
/// one.
pub struct ScheduleRepositoryImpl {
    state: RwLock<Arc<ScheduleState>>,
}

impl ScheduleRepositoryImpl {
    pub fn new(initial: ScheduleState) -> Self {
        Self {
            state: RwLock::new(Arc::new(initial)),
        }
    }
}

#[async_trait]
impl ScheduleRepository for ScheduleRepositoryImpl {
    async fn snapshot(&self) -> AppResult<Arc<ScheduleState>> {
        Ok(Arc::clone(&*self.state.read().await))
    }

    async fn update_service(&self, kind: ServiceKind, update: ScheduleUpdate) -> AppResult<()> {
        let mut guard = self.state.write().await;
        let merged = guard.service(kind).apply(kind, update)?;
        let mut next = (**guard).clone();
        *next.service_mut(kind) = merged;
        *guard = Arc::new(next);
        tracing::info!(service = %kind, "schedule updated");
        Ok(())
    }

    async fn update_locations(&self, names: Vec<String>) -> AppResult<()> {
        let locations = validate_locations(&names)?;
        let mut guard = self.state.write().await;
        let mut next = (**guard).clone();
        next.locations = locations;
        *guard = Arc::new(next);
        tracing::info!("location list updated");
        Ok(())
    }
}
