use crate::model::schedule::{event::ScheduleUpdate, ScheduleState, ServiceKind};
use async_trait::async_trait;
use shared::error::AppResult;
use std::sync::Arc;

#[async_trait]
pub trait ScheduleRepository: Send + Sync {
    // Schedule currently in effect. Callers take one snapshot per
    // operation instead of caching it.
    async fn snapshot(&self) -> AppResult<Arc<ScheduleState>>;
    // Validates and applies a per-service update. The old config stays in
    // effect when validation fails.
    async fn update_service(&self, kind: ServiceKind, update: ScheduleUpdate) -> AppResult<()>;
    // Replaces the location list after validating it.
    async fn update_locations(&self, names: Vec<String>) -> AppResult<()>;
}
