//! Driving ports (API - Inbound)

use crate::domain::{Conflict, Resolution, ResolutionMethod, ResolutionStatistics};
use async_trait::async_trait;

/// Primary conflict resolution API.
///
/// Resolution never fails: invalid conflicts and failing strategies come
/// back as escalation resolutions.
#[async_trait]
pub trait ConflictResolutionApi: Send + Sync {
    /// Resolve with an automatically selected method.
    async fn resolve_conflict(&self, conflict: Conflict) -> Resolution;

    /// Resolve with an explicitly chosen method.
    async fn resolve_conflict_with(
        &self,
        conflict: Conflict,
        method: ResolutionMethod,
    ) -> Resolution;

    /// Aggregates over the retained history.
    async fn statistics(&self) -> ResolutionStatistics;

    /// Retained resolutions, oldest first.
    async fn history(&self) -> Vec<Resolution>;
}
