use serde::Serialize;

use super::aggregation::ManagerAggregate;
use super::domain::{CompanyId, ManagerKey, NewResponse, ResponseRecord};

/// Append-only storage of scored responses.
pub trait ResponseStore: Send + Sync {
    /// Persists a response, assigning its id and a strictly increasing sequence.
    fn insert(&self, response: NewResponse) -> Result<ResponseRecord, RepositoryError>;
    /// All responses for one manager, ordered by `(submitted_at, sequence)`.
    fn responses_for(
        &self,
        company: &CompanyId,
        manager: &ManagerKey,
    ) -> Result<Vec<ResponseRecord>, RepositoryError>;
    /// Every manager with at least one response in the company.
    fn managers(&self, company: &CompanyId) -> Result<Vec<ManagerKey>, RepositoryError>;
}

/// Snapshot storage for computed aggregates.
pub trait AggregateStore: Send + Sync {
    fn fetch(
        &self,
        company: &CompanyId,
        manager: &ManagerKey,
    ) -> Result<Option<ManagerAggregate>, RepositoryError>;
    fn list(&self, company: &CompanyId) -> Result<Vec<ManagerAggregate>, RepositoryError>;
    /// Compare-and-swap on `revision`: an older snapshot never replaces a newer one.
    fn replace(&self, aggregate: ManagerAggregate) -> Result<SnapshotWrite, RepositoryError>;
}

/// Outcome of [`AggregateStore::replace`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SnapshotWrite {
    Written { previous_revision: Option<u64> },
    Stale { current_revision: u64 },
}

impl SnapshotWrite {
    pub fn is_written(self) -> bool {
        matches!(self, Self::Written { .. })
    }
}

/// Error enumeration for storage failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
