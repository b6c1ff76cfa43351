use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Mutex, MutexGuard};

use super::aggregation::ManagerAggregate;
use super::domain::{CompanyId, ManagerKey, NewResponse, ResponseId, ResponseRecord};
use super::repository::{AggregateStore, RepositoryError, ResponseStore, SnapshotWrite};

type IdentityKey = (CompanyId, ManagerKey);

#[derive(Debug, Default)]
struct StoreState {
    last_sequence: u64,
    responses: BTreeMap<IdentityKey, Vec<ResponseRecord>>,
    aggregates: BTreeMap<IdentityKey, ManagerAggregate>,
}

/// Process-local response and aggregate store.
#[derive(Debug, Default)]
pub struct InMemoryAssessmentStore {
    state: Mutex<StoreState>,
}

impl InMemoryAssessmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn response_count(&self) -> Result<usize, RepositoryError> {
        let state = self.lock()?;
        Ok(state.responses.values().map(Vec::len).sum())
    }

    fn lock(&self) -> Result<MutexGuard<'_, StoreState>, RepositoryError> {
        self.state
            .lock()
            .map_err(|_| RepositoryError::Unavailable("store mutex poisoned".to_string()))
    }
}

impl ResponseStore for InMemoryAssessmentStore {
    fn insert(&self, response: NewResponse) -> Result<ResponseRecord, RepositoryError> {
        let mut state = self.lock()?;
        state.last_sequence += 1;
        let sequence = state.last_sequence;
        let id = ResponseId(format!("resp-{sequence:06}"));
        let record = ResponseRecord::from_new(id, sequence, response);

        let bucket = state
            .responses
            .entry((record.company.clone(), record.manager.clone()))
            .or_default();
        let position = bucket.partition_point(|existing| {
            (existing.submitted_at, existing.sequence) <= (record.submitted_at, record.sequence)
        });
        bucket.insert(position, record.clone());

        Ok(record)
    }

    fn responses_for(
        &self,
        company: &CompanyId,
        manager: &ManagerKey,
    ) -> Result<Vec<ResponseRecord>, RepositoryError> {
        let state = self.lock()?;
        Ok(state
            .responses
            .get(&(company.clone(), manager.clone()))
            .cloned()
            .unwrap_or_default())
    }

    fn managers(&self, company: &CompanyId) -> Result<Vec<ManagerKey>, RepositoryError> {
        let state = self.lock()?;
        let managers: BTreeSet<ManagerKey> = state
            .responses
            .keys()
            .filter(|(owner, _)| owner == company)
            .map(|(_, manager)| manager.clone())
            .collect();
        Ok(managers.into_iter().collect())
    }
}

impl AggregateStore for InMemoryAssessmentStore {
    fn fetch(
        &self,
        company: &CompanyId,
        manager: &ManagerKey,
    ) -> Result<Option<ManagerAggregate>, RepositoryError> {
        let state = self.lock()?;
        Ok(state
            .aggregates
            .get(&(company.clone(), manager.clone()))
            .cloned())
    }

    fn list(&self, company: &CompanyId) -> Result<Vec<ManagerAggregate>, RepositoryError> {
        let state = self.lock()?;
        Ok(state
            .aggregates
            .iter()
            .filter(|((owner, _), _)| owner == company)
            .map(|(_, aggregate)| aggregate.clone())
            .collect())
    }

    fn replace(&self, aggregate: ManagerAggregate) -> Result<SnapshotWrite, RepositoryError> {
        let mut state = self.lock()?;
        let key = (aggregate.company.clone(), aggregate.manager.clone());

        let previous_revision = state.aggregates.get(&key).map(|current| current.revision);
        if let Some(current_revision) = previous_revision {
            if current_revision > aggregate.revision {
                return Ok(SnapshotWrite::Stale { current_revision });
            }
        }

        state.aggregates.insert(key, aggregate);
        Ok(SnapshotWrite::Written { previous_revision })
    }
}
