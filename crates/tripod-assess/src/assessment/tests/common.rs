use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};

use crate::assessment::aggregation::ManagerAggregate;
use crate::assessment::catalog::{AnswerOption, Category, QuestionCatalog};
use crate::assessment::domain::{
    CompanyId, FormSubmission, ManagerKey, NewResponse, ResponseId, ResponseRecord,
};
use crate::assessment::engine::AssessmentEngine;
use crate::assessment::intake::{RawAnswerBatch, SubmissionIdentity};
use crate::assessment::memory::InMemoryAssessmentStore;
use crate::assessment::repository::{
    AggregateStore, RepositoryError, ResponseStore, SnapshotWrite,
};
use crate::assessment::scoring::{ResponseScorer, ScoredResponse};
use crate::assessment::service::{AssessmentService, FixedClock};

pub(super) type MemoryService = AssessmentService<InMemoryAssessmentStore, InMemoryAssessmentStore>;

pub(super) fn company() -> CompanyId {
    CompanyId("acme".to_string())
}

pub(super) fn manager(name: &str) -> ManagerKey {
    ManagerKey::from_raw(name).expect("non-empty manager name")
}

pub(super) fn at(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, day, hour, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn clock_time() -> DateTime<Utc> {
    at(28, 12)
}

/// Form-style labels with the best-scoring option for every question in `categories`.
pub(super) fn best_answers(categories: &[Category]) -> RawAnswerBatch {
    answers_where(categories, |best| best)
}

/// Every question in `categories` answered with the same option.
pub(super) fn uniform_answers(categories: &[Category], option: AnswerOption) -> RawAnswerBatch {
    answers_where(categories, |_| option)
}

fn answers_where(
    categories: &[Category],
    choose: impl Fn(AnswerOption) -> AnswerOption,
) -> RawAnswerBatch {
    let catalog = QuestionCatalog::standard();
    catalog
        .questions()
        .iter()
        .filter(|question| categories.contains(&question.category))
        .map(|question| {
            let label = format!("{} | {}", question.code, question.text);
            let option = choose(question.polarity.best_option());
            (label, option.label())
        })
        .collect()
}

pub(super) fn submission(
    manager: &str,
    reporting_to: Option<&str>,
    answers: RawAnswerBatch,
    submitted_at: DateTime<Utc>,
) -> FormSubmission {
    FormSubmission {
        submitted_at: Some(submitted_at),
        manager_name: Some(manager.to_string()),
        reporting_to: reporting_to.map(str::to_string),
        answers,
        ..FormSubmission::default()
    }
}

pub(super) fn scorer() -> ResponseScorer {
    ResponseScorer::new(Arc::new(QuestionCatalog::standard()))
}

pub(super) fn scored(answers: &RawAnswerBatch) -> ScoredResponse {
    let identity = SubmissionIdentity::new(Some("Dana White"), Some("Sam Lee"));
    scorer().score_batch(answers, &identity)
}

/// Stored-response fixture for driving the aggregator directly.
pub(super) fn record(
    sequence: u64,
    name: &str,
    reporting_to: Option<&str>,
    answers: &RawAnswerBatch,
    submitted_at: DateTime<Utc>,
) -> ResponseRecord {
    ResponseRecord::from_new(
        ResponseId(format!("resp-{sequence:06}")),
        sequence,
        NewResponse {
            company: company(),
            manager: manager(name),
            raw_manager_name: name.to_string(),
            reporting_to: reporting_to.map(str::to_string),
            raw_reporting_to: reporting_to.map(str::to_string),
            respondent_role: "peer".to_string(),
            form_id: None,
            submitted_at,
            scored: scored(answers),
        },
    )
}

pub(super) fn build_service() -> (MemoryService, Arc<InMemoryAssessmentStore>) {
    let store = Arc::new(InMemoryAssessmentStore::new());
    let service = AssessmentService::new(
        store.clone(),
        store.clone(),
        Arc::new(AssessmentEngine::default()),
    )
    .with_clock(Arc::new(FixedClock(clock_time())));
    (service, store)
}

pub(super) struct UnavailableStore;

impl ResponseStore for UnavailableStore {
    fn insert(&self, _response: NewResponse) -> Result<ResponseRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn responses_for(
        &self,
        _company: &CompanyId,
        _manager: &ManagerKey,
    ) -> Result<Vec<ResponseRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn managers(&self, _company: &CompanyId) -> Result<Vec<ManagerKey>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

impl AggregateStore for UnavailableStore {
    fn fetch(
        &self,
        _company: &CompanyId,
        _manager: &ManagerKey,
    ) -> Result<Option<ManagerAggregate>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list(&self, _company: &CompanyId) -> Result<Vec<ManagerAggregate>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn replace(&self, _aggregate: ManagerAggregate) -> Result<SnapshotWrite, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

/// Aggregate store that already holds a snapshot newer than anything the service computes.
pub(super) struct AheadAggregates;

impl AggregateStore for AheadAggregates {
    fn fetch(
        &self,
        _company: &CompanyId,
        _manager: &ManagerKey,
    ) -> Result<Option<ManagerAggregate>, RepositoryError> {
        Ok(None)
    }

    fn list(&self, _company: &CompanyId) -> Result<Vec<ManagerAggregate>, RepositoryError> {
        Ok(Vec::new())
    }

    fn replace(&self, _aggregate: ManagerAggregate) -> Result<SnapshotWrite, RepositoryError> {
        Ok(SnapshotWrite::Stale {
            current_revision: u64::MAX,
        })
    }
}
