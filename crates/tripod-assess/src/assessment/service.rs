use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::aggregation::{AggregateError, ManagerAggregate};
use super::catalog::QuestionCode;
use super::domain::{CompanyId, FormSubmission, ManagerKey, NewResponse, ResponseId};
use super::engine::AssessmentEngine;
use super::intake::{FormLabelIdentityExtractor, IdentityExtractor};
use super::report::{CompanyOverview, ManagerScorecard};
use super::repository::{AggregateStore, RepositoryError, ResponseStore, SnapshotWrite};

/// Respondent role recorded when the submission does not name one.
pub const DEFAULT_RESPONDENT_ROLE: &str = "anonymous";

/// Source of `last_updated` and fallback submission timestamps.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Always reports the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// What the caller learns about an accepted submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmissionReceipt {
    pub response_id: ResponseId,
    pub sequence: u64,
    pub company: CompanyId,
    pub manager: ManagerKey,
    pub form_id: Option<String>,
    pub answered_count: usize,
    pub missing_questions: Vec<QuestionCode>,
    pub overall_score: f64,
    pub is_complete: bool,
}

/// Freshly computed aggregate and whether the store accepted it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateRefresh {
    pub aggregate: ManagerAggregate,
    pub write: SnapshotWrite,
}

/// Counts from a company-wide re-aggregation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    pub managers: usize,
    pub created: usize,
    pub updated: usize,
    pub stale: usize,
    pub failed: usize,
}

/// Service composing the engine with response and aggregate storage.
pub struct AssessmentService<R, A> {
    responses: Arc<R>,
    aggregates: Arc<A>,
    engine: Arc<AssessmentEngine>,
    identity: Arc<dyn IdentityExtractor>,
    clock: Arc<dyn Clock>,
}

impl<R, A> AssessmentService<R, A>
where
    R: ResponseStore + 'static,
    A: AggregateStore + 'static,
{
    pub fn new(responses: Arc<R>, aggregates: Arc<A>, engine: Arc<AssessmentEngine>) -> Self {
        Self {
            responses,
            aggregates,
            engine,
            identity: Arc::new(FormLabelIdentityExtractor),
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_identity_extractor(mut self, extractor: Arc<dyn IdentityExtractor>) -> Self {
        self.identity = extractor;
        self
    }

    pub fn engine(&self) -> &AssessmentEngine {
        &self.engine
    }

    /// Scores and stores one submission. Only a missing manager name is rejected.
    pub fn submit(
        &self,
        company: &CompanyId,
        submission: FormSubmission,
    ) -> Result<SubmissionReceipt, ServiceError> {
        let identity = submission.identity(self.identity.as_ref());
        let manager = identity
            .manager_name
            .as_deref()
            .and_then(ManagerKey::from_raw)
            .ok_or(ServiceError::MissingManagerName)?;

        let scored = self
            .engine
            .scorer()
            .score_batch(&submission.answers, &identity);

        let respondent_role = submission
            .respondent_role
            .as_deref()
            .map(str::trim)
            .filter(|role| !role.is_empty())
            .unwrap_or(DEFAULT_RESPONDENT_ROLE)
            .to_string();

        let record = self.responses.insert(NewResponse {
            company: company.clone(),
            manager: manager.clone(),
            raw_manager_name: identity
                .raw_manager_name
                .unwrap_or_else(|| manager.as_str().to_string()),
            reporting_to: identity.reporting_to,
            raw_reporting_to: identity.raw_reporting_to,
            respondent_role,
            form_id: submission
                .form_id
                .map(|id| id.trim().to_string())
                .filter(|id| !id.is_empty()),
            submitted_at: submission.submitted_at.unwrap_or_else(|| self.clock.now()),
            scored,
        })?;

        debug!(
            company = %company,
            manager = %manager,
            response = %record.id.0,
            answered = record.scored.answered_count,
            "stored assessment response"
        );

        Ok(SubmissionReceipt {
            response_id: record.id,
            sequence: record.sequence,
            company: record.company,
            manager: record.manager,
            form_id: record.form_id,
            answered_count: record.scored.answered_count,
            missing_questions: record.scored.missing_questions,
            overall_score: record.scored.overall_score,
            is_complete: record.scored.is_complete,
        })
    }

    /// Recomputes a manager's aggregate from every stored response and writes it back.
    pub fn refresh(
        &self,
        company: &CompanyId,
        manager: &ManagerKey,
    ) -> Result<AggregateRefresh, ServiceError> {
        let responses = self.responses.responses_for(company, manager)?;
        if responses.is_empty() {
            return Err(ServiceError::ManagerNotFound {
                company: company.clone(),
                manager: manager.clone(),
            });
        }

        let aggregate =
            self.engine
                .aggregator()
                .aggregate(company, manager, &responses, self.clock.now())?;
        let write = self.aggregates.replace(aggregate.clone())?;

        match write {
            SnapshotWrite::Written { .. } => info!(
                company = %company,
                manager = %manager,
                revision = aggregate.revision,
                assessments = aggregate.total_assessments,
                "aggregate written"
            ),
            SnapshotWrite::Stale { current_revision } => warn!(
                company = %company,
                manager = %manager,
                revision = aggregate.revision,
                current_revision,
                "skipped stale aggregate"
            ),
        }

        Ok(AggregateRefresh { aggregate, write })
    }

    /// Current stored snapshot.
    ///
    /// A manager with responses but no snapshot yet is `NotAggregated`, not `ManagerNotFound`.
    pub fn aggregate(
        &self,
        company: &CompanyId,
        manager: &ManagerKey,
    ) -> Result<ManagerAggregate, ServiceError> {
        if let Some(aggregate) = self.aggregates.fetch(company, manager)? {
            return Ok(aggregate);
        }

        let pending = self.responses.responses_for(company, manager)?.len();
        if pending == 0 {
            Err(ServiceError::ManagerNotFound {
                company: company.clone(),
                manager: manager.clone(),
            })
        } else {
            Err(ServiceError::NotAggregated {
                company: company.clone(),
                manager: manager.clone(),
                responses: pending,
            })
        }
    }

    /// Re-aggregates every manager with responses in the company.
    pub fn sweep(&self, company: &CompanyId) -> Result<SweepReport, ServiceError> {
        let managers = self.responses.managers(company)?;
        let mut report = SweepReport {
            managers: managers.len(),
            ..SweepReport::default()
        };

        for manager in &managers {
            match self.refresh(company, manager) {
                Ok(refresh) => match refresh.write {
                    SnapshotWrite::Written {
                        previous_revision: None,
                    } => report.created += 1,
                    SnapshotWrite::Written { .. } => report.updated += 1,
                    SnapshotWrite::Stale { .. } => report.stale += 1,
                },
                Err(err) => {
                    warn!(
                        company = %company,
                        manager = %manager,
                        error = %err,
                        "sweep failed for manager"
                    );
                    report.failed += 1;
                }
            }
        }

        info!(
            company = %company,
            managers = report.managers,
            created = report.created,
            updated = report.updated,
            stale = report.stale,
            failed = report.failed,
            "aggregation sweep finished"
        );
        Ok(report)
    }

    pub fn scorecard(
        &self,
        company: &CompanyId,
        manager: &ManagerKey,
    ) -> Result<ManagerScorecard, ServiceError> {
        let aggregate = self.aggregate(company, manager)?;
        Ok(ManagerScorecard::from_aggregate(
            &aggregate,
            self.engine.remarks(),
        ))
    }

    pub fn company_overview(&self, company: &CompanyId) -> Result<CompanyOverview, ServiceError> {
        let aggregates = self.aggregates.list(company)?;
        Ok(CompanyOverview::from_aggregates(company.clone(), &aggregates))
    }
}

/// Error raised by the assessment service.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("submission does not name a manager")]
    MissingManagerName,
    #[error("no assessments found for manager '{manager}' in company '{company}'")]
    ManagerNotFound {
        company: CompanyId,
        manager: ManagerKey,
    },
    #[error(
        "manager '{manager}' in company '{company}' has {responses} responses \
         but no aggregate yet"
    )]
    NotAggregated {
        company: CompanyId,
        manager: ManagerKey,
        responses: usize,
    },
    #[error(transparent)]
    Aggregate(#[from] AggregateError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl ServiceError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ManagerNotFound { .. })
    }
}
