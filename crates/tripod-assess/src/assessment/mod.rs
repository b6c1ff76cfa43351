//! Scoring and aggregation engine for three-dimension (trusting, tasking, tending) manager
//! assessments.
//!
//! Data flows leaf-first: raw form answers are resolved against the [`QuestionCatalog`] at the
//! intake boundary, scored once by the [`ResponseScorer`], stored, and then folded per manager by
//! the [`ManagerAggregator`] whenever a new response arrives. The [`AggregationDispatcher`]
//! serializes those recomputes per manager.

pub mod aggregation;
pub mod catalog;
pub mod dispatcher;
pub mod domain;
pub mod engine;
pub mod intake;
pub mod memory;
pub mod normalizer;
pub mod remarks;
pub mod report;
pub mod repository;
pub mod scoring;
pub mod service;

#[cfg(test)]
mod tests;

pub use aggregation::{
    AggregateError, AssessmentSummary, DenominatorPolicy, ManagerAggregate, ManagerAggregator,
    ScoreDistribution, ScoringConfig, UnknownDenominatorPolicy, DEFAULT_CONFIDENCE_STEP,
    MAX_CONFIDENCE,
};
pub use catalog::{
    AnswerOption, Category, Polarity, Question, QuestionCatalog, QuestionCode, Subcategory,
    MAX_CATEGORY_SCORE, MAX_SCORE_PER_QUESTION, MAX_SUBCATEGORY_SCORE, TOTAL_QUESTIONS,
};
pub use dispatcher::{AggregationDispatcher, AggregationTicket, DispatchError, DispatchOutcome};
pub use domain::{CompanyId, FormSubmission, ManagerKey, NewResponse, ResponseId, ResponseRecord};
pub use engine::AssessmentEngine;
pub use intake::{
    extract_question_code, parse_export, parse_export_rows, AnswerSheet, ExportRow,
    FormLabelIdentityExtractor, IdentityExtractor, IntakeError, RawAnswer, RawAnswerBatch,
    SubmissionIdentity,
};
pub use memory::InMemoryAssessmentStore;
pub use normalizer::normalize_name;
pub use remarks::{Band, Classification, RemarkEntry, RemarkTable};
pub use report::{CompanyOverview, ManagerScorecard};
pub use repository::{AggregateStore, RepositoryError, ResponseStore, SnapshotWrite};
pub use scoring::{QuestionScore, ResponseScorer, ScoredResponse, ScoringSchema, SCHEMA_VERSION};
pub use service::{
    AggregateRefresh, AssessmentService, Clock, FixedClock, ServiceError, SubmissionReceipt,
    SweepReport, SystemClock, DEFAULT_RESPONDENT_ROLE,
};
