mod rules;

pub(crate) use rules::{round1, round2};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

use super::catalog::{
    AnswerOption, Category, Polarity, QuestionCatalog, QuestionCode, Subcategory,
    MAX_SCORE_PER_QUESTION, TOTAL_QUESTIONS,
};
use super::intake::{AnswerSheet, RawAnswerBatch, SubmissionIdentity};

/// Version tag stored alongside every scored response.
pub const SCHEMA_VERSION: &str = "TRIPOD_v1";

/// Converts one resolved answer sheet into totals and completeness metadata.
///
/// The scorer never fails: unknown codes were already dropped at the intake boundary, and an
/// empty sheet yields an all-zero, incomplete response.
#[derive(Debug, Clone)]
pub struct ResponseScorer {
    catalog: Arc<QuestionCatalog>,
}

impl ResponseScorer {
    pub fn new(catalog: Arc<QuestionCatalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &QuestionCatalog {
        &self.catalog
    }

    pub fn score(&self, sheet: &AnswerSheet, identity: &SubmissionIdentity) -> ScoredResponse {
        let tally = rules::tally(&self.catalog, sheet);
        let missing_questions = self
            .catalog
            .codes()
            .filter(|code| !tally.answers.contains_key(code))
            .collect();
        let answered_count = tally.answers.len();
        let is_complete = answered_count == TOTAL_QUESTIONS && identity.is_complete();

        ScoredResponse {
            schema: ScoringSchema::default(),
            overall_score: rules::overall_percentage(tally.total),
            total_score: tally.total,
            answers: tally.answers,
            category_totals: tally.category_totals,
            subcategory_totals: tally.subcategory_totals,
            answered_count,
            missing_questions,
            is_complete,
        }
    }

    /// Resolves a raw batch against the catalog, then scores it.
    pub fn score_batch(
        &self,
        batch: &RawAnswerBatch,
        identity: &SubmissionIdentity,
    ) -> ScoredResponse {
        self.score(&batch.resolve(&self.catalog), identity)
    }
}

/// Marker describing the scale the stored numbers were produced under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringSchema {
    pub version: String,
    pub max_per_question: u32,
    pub total_questions: usize,
}

impl Default for ScoringSchema {
    fn default() -> Self {
        Self {
            version: SCHEMA_VERSION.to_string(),
            max_per_question: MAX_SCORE_PER_QUESTION,
            total_questions: TOTAL_QUESTIONS,
        }
    }
}

/// Audit detail for one answered question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionScore {
    pub option: AnswerOption,
    pub score: u32,
    pub polarity: Polarity,
    pub category: Category,
    pub subcategory: Subcategory,
}

/// One respondent's scored answers. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredResponse {
    pub schema: ScoringSchema,
    /// Only questions that were actually answered.
    pub answers: BTreeMap<QuestionCode, QuestionScore>,
    pub category_totals: BTreeMap<Category, u32>,
    pub subcategory_totals: BTreeMap<Subcategory, u32>,
    pub total_score: u32,
    /// Percentage of the 108-mark maximum, 2 decimals.
    pub overall_score: f64,
    pub answered_count: usize,
    pub missing_questions: Vec<QuestionCode>,
    pub is_complete: bool,
}

impl ScoredResponse {
    pub fn category_total(&self, category: Category) -> u32 {
        self.category_totals.get(&category).copied().unwrap_or(0)
    }

    pub fn subcategory_total(&self, subcategory: Subcategory) -> u32 {
        self.subcategory_totals
            .get(&subcategory)
            .copied()
            .unwrap_or(0)
    }

    /// At least one of the subcategory's questions was answered.
    pub fn answered_subcategory(&self, subcategory: Subcategory) -> bool {
        self.answers
            .values()
            .any(|detail| detail.subcategory == subcategory)
    }

    pub fn is_empty(&self) -> bool {
        self.answered_count == 0
    }
}
