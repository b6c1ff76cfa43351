//! Full-recompute folding of a manager's scored responses into one snapshot.
//!
//! Subcategory averages are computed first and every category average is rebuilt from them, so
//! `category = sum of its four subcategories` holds for every snapshot this module produces.

mod config;
mod statistics;

pub use config::{
    DenominatorPolicy, ScoringConfig, UnknownDenominatorPolicy, DEFAULT_CONFIDENCE_STEP,
    MAX_CONFIDENCE,
};
pub use statistics::ScoreDistribution;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::catalog::{Category, Subcategory};
use super::domain::{CompanyId, ManagerKey, ResponseId, ResponseRecord};
use super::remarks::{RemarkEntry, RemarkTable};
use super::scoring::round2;

/// Per-response line kept on the aggregate for drill-down views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentSummary {
    pub response_id: ResponseId,
    pub sequence: u64,
    pub submitted_at: DateTime<Utc>,
    pub respondent_role: String,
    #[serde(default)]
    pub form_id: Option<String>,
    pub category_scores: BTreeMap<Category, u32>,
    pub subcategory_scores: BTreeMap<Subcategory, u32>,
    pub overall_score: f64,
    pub answered_count: usize,
    pub is_complete: bool,
}

/// Current summary state of one manager within one company.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManagerAggregate {
    pub company: CompanyId,
    pub manager: ManagerKey,
    pub raw_manager_name: String,
    pub reporting_to: Option<String>,
    pub raw_reporting_to: Option<String>,
    pub total_assessments: usize,
    pub complete_assessments: usize,
    /// 0-36 marks, each the sum of the category's four subcategory averages.
    pub category_averages: BTreeMap<Category, f64>,
    /// 0-9 marks.
    pub subcategory_averages: BTreeMap<Subcategory, f64>,
    pub category_totals: BTreeMap<Category, u64>,
    pub subcategory_totals: BTreeMap<Subcategory, u64>,
    pub score_distribution: BTreeMap<Category, ScoreDistribution>,
    pub confidence_score: u32,
    pub first_assessment: DateTime<Utc>,
    pub last_assessment: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
    /// Highest response sequence folded into this snapshot.
    pub revision: u64,
    pub denominator_policy: DenominatorPolicy,
    pub remark_context: Vec<RemarkEntry>,
    pub assessment_summaries: Vec<AssessmentSummary>,
}

impl ManagerAggregate {
    pub fn category_average(&self, category: Category) -> f64 {
        self.category_averages.get(&category).copied().unwrap_or(0.0)
    }

    pub fn subcategory_average(&self, subcategory: Subcategory) -> f64 {
        self.subcategory_averages
            .get(&subcategory)
            .copied()
            .unwrap_or(0.0)
    }

    /// Checks `category == round2(sum of subcategory averages)` for every category.
    pub fn category_identity_holds(&self) -> bool {
        Category::ordered().into_iter().all(|category| {
            let rebuilt = round2(
                category
                    .subcategories()
                    .iter()
                    .map(|subcategory| self.subcategory_average(*subcategory))
                    .sum(),
            );
            (self.category_average(category) - rebuilt).abs() < 1e-9
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AggregateError {
    #[error("no responses recorded for manager '{manager}' in company '{company}'")]
    NoResponses {
        company: CompanyId,
        manager: ManagerKey,
    },
    #[error("response {response} belongs to '{found}', not the manager being aggregated")]
    ForeignResponse { response: String, found: String },
}

/// Pure aggregator: same responses and timestamp in, same snapshot out.
#[derive(Debug, Clone, Default)]
pub struct ManagerAggregator {
    config: ScoringConfig,
    remarks: RemarkTable,
}

impl ManagerAggregator {
    pub fn new(config: ScoringConfig, remarks: RemarkTable) -> Self {
        Self { config, remarks }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn aggregate(
        &self,
        company: &CompanyId,
        manager: &ManagerKey,
        responses: &[ResponseRecord],
        computed_at: DateTime<Utc>,
    ) -> Result<ManagerAggregate, AggregateError> {
        if let Some(foreign) = responses
            .iter()
            .find(|response| &response.company != company || &response.manager != manager)
        {
            return Err(AggregateError::ForeignResponse {
                response: foreign.id.0.clone(),
                found: format!("{}/{}", foreign.company, foreign.manager),
            });
        }

        let mut ordered: Vec<&ResponseRecord> = responses.iter().collect();
        ordered.sort_by(|a, b| {
            a.submitted_at
                .cmp(&b.submitted_at)
                .then(a.sequence.cmp(&b.sequence))
        });

        let (Some(first), Some(latest)) = (ordered.first(), ordered.last()) else {
            return Err(AggregateError::NoResponses {
                company: company.clone(),
                manager: manager.clone(),
            });
        };

        let total_assessments = ordered.len();
        let subcategory_totals = self.subcategory_totals(&ordered);
        let subcategory_averages = self.subcategory_averages(&ordered, &subcategory_totals);
        let category_averages = category_averages(&subcategory_averages);

        let category_totals = Category::ordered()
            .into_iter()
            .map(|category| {
                let total = ordered
                    .iter()
                    .map(|response| u64::from(response.scored.category_total(category)))
                    .sum();
                (category, total)
            })
            .collect();

        let score_distribution = Category::ordered()
            .into_iter()
            .map(|category| {
                let samples: Vec<f64> = ordered
                    .iter()
                    .map(|response| f64::from(response.scored.category_total(category)))
                    .collect();
                (category, ScoreDistribution::from_samples(&samples))
            })
            .collect();

        let assessment_summaries = ordered.iter().map(|response| summarize(response)).collect();
        let remark_context = self.remarks.remark_context(&subcategory_averages);

        let aggregate = ManagerAggregate {
            company: company.clone(),
            manager: manager.clone(),
            raw_manager_name: latest.raw_manager_name.clone(),
            reporting_to: latest.reporting_to.clone(),
            raw_reporting_to: latest.raw_reporting_to.clone(),
            total_assessments,
            complete_assessments: ordered
                .iter()
                .filter(|response| response.scored.is_complete)
                .count(),
            category_averages,
            subcategory_averages,
            category_totals,
            subcategory_totals,
            score_distribution,
            confidence_score: self.config.confidence(total_assessments),
            first_assessment: first.submitted_at,
            last_assessment: latest.submitted_at,
            last_updated: computed_at,
            revision: ordered
                .iter()
                .map(|response| response.sequence)
                .max()
                .unwrap_or_default(),
            denominator_policy: self.config.denominator,
            remark_context,
            assessment_summaries,
        };

        debug_assert!(
            aggregate.category_identity_holds(),
            "category averages drifted from their subcategories"
        );

        Ok(aggregate)
    }

    fn subcategory_totals(&self, responses: &[&ResponseRecord]) -> BTreeMap<Subcategory, u64> {
        Subcategory::ordered()
            .into_iter()
            .map(|subcategory| {
                let total = responses
                    .iter()
                    .map(|response| u64::from(response.scored.subcategory_total(subcategory)))
                    .sum();
                (subcategory, total)
            })
            .collect()
    }

    fn subcategory_averages(
        &self,
        responses: &[&ResponseRecord],
        totals: &BTreeMap<Subcategory, u64>,
    ) -> BTreeMap<Subcategory, f64> {
        Subcategory::ordered()
            .into_iter()
            .map(|subcategory| {
                let denominator = match self.config.denominator {
                    DenominatorPolicy::AllResponses => responses.len(),
                    DenominatorPolicy::AnsweringResponses => responses
                        .iter()
                        .filter(|response| response.scored.answered_subcategory(subcategory))
                        .count(),
                };
                let total = totals.get(&subcategory).copied().unwrap_or(0);
                let average = if denominator == 0 {
                    0.0
                } else {
                    round2(total as f64 / denominator as f64)
                };
                (subcategory, average)
            })
            .collect()
    }
}

fn category_averages(subcategory_averages: &BTreeMap<Subcategory, f64>) -> BTreeMap<Category, f64> {
    Category::ordered()
        .into_iter()
        .map(|category| {
            let sum: f64 = category
                .subcategories()
                .iter()
                .map(|subcategory| subcategory_averages.get(subcategory).copied().unwrap_or(0.0))
                .sum();
            (category, round2(sum))
        })
        .collect()
}

fn summarize(response: &ResponseRecord) -> AssessmentSummary {
    AssessmentSummary {
        response_id: response.id.clone(),
        sequence: response.sequence,
        submitted_at: response.submitted_at,
        respondent_role: response.respondent_role.clone(),
        form_id: response.form_id.clone(),
        category_scores: response.scored.category_totals.clone(),
        subcategory_scores: response.scored.subcategory_totals.clone(),
        overall_score: response.scored.overall_score,
        answered_count: response.scored.answered_count,
        is_complete: response.scored.is_complete,
    }
}
