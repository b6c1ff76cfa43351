use std::sync::Arc;

use super::aggregation::{ManagerAggregator, ScoringConfig};
use super::catalog::QuestionCatalog;
use super::remarks::RemarkTable;
use super::scoring::ResponseScorer;

/// Read-only bundle of catalog, scorer, aggregator and remark table.
///
/// Built once at startup and handed to the service and dispatcher explicitly.
#[derive(Debug, Clone)]
pub struct AssessmentEngine {
    catalog: Arc<QuestionCatalog>,
    scorer: ResponseScorer,
    aggregator: ManagerAggregator,
    remarks: RemarkTable,
}

impl AssessmentEngine {
    pub fn new(config: ScoringConfig) -> Self {
        Self::with_catalog(QuestionCatalog::standard(), config)
    }

    pub fn with_catalog(catalog: QuestionCatalog, config: ScoringConfig) -> Self {
        let catalog = Arc::new(catalog);
        let remarks = RemarkTable::standard();
        Self {
            scorer: ResponseScorer::new(catalog.clone()),
            aggregator: ManagerAggregator::new(config, remarks.clone()),
            catalog,
            remarks,
        }
    }

    pub fn catalog(&self) -> &QuestionCatalog {
        &self.catalog
    }

    pub fn scorer(&self) -> &ResponseScorer {
        &self.scorer
    }

    pub fn aggregator(&self) -> &ManagerAggregator {
        &self.aggregator
    }

    pub fn remarks(&self) -> &RemarkTable {
        &self.remarks
    }

    pub fn config(&self) -> &ScoringConfig {
        self.aggregator.config()
    }
}

impl Default for AssessmentEngine {
    fn default() -> Self {
        Self::new(ScoringConfig::default())
    }
}
