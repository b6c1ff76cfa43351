use super::super::catalog::{Category, Subcategory};
use super::super::domain::{CompanyId, ManagerKey};
use super::super::remarks::Band;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct SubcategoryRow {
    pub subcategory: Subcategory,
    pub label: &'static str,
    pub average: f64,
    pub band: Band,
    pub band_label: &'static str,
    pub grade: &'static str,
    pub remark: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryCard {
    pub category: Category,
    pub label: &'static str,
    pub marks: f64,
    pub percentage: f64,
    pub subcategories: Vec<SubcategoryRow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ManagerScorecard {
    pub company: CompanyId,
    pub manager: ManagerKey,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reporting_to: Option<String>,
    pub total_assessments: usize,
    pub confidence_score: u32,
    pub overall_percentage: f64,
    pub categories: Vec<CategoryCard>,
    pub last_assessment: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BandCount {
    pub band: Band,
    pub label: &'static str,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryAverageEntry {
    pub category: Category,
    pub label: &'static str,
    pub average: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompanyOverview {
    pub company: CompanyId,
    pub manager_count: usize,
    pub assessment_count: usize,
    pub category_averages: Vec<CategoryAverageEntry>,
    pub band_counts: Vec<BandCount>,
}
