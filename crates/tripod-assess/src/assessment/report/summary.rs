use super::super::aggregation::ManagerAggregate;
use super::super::catalog::{Category, MAX_CATEGORY_SCORE};
use super::super::domain::CompanyId;
use super::super::remarks::{Band, RemarkTable};
use super::super::scoring::round1;
use super::views::{
    BandCount, CategoryAverageEntry, CategoryCard, CompanyOverview, ManagerScorecard,
    SubcategoryRow,
};
use std::collections::BTreeMap;

fn percentage(marks: f64, maximum: f64) -> f64 {
    if maximum <= 0.0 {
        return 0.0;
    }
    round1(marks / maximum * 100.0)
}

impl ManagerScorecard {
    /// Presentation view over a stored aggregate; the aggregate itself is untouched.
    pub fn from_aggregate(aggregate: &ManagerAggregate, remarks: &RemarkTable) -> Self {
        let category_max = f64::from(MAX_CATEGORY_SCORE);

        let categories: Vec<CategoryCard> = Category::ordered()
            .into_iter()
            .map(|category| {
                let marks = aggregate.category_average(category);
                let subcategories = category
                    .subcategories()
                    .into_iter()
                    .map(|subcategory| {
                        let average = aggregate.subcategory_average(subcategory);
                        let classification = remarks.classify(category, subcategory, average);
                        SubcategoryRow {
                            subcategory,
                            label: subcategory.label(),
                            average,
                            band: classification.band,
                            band_label: classification.band.label(),
                            grade: classification.band.grade_label(),
                            remark: classification.remark.to_string(),
                        }
                    })
                    .collect();

                CategoryCard {
                    category,
                    label: category.label(),
                    marks,
                    percentage: percentage(marks, category_max),
                    subcategories,
                }
            })
            .collect();

        let total_marks: f64 = categories.iter().map(|card| card.marks).sum();
        let overall_max = category_max * Category::ordered().len() as f64;

        Self {
            company: aggregate.company.clone(),
            manager: aggregate.manager.clone(),
            reporting_to: aggregate.reporting_to.clone(),
            total_assessments: aggregate.total_assessments,
            confidence_score: aggregate.confidence_score,
            overall_percentage: percentage(total_marks, overall_max),
            categories,
            last_assessment: aggregate.last_assessment,
        }
    }
}

impl CompanyOverview {
    /// Every manager weighs the same regardless of response count.
    pub fn from_aggregates(company: CompanyId, aggregates: &[ManagerAggregate]) -> Self {
        let manager_count = aggregates.len();
        let assessment_count = aggregates
            .iter()
            .map(|aggregate| aggregate.total_assessments)
            .sum();

        let category_averages = Category::ordered()
            .into_iter()
            .map(|category| {
                let average = if manager_count == 0 {
                    0.0
                } else {
                    let sum: f64 = aggregates
                        .iter()
                        .map(|aggregate| aggregate.category_average(category))
                        .sum();
                    round1(sum / manager_count as f64)
                };
                CategoryAverageEntry {
                    category,
                    label: category.label(),
                    average,
                }
            })
            .collect();

        let mut counts: BTreeMap<Band, usize> = BTreeMap::new();
        for aggregate in aggregates {
            for average in aggregate.subcategory_averages.values() {
                *counts.entry(Band::classify(*average)).or_insert(0) += 1;
            }
        }
        let band_counts = Band::ordered()
            .into_iter()
            .map(|band| BandCount {
                band,
                label: band.label(),
                count: counts.get(&band).copied().unwrap_or(0),
            })
            .collect();

        Self {
            company,
            manager_count,
            assessment_count,
            category_averages,
            band_counts,
        }
    }
}
