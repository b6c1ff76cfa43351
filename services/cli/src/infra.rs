use serde::Serialize;
use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::Path;
use std::sync::Arc;
use tripod_assess::assessment::{
    AssessmentEngine, AssessmentService, CompanyOverview, InMemoryAssessmentStore,
    ManagerScorecard, RawAnswerBatch, ScoringConfig, SweepReport,
};
use tripod_assess::error::AppError;

pub(crate) type MemoryService = AssessmentService<InMemoryAssessmentStore, InMemoryAssessmentStore>;

/// In-process service backed by a single memory store for both responses and aggregates.
pub(crate) fn memory_service(scoring: &ScoringConfig) -> Arc<MemoryService> {
    let store = Arc::new(InMemoryAssessmentStore::new());
    Arc::new(AssessmentService::new(
        store.clone(),
        store,
        Arc::new(AssessmentEngine::new(scoring.clone())),
    ))
}

pub(crate) fn read_answers(path: &Path) -> Result<RawAnswerBatch, AppError> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), AppError> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    serde_json::to_writer_pretty(&mut handle, value)?;
    writeln!(handle)?;
    Ok(())
}

pub(crate) fn render_sweep(report: &SweepReport) {
    println!(
        "Aggregated {} managers | {} created | {} updated | {} stale | {} failed",
        report.managers, report.created, report.updated, report.stale, report.failed
    );
}

pub(crate) fn render_scorecard(card: &ManagerScorecard) {
    println!("\nScorecard for {}", card.manager);
    if let Some(reporting_to) = &card.reporting_to {
        println!("- Reports to {reporting_to}");
    }
    println!(
        "- {} assessments | confidence {}% | overall {:.1}%",
        card.total_assessments, card.confidence_score, card.overall_percentage
    );
    for category in &card.categories {
        println!(
            "  {} {:.2}/36 ({:.1}%)",
            category.label, category.marks, category.percentage
        );
        for row in &category.subcategories {
            println!(
                "    - {}: {:.2} [{}] {}",
                row.label, row.average, row.band_label, row.grade
            );
            if !row.remark.is_empty() {
                println!("      {}", row.remark);
            }
        }
    }
}

pub(crate) fn render_overview(overview: &CompanyOverview) {
    println!(
        "\nCompany {} | {} managers | {} assessments",
        overview.company, overview.manager_count, overview.assessment_count
    );
    for entry in &overview.category_averages {
        println!("- {} average {:.1}/36", entry.label, entry.average);
    }
    let bands: Vec<String> = overview
        .band_counts
        .iter()
        .map(|count| format!("{} {}", count.label, count.count))
        .collect();
    println!("- Subcategory bands: {}", bands.join(" | "));
}
