use crate::infra::{
    memory_service, print_json, render_overview, render_scorecard, render_sweep, MemoryService,
};
use clap::Args;
use serde::Serialize;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use tripod_assess::assessment::{
    parse_export_rows, CompanyId, CompanyOverview, ExportRow, ManagerKey, ManagerScorecard,
    ServiceError, SweepReport,
};
use tripod_assess::config::AppConfig;
use tripod_assess::error::AppError;
use tracing::{info, warn};

#[derive(Args, Debug)]
pub(crate) struct SweepArgs {
    /// Spreadsheet export (CSV) with one submission per row
    #[arg(long)]
    pub(crate) responses: PathBuf,
    /// Company the responses belong to
    #[arg(long, default_value = "default")]
    pub(crate) company: String,
    /// Print the scorecard for one manager instead of the company overview
    #[arg(long)]
    pub(crate) manager: Option<String>,
    /// Emit JSON instead of a text report
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Serialize)]
struct SweepOutput {
    skipped_lines: Vec<u64>,
    sweep: SweepReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    scorecard: Option<ManagerScorecard>,
    #[serde(skip_serializing_if = "Option::is_none")]
    overview: Option<CompanyOverview>,
}

pub(crate) fn run_sweep(args: SweepArgs, config: &AppConfig) -> Result<(), AppError> {
    let SweepArgs {
        responses,
        company,
        manager,
        json,
    } = args;

    let company = CompanyId(company);
    let rows = parse_export_rows(BufReader::new(File::open(&responses)?))?;
    info!(
        path = %responses.display(),
        rows = rows.len(),
        "export loaded"
    );

    let service = memory_service(&config.scoring);
    let skipped_lines = submit_rows(&service, &company, rows)?;

    let sweep = service.sweep(&company)?;
    let (scorecard, overview) = match manager.as_deref() {
        Some(raw) => {
            let key = ManagerKey::from_raw(raw).ok_or(ServiceError::MissingManagerName)?;
            (Some(service.scorecard(&company, &key)?), None)
        }
        None => (None, Some(service.company_overview(&company)?)),
    };

    if json {
        return print_json(&SweepOutput {
            skipped_lines,
            sweep,
            scorecard,
            overview,
        });
    }

    render_sweep(&sweep);
    if !skipped_lines.is_empty() {
        println!("- Skipped rows without a manager name on lines {skipped_lines:?}");
    }
    if let Some(card) = &scorecard {
        render_scorecard(card);
    }
    if let Some(overview) = &overview {
        render_overview(overview);
    }
    Ok(())
}

/// Submits every row; rows with no manager name are skipped and their lines returned.
fn submit_rows(
    service: &MemoryService,
    company: &CompanyId,
    rows: Vec<ExportRow>,
) -> Result<Vec<u64>, ServiceError> {
    let mut skipped = Vec::new();
    for ExportRow { line, submission } in rows {
        match service.submit(company, submission) {
            Ok(_) => {}
            Err(ServiceError::MissingManagerName) => {
                warn!(line, "row skipped: no manager name");
                skipped.push(line);
            }
            Err(err) => return Err(err),
        }
    }
    Ok(skipped)
}
