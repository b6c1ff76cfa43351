use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use std::io::Read;

use super::{IntakeError, RawAnswer, RawAnswerBatch};
use crate::assessment::domain::FormSubmission;

const TIMESTAMP_COLUMN: &str = "Timestamp";

/// Columns whose header routes the cell to an explicit submission field instead of the answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Timestamp,
    ManagerName,
    ReportingTo,
    RespondentRole,
    FormId,
    Answer,
}

impl Column {
    fn classify(header: &str) -> Self {
        let folded = header.trim().to_ascii_lowercase();
        match folded.as_str() {
            "timestamp" | "submitted_at" | "submittedat" => Self::Timestamp,
            "manager_name" | "manager" => Self::ManagerName,
            "reporting_to" => Self::ReportingTo,
            "respondent_role" | "role" => Self::RespondentRole,
            "form_id" | "formid" => Self::FormId,
            _ => Self::Answer,
        }
    }
}

/// One parsed export row together with the file line it started on.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportRow {
    pub line: u64,
    pub submission: FormSubmission,
}

/// Reads a spreadsheet export, one submission per row.
///
/// Identity questions that carry their full form label stay in the answer batch so the identity
/// extractor can find them; short `manager_name` / `reporting_to` headers become explicit fields.
pub fn parse_export<R: Read>(reader: R) -> Result<Vec<FormSubmission>, IntakeError> {
    Ok(parse_export_rows(reader)?
        .into_iter()
        .map(|row| row.submission)
        .collect())
}

/// Like [`parse_export`], keeping each row's line number for diagnostics.
///
/// Line numbers come from the reader, so skipped blank lines and multi-line quoted cells are
/// accounted for.
pub fn parse_export_rows<R: Read>(reader: R) -> Result<Vec<ExportRow>, IntakeError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let columns: Vec<Column> = headers.iter().map(Column::classify).collect();
    if !columns.contains(&Column::Timestamp) {
        return Err(IntakeError::MissingColumn(TIMESTAMP_COLUMN));
    }

    let mut rows = Vec::new();
    for (index, record) in csv_reader.records().enumerate() {
        let record = record?;
        // Header is line 1.
        let line = record
            .position()
            .map_or(index as u64 + 2, |position| position.line());
        let mut submission = FormSubmission::default();

        for ((header, column), cell) in headers.iter().zip(&columns).zip(record.iter()) {
            let Some(value) = non_empty(cell) else {
                continue;
            };
            match column {
                Column::Timestamp => {
                    let parsed = parse_timestamp(value).ok_or_else(|| {
                        IntakeError::InvalidTimestamp {
                            line,
                            value: value.to_string(),
                        }
                    })?;
                    submission.submitted_at = Some(parsed);
                }
                Column::ManagerName => submission.manager_name = Some(value.to_string()),
                Column::ReportingTo => submission.reporting_to = Some(value.to_string()),
                Column::RespondentRole => submission.respondent_role = Some(value.to_string()),
                Column::FormId => submission.form_id = Some(value.to_string()),
                Column::Answer => submission
                    .answers
                    .insert(header, RawAnswer::Single(value.to_string())),
            }
        }

        rows.push(ExportRow { line, submission });
    }

    Ok(rows)
}

fn non_empty(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

pub(crate) fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S") {
        return Some(Utc.from_utc_datetime(&dt));
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return date
            .and_hms_opt(0, 0, 0)
            .map(|dt| Utc.from_utc_datetime(&dt));
    }

    None
}

impl RawAnswerBatch {
    /// Number of labels whose answer is non-blank.
    pub fn answered_labels(&self) -> usize {
        self.iter()
            .filter(|(_, answer)| answer.selected().is_some())
            .count()
    }
}
