//! Boundary between loosely typed form payloads and the scorer's closed input type.
//!
//! Form tools deliver answers keyed by the full question label (`"STR_1 | Does your manager
//! ..."`) and sometimes wrap the selected option in a list. Everything here is lenient: labels
//! that do not name a catalog question and options outside Never/Sometimes/Always are dropped,
//! so a garbled submission still scores best-effort.

mod parser;

pub use parser::{parse_export, parse_export_rows, ExportRow};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::catalog::{AnswerOption, QuestionCatalog, QuestionCode};
use super::domain::FormSubmission;
use super::normalizer::normalize_name;

/// Selected option exactly as the form tool sent it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawAnswer {
    Single(String),
    Many(Vec<String>),
}

impl RawAnswer {
    /// First non-blank value, trimmed.
    pub fn selected(&self) -> Option<&str> {
        match self {
            RawAnswer::Single(value) => Some(value.trim()).filter(|value| !value.is_empty()),
            RawAnswer::Many(values) => values
                .iter()
                .map(|value| value.trim())
                .find(|value| !value.is_empty()),
        }
    }
}

impl From<&str> for RawAnswer {
    fn from(value: &str) -> Self {
        RawAnswer::Single(value.to_string())
    }
}

/// Free-text label -> raw answer, as received.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawAnswerBatch(BTreeMap<String, RawAnswer>);

impl RawAnswerBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, label: impl Into<String>, answer: impl Into<RawAnswer>) {
        self.0.insert(label.into(), answer.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RawAnswer)> {
        self.0.iter().map(|(label, answer)| (label.as_str(), answer))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Keeps only answers that name a catalog question and a known option.
    pub fn resolve(&self, catalog: &QuestionCatalog) -> AnswerSheet {
        let mut sheet = AnswerSheet::default();
        for (label, answer) in self.iter() {
            let Some(code) = extract_question_code(label) else {
                continue;
            };
            if catalog.get(code).is_none() {
                continue;
            }
            if let Some(option) = answer.selected().and_then(AnswerOption::parse) {
                sheet.insert(code, option);
            }
        }
        sheet
    }
}

impl<K, V> FromIterator<(K, V)> for RawAnswerBatch
where
    K: Into<String>,
    V: Into<RawAnswer>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut batch = Self::new();
        for (label, answer) in iter {
            batch.insert(label, answer);
        }
        batch
    }
}

/// Validated answers: every key is a catalog code and every value a known option.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerSheet(BTreeMap<QuestionCode, AnswerOption>);

impl AnswerSheet {
    pub fn insert(&mut self, code: QuestionCode, option: AnswerOption) {
        self.0.insert(code, option);
    }

    pub fn get(&self, code: QuestionCode) -> Option<AnswerOption> {
        self.0.get(&code).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (QuestionCode, AnswerOption)> + '_ {
        self.0.iter().map(|(code, option)| (*code, *option))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(QuestionCode, AnswerOption)> for AnswerSheet {
    fn from_iter<T: IntoIterator<Item = (QuestionCode, AnswerOption)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Failure while reading a bulk export of submissions.
#[derive(Debug, thiserror::Error)]
pub enum IntakeError {
    #[error("export is missing the '{0}' column")]
    MissingColumn(&'static str),
    #[error("line {line}: unreadable timestamp '{value}'")]
    InvalidTimestamp { line: u64, value: String },
    #[error(transparent)]
    Csv(#[from] csv::Error),
}

/// Pulls the question code out of a form label: the text before `|`, first token.
pub fn extract_question_code(label: &str) -> Option<QuestionCode> {
    let head = label.split('|').next().unwrap_or(label);
    let token = head.split_whitespace().next()?;
    token.trim_end_matches([':', '.']).parse().ok()
}

/// Normalized manager identity attached to a submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionIdentity {
    pub manager_name: Option<String>,
    pub raw_manager_name: Option<String>,
    pub reporting_to: Option<String>,
    pub raw_reporting_to: Option<String>,
}

impl SubmissionIdentity {
    pub fn new(manager_name: Option<&str>, reporting_to: Option<&str>) -> Self {
        let (manager_name, raw_manager_name) = normalized_pair(manager_name);
        let (reporting_to, raw_reporting_to) = normalized_pair(reporting_to);
        Self {
            manager_name,
            raw_manager_name,
            reporting_to,
            raw_reporting_to,
        }
    }

    /// Both identity fields were supplied in the same payload.
    pub fn is_complete(&self) -> bool {
        self.manager_name.is_some() && self.reporting_to.is_some()
    }

    /// Fields already set win over the fallback.
    pub fn or(self, fallback: SubmissionIdentity) -> Self {
        let (manager_name, raw_manager_name) = if self.manager_name.is_some() {
            (self.manager_name, self.raw_manager_name)
        } else {
            (fallback.manager_name, fallback.raw_manager_name)
        };
        let (reporting_to, raw_reporting_to) = if self.reporting_to.is_some() {
            (self.reporting_to, self.raw_reporting_to)
        } else {
            (fallback.reporting_to, fallback.raw_reporting_to)
        };
        Self {
            manager_name,
            raw_manager_name,
            reporting_to,
            raw_reporting_to,
        }
    }
}

fn normalized_pair(raw: Option<&str>) -> (Option<String>, Option<String>) {
    let raw = raw.map(str::trim).filter(|value| !value.is_empty());
    let normalized = raw.map(normalize_name).filter(|value| !value.is_empty());
    match normalized {
        Some(name) => (Some(name), raw.map(str::to_string)),
        None => (None, None),
    }
}

/// Caller-supplied strategy for finding the manager identity inside an answer batch.
pub trait IdentityExtractor: Send + Sync {
    fn extract(&self, answers: &RawAnswerBatch) -> SubmissionIdentity;
}

/// Recognizes the identity questions of the standard assessment form by label.
#[derive(Debug, Clone, Default)]
pub struct FormLabelIdentityExtractor;

impl FormLabelIdentityExtractor {
    const MANAGER_MARKER: &'static str = "manager's full name";
    const REPORTING_MARKER: &'static str = "manager report to";
}

impl IdentityExtractor for FormLabelIdentityExtractor {
    fn extract(&self, answers: &RawAnswerBatch) -> SubmissionIdentity {
        let mut manager_name = None;
        let mut reporting_to = None;

        for (label, answer) in answers.iter() {
            let folded = label.to_lowercase().replace('\u{2019}', "'");
            if manager_name.is_none() && folded.contains(Self::MANAGER_MARKER) {
                manager_name = answer.selected();
            } else if reporting_to.is_none() && folded.contains(Self::REPORTING_MARKER) {
                reporting_to = answer.selected();
            }
        }

        SubmissionIdentity::new(manager_name, reporting_to)
    }
}

impl FormSubmission {
    /// Explicit identity fields first, then whatever the extractor finds in the answers.
    pub fn identity(&self, extractor: &dyn IdentityExtractor) -> SubmissionIdentity {
        SubmissionIdentity::new(self.manager_name.as_deref(), self.reporting_to.as_deref())
            .or(extractor.extract(&self.answers))
    }
}
