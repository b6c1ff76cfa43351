use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::intake::RawAnswerBatch;
use super::normalizer::normalize_name;
use super::scoring::ScoredResponse;

/// Organizational scope (company) that owns a set of responses and aggregates.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CompanyId(pub String);

impl fmt::Display for CompanyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Normalized manager name; two raw spellings with the same key are the same person.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ManagerKey(String);

impl ManagerKey {
    /// Returns `None` when the name is blank after normalization.
    pub fn from_raw(raw: &str) -> Option<Self> {
        let normalized = normalize_name(raw);
        (!normalized.is_empty()).then_some(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ManagerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier wrapper for stored responses.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResponseId(pub String);

/// One respondent's submission as it arrives from the form layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormSubmission {
    #[serde(default, alias = "submittedAt")]
    pub submitted_at: Option<DateTime<Utc>>,
    #[serde(default, alias = "formId")]
    pub form_id: Option<String>,
    #[serde(default)]
    pub manager_name: Option<String>,
    #[serde(default)]
    pub reporting_to: Option<String>,
    #[serde(default)]
    pub respondent_role: Option<String>,
    #[serde(default)]
    pub answers: RawAnswerBatch,
}

/// Scored response waiting for the store to assign its id and sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewResponse {
    pub company: CompanyId,
    pub manager: ManagerKey,
    pub raw_manager_name: String,
    pub reporting_to: Option<String>,
    pub raw_reporting_to: Option<String>,
    pub respondent_role: String,
    /// Form the response came through, when the intake layer reported one.
    #[serde(default)]
    pub form_id: Option<String>,
    pub submitted_at: DateTime<Utc>,
    pub scored: ScoredResponse,
}

/// Immutable stored response. Corrections arrive as new records, never edits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseRecord {
    pub id: ResponseId,
    /// Store-assigned, strictly increasing per store; doubles as the aggregate revision.
    pub sequence: u64,
    pub company: CompanyId,
    pub manager: ManagerKey,
    pub raw_manager_name: String,
    pub reporting_to: Option<String>,
    pub raw_reporting_to: Option<String>,
    pub respondent_role: String,
    /// Form the response came through, when the intake layer reported one.
    #[serde(default)]
    pub form_id: Option<String>,
    pub submitted_at: DateTime<Utc>,
    pub scored: ScoredResponse,
}

impl ResponseRecord {
    pub fn from_new(id: ResponseId, sequence: u64, response: NewResponse) -> Self {
        let NewResponse {
            company,
            manager,
            raw_manager_name,
            reporting_to,
            raw_reporting_to,
            respondent_role,
            form_id,
            submitted_at,
            scored,
        } = response;

        Self {
            id,
            sequence,
            company,
            manager,
            raw_manager_name,
            reporting_to,
            raw_reporting_to,
            respondent_role,
            form_id,
            submitted_at,
            scored,
        }
    }
}
