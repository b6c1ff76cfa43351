mod questions;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Highest mark a single answer can earn.
pub const MAX_SCORE_PER_QUESTION: u32 = 3;
/// Questions asked per subcategory.
pub const QUESTIONS_PER_SUBCATEGORY: u8 = 3;
/// Questions asked per category.
pub const QUESTIONS_PER_CATEGORY: u8 = 12;
/// Highest mark a subcategory can earn in one response.
pub const MAX_SUBCATEGORY_SCORE: u32 = MAX_SCORE_PER_QUESTION * QUESTIONS_PER_SUBCATEGORY as u32;
/// Highest mark a category can earn in one response.
pub const MAX_CATEGORY_SCORE: u32 = MAX_SCORE_PER_QUESTION * QUESTIONS_PER_CATEGORY as u32;
/// Size of the full questionnaire.
pub const TOTAL_QUESTIONS: usize = 36;

/// One of the three top-level behavioural dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Trusting,
    Tasking,
    Tending,
}

impl Category {
    pub const fn ordered() -> [Self; 3] {
        [Self::Trusting, Self::Tasking, Self::Tending]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Trusting => "Trusting",
            Self::Tasking => "Tasking",
            Self::Tending => "Tending",
        }
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::Trusting => "trusting",
            Self::Tasking => "tasking",
            Self::Tending => "tending",
        }
    }

    /// Prefix used by question codes (`STR_1`, `STA_4`, ...).
    pub const fn code_prefix(self) -> &'static str {
        match self {
            Self::Trusting => "STR",
            Self::Tasking => "STA",
            Self::Tending => "STE",
        }
    }

    pub const fn subcategories(self) -> [Subcategory; 4] {
        match self {
            Self::Trusting => [
                Subcategory::HonestyDependabilityFairness,
                Subcategory::TaskDelegationWithoutBias,
                Subcategory::ProvidingNecessarySupport,
                Subcategory::EncouragingOpenCommunication,
            ],
            Self::Tasking => [
                Subcategory::DefiningRolesResponsibilities,
                Subcategory::PlanningOrganizing,
                Subcategory::PrioritisingTasks,
                Subcategory::MonitoringProgress,
            ],
            Self::Tending => [
                Subcategory::HelpingTeamLearn,
                Subcategory::CollaborativeEnvironment,
                Subcategory::ResolvingConflicts,
                Subcategory::RecognisingAchievement,
            ],
        }
    }

    pub fn from_label(value: &str) -> Option<Self> {
        let wanted = value.trim();
        Self::ordered()
            .into_iter()
            .find(|category| category.key().eq_ignore_ascii_case(wanted))
    }

    fn from_prefix(prefix: &str) -> Option<Self> {
        Self::ordered()
            .into_iter()
            .find(|category| category.code_prefix().eq_ignore_ascii_case(prefix))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Finer-grained behaviour measured by exactly three questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Subcategory {
    HonestyDependabilityFairness,
    TaskDelegationWithoutBias,
    ProvidingNecessarySupport,
    EncouragingOpenCommunication,
    DefiningRolesResponsibilities,
    PlanningOrganizing,
    PrioritisingTasks,
    MonitoringProgress,
    HelpingTeamLearn,
    CollaborativeEnvironment,
    ResolvingConflicts,
    RecognisingAchievement,
}

impl Subcategory {
    pub const fn ordered() -> [Self; 12] {
        [
            Self::HonestyDependabilityFairness,
            Self::TaskDelegationWithoutBias,
            Self::ProvidingNecessarySupport,
            Self::EncouragingOpenCommunication,
            Self::DefiningRolesResponsibilities,
            Self::PlanningOrganizing,
            Self::PrioritisingTasks,
            Self::MonitoringProgress,
            Self::HelpingTeamLearn,
            Self::CollaborativeEnvironment,
            Self::ResolvingConflicts,
            Self::RecognisingAchievement,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::HonestyDependabilityFairness => "Honesty, Dependability & Fairness",
            Self::TaskDelegationWithoutBias => "Task Delegation Without Bias",
            Self::ProvidingNecessarySupport => "Providing Necessary Support",
            Self::EncouragingOpenCommunication => "Encouraging Open Communication",
            Self::DefiningRolesResponsibilities => "Defining Roles & Responsibilities",
            Self::PlanningOrganizing => "Planning & Organizing",
            Self::PrioritisingTasks => "Prioritising Tasks",
            Self::MonitoringProgress => "Monitoring Progress & Providing Assistance",
            Self::HelpingTeamLearn => "Helping Team Members Learn & Improve",
            Self::CollaborativeEnvironment => "Creating a Collaborative Environment",
            Self::ResolvingConflicts => "Resolving Conflicts & Fostering Camaraderie",
            Self::RecognisingAchievement => "Recognising & Rewarding Achievement",
        }
    }

    pub const fn category(self) -> Category {
        match self {
            Self::HonestyDependabilityFairness
            | Self::TaskDelegationWithoutBias
            | Self::ProvidingNecessarySupport
            | Self::EncouragingOpenCommunication => Category::Trusting,
            Self::DefiningRolesResponsibilities
            | Self::PlanningOrganizing
            | Self::PrioritisingTasks
            | Self::MonitoringProgress => Category::Tasking,
            Self::HelpingTeamLearn
            | Self::CollaborativeEnvironment
            | Self::ResolvingConflicts
            | Self::RecognisingAchievement => Category::Tending,
        }
    }

    /// Resolves a behaviour label as stored by older records; spacing and case are ignored.
    pub fn from_label(value: &str) -> Option<Self> {
        let wanted = fold_label(value);
        Self::ordered()
            .into_iter()
            .find(|subcategory| fold_label(subcategory.label()) == wanted)
    }

    fn for_position(category: Category, number: u8) -> Self {
        let index = usize::from((number - 1) / QUESTIONS_PER_SUBCATEGORY);
        category.subcategories()[index.min(3)]
    }
}

fn fold_label(value: &str) -> String {
    value
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Whether an answer scores with or against the Never -> Always ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    Direct,
    Reconfirmation,
    Reverse,
}

impl Polarity {
    pub const fn score(self, option: AnswerOption) -> u32 {
        match (self, option) {
            (Self::Direct | Self::Reconfirmation, AnswerOption::Never) => 1,
            (Self::Direct | Self::Reconfirmation, AnswerOption::Sometimes) => 2,
            (Self::Direct | Self::Reconfirmation, AnswerOption::Always) => 3,
            (Self::Reverse, AnswerOption::Never) => 3,
            (Self::Reverse, AnswerOption::Sometimes) => 2,
            (Self::Reverse, AnswerOption::Always) => 1,
        }
    }

    /// The option that earns the maximum mark under this polarity.
    pub const fn best_option(self) -> AnswerOption {
        match self {
            Self::Direct | Self::Reconfirmation => AnswerOption::Always,
            Self::Reverse => AnswerOption::Never,
        }
    }

    fn for_position(number: u8) -> Self {
        match number % 3 {
            1 => Self::Direct,
            2 => Self::Reconfirmation,
            _ => Self::Reverse,
        }
    }
}

/// The three answer labels offered for every question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnswerOption {
    Never,
    Sometimes,
    Always,
}

impl AnswerOption {
    pub const fn ordered() -> [Self; 3] {
        [Self::Never, Self::Sometimes, Self::Always]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Never => "Never",
            Self::Sometimes => "Sometimes",
            Self::Always => "Always",
        }
    }

    /// Exact label match after trimming; anything else is treated as unanswered.
    pub fn parse(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        Self::ordered()
            .into_iter()
            .find(|option| option.label() == trimmed)
    }
}

/// Catalog identifier such as `STR_1` or `STE_12`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct QuestionCode {
    category: Category,
    number: u8,
}

impl QuestionCode {
    pub fn new(category: Category, number: u8) -> Option<Self> {
        (1..=QUESTIONS_PER_CATEGORY)
            .contains(&number)
            .then_some(Self { category, number })
    }

    pub const fn category(self) -> Category {
        self.category
    }

    pub const fn number(self) -> u8 {
        self.number
    }
}

impl fmt::Display for QuestionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.category.code_prefix(), self.number)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{0}' is not a catalog question code")]
pub struct UnknownQuestionCode(pub String);

impl FromStr for QuestionCode {
    type Err = UnknownQuestionCode;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let unknown = || UnknownQuestionCode(value.to_string());
        let (prefix, number) = value.trim().split_once('_').ok_or_else(unknown)?;
        let category = Category::from_prefix(prefix).ok_or_else(unknown)?;
        let number = number.parse::<u8>().map_err(|_| unknown())?;
        Self::new(category, number).ok_or_else(unknown)
    }
}

impl TryFrom<String> for QuestionCode {
    type Error = UnknownQuestionCode;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<QuestionCode> for String {
    fn from(value: QuestionCode) -> Self {
        value.to_string()
    }
}

/// Immutable catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Question {
    pub code: QuestionCode,
    pub text: &'static str,
    pub category: Category,
    pub subcategory: Subcategory,
    pub polarity: Polarity,
    pub sequence: u8,
    pub options: [AnswerOption; 3],
}

impl Question {
    pub fn score(&self, option: AnswerOption) -> u32 {
        self.polarity.score(option)
    }
}

/// Static definition of the 36-question assessment.
#[derive(Debug, Clone)]
pub struct QuestionCatalog {
    questions: Vec<Question>,
    index: BTreeMap<QuestionCode, usize>,
}

impl QuestionCatalog {
    pub fn standard() -> Self {
        let mut questions = Vec::with_capacity(TOTAL_QUESTIONS);
        for category in Category::ordered() {
            for (offset, text) in questions::prompts(category).iter().enumerate() {
                let number = offset as u8 + 1;
                let Some(code) = QuestionCode::new(category, number) else {
                    continue;
                };
                questions.push(Question {
                    code,
                    text: *text,
                    category,
                    subcategory: Subcategory::for_position(category, number),
                    polarity: Polarity::for_position(number),
                    sequence: number,
                    options: AnswerOption::ordered(),
                });
            }
        }

        let index = questions
            .iter()
            .enumerate()
            .map(|(position, question)| (question.code, position))
            .collect();

        Self { questions, index }
    }

    /// Read-only export for form rendering.
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn get(&self, code: QuestionCode) -> Option<&Question> {
        self.index.get(&code).map(|position| &self.questions[*position])
    }

    pub fn codes(&self) -> impl Iterator<Item = QuestionCode> + '_ {
        self.questions.iter().map(|question| question.code)
    }

    pub fn for_category(&self, category: Category) -> Vec<&Question> {
        self.questions
            .iter()
            .filter(|question| question.category == category)
            .collect()
    }

    pub fn for_subcategory(&self, subcategory: Subcategory) -> Vec<&Question> {
        self.questions
            .iter()
            .filter(|question| question.subcategory == subcategory)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Checks the 12-per-category / 3-per-subcategory shape.
    pub fn validate(&self) -> Result<(), CatalogShapeError> {
        for category in Category::ordered() {
            let found = self.for_category(category).len();
            if found != usize::from(QUESTIONS_PER_CATEGORY) {
                return Err(CatalogShapeError::Category { category, found });
            }
            for subcategory in category.subcategories() {
                let found = self.for_subcategory(subcategory).len();
                if found != usize::from(QUESTIONS_PER_SUBCATEGORY) {
                    return Err(CatalogShapeError::Subcategory { subcategory, found });
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogShapeError {
    #[error("category {category} has {found} questions")]
    Category { category: Category, found: usize },
    #[error("subcategory '{}' has {found} questions", .subcategory.label())]
    Subcategory {
        subcategory: Subcategory,
        found: usize,
    },
}
