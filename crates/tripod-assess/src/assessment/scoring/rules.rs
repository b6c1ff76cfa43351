use std::collections::BTreeMap;

use super::super::catalog::{
    Category, QuestionCatalog, QuestionCode, Subcategory, MAX_SCORE_PER_QUESTION, TOTAL_QUESTIONS,
};
use super::super::intake::AnswerSheet;
use super::QuestionScore;

pub(crate) struct Tally {
    pub answers: BTreeMap<QuestionCode, QuestionScore>,
    pub category_totals: BTreeMap<Category, u32>,
    pub subcategory_totals: BTreeMap<Subcategory, u32>,
    pub total: u32,
}

pub(crate) fn tally(catalog: &QuestionCatalog, sheet: &AnswerSheet) -> Tally {
    let mut category_totals: BTreeMap<Category, u32> =
        Category::ordered().into_iter().map(|c| (c, 0)).collect();
    let mut subcategory_totals: BTreeMap<Subcategory, u32> =
        Subcategory::ordered().into_iter().map(|s| (s, 0)).collect();
    let mut answers = BTreeMap::new();
    let mut total = 0;

    for (code, option) in sheet.iter() {
        let Some(question) = catalog.get(code) else {
            continue;
        };
        let score = question.score(option);

        *category_totals.entry(question.category).or_insert(0) += score;
        *subcategory_totals.entry(question.subcategory).or_insert(0) += score;
        total += score;

        answers.insert(
            code,
            QuestionScore {
                option,
                score,
                polarity: question.polarity,
                category: question.category,
                subcategory: question.subcategory,
            },
        );
    }

    Tally {
        answers,
        category_totals,
        subcategory_totals,
        total,
    }
}

pub(crate) fn overall_percentage(total: u32) -> f64 {
    let maximum = f64::from(MAX_SCORE_PER_QUESTION) * TOTAL_QUESTIONS as f64;
    round2(f64::from(total) / maximum * 100.0)
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
