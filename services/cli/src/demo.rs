use crate::infra::{memory_service, render_overview, render_scorecard};
use chrono::{Duration, Utc};
use clap::Args;
use tripod_assess::assessment::{
    AggregationDispatcher, AnswerOption, Category, CompanyId, FormSubmission, Polarity,
    QuestionCatalog, RawAnswerBatch,
};
use tripod_assess::config::AppConfig;
use tripod_assess::error::AppError;
use tracing::info;

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Responses generated per manager
    #[arg(long, default_value_t = 12)]
    pub(crate) responses: usize,
    /// Company name used for the demo data
    #[arg(long, default_value = "demo")]
    pub(crate) company: String,
}

impl Default for DemoArgs {
    fn default() -> Self {
        Self {
            responses: 12,
            company: "demo".to_string(),
        }
    }
}

struct Profile {
    name: &'static str,
    reporting_to: &'static str,
    role: &'static str,
    /// Out of ten: how often a question gets the best-scoring answer.
    strength: usize,
}

const PROFILES: [Profile; 3] = [
    Profile {
        name: "Priya Nair",
        reporting_to: "Omar Haddad",
        role: "direct report",
        strength: 9,
    },
    Profile {
        name: "lee  CHEN",
        reporting_to: "Omar Haddad",
        role: "peer",
        strength: 6,
    },
    Profile {
        name: "Ada Moss",
        reporting_to: "Kai Olsen",
        role: "direct report",
        strength: 3,
    },
];

pub(crate) async fn run_demo(args: DemoArgs, config: &AppConfig) -> Result<(), AppError> {
    let DemoArgs { responses, company } = args;
    let company = CompanyId(company);
    let catalog = QuestionCatalog::standard();
    let service = memory_service(&config.scoring);
    let dispatcher = AggregationDispatcher::try_current(service.clone())?;

    println!("TRIPOD assessment demo");
    println!(
        "- {} managers x {} responses | confidence step {} | denominator {}",
        PROFILES.len(),
        responses,
        config.scoring.confidence_step,
        config.scoring.denominator
    );

    let start = Utc::now() - Duration::days(responses as i64);
    let mut tickets = Vec::new();
    for profile in &PROFILES {
        for response in 0..responses {
            let submission = FormSubmission {
                submitted_at: Some(start + Duration::days(response as i64)),
                manager_name: Some(profile.name.to_string()),
                reporting_to: Some(profile.reporting_to.to_string()),
                respondent_role: Some(profile.role.to_string()),
                answers: synthetic_answers(&catalog, profile, response),
                ..FormSubmission::default()
            };
            let (_, ticket) = dispatcher.submit_and_schedule(&company, submission)?;
            tickets.push(ticket);
        }
    }

    let mut managers = Vec::new();
    for ticket in tickets {
        let refresh = ticket.wait().await?;
        if !managers.contains(&refresh.aggregate.manager) {
            managers.push(refresh.aggregate.manager.clone());
        }
    }
    dispatcher.shutdown().await;
    info!(managers = managers.len(), "demo aggregation complete");

    for manager in &managers {
        render_scorecard(&service.scorecard(&company, manager)?);
    }
    render_overview(&service.company_overview(&company)?);
    Ok(())
}

/// Deterministic answer set; every fifth response leaves the Tending questions blank.
fn synthetic_answers(
    catalog: &QuestionCatalog,
    profile: &Profile,
    response: usize,
) -> RawAnswerBatch {
    catalog
        .questions()
        .iter()
        .enumerate()
        .filter(|(_, question)| response % 5 != 4 || question.category != Category::Tending)
        .map(|(index, question)| {
            let roll = (response * 7 + index * 3) % 10;
            let option = if roll < profile.strength {
                question.polarity.best_option()
            } else if roll % 2 == 0 {
                AnswerOption::Sometimes
            } else {
                worst_option(question.polarity)
            };
            (format!("{} | {}", question.code, question.text), option.label())
        })
        .collect()
}

fn worst_option(polarity: Polarity) -> AnswerOption {
    match polarity.best_option() {
        AnswerOption::Always => AnswerOption::Never,
        _ => AnswerOption::Always,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tripod_assess::assessment::{ResponseScorer, SubmissionIdentity, TOTAL_QUESTIONS};

    #[test]
    fn strong_profiles_outscore_weak_ones() {
        let catalog = QuestionCatalog::standard();
        let scorer = ResponseScorer::new(Arc::new(catalog.clone()));
        let identity = SubmissionIdentity::new(Some("Demo Manager"), Some("Demo Director"));

        let strong_answers = synthetic_answers(&catalog, &PROFILES[0], 0);
        let weak_answers = synthetic_answers(&catalog, &PROFILES[2], 0);
        let strong = scorer.score_batch(&strong_answers, &identity);
        let weak = scorer.score_batch(&weak_answers, &identity);

        assert_eq!(strong.answered_count, TOTAL_QUESTIONS);
        assert!(strong.is_complete);
        assert!(strong.total_score > weak.total_score);
    }

    #[test]
    fn every_fifth_response_skips_tending() {
        let catalog = QuestionCatalog::standard();
        let answers = synthetic_answers(&catalog, &PROFILES[1], 4);
        assert_eq!(answers.len(), 24);
    }
}
