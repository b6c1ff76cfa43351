use std::sync::Arc;

use chrono::{TimeZone, Utc};
use tripod_assess::assessment::{
    parse_export, AggregationDispatcher, AnswerOption, AssessmentEngine, AssessmentService, Band,
    Category, CompanyId, DenominatorPolicy, FixedClock, FormSubmission, InMemoryAssessmentStore,
    ManagerKey, QuestionCatalog, RawAnswerBatch, ScoringConfig, Subcategory,
};

type Service = AssessmentService<InMemoryAssessmentStore, InMemoryAssessmentStore>;

fn service_with(config: ScoringConfig) -> Service {
    let store = Arc::new(InMemoryAssessmentStore::new());
    let clock = Utc
        .with_ymd_and_hms(2025, 4, 1, 12, 0, 0)
        .single()
        .expect("valid clock");
    AssessmentService::new(
        store.clone(),
        store,
        Arc::new(AssessmentEngine::new(config)),
    )
    .with_clock(Arc::new(FixedClock(clock)))
}

fn company() -> CompanyId {
    CompanyId("northwind".to_string())
}

fn key(name: &str) -> ManagerKey {
    ManagerKey::from_raw(name).expect("non-empty name")
}

/// Best-scoring option for each question of the given categories.
fn best_answers(categories: &[Category]) -> RawAnswerBatch {
    let catalog = QuestionCatalog::standard();
    catalog
        .questions()
        .iter()
        .filter(|question| categories.contains(&question.category))
        .map(|question| {
            (
                format!("{} | {}", question.code, question.text),
                question.polarity.best_option().label(),
            )
        })
        .collect()
}

fn submission(manager: &str, answers: RawAnswerBatch, day: u32) -> FormSubmission {
    FormSubmission {
        submitted_at: Utc.with_ymd_and_hms(2025, 3, day, 9, 0, 0).single(),
        manager_name: Some(manager.to_string()),
        reporting_to: Some("Morgan Ray".to_string()),
        answers,
        ..FormSubmission::default()
    }
}

#[test]
fn trusting_only_response_scores_full_trusting_marks() {
    let service = service_with(ScoringConfig::default());
    service
        .submit(
            &company(),
            submission("Dana White", best_answers(&[Category::Trusting]), 3),
        )
        .expect("submission accepted");

    let aggregate = service
        .refresh(&company(), &key("Dana White"))
        .expect("aggregate computed")
        .aggregate;

    for subcategory in Category::Trusting.subcategories() {
        assert_eq!(aggregate.subcategory_averages[&subcategory], 9.0);
    }
    assert_eq!(aggregate.category_averages[&Category::Trusting], 36.0);
}

#[test]
fn empty_response_counts_toward_the_denominator() {
    let service = service_with(ScoringConfig::default());
    service
        .submit(
            &company(),
            submission("Dana White", best_answers(&Category::ordered()), 3),
        )
        .expect("full response accepted");
    service
        .submit(&company(), submission("Dana White", RawAnswerBatch::new(), 4))
        .expect("empty response accepted");

    let aggregate = service
        .refresh(&company(), &key("Dana White"))
        .expect("aggregate computed")
        .aggregate;

    assert_eq!(aggregate.total_assessments, 2);
    for subcategory in Subcategory::ordered() {
        assert_eq!(aggregate.subcategory_averages[&subcategory], 4.5);
    }
    assert!(aggregate.category_identity_holds());
}

#[test]
fn answering_policy_is_an_explicit_opt_in() {
    let service = service_with(ScoringConfig {
        denominator: DenominatorPolicy::AnsweringResponses,
        ..ScoringConfig::default()
    });
    service
        .submit(
            &company(),
            submission("Dana White", best_answers(&Category::ordered()), 3),
        )
        .expect("accepted");
    service
        .submit(&company(), submission("Dana White", RawAnswerBatch::new(), 4))
        .expect("accepted");

    let aggregate = service
        .refresh(&company(), &key("Dana White"))
        .expect("aggregate computed")
        .aggregate;
    assert!(aggregate.subcategory_averages.values().all(|avg| *avg == 9.0));
}

#[test]
fn unknown_manager_is_distinguishable_from_zero_scores() {
    let service = service_with(ScoringConfig::default());
    let err = service
        .refresh(&company(), &key("Ghost Manager"))
        .expect_err("no responses");
    assert!(err.is_not_found());

    service
        .submit(&company(), submission("Zero Scores", RawAnswerBatch::new(), 3))
        .expect("accepted");
    let aggregate = service
        .refresh(&company(), &key("Zero Scores"))
        .expect("manager exists")
        .aggregate;
    assert_eq!(aggregate.total_assessments, 1);
    assert!(aggregate.category_averages.values().all(|avg| *avg == 0.0));
}

#[test]
fn csv_export_sweep_builds_every_manager() {
    let data = include_bytes!("fixtures/responses.csv");
    let submissions = parse_export(&data[..]).expect("export parses");
    assert_eq!(submissions.len(), 5);

    let service = service_with(ScoringConfig::default());
    for submission in submissions {
        service
            .submit(&company(), submission)
            .expect("row accepted");
    }

    let report = service.sweep(&company()).expect("sweep runs");
    assert_eq!(report.managers, 2);
    assert_eq!(report.created, 2);
    assert_eq!(report.failed, 0);

    let priya = service
        .aggregate(&company(), &key("Priya Nair"))
        .expect("priya aggregated");
    assert_eq!(priya.total_assessments, 3);
    assert_eq!(priya.complete_assessments, 2);
    assert!(priya.subcategory_averages.values().all(|avg| *avg == 5.0));
    assert_eq!(priya.category_averages[&Category::Tasking], 20.0);
    assert_eq!(priya.reporting_to.as_deref(), Some("Kai Olsen"));
    assert_eq!(priya.assessment_summaries[1].respondent_role, "direct report");
    assert_eq!(priya.assessment_summaries[2].respondent_role, "anonymous");

    let lee = service
        .aggregate(&company(), &key("Lee Chen"))
        .expect("lee aggregated");
    assert_eq!(lee.category_averages[&Category::Trusting], 32.0);
    assert_eq!(lee.category_averages[&Category::Tending], 14.0);
    assert_eq!(
        lee.subcategory_averages[&Subcategory::HonestyDependabilityFairness],
        8.0
    );

    let card = service
        .scorecard(&company(), &key("Lee Chen"))
        .expect("scorecard");
    let trusting = &card.categories[0];
    assert_eq!(trusting.percentage, 88.9);
    assert!(trusting
        .subcategories
        .iter()
        .all(|row| row.band == Band::Green));

    let overview = service.company_overview(&company()).expect("overview");
    assert_eq!(overview.manager_count, 2);
    assert_eq!(overview.assessment_count, 5);
    assert_eq!(overview.category_averages[0].average, 26.0);
    assert_eq!(overview.category_averages[1].average, 17.0);
}

#[test]
fn catalog_export_is_complete_and_read_only() {
    let catalog = QuestionCatalog::standard();
    assert_eq!(catalog.questions().len(), 36);
    assert!(catalog
        .questions()
        .iter()
        .all(|question| question.options == AnswerOption::ordered()));
    let json = serde_json::to_value(catalog.questions()).expect("catalog serializes");
    assert_eq!(json[0]["code"], "STR_1");
    assert_eq!(json[35]["code"], "STE_12");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn dispatcher_serializes_recomputes_per_manager() {
    let service = Arc::new(service_with(ScoringConfig::default()));
    let dispatcher = AggregationDispatcher::try_current(service.clone()).expect("runtime");

    let mut tickets = Vec::new();
    for day in 1..=10 {
        for name in ["Dana White", "Lee Chen"] {
            let answers = if day % 2 == 0 {
                RawAnswerBatch::new()
            } else {
                best_answers(&Category::ordered())
            };
            let (_, ticket) = dispatcher
                .submit_and_schedule(&company(), submission(name, answers, day))
                .expect("accepted");
            tickets.push(ticket);
        }
    }

    for ticket in tickets {
        ticket.wait().await.expect("aggregation succeeds");
    }
    dispatcher.shutdown().await;

    for name in ["Dana White", "Lee Chen"] {
        let aggregate = service
            .aggregate(&company(), &key(name))
            .expect("aggregate stored");
        assert_eq!(aggregate.total_assessments, 10);
        assert_eq!(aggregate.confidence_score, 50);
        assert!(aggregate
            .subcategory_averages
            .values()
            .all(|avg| *avg == 4.5));
    }
}
