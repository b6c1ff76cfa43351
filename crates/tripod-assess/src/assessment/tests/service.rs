use std::sync::Arc;

use crate::assessment::catalog::Category;
use crate::assessment::domain::FormSubmission;
use crate::assessment::engine::AssessmentEngine;
use crate::assessment::intake::RawAnswerBatch;
use crate::assessment::memory::InMemoryAssessmentStore;
use crate::assessment::remarks::Band;
use crate::assessment::repository::{AggregateStore, ResponseStore, SnapshotWrite};
use crate::assessment::service::{AssessmentService, ServiceError, DEFAULT_RESPONDENT_ROLE};

use super::common::{
    at, best_answers, build_service, clock_time, company, manager, submission, AheadAggregates,
    UnavailableStore,
};

#[test]
fn submit_normalizes_identity_and_stores_response() {
    let (service, store) = build_service();

    let receipt = service
        .submit(
            &company(),
            submission(
                "  dana   WHITE ",
                Some("sam lee"),
                best_answers(&Category::ordered()),
                at(3, 9),
            ),
        )
        .expect("submission accepted");

    assert_eq!(receipt.manager.as_str(), "Dana White");
    assert!(receipt.is_complete);
    assert_eq!(receipt.overall_score, 100.0);
    assert!(receipt.response_id.0.starts_with("resp-"));

    let stored = store
        .responses_for(&company(), &manager("Dana White"))
        .expect("store readable");
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].raw_manager_name, "dana   WHITE");
    assert_eq!(stored[0].reporting_to.as_deref(), Some("Sam Lee"));
    assert_eq!(stored[0].respondent_role, DEFAULT_RESPONDENT_ROLE);
}

#[test]
fn submit_without_manager_name_is_rejected() {
    let (service, store) = build_service();
    let submission = FormSubmission {
        answers: best_answers(&[Category::Tasking]),
        ..FormSubmission::default()
    };

    let err = service
        .submit(&company(), submission)
        .expect_err("no manager");
    assert!(matches!(err, ServiceError::MissingManagerName));
    assert_eq!(store.response_count().expect("count"), 0);
}

#[test]
fn submit_reads_identity_from_form_labels() {
    let (service, _) = build_service();
    let mut answers = best_answers(&[Category::Tending]);
    answers.insert("Your manager's full name", "ana  lima");
    answers.insert("Who does your manager report to?", "joe ruiz");

    let receipt = service
        .submit(
            &company(),
            FormSubmission {
                answers,
                ..FormSubmission::default()
            },
        )
        .expect("submission accepted");

    assert_eq!(receipt.manager.as_str(), "Ana Lima");
    assert_eq!(receipt.answered_count, 12);
    assert!(!receipt.is_complete);
}

#[test]
fn missing_timestamp_uses_the_clock() {
    let (service, store) = build_service();
    let mut submission = submission("Dana White", None, RawAnswerBatch::new(), at(1, 0));
    submission.submitted_at = None;

    service.submit(&company(), submission).expect("accepted");

    let stored = store
        .responses_for(&company(), &manager("Dana White"))
        .expect("store readable");
    assert_eq!(stored[0].submitted_at, clock_time());
}

#[test]
fn form_id_reaches_record_and_summary() {
    let (service, store) = build_service();
    let submission = FormSubmission {
        form_id: Some(" tripod-2025 ".to_string()),
        ..submission("Dana White", None, best_answers(&[Category::Tasking]), at(3, 9))
    };

    let receipt = service.submit(&company(), submission).expect("accepted");
    assert_eq!(receipt.form_id.as_deref(), Some("tripod-2025"));

    let stored = store
        .responses_for(&company(), &manager("Dana White"))
        .expect("store readable");
    assert_eq!(stored[0].form_id.as_deref(), Some("tripod-2025"));

    let refresh = service
        .refresh(&company(), &manager("Dana White"))
        .expect("refresh succeeds");
    let summary = &refresh.aggregate.assessment_summaries[0];
    assert_eq!(summary.form_id.as_deref(), Some("tripod-2025"));
}

#[test]
fn blank_form_id_is_dropped() {
    let (service, _) = build_service();
    let submission = FormSubmission {
        form_id: Some("   ".to_string()),
        ..submission("Dana White", None, RawAnswerBatch::new(), at(3, 9))
    };

    let receipt = service.submit(&company(), submission).expect("accepted");
    assert_eq!(receipt.form_id, None);
}

#[test]
fn refresh_recomputes_and_persists() {
    let (service, store) = build_service();
    for (day, answers) in [
        (3, best_answers(&Category::ordered())),
        (4, RawAnswerBatch::new()),
    ] {
        service
            .submit(
                &company(),
                submission("Dana White", Some("Sam Lee"), answers, at(day, 9)),
            )
            .expect("accepted");
    }

    let refresh = service
        .refresh(&company(), &manager("Dana White"))
        .expect("refresh succeeds");
    assert_eq!(
        refresh.write,
        SnapshotWrite::Written {
            previous_revision: None
        }
    );
    assert_eq!(refresh.aggregate.total_assessments, 2);
    assert_eq!(refresh.aggregate.category_average(Category::Trusting), 18.0);

    let stored = store
        .fetch(&company(), &manager("Dana White"))
        .expect("readable")
        .expect("aggregate stored");
    assert_eq!(stored, refresh.aggregate);

    let again = service
        .refresh(&company(), &manager("Dana White"))
        .expect("refresh succeeds");
    assert_eq!(again.aggregate, refresh.aggregate);
    assert_eq!(
        again.write,
        SnapshotWrite::Written {
            previous_revision: Some(2)
        }
    );
}

#[test]
fn refresh_unknown_manager_is_not_found() {
    let (service, _) = build_service();
    let err = service
        .refresh(&company(), &manager("Nobody Here"))
        .expect_err("no responses");
    assert!(err.is_not_found());

    let err = service
        .aggregate(&company(), &manager("Nobody Here"))
        .expect_err("no aggregate");
    assert!(err.is_not_found());
}

#[test]
fn submitted_but_unaggregated_manager_is_distinct_from_unknown() {
    let (service, _) = build_service();
    service
        .submit(
            &company(),
            submission("Dana White", None, RawAnswerBatch::new(), at(3, 9)),
        )
        .expect("accepted");

    let err = service
        .aggregate(&company(), &manager("Dana White"))
        .expect_err("nothing aggregated yet");
    assert!(!err.is_not_found());
    assert!(matches!(
        err,
        ServiceError::NotAggregated { ref manager, responses: 1, .. }
            if manager.as_str() == "Dana White"
    ));
    assert!(err.to_string().contains("no aggregate yet"));

    service
        .refresh(&company(), &manager("Dana White"))
        .expect("refresh succeeds");
    assert!(service.aggregate(&company(), &manager("Dana White")).is_ok());
}

#[test]
fn stale_snapshot_is_reported_not_written() {
    let responses = Arc::new(InMemoryAssessmentStore::new());
    let service = AssessmentService::new(
        responses,
        Arc::new(AheadAggregates),
        Arc::new(AssessmentEngine::default()),
    );
    service
        .submit(
            &company(),
            submission("Dana White", None, RawAnswerBatch::new(), at(3, 9)),
        )
        .expect("accepted");

    let refresh = service
        .refresh(&company(), &manager("Dana White"))
        .expect("refresh completes");
    assert!(!refresh.write.is_written());
}

#[test]
fn storage_failures_propagate() {
    let store = Arc::new(UnavailableStore);
    let service = AssessmentService::new(
        store.clone(),
        store,
        Arc::new(AssessmentEngine::default()),
    );

    let err = service
        .submit(
            &company(),
            submission("Dana White", None, RawAnswerBatch::new(), at(3, 9)),
        )
        .expect_err("insert fails");
    assert!(matches!(err, ServiceError::Repository(_)));

    let err = service.sweep(&company()).expect_err("listing fails");
    assert!(matches!(err, ServiceError::Repository(_)));
}

#[test]
fn sweep_counts_created_and_updated() {
    let (service, _) = build_service();
    for name in ["Dana White", "Lee Chen", "Ana Lima"] {
        service
            .submit(
                &company(),
                submission(name, None, best_answers(&[Category::Trusting]), at(3, 9)),
            )
            .expect("accepted");
    }
    service
        .refresh(&company(), &manager("Lee Chen"))
        .expect("refresh");

    let report = service.sweep(&company()).expect("sweep runs");
    assert_eq!(report.managers, 3);
    assert_eq!(report.created, 2);
    assert_eq!(report.updated, 1);
    assert_eq!(report.failed, 0);
}

#[test]
fn sweep_counts_stale_snapshots() {
    let service = AssessmentService::new(
        Arc::new(InMemoryAssessmentStore::new()),
        Arc::new(AheadAggregates),
        Arc::new(AssessmentEngine::default()),
    );
    for name in ["Dana White", "Lee Chen"] {
        service
            .submit(
                &company(),
                submission(name, None, RawAnswerBatch::new(), at(3, 9)),
            )
            .expect("accepted");
    }

    let report = service.sweep(&company()).expect("sweep runs");
    assert_eq!(report.managers, 2);
    assert_eq!(report.stale, 2);
    assert_eq!(report.created + report.updated + report.failed, 0);
}

#[test]
fn scorecard_and_overview_present_percentages() {
    let (service, _) = build_service();
    service
        .submit(
            &company(),
            submission(
                "Dana White",
                Some("Sam Lee"),
                best_answers(&[Category::Trusting, Category::Tasking]),
                at(3, 9),
            ),
        )
        .expect("accepted");
    service
        .submit(
            &company(),
            submission("Lee Chen", None, best_answers(&Category::ordered()), at(3, 10)),
        )
        .expect("accepted");
    service.sweep(&company()).expect("sweep");

    let card = service
        .scorecard(&company(), &manager("Dana White"))
        .expect("scorecard");
    assert_eq!(card.categories.len(), 3);
    assert_eq!(card.categories[0].percentage, 100.0);
    assert_eq!(card.categories[2].percentage, 0.0);
    assert_eq!(card.overall_percentage, 66.7);
    let row = &card.categories[0].subcategories[0];
    assert_eq!(row.band, Band::Green);
    assert_eq!(row.grade, "Above Average");
    assert!(!row.remark.is_empty());

    let overview = service.company_overview(&company()).expect("overview");
    assert_eq!(overview.manager_count, 2);
    assert_eq!(overview.assessment_count, 2);
    let tending = &overview.category_averages[2];
    assert_eq!(tending.category, Category::Tending);
    assert_eq!(tending.average, 18.0);
    let green = overview
        .band_counts
        .iter()
        .find(|count| count.band == Band::Green)
        .expect("green row");
    assert_eq!(green.count, 20);
}
