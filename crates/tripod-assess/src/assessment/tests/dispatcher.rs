use std::sync::Arc;

use crate::assessment::catalog::Category;
use crate::assessment::dispatcher::{AggregationDispatcher, DispatchError};
use crate::assessment::intake::RawAnswerBatch;
use crate::assessment::memory::InMemoryAssessmentStore;
use crate::assessment::repository::AggregateStore;

use super::common::{at, best_answers, build_service, company, manager, submission};

type MemoryDispatcher = AggregationDispatcher<InMemoryAssessmentStore, InMemoryAssessmentStore>;

fn dispatcher() -> (MemoryDispatcher, Arc<InMemoryAssessmentStore>) {
    let (service, store) = build_service();
    let dispatcher =
        AggregationDispatcher::try_current(Arc::new(service)).expect("inside a tokio runtime");
    (dispatcher, store)
}

#[tokio::test]
async fn scheduled_recompute_sees_the_submission() {
    let (dispatcher, store) = dispatcher();

    let (receipt, ticket) = dispatcher
        .submit_and_schedule(
            &company(),
            submission(
                "Dana White",
                Some("Sam Lee"),
                best_answers(&[Category::Trusting]),
                at(3, 9),
            ),
        )
        .expect("submission accepted");

    let refresh = ticket.wait().await.expect("aggregation succeeds");
    assert_eq!(refresh.aggregate.revision, receipt.sequence);
    assert_eq!(refresh.aggregate.category_average(Category::Trusting), 36.0);

    let stored = store
        .fetch(&company(), &manager("Dana White"))
        .expect("readable")
        .expect("aggregate stored");
    assert_eq!(stored.total_assessments, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn bursts_for_one_manager_converge() {
    let (dispatcher, store) = dispatcher();
    let mut tickets = Vec::new();

    for hour in 0..20 {
        let answers = if hour % 2 == 0 {
            best_answers(&Category::ordered())
        } else {
            RawAnswerBatch::new()
        };
        let (_, ticket) = dispatcher
            .submit_and_schedule(
                &company(),
                submission("Dana White", None, answers, at(3, hour)),
            )
            .expect("accepted");
        tickets.push(ticket);
    }

    for ticket in tickets {
        ticket.wait().await.expect("aggregation succeeds");
    }

    let stored = store
        .fetch(&company(), &manager("Dana White"))
        .expect("readable")
        .expect("aggregate stored");
    assert_eq!(stored.total_assessments, 20);
    assert_eq!(stored.revision, 20);
    assert_eq!(stored.category_average(Category::Tasking), 18.0);
    assert_eq!(stored.confidence_score, 100);
    assert_eq!(dispatcher.worker_count(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn idle_workers_retire_once_queues_drain() {
    let (dispatcher, _) = dispatcher();
    let mut tickets = Vec::new();
    for index in 0..50 {
        let name = format!("Manager {index}");
        let (_, ticket) = dispatcher
            .submit_and_schedule(
                &company(),
                submission(&name, None, best_answers(&[Category::Trusting]), at(3, 9)),
            )
            .expect("accepted");
        tickets.push(ticket);
    }

    for ticket in tickets {
        ticket.wait().await.expect("aggregation succeeds");
    }
    assert_eq!(dispatcher.worker_count(), 0);
}

#[tokio::test]
async fn retired_manager_gets_a_fresh_worker() {
    let (dispatcher, store) = dispatcher();

    for day in [3, 4] {
        let (_, ticket) = dispatcher
            .submit_and_schedule(
                &company(),
                submission("Dana White", None, best_answers(&[Category::Tasking]), at(day, 9)),
            )
            .expect("accepted");
        let refresh = ticket.wait().await.expect("aggregation succeeds");
        assert_eq!(refresh.aggregate.total_assessments, day as usize - 2);
        assert_eq!(dispatcher.worker_count(), 0);
    }

    let stored = store
        .fetch(&company(), &manager("Dana White"))
        .expect("readable")
        .expect("aggregate stored");
    assert_eq!(stored.total_assessments, 2);
}

#[tokio::test]
async fn managers_get_their_own_workers() {
    let (dispatcher, _) = dispatcher();

    let mut tickets = Vec::new();
    for name in ["Dana White", "Lee Chen"] {
        let (_, ticket) = dispatcher
            .submit_and_schedule(
                &company(),
                submission(name, None, best_answers(&[Category::Tending]), at(3, 9)),
            )
            .expect("accepted");
        tickets.push(ticket);
    }

    assert_eq!(dispatcher.worker_count(), 2);
    for ticket in tickets {
        let refresh = ticket.wait().await.expect("aggregation succeeds");
        assert_eq!(refresh.aggregate.total_assessments, 1);
    }
}

#[tokio::test]
async fn unknown_manager_resolves_not_found() {
    let (dispatcher, _) = dispatcher();

    let outcome = dispatcher
        .schedule(&company(), &manager("Nobody Here"))
        .wait()
        .await;

    assert!(matches!(outcome, Err(DispatchError::NotFound { .. })));
}

#[tokio::test]
async fn dropped_tickets_still_run() {
    let (dispatcher, store) = dispatcher();

    let (_, ticket) = dispatcher
        .submit_and_schedule(
            &company(),
            submission("Dana White", None, best_answers(&[]), at(3, 9)),
        )
        .expect("accepted");
    drop(ticket);

    dispatcher.shutdown().await;
    let stored = store
        .fetch(&company(), &manager("Dana White"))
        .expect("readable");
    assert!(stored.is_some());
}

#[tokio::test]
async fn shutdown_closes_the_queues() {
    let (dispatcher, _) = dispatcher();
    dispatcher
        .submit_and_schedule(
            &company(),
            submission("Dana White", None, best_answers(&[]), at(3, 9)),
        )
        .expect("accepted");

    dispatcher.shutdown().await;
    assert_eq!(dispatcher.worker_count(), 0);

    for name in ["Dana White", "Lee Chen"] {
        let outcome = dispatcher.schedule(&company(), &manager(name)).wait().await;
        assert_eq!(outcome.map(|_| ()), Err(DispatchError::Closed));
    }
    assert_eq!(dispatcher.worker_count(), 0);
}

#[test]
fn requires_a_runtime() {
    let (service, _) = build_service();
    let result = AggregationDispatcher::try_current(Arc::new(service));
    assert!(matches!(result, Err(DispatchError::NoRuntime)));
}
