use crate::mocks::{cluster_state, operation, MockInvoker, MockRepository};
use reconciler_core::database::QueryArg;
use reconciler_core::models::OperationState;
use reconciler_core::scheduler::{RetryError, RetryPolicy, Worker, WorkerError, WorkerOutcome};
use reconciler_core::WorkerConfig;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

fn worker(
    repository: &Arc<MockRepository>,
    invoker: &Arc<MockInvoker>,
    attempts: u32,
    delay: Duration,
) -> Worker {
    Worker::new(
        repository.clone(),
        invoker.clone(),
        RetryPolicy::new(attempts, delay),
    )
}

#[tokio::test]
async fn test_non_processable_operations_are_skipped_without_calls() {
    for state in [
        OperationState::Done,
        OperationState::Error,
        OperationState::InProgress,
    ] {
        let repository = Arc::new(MockRepository::returning(Vec::new()));
        let invoker = Arc::new(MockInvoker::succeeding());

        let outcome = worker(&repository, &invoker, 3, Duration::from_millis(1))
            .run(
                &CancellationToken::new(),
                cluster_state(&["istio"]),
                &operation("istio", state),
                5,
            )
            .await
            .unwrap();

        assert_eq!(outcome, WorkerOutcome::Skipped { state });
        assert!(repository.queries().is_empty());
        assert_eq!(invoker.calls(), 0);
    }
}

#[tokio::test]
async fn test_ready_set_is_distinct_done_components() {
    let repository = Arc::new(MockRepository::returning(vec![
        operation("serverless", OperationState::Done),
        operation("istio", OperationState::Done),
        operation("serverless", OperationState::Done),
    ]));
    let invoker = Arc::new(MockInvoker::succeeding());

    let outcome = worker(&repository, &invoker, 3, Duration::from_millis(1))
        .run(
            &CancellationToken::new(),
            cluster_state(&["istio", "serverless", "eventing"]),
            &operation("eventing", OperationState::New),
            7,
        )
        .await
        .unwrap();

    assert_eq!(outcome, WorkerOutcome::Completed { attempts: 1 });

    let params = invoker.params();
    assert_eq!(params.len(), 1);
    let expected: BTreeSet<String> = ["istio", "serverless"]
        .into_iter()
        .map(String::from)
        .collect();
    assert_eq!(params[0].components_ready, expected);
    assert_eq!(params[0].component_to_reconcile.name, "eventing");
    assert_eq!(params[0].scheduling_id, "scheduling-1");
    assert_eq!(params[0].correlation_id, "correlation-eventing");
    assert_eq!(params[0].max_operation_retries, 7);
}

#[tokio::test]
async fn test_dependency_query_selects_done_operations_of_the_run() {
    let repository = Arc::new(MockRepository::returning(Vec::new()));
    let invoker = Arc::new(MockInvoker::succeeding());

    worker(&repository, &invoker, 1, Duration::ZERO)
        .run(
            &CancellationToken::new(),
            cluster_state(&["istio"]),
            &operation("istio", OperationState::New),
            5,
        )
        .await
        .unwrap();

    let queries = repository.queries();
    assert_eq!(queries.len(), 1);
    assert_eq!(
        queries[0].sql,
        "scheduling_id = @sidfSchedulingId AND state = @sfValue"
    );
    assert_eq!(
        queries[0].args,
        vec![
            QueryArg::named("sidfSchedulingId", "scheduling-1"),
            QueryArg::named("sfValue", "done"),
        ]
    );
}

#[tokio::test]
async fn test_missing_component_is_fatal_and_not_retried() {
    let repository = Arc::new(MockRepository::returning(Vec::new()));
    let invoker = Arc::new(MockInvoker::succeeding());

    let err = worker(&repository, &invoker, 3, Duration::from_millis(1))
        .run(
            &CancellationToken::new(),
            cluster_state(&["istio"]),
            &operation("eventing", OperationState::New),
            5,
        )
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        WorkerError::ComponentNotConfigured { ref runtime_id, ref component }
            if runtime_id == "runtime-1" && component == "eventing"
    ));
    assert_eq!(invoker.calls(), 0);
}

#[tokio::test]
async fn test_repository_failure_propagates() {
    let repository = Arc::new(MockRepository::failing("connection reset"));
    let invoker = Arc::new(MockInvoker::succeeding());

    let err = worker(&repository, &invoker, 3, Duration::from_millis(1))
        .run(
            &CancellationToken::new(),
            cluster_state(&["istio"]),
            &operation("istio", OperationState::New),
            5,
        )
        .await
        .unwrap_err();

    assert!(matches!(err, WorkerError::Repository(_)));
    assert_eq!(invoker.calls(), 0);
}

#[tokio::test]
async fn test_transient_failures_are_retried() {
    let repository = Arc::new(MockRepository::returning(Vec::new()));
    let invoker = Arc::new(MockInvoker::failing_times(2));

    let outcome = worker(&repository, &invoker, 3, Duration::from_millis(5))
        .run(
            &CancellationToken::new(),
            cluster_state(&["istio"]),
            &operation("istio", OperationState::Failed),
            5,
        )
        .await
        .unwrap();

    assert_eq!(outcome, WorkerOutcome::Completed { attempts: 3 });
    assert_eq!(invoker.calls(), 3);
}

#[tokio::test]
async fn test_exhausted_retries_return_every_attempt_error() {
    let repository = Arc::new(MockRepository::returning(Vec::new()));
    let invoker = Arc::new(MockInvoker::always_failing());
    let started = Instant::now();

    let err = worker(&repository, &invoker, 3, Duration::from_millis(25))
        .run(
            &CancellationToken::new(),
            cluster_state(&["istio"]),
            &operation("istio", OperationState::New),
            5,
        )
        .await
        .unwrap_err();

    assert_eq!(invoker.calls(), 3);
    assert!(started.elapsed() >= Duration::from_millis(50));
    assert!(!err.is_cancelled());

    let WorkerError::Invocation { source, .. } = err else {
        panic!("expected an invocation error");
    };
    assert!(matches!(source, RetryError::Exhausted { .. }));
    let attempts: Vec<u32> = source.attempts().iter().map(|f| f.attempt).collect();
    assert_eq!(attempts, vec![1, 2, 3]);
}

#[tokio::test]
async fn test_cancellation_during_delay_aborts_remaining_attempts() {
    let repository = Arc::new(MockRepository::returning(Vec::new()));
    let invoker = Arc::new(MockInvoker::always_failing());
    let cancel = CancellationToken::new();

    let canceller = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        canceller.cancel();
    });

    let started = Instant::now();
    let err = worker(&repository, &invoker, 5, Duration::from_secs(30))
        .run(
            &cancel,
            cluster_state(&["istio"]),
            &operation("istio", OperationState::New),
            5,
        )
        .await
        .unwrap_err();

    assert!(started.elapsed() < Duration::from_secs(5));
    assert!(err.is_cancelled());
    assert_eq!(invoker.calls(), 1);
}

#[tokio::test]
async fn test_cancellation_aborts_running_attempt() {
    let repository = Arc::new(MockRepository::returning(Vec::new()));
    let invoker = Arc::new(MockInvoker::succeeding().with_latency(Duration::from_secs(30)));
    let cancel = CancellationToken::new();

    let canceller = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        canceller.cancel();
    });

    let err = worker(&repository, &invoker, 3, Duration::from_millis(1))
        .run(
            &cancel,
            cluster_state(&["istio"]),
            &operation("istio", OperationState::New),
            5,
        )
        .await
        .unwrap_err();

    assert!(err.is_cancelled());
    assert_eq!(invoker.calls(), 1);
}

#[tokio::test]
async fn test_worker_built_from_config() {
    let repository = Arc::new(MockRepository::returning(Vec::new()));
    let invoker = Arc::new(MockInvoker::succeeding());
    let config = WorkerConfig {
        max_retries: 2,
        retry_delay_ms: 10,
        max_operation_retries: 3,
    };

    let worker = Worker::from_config(repository, invoker, &config);

    assert_eq!(
        worker.retry_policy(),
        RetryPolicy::new(2, Duration::from_millis(10))
    );
}
