use reconciler_core::database::{
    ArgValue, ColumnHandler, ColumnMap, Dialect, PositionalRewriter, QueryArg,
};
use reconciler_core::filters::{
    ConfigIdFilter, CreatedIntervalFilter, Filter, FilterError, FilterMixer, FilterSql,
    ReconcileIntervalFilter, RuntimeIdFilter, SchedulingIdFilter, StatusFilter,
};
use reconciler_core::models::OperationState;
use reconciler_core::repository::select_operations_query;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Records whether it was asked to render
#[derive(Debug, Default)]
struct RecordingFilter {
    rendered: Arc<AtomicBool>,
}

impl Filter for RecordingFilter {
    fn render(&self, _dialect: Dialect, _columns: &dyn ColumnHandler) -> Result<FilterSql, FilterError> {
        self.rendered.store(true, Ordering::SeqCst);
        Ok(FilterSql::new("1=1", Vec::new()))
    }
}

fn candidate_filter() -> FilterMixer {
    FilterMixer::new()
        .with(RuntimeIdFilter::new("runtime-1"))
        .with(ConfigIdFilter::new(3))
        .with(ReconcileIntervalFilter::new(Duration::from_secs(300)))
}

#[test]
fn test_candidate_selection_renders_for_postgres() {
    let rendered = candidate_filter()
        .render(Dialect::Postgres, &ColumnMap::operations())
        .unwrap();

    assert_eq!(
        rendered.sql,
        "runtime_id = :ridfRuntimeId AND config_version = :cidfConfigId AND \
         state IN (:rifReady, :rifReconcileRetryable, :rifDeleteRetryable) AND \
         updated <= NOW() - INTERVAL '300 SECOND'"
    );

    let query = PositionalRewriter::POSTGRES
        .rewrite(&rendered.sql, &rendered.args)
        .unwrap();
    assert_eq!(
        query.sql,
        "runtime_id = $1 AND config_version = $2 AND state IN ($3, $4, $5) AND \
         updated <= NOW() - INTERVAL '300 SECOND'"
    );
    assert_eq!(
        query.args,
        vec![
            ArgValue::from("runtime-1"),
            ArgValue::Int(3),
            ArgValue::from("ready"),
            ArgValue::from("reconcile_error_retryable"),
            ArgValue::from("delete_error_retryable"),
        ]
    );
}

#[test]
fn test_candidate_selection_renders_for_sqlite() {
    let rendered = candidate_filter()
        .render(Dialect::Sqlite, &ColumnMap::operations())
        .unwrap();

    assert_eq!(
        rendered.sql,
        "runtime_id = @ridfRuntimeId AND config_version = @cidfConfigId AND \
         state IN (@rifReady, @rifReconcileRetryable, @rifDeleteRetryable) AND \
         updated <= DATETIME('now', '-300 SECONDS')"
    );
    assert_eq!(rendered.args.len(), 5);
    assert!(PositionalRewriter::for_dialect(Dialect::Sqlite).is_none());
}

#[test]
fn test_failing_child_stops_composition() {
    let recorder = RecordingFilter::default();
    let rendered = Arc::clone(&recorder.rendered);
    let columns = ColumnMap::new().with("RuntimeID", "runtime_id");

    let err = FilterMixer::new()
        .with(RuntimeIdFilter::new("runtime-1"))
        .with(ConfigIdFilter::new(3))
        .with(recorder)
        .render(Dialect::Postgres, &columns)
        .unwrap_err();

    assert!(matches!(err, FilterError::Column(ref column) if column.logical == "ConfigID"));
    assert!(!rendered.load(Ordering::SeqCst));
}

#[test]
fn test_children_render_in_insertion_order() {
    let recorder = RecordingFilter::default();
    let rendered = Arc::clone(&recorder.rendered);

    let filter = FilterMixer::new()
        .with(StatusFilter::with_states(&[OperationState::New]))
        .with(recorder)
        .with(RuntimeIdFilter::new("runtime-1"));
    let result = filter
        .render(Dialect::Postgres, &ColumnMap::operations())
        .unwrap();

    assert!(rendered.load(Ordering::SeqCst));
    assert_eq!(
        result.sql,
        "state = :sfValue AND 1=1 AND runtime_id = :ridfRuntimeId"
    );
}

#[test]
fn test_two_status_filters_compose_with_distinct_placeholders() {
    let rendered = FilterMixer::new()
        .with(StatusFilter::new(["a", "b"]))
        .with(StatusFilter::with_states(&[OperationState::New, OperationState::Failed]))
        .render(Dialect::Postgres, &ColumnMap::operations())
        .unwrap();

    assert_eq!(
        rendered.sql,
        "state IN (:sf0, :sf1) AND state IN (:sf0_1, :sf1_1)"
    );

    let query = PositionalRewriter::POSTGRES
        .rewrite(&rendered.sql, &rendered.args)
        .unwrap();
    assert_eq!(query.sql, "state IN ($1, $2) AND state IN ($3, $4)");
    assert_eq!(
        query.args,
        vec![
            ArgValue::from("a"),
            ArgValue::from("b"),
            ArgValue::from("new"),
            ArgValue::from("failed"),
        ]
    );
}

#[test]
fn test_different_scheduling_ids_bind_separately() {
    let rendered = FilterMixer::new()
        .with(SchedulingIdFilter::new("scheduling-1"))
        .with(SchedulingIdFilter::new("scheduling-2"))
        .render(Dialect::Sqlite, &ColumnMap::operations())
        .unwrap();

    assert_eq!(
        rendered.sql,
        "scheduling_id = @sidfSchedulingId AND scheduling_id = @sidfSchedulingId_1"
    );
    assert_eq!(
        rendered.args,
        vec![
            QueryArg::named("sidfSchedulingId", "scheduling-1"),
            QueryArg::named("sidfSchedulingId_1", "scheduling-2"),
        ]
    );
}

#[test]
fn test_repeated_placeholder_with_same_value_binds_once() {
    let rendered = FilterMixer::new()
        .with(RuntimeIdFilter::new("runtime-1"))
        .with(CreatedIntervalFilter::new("runtime-1", Duration::from_secs(60)))
        .with(RuntimeIdFilter::new("runtime-1"))
        .render(Dialect::Postgres, &ColumnMap::operations())
        .unwrap();

    let query = PositionalRewriter::POSTGRES
        .rewrite(&rendered.sql, &rendered.args)
        .unwrap();

    assert_eq!(
        query.sql,
        "runtime_id = $1 AND runtime_id = $2 AND created >= NOW() - INTERVAL '60 SECOND' \
         AND runtime_id = $1"
    );
    assert_eq!(
        query.args,
        vec![ArgValue::from("runtime-1"), ArgValue::from("runtime-1")]
    );
}

#[test]
fn test_nested_mixers_flatten_into_one_predicate() {
    let inner = FilterMixer::new()
        .with(SchedulingIdFilter::new("scheduling-1"))
        .with(StatusFilter::with_states(&[OperationState::Done]));
    let outer = FilterMixer::new()
        .with(RuntimeIdFilter::new("runtime-1"))
        .with(inner);

    let rendered = outer
        .render(Dialect::Sqlite, &ColumnMap::operations())
        .unwrap();

    assert_eq!(
        rendered.sql,
        "runtime_id = @ridfRuntimeId AND scheduling_id = @sidfSchedulingId AND state = @sfValue"
    );
    assert_eq!(
        rendered.args,
        vec![
            QueryArg::named("ridfRuntimeId", "runtime-1"),
            QueryArg::named("sidfSchedulingId", "scheduling-1"),
            QueryArg::named("sfValue", "done"),
        ]
    );
}

#[test]
fn test_concurrent_rendering_is_deterministic() {
    let filter = Arc::new(candidate_filter());
    let columns = Arc::new(ColumnMap::operations());
    let expected = filter.render(Dialect::Postgres, columns.as_ref()).unwrap();

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let filter = Arc::clone(&filter);
                let columns = Arc::clone(&columns);
                scope.spawn(move || {
                    (0..100)
                        .map(|_| filter.render(Dialect::Postgres, columns.as_ref()).unwrap())
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        for handle in handles {
            for rendered in handle.join().unwrap() {
                assert_eq!(rendered, expected);
            }
        }
    });
}

#[test]
fn test_select_statement_for_candidate_operations() {
    let query = select_operations_query(
        "scheduler_operations",
        &ColumnMap::operations(),
        &candidate_filter(),
    )
    .unwrap();

    assert!(query.sql.starts_with(
        "SELECT scheduling_id, correlation_id, component, type, state, created, updated, \
         runtime_id, config_version FROM scheduler_operations WHERE runtime_id = $1"
    ));
    assert_eq!(query.args.len(), 5);
}
