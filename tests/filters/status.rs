use proptest::prelude::*;
use reconciler_core::database::{ColumnMap, Dialect, QueryArg};
use reconciler_core::filters::{Filter, FilterError, StatusFilter};
use reconciler_core::models::OperationState;

fn columns() -> ColumnMap {
    ColumnMap::operations()
}

proptest! {
    #[test]
    fn test_distinct_statuses_render_one_placeholder_each(
        statuses in prop::collection::btree_set("[a-z_]{1,12}", 2..8)
    ) {
        let statuses: Vec<String> = statuses.into_iter().collect();

        for dialect in Dialect::ALL {
            let rendered = StatusFilter::new(&statuses).render(dialect, &columns()).unwrap();

            let placeholders: Vec<String> = (0..statuses.len())
                .map(|i| dialect.placeholder(&format!("sf{i}")))
                .collect();
            prop_assert_eq!(
                rendered.sql,
                format!("state IN ({})", placeholders.join(", "))
            );

            let bound: Vec<String> = rendered.args.iter().map(|arg| arg.value().to_string()).collect();
            prop_assert_eq!(&bound, &statuses);
        }
    }

    #[test]
    fn test_repeated_single_status_renders_equality(status in "[a-z]{1,10}", copies in 1usize..5) {
        let rendered = StatusFilter::new(std::iter::repeat(status.as_str()).take(copies))
            .render(Dialect::Sqlite, &columns())
            .unwrap();

        prop_assert_eq!(rendered.sql, "state = @sfValue");
        prop_assert_eq!(rendered.args, vec![QueryArg::named("sfValue", status.as_str())]);
    }
}

#[test]
fn test_operation_states_render_their_wire_names() {
    let rendered = StatusFilter::with_states(&[
        OperationState::Ready,
        OperationState::ReconcileErrorRetryable,
    ])
    .render(Dialect::Postgres, &columns())
    .unwrap();

    assert_eq!(rendered.sql, "state IN (:sf0, :sf1)");
    assert_eq!(
        rendered.args,
        vec![
            QueryArg::named("sf0", "ready"),
            QueryArg::named("sf1", "reconcile_error_retryable"),
        ]
    );
}

#[test]
fn test_empty_status_set_is_rejected_for_every_dialect() {
    for dialect in Dialect::ALL {
        let err = StatusFilter::new(Vec::<String>::new())
            .render(dialect, &columns())
            .unwrap_err();
        assert_eq!(err, FilterError::EmptyStatusSet);
    }
}

#[test]
fn test_unmapped_status_column_fails() {
    let err = StatusFilter::new(["ready"])
        .render(Dialect::Postgres, &ColumnMap::new())
        .unwrap_err();
    assert!(matches!(err, FilterError::Column(_)));
    assert!(err.to_string().contains("'Status'"));
}
