//! Bulk engine integration tests
//!
//! Drive `BulkService` over the in-memory cell store and check the effects
//! that land in it.

#[cfg(test)]
mod tests {
    use crate::common::InMemoryCells;
    use crate::common::fixtures::{fast_write_options, mixed_batch, sales_queries, sales_writes};
    use serde_json::json;
    use std::time::Duration;
    use tm1_rs::{
        BatchSummary, BulkReadOptions, BulkService, CellQuery, CellValue, CellWrite, Tm1Error,
    };

    // ==================== Bulk Write ====================

    #[tokio::test]
    async fn test_sales_round_trip_with_single_cell_chunks() {
        let service = BulkService::new(InMemoryCells::new());

        service
            .execute_bulk_write(sales_writes(2), &fast_write_options().with_chunk_size(1))
            .await
            .unwrap();

        assert_eq!(
            service.cells().requests(),
            vec![("Sales".to_string(), 1), ("Sales".to_string(), 1)]
        );

        let values = service
            .execute_bulk_read(sales_queries(2), &BulkReadOptions::default().with_chunk_size(1))
            .await
            .unwrap();
        assert_eq!(
            values,
            vec![Some(CellValue::Number(100.0)), Some(CellValue::Number(200.0))]
        );
    }

    #[tokio::test]
    async fn test_chunks_cover_every_write_in_order() {
        let service = BulkService::new(InMemoryCells::new());

        service
            .execute_bulk_write(sales_writes(25), &fast_write_options().with_chunk_size(10))
            .await
            .unwrap();

        let sizes: Vec<usize> = service.cells().requests().into_iter().map(|(_, n)| n).collect();
        assert_eq!(sizes, vec![10, 10, 5]);
        assert_eq!(
            service.cells().value("Sales", &["2024", "P25"]),
            Some(CellValue::Number(2500.0))
        );
    }

    #[tokio::test]
    async fn test_transient_failures_are_retried() {
        let service = BulkService::new(InMemoryCells::new().fail_next_writes(3));

        service
            .execute_bulk_write(sales_writes(1), &fast_write_options().with_max_retries(3))
            .await
            .unwrap();

        assert_eq!(service.cells().write_calls(), 4);
        assert_eq!(service.cells().requests().len(), 1);
    }

    #[tokio::test]
    async fn test_exhausted_retries_surface_the_last_error() {
        let service = BulkService::new(InMemoryCells::new().fail_next_writes(10));

        let err = service
            .execute_bulk_write(sales_writes(3), &fast_write_options().with_max_retries(2))
            .await
            .unwrap_err();

        assert!(matches!(err, Tm1Error::BulkWriteFailure { attempts: 3, .. }));
        assert_eq!(err.status_code(), Some(503));
        assert_eq!(service.cells().write_calls(), 3);
        assert!(service.cells().requests().is_empty());
    }

    #[tokio::test]
    async fn test_failure_in_one_cube_stops_later_cubes() {
        let service = BulkService::new(InMemoryCells::new().without_cube("Plan"));
        let writes = vec![
            CellWrite::new("Sales", ["2024", "P01"], 1),
            CellWrite::new("Plan", ["2024", "P01"], 2),
            CellWrite::new("Margin", ["2024", "P01"], 3),
        ];

        let err = service
            .execute_bulk_write(writes, &fast_write_options().with_cancel_at_failure(true))
            .await
            .unwrap_err();

        assert!(matches!(err, Tm1Error::BulkWriteFailure { ref target, attempts: 1, .. } if target == "Plan"));
        assert!(service.cells().value("Sales", &["2024", "P01"]).is_some());
        assert!(service.cells().value("Margin", &["2024", "P01"]).is_none());
    }

    // ==================== Update and Delete ====================

    #[tokio::test]
    async fn test_update_and_delete() {
        let cells = InMemoryCells::new();
        cells.seed("Sales", &["2024", "P01"], 100);
        cells.seed("Sales", &["2024", "P02"], 100);
        let service = BulkService::new(cells);

        service
            .execute_bulk_update(
                vec![
                    CellWrite::new("Sales", ["2024", "P01"], 25).incrementing(true),
                    CellWrite::new("Sales", ["2024", "P02"], 25),
                ],
                &fast_write_options(),
            )
            .await
            .unwrap();
        assert_eq!(
            service.cells().value("Sales", &["2024", "P01"]),
            Some(CellValue::Number(125.0))
        );
        assert_eq!(
            service.cells().value("Sales", &["2024", "P02"]),
            Some(CellValue::Number(25.0))
        );

        service
            .execute_bulk_delete(
                vec![CellQuery::new("Sales", ["2024", "P01"])],
                &fast_write_options(),
            )
            .await
            .unwrap();
        assert_eq!(
            service.cells().value("Sales", &["2024", "P01"]),
            Some(CellValue::Number(0.0))
        );
    }

    // ==================== Bulk Read ====================

    #[tokio::test]
    async fn test_read_failures_do_not_abort_the_read() {
        let cells = InMemoryCells::new().without_cube("Plan");
        cells.seed("Sales", &["2024", "P01"], 1);
        let service = BulkService::new(cells);

        let values = service
            .execute_bulk_read(
                vec![
                    CellQuery::new("Plan", ["2024", "P01"]),
                    CellQuery::new("Sales", ["2024", "P01"]),
                ],
                &BulkReadOptions::default(),
            )
            .await
            .unwrap();

        assert_eq!(values, vec![None, Some(CellValue::Number(1.0))]);
        assert_eq!(service.cells().read_calls(), 2);
    }

    // ==================== Batches ====================

    #[tokio::test]
    async fn test_mixed_batch() {
        let service = BulkService::new(InMemoryCells::new());

        let results = service.execute_batch_operations(mixed_batch()).await;

        assert!(results.iter().all(|r| r.success));
        let indexes: Vec<usize> = results.iter().map(|r| r.index).collect();
        assert_eq!(indexes, vec![0, 1, 2, 3]);
        assert_eq!(results[2].result, Some(CellValue::Number(15.0)));
        assert_eq!(
            service.cells().value("Sales", &["2024", "P01"]),
            Some(CellValue::Number(0.0))
        );
    }

    #[tokio::test]
    async fn test_batch_json_items() {
        let service = BulkService::new(InMemoryCells::new().without_cube("Plan"));

        let results = service
            .execute_batch_json(vec![
                json!({ "kind": "Write", "target": "Sales", "coordinates": ["2024", "P01"], "value": 7 }),
                json!({ "kind": "write", "target": "Plan", "coordinates": ["2024", "P01"], "value": 7 }),
                json!({ "kind": "merge", "target": "Sales", "coordinates": ["2024", "P01"] }),
                json!({ "kind": "read", "target": "Sales", "coordinates": ["2024", "P01"] }),
            ])
            .await;
        let summary = BatchSummary::from_results(&results, Duration::ZERO);

        let flags: Vec<bool> = results.iter().map(|r| r.success).collect();
        assert_eq!(flags, vec![true, false, false, true]);
        assert!(results[2].error.as_deref().unwrap_or_default().contains("merge"));
        assert_eq!(results[3].result, Some(CellValue::Number(7.0)));
        assert_eq!(summary.succeeded, 2);
        assert_eq!(summary.failed, 2);
    }
}
