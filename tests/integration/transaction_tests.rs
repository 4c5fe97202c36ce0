//! Batch transaction integration tests

#[cfg(test)]
mod tests {
    use crate::common::InMemoryCells;
    use crate::common::fixtures::mixed_batch;
    use tm1_rs::{BulkService, CellValue, Operation, Tm1Error, TransactionStatus};

    #[tokio::test]
    async fn test_commit_runs_staged_operations() {
        let service = BulkService::new(InMemoryCells::new());
        let id = service.create_batch_transaction(vec![
            Operation::write("Sales", ["2024", "P01"], 10),
            Operation::update("Sales", ["2024", "P01"], 5, true),
        ]);

        assert_eq!(service.cells().write_calls(), 0);

        let results = service.commit_batch_transaction(&id).await.unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(
            service.cells().value("Sales", &["2024", "P01"]),
            Some(CellValue::Number(15.0))
        );

        let snapshot = service.transaction(&id).await.unwrap();
        assert_eq!(snapshot.status, TransactionStatus::Committed);
        assert!(matches!(
            service.rollback_batch_transaction(&id).await,
            Err(Tm1Error::TransactionInvalidState { .. })
        ));
    }

    #[tokio::test]
    async fn test_failed_commit_is_rolled_back_but_not_undone() {
        let service = BulkService::new(InMemoryCells::new().without_cube("Plan"));
        let id = service.create_batch_transaction(vec![
            Operation::write("Sales", ["2024", "P01"], 10),
            Operation::write("Plan", ["2024", "P01"], 10),
            Operation::write("Sales", ["2024", "P02"], 20),
        ]);

        let err = service.commit_batch_transaction(&id).await.unwrap_err();
        match err {
            Tm1Error::TransactionFailed {
                id: failed_id,
                failed,
                total,
            } => {
                assert_eq!(failed_id, id);
                assert_eq!((failed, total), (1, 3));
            }
            other => panic!("expected TransactionFailed, got {:?}", other),
        }

        assert_eq!(
            service.transaction(&id).await.map(|t| t.status),
            Some(TransactionStatus::RolledBack)
        );
        assert!(service.cells().value("Sales", &["2024", "P02"]).is_some());
        assert!(matches!(
            service.commit_batch_transaction(&id).await,
            Err(Tm1Error::TransactionInvalidState { .. })
        ));
    }

    #[tokio::test]
    async fn test_rollback_discards_without_remote_calls() {
        let service = BulkService::new(InMemoryCells::new());
        let id = service.create_batch_transaction(mixed_batch());

        service.rollback_batch_transaction(&id).await.unwrap();

        assert_eq!(service.cells().write_calls(), 0);
        assert_eq!(service.cells().read_calls(), 0);
        assert!(service.transaction(&id).await.is_none());
        assert!(matches!(
            service.commit_batch_transaction(&id).await,
            Err(Tm1Error::TransactionNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_concurrent_commits_run_once() {
        let service = BulkService::new(InMemoryCells::new());
        let id = service.create_batch_transaction(vec![Operation::update(
            "Sales",
            ["2024", "P01"],
            1,
            true,
        )]);
        service.cells().seed("Sales", &["2024", "P01"], 0);

        let (first, second) = tokio::join!(
            service.commit_batch_transaction(&id),
            service.commit_batch_transaction(&id)
        );

        let committed = [&first, &second].iter().filter(|r| r.is_ok()).count();
        assert_eq!(committed, 1);
        assert!(
            matches!(first, Err(Tm1Error::TransactionInvalidState { .. }))
                || matches!(second, Err(Tm1Error::TransactionInvalidState { .. }))
        );
        assert_eq!(
            service.cells().value("Sales", &["2024", "P01"]),
            Some(CellValue::Number(1.0))
        );
    }

    #[tokio::test]
    async fn test_list_transactions() {
        let service = BulkService::new(InMemoryCells::new());
        let a = service.create_batch_transaction(mixed_batch());
        let b = service.create_batch_transaction(Vec::new());

        let listed = service.list_transactions().await;
        let ids: Vec<&str> = listed.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(listed.len(), 2);
        assert!(ids.contains(&a.as_str()));
        assert!(ids.contains(&b.as_str()));
        assert!(listed.iter().all(|t| t.status == TransactionStatus::Pending));
    }
}
