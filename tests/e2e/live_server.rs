//! E2E tests against a live TM1 server
//!
//! Run with: TM1_BASE_URL=xxx TM1_USER=xxx TM1_PASSWORD=xxx cargo test -- --ignored live

#[cfg(test)]
mod tests {
    use crate::skip_without_env;
    use tm1_rs::{BulkReadOptions, CellQuery, CellWrite, Operation, Tm1Client};

    fn test_cube() -> String {
        std::env::var("TM1_TEST_CUBE").unwrap_or_else(|_| "Sales".to_string())
    }

    /// Write, read back and clear one cell on a live server
    #[tokio::test]
    #[ignore]
    async fn test_live_bulk_round_trip() {
        skip_without_env!("TM1_BASE_URL");
        skip_without_env!("TM1_TEST_COORDINATES");
        let client = Tm1Client::from_env().expect("Failed to create client from env");
        let cube = test_cube();
        let coordinates: Vec<String> = std::env::var("TM1_TEST_COORDINATES")
            .unwrap_or_default()
            .split(',')
            .map(|c| c.trim().to_string())
            .collect();
        let dimensions = client
            .cells()
            .dimension_names(&cube)
            .await
            .expect("Failed to read cube dimensions");
        assert_eq!(coordinates.len(), dimensions.len());

        let options = client.bulk().write_options().with_chunk_size(1);
        client
            .bulk()
            .execute_bulk_write(
                vec![CellWrite::new(cube.as_str(), coordinates.clone(), 42)],
                &options,
            )
            .await
            .expect("Bulk write failed");

        let values = client
            .bulk()
            .execute_bulk_read(
                vec![CellQuery::new(cube.as_str(), coordinates.clone())],
                &BulkReadOptions::default(),
            )
            .await
            .expect("Bulk read failed");
        assert_eq!(values[0].as_ref().and_then(|v| v.as_f64()), Some(42.0));

        let results = client
            .bulk()
            .execute_batch_operations(vec![Operation::delete(cube.as_str(), coordinates)])
            .await;
        assert!(results[0].success, "Clearing the cell failed: {:?}", results[0].error);
    }

    /// Run a process asynchronously on a live server
    #[tokio::test]
    #[ignore]
    async fn test_live_process_polling() {
        skip_without_env!("TM1_BASE_URL");
        skip_without_env!("TM1_TEST_PROCESS");
        let client = Tm1Client::from_env().expect("Failed to create client from env");
        let process = std::env::var("TM1_TEST_PROCESS").unwrap_or_default();

        let result = client
            .processes()
            .poll_execute_with_return(&process, &[], None)
            .await
            .expect("Process polling failed");
        assert!(result.is_success(), "Process finished with {}", result.status_code);
    }
}
