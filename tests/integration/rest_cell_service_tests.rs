//! Cell service and bulk engine tests against a mock server

#[cfg(test)]
mod tests {
    use crate::common::MockTm1;
    use crate::common::fixtures::{fast_write_options, sales_writes};
    use serde_json::{Value, json};
    use tm1_rs::{
        BulkService, CellService, CellUpdate, CellValue, RestCellService, RestTransport, Tm1Client,
        Tm1Error,
    };
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, ResponseTemplate};

    fn service(mock: &MockTm1) -> RestCellService<RestTransport> {
        RestCellService::new(RestTransport::new(&mock.config().connection).unwrap())
    }

    async fn mount_update(mock: &MockTm1, status: u16) {
        Mock::given(method("POST"))
            .and(path(MockTm1::api_path("Cubes('Sales')/tm1.Update")))
            .respond_with(ResponseTemplate::new(status))
            .mount(&mock.server)
            .await;
    }

    #[tokio::test]
    async fn test_write_values_binds_elements_in_dimension_order() {
        let mock = MockTm1::start().await;
        mock.mount_dimensions("Sales", &["Year", "Period"]).await;
        mount_update(&mock, 204).await;

        service(&mock)
            .write_values(
                "Sales",
                &[
                    CellUpdate::new(vec!["2024".into(), "Q1".into()], 100),
                    CellUpdate::new(vec!["2024".into(), "Q2".into()], "n/a"),
                ],
            )
            .await
            .unwrap();

        let requests = mock.requests_to("Cubes('Sales')/tm1.Update").await;
        assert_eq!(requests.len(), 1);
        let body: Value = requests[0].body_json().unwrap();
        assert_eq!(
            body,
            json!([
                {
                    "Cells": [{ "Tuple@odata.bind": [
                        "Dimensions('Year')/Hierarchies('Year')/Elements('2024')",
                        "Dimensions('Period')/Hierarchies('Period')/Elements('Q1')"
                    ]}],
                    "Value": 100.0
                },
                {
                    "Cells": [{ "Tuple@odata.bind": [
                        "Dimensions('Year')/Hierarchies('Year')/Elements('2024')",
                        "Dimensions('Period')/Hierarchies('Period')/Elements('Q2')"
                    ]}],
                    "Value": "n/a"
                }
            ])
        );
    }

    #[tokio::test]
    async fn test_wrong_coordinate_count_is_rejected_locally() {
        let mock = MockTm1::start().await;
        mock.mount_dimensions("Sales", &["Year", "Period"]).await;

        let err = service(&mock)
            .write_values("Sales", &[CellUpdate::new(vec!["2024".into()], 1)])
            .await
            .unwrap_err();

        assert!(matches!(err, Tm1Error::InvalidRequest(_)));
        assert!(mock.requests_to("Cubes('Sales')/tm1.Update").await.is_empty());
    }

    #[tokio::test]
    async fn test_increment_adds_to_current_value() {
        let mock = MockTm1::start().await;
        mock.mount_dimensions("Sales", &["Year", "Period"]).await;
        mock.mount_single_cell(json!(40)).await;
        mount_update(&mock, 204).await;

        service(&mock)
            .write_values(
                "Sales",
                &[CellUpdate::new(vec!["2024".into(), "Q1".into()], 2).incrementing(true)],
            )
            .await
            .unwrap();

        let requests = mock.requests_to("Cubes('Sales')/tm1.Update").await;
        let body: Value = requests[0].body_json().unwrap();
        assert_eq!(body[0]["Value"], json!(42.0));

        let mdx: Value = mock.requests_to("ExecuteMDX").await[0].body_json().unwrap();
        assert_eq!(
            mdx["MDX"],
            "SELECT {([Year].[Year].[2024], [Period].[Period].[Q1])} ON 0 FROM [Sales]"
        );
    }

    #[tokio::test]
    async fn test_repeated_increments_in_one_request_accumulate() {
        let mock = MockTm1::start().await;
        mock.mount_dimensions("Sales", &["Year", "Period"]).await;
        mock.mount_single_cell(json!(10)).await;
        mount_update(&mock, 204).await;

        let q1 = || vec!["2024".to_string(), "Q1".to_string()];
        service(&mock)
            .write_values(
                "Sales",
                &[
                    CellUpdate::new(q1(), 5).incrementing(true),
                    CellUpdate::new(q1(), 5).incrementing(true),
                ],
            )
            .await
            .unwrap();

        let requests = mock.requests_to("Cubes('Sales')/tm1.Update").await;
        let body: Value = requests[0].body_json().unwrap();
        assert_eq!(body[0]["Value"], json!(15.0));
        assert_eq!(body[1]["Value"], json!(20.0));
        // The server is read once; the second increment builds on the first
        assert_eq!(mock.requests_to("ExecuteMDX").await.len(), 1);
    }

    #[tokio::test]
    async fn test_increment_after_write_in_one_request_builds_on_the_write() {
        let mock = MockTm1::start().await;
        mock.mount_dimensions("Sales", &["Year", "Period"]).await;
        mount_update(&mock, 204).await;

        let q1 = || vec!["2024".to_string(), "Q1".to_string()];
        service(&mock)
            .write_values(
                "Sales",
                &[
                    CellUpdate::new(q1(), 7),
                    CellUpdate::new(q1(), 3).incrementing(true),
                ],
            )
            .await
            .unwrap();

        let requests = mock.requests_to("Cubes('Sales')/tm1.Update").await;
        let body: Value = requests[0].body_json().unwrap();
        assert_eq!(body[0]["Value"], json!(7.0));
        assert_eq!(body[1]["Value"], json!(10.0));
        assert!(mock.requests_to("ExecuteMDX").await.is_empty());
    }

    #[tokio::test]
    async fn test_get_value_reads_through_mdx_and_cleans_up() {
        let mock = MockTm1::start().await;
        mock.mount_dimensions("Sales", &["Year", "Period"]).await;
        mock.mount_single_cell(json!("Approved")).await;

        let value = service(&mock)
            .get_value("Sales", &["2024".to_string(), "Q1".to_string()])
            .await
            .unwrap();

        assert_eq!(value, Some(CellValue::from("Approved")));
        assert_eq!(mock.requests_to("Cellsets('cs1')").await.len(), 1);
    }

    #[tokio::test]
    async fn test_null_cell_reads_as_none() {
        let mock = MockTm1::start().await;
        mock.mount_dimensions("Sales", &["Year", "Period"]).await;
        mock.mount_single_cell(Value::Null).await;

        let value = service(&mock)
            .get_value("Sales", &["2024".to_string(), "Q1".to_string()])
            .await
            .unwrap();
        assert_eq!(value, None);
    }

    #[tokio::test]
    async fn test_bulk_write_over_http_retries_then_succeeds() {
        let mock = MockTm1::start().await;
        mock.mount_dimensions("Sales", &["Year", "Period"]).await;
        Mock::given(method("POST"))
            .and(path(MockTm1::api_path("Cubes('Sales')/tm1.Update")))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(1)
            .with_priority(1)
            .mount(&mock.server)
            .await;
        mount_update(&mock, 204).await;

        let bulk = BulkService::new(service(&mock));
        bulk.execute_bulk_write(sales_writes(3), &fast_write_options().with_chunk_size(2))
            .await
            .unwrap();

        // One failed attempt plus one request per chunk
        assert_eq!(mock.requests_to("Cubes('Sales')/tm1.Update").await.len(), 3);
    }

    #[tokio::test]
    async fn test_client_bulk_write_reports_exhausted_chunk() {
        let mock = MockTm1::start().await;
        mock.mount_dimensions("Sales", &["Year", "Period"]).await;
        mount_update(&mock, 500).await;

        let mut config = mock.config();
        config.bulk.max_retries = 1;
        let client = Tm1Client::new(config).unwrap();

        let err = client
            .bulk()
            .execute_bulk_write(sales_writes(1), &client.bulk().write_options())
            .await
            .unwrap_err();

        assert!(matches!(err, Tm1Error::BulkWriteFailure { attempts: 2, .. }));
        assert_eq!(err.status_code(), Some(500));
        assert_eq!(mock.requests_to("Cubes('Sales')/tm1.Update").await.len(), 2);
    }
}
