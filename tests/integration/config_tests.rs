//! Configuration loading and validation tests

#[cfg(test)]
mod tests {
    use tm1_rs::{Config, Tm1Client, Tm1Error};

    const FULL_CONFIG: &str = r#"
connection:
  base_url: "https://tm1.example.com:8010/api/v1"
  user: admin
  password: apple
  timeout: 120
  verify_tls: false
  headers:
    TM1-SessionContext: "planning-loader"
bulk:
  chunk_size: 500
  max_retries: 2
  retry_delay_ms: 250
  cancel_at_failure: true
polling:
  timeout: 600
  poll_interval: 10
logging:
  level: "tm1_rs=debug"
"#;

    #[tokio::test]
    async fn test_config_file_builds_client() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tm1.yaml");
        tokio::fs::write(&path, FULL_CONFIG).await.unwrap();

        let client = Tm1Client::from_file(&path).await.unwrap();

        let options = client.bulk().write_options();
        assert_eq!(options.chunk_size, 500);
        assert_eq!(options.max_retries, 2);
        assert_eq!(options.retry_delay, std::time::Duration::from_millis(250));
        assert!(options.cancel_at_failure);
        assert_eq!(
            client.processes().poll_options().timeout,
            std::time::Duration::from_secs(600)
        );
        assert_eq!(
            client.transport().base_url().as_str(),
            "https://tm1.example.com:8010/api/v1/"
        );
    }

    #[tokio::test]
    async fn test_shipped_config_is_valid() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/config/tm1.yaml");
        let config = Config::from_file(path).await.unwrap();
        assert_eq!(config.bulk.chunk_size, 1000);
        assert_eq!(config.polling.timeout, 300);
    }

    #[test]
    fn test_invalid_sections_are_named() {
        let cases = [
            ("connection:\n  base_url: \"ftp://tm1/api/v1/\"\n", "Connection"),
            (
                "connection:\n  base_url: \"http://tm1/api/v1/\"\n  user: admin\n",
                "Connection",
            ),
            (
                "connection:\n  base_url: \"http://tm1/api/v1/\"\npolling:\n  timeout: 5\n  poll_interval: 10\n",
                "Polling",
            ),
            (
                "connection:\n  base_url: \"http://tm1/api/v1/\"\nbulk:\n  max_retries: 50\n",
                "Bulk",
            ),
        ];

        for (yaml, section) in cases {
            match Config::from_yaml_str(yaml) {
                Err(Tm1Error::Config(message)) => {
                    assert!(message.contains(section), "{} not in {}", section, message)
                }
                other => panic!("expected config error for {:?}, got {:?}", yaml, other),
            }
        }
    }

    #[test]
    fn test_env_overrides_file() {
        let config = Config::from_yaml_str(FULL_CONFIG)
            .unwrap()
            .apply_env(|key| match key {
                "TM1_BULK_CHUNK_SIZE" => Some("25".to_string()),
                "TM1_BULK_CANCEL_AT_FAILURE" => Some("false".to_string()),
                _ => None,
            })
            .unwrap();

        assert_eq!(config.bulk.chunk_size, 25);
        assert!(!config.bulk.cancel_at_failure);
        assert_eq!(config.bulk.max_retries, 2);
    }
}
