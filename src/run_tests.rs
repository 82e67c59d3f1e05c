//! Tests for application execution logic.

use super::*;
use alert_courier::config::Cli;
use tempfile::TempDir;

mod parsing {
    use super::*;

    #[test]
    fn accepts_bare_array() {
        let alerts = parse_alerts(br#"[{"labels":{"alertname":"A"}},{"labels":{"alertname":"B"}}]"#)
            .unwrap();

        assert_eq!(alerts.len(), 2);
        assert_eq!(alerts[1].name(), "B");
    }

    #[test]
    fn accepts_envelope_object() {
        let alerts = parse_alerts(
            br#"{"receiver":"ops","status":"firing","alerts":[{"labels":{"alertname":"A"}}]}"#,
        )
        .unwrap();

        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].name(), "A");
    }

    #[test]
    fn accepts_rfc3339_times_with_zero_end() {
        let alerts = parse_alerts(
            br#"[{"labels":{"alertname":"Disk"},"annotations":{},"startsAt":"2024-01-01T00:00:00Z","endsAt":"0001-01-01T00:00:00Z"}]"#,
        )
        .unwrap();

        assert!(alerts[0].starts_at.is_some());
        assert!(alerts[0].ends_at.is_none());
    }

    #[test]
    fn rejects_other_json() {
        assert!(matches!(parse_alerts(b"42"), Err(RunError::ParseAlerts(_))));
        assert!(matches!(parse_alerts(b"not json"), Err(RunError::ParseAlerts(_))));
    }
}

mod reading {
    use super::*;

    #[tokio::test]
    async fn reads_alerts_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("alerts.json");
        std::fs::write(&path, r#"[{"labels":{"alertname":"DiskFull"}}]"#).unwrap();

        let alerts = read_alerts(Some(&path)).await.unwrap();

        assert_eq!(alerts[0].name(), "DiskFull");
    }

    #[tokio::test]
    async fn missing_file_names_origin() {
        let error = read_alerts(Some(Path::new("/nonexistent/alerts.json")))
            .await
            .unwrap_err();

        assert!(error.to_string().contains("/nonexistent/alerts.json"));
    }
}

mod image_store_selection {
    use super::*;

    #[tokio::test]
    async fn no_directory_disables_images() {
        let store = AppImageStore::from(&ImageSettings::default());

        let error = store.get_image("abc").await.unwrap_err();

        assert!(matches!(error, ImageError::Unavailable));
    }

    #[tokio::test]
    async fn directory_store_serves_files_with_urls() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("abc.png"), b"png").unwrap();
        let settings = ImageSettings {
            dir: Some(dir.path().to_path_buf()),
            base_url: Some("https://img.example.com/shots".to_string()),
        };

        let image = AppImageStore::from(&settings).get_image("abc").await.unwrap();

        assert_eq!(image.url.as_deref(), Some("https://img.example.com/shots/abc.png"));
    }
}

mod execution {
    use super::*;

    #[tokio::test]
    async fn dry_run_with_empty_batch_succeeds() {
        let dir = TempDir::new().unwrap();
        let alerts = dir.path().join("alerts.json");
        std::fs::write(&alerts, "[]").unwrap();

        let cli = Cli::parse_from_iter([
            "alert-courier",
            "--url",
            "https://hooks.example.com",
            "--alerts",
            alerts.to_str().unwrap(),
            "--dry-run",
        ]);
        let config = ValidatedConfig::from_raw(&cli, None).unwrap();

        assert!(execute(config).await.is_ok());
    }

    #[tokio::test]
    async fn dry_run_builds_payload_without_sending() {
        let dir = TempDir::new().unwrap();
        let alerts = dir.path().join("alerts.json");
        std::fs::write(
            &alerts,
            r#"[{"labels":{"alertname":"A"},"annotations":{"__alertImageToken__":"missing"}}]"#,
        )
        .unwrap();

        // The URL points nowhere; dry-run must not touch it.
        let cli = Cli::parse_from_iter([
            "alert-courier",
            "--url",
            "http://127.0.0.1:9/unused",
            "--alerts",
            alerts.to_str().unwrap(),
            "--images-dir",
            dir.path().to_str().unwrap(),
            "--dry-run",
        ]);
        let config = ValidatedConfig::from_raw(&cli, None).unwrap();

        assert!(execute(config).await.is_ok());
    }
}
