//! Tests for exit code and hint selection.

use super::*;
use alert_courier::images::{AttachError, ImageError};
use alert_courier::receiver::{ReceiverRef, ReceiverValidationError};

fn receiver_error(reason: &str) -> ConfigError {
    ReceiverValidationError::new(ReceiverRef::new("ops", "webhook"), reason).into()
}

mod run_failures {
    use super::*;

    #[test]
    fn rejected_delivery_has_its_own_code() {
        let error = RunError::Notify(NotifyError::Deliver(DeliveryError::Status {
            status: http::StatusCode::BAD_REQUEST,
        }));

        assert_eq!(run_failure_code(&error), exit_code::REJECTED);
    }

    #[test]
    fn interrupt_uses_shell_convention() {
        assert_eq!(run_failure_code(&RunError::Interrupted), 130);
    }

    #[test]
    fn other_failures_are_runtime_errors() {
        let image = RunError::Notify(NotifyError::Attach(AttachError::Resolve(
            ImageError::Timeout(std::time::Duration::from_millis(500)),
        )));
        let input = RunError::ReadAlerts {
            origin: "stdin".to_string(),
            source: std::io::Error::other("closed"),
        };

        assert_eq!(run_failure_code(&image), exit_code::RUNTIME);
        assert_eq!(run_failure_code(&input), exit_code::RUNTIME);
    }
}

mod hints {
    use super::*;

    #[test]
    fn missing_config_file_suggests_init() {
        let error = ConfigError::FileRead {
            path: "courier.toml".into(),
            source: std::io::Error::other("missing"),
        };

        assert!(config_hint(&error).unwrap().contains("alert-courier init"));
    }

    #[test]
    fn url_problems_point_at_url_setting() {
        let hint = config_hint(&receiver_error("could not find url property in settings")).unwrap();

        assert!(hint.contains("--url"));
    }

    #[test]
    fn credential_problems_point_at_both_flags() {
        let hint = config_hint(&receiver_error(
            "basic authentication requires both username and password",
        ))
        .unwrap();

        assert!(hint.contains("--username"));
        assert!(hint.contains("--password"));
    }

    #[test]
    fn image_url_problem_shows_example() {
        let error = ConfigError::InvalidImageUrl {
            url: "img".to_string(),
            reason: "relative URL without a base".to_string(),
        };

        assert!(config_hint(&error).unwrap().starts_with("images.base_url"));
    }

    #[test]
    fn parse_errors_need_no_hint() {
        let error = ConfigError::TomlParse(toml::from_str::<toml::Value>("=").unwrap_err());

        assert!(config_hint(&error).is_none());
    }
}
