use super::*;

#[test]
fn summarize_request_parses_array_and_object() {
    let request = summarize_request(r#"[{"month":"Jan","sales":10}]"#, r#"{"type":"line"}"#).unwrap();
    assert_eq!(request.data.len(), 1);
    assert_eq!(request.chart_config.get("type"), Some(&Value::from("line")));
}

#[test]
fn summarize_request_rejects_non_array_data() {
    let err = summarize_request(r#"{"month":"Jan"}"#, "{}").unwrap_err();
    assert!(matches!(err, CliError::WrongJsonType { arg: "data", .. }));
}

#[test]
fn summarize_request_rejects_non_object_config() {
    let err = summarize_request("[]", "[1]").unwrap_err();
    assert!(matches!(err, CliError::WrongJsonType { arg: "chart-config", .. }));
}

#[test]
fn summarize_request_reports_invalid_json() {
    assert!(matches!(summarize_request("[", "{}"), Err(CliError::InvalidJson(_))));
}

#[test]
fn credentials_require_both_fields() {
    let missing = Credentials { email: Some("a@example.com".into()), password: None };
    assert!(matches!(missing.require(), Err(CliError::MissingCredentials)));

    let blank = Credentials { email: Some(String::new()), password: Some("pw".into()) };
    assert!(matches!(blank.require(), Err(CliError::MissingCredentials)));

    let full = Credentials { email: Some("a@example.com".into()), password: Some("pw".into()) };
    assert_eq!(full.require().unwrap(), ("a@example.com", "pw"));
}

#[test]
fn timeout_defaults_to_ten_seconds() {
    let cli = Cli::try_parse_from(["insightdeck-cli", "inspect-token", "abc"]).unwrap();
    assert_eq!(cli.timeout_secs, 10);
    assert!(matches!(cli.command, Command::InspectToken { ref token } if token == "abc"));
}

#[test]
fn protected_path_defaults_to_profile() {
    let cli =
        Cli::try_parse_from(["insightdeck-cli", "protected", "--email", "a@example.com", "--password", "pw"]).unwrap();
    match cli.command {
        Command::Protected { path, .. } => assert_eq!(path, contracts::PROFILE_PATH),
        other => panic!("unexpected command {other:?}"),
    }
}

#[test]
fn unauthorized_maps_to_distinct_exit_status() {
    let err = CliError::Unauthorized { status: 401, message: "expired".into() };
    assert_eq!(err.exit_status(), EXIT_UNAUTHORIZED);
    assert_eq!(CliError::MissingCredentials.exit_status(), EXIT_FAILURE);
}
