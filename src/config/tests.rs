use std::io::Write;

use super::*;

fn settings(raw: RawSettings) -> Settings {
    Settings::from_raw(raw, None).expect("valid settings")
}

#[test]
fn defaults_cover_every_section() {
    let settings = settings(RawSettings::default());

    assert!(settings.api.base_url.is_none());
    assert_eq!(settings.api.prefix, DEFAULT_API_PREFIX);
    assert_eq!(settings.api.timeout, Duration::from_secs(30));
    assert_eq!(settings.moderation.page_size.get(), 10);
    assert_eq!(settings.moderation.starred_limit.get(), 5);
    assert_eq!(
        settings.moderation.auto_approval_scope,
        AutoApprovalScope::PerKind
    );
    assert_eq!(settings.logging.level, LevelFilter::WARN);
    assert!(matches!(settings.logging.format, LogFormat::Compact));
}

#[test]
fn cli_overrides_take_highest_precedence() {
    let mut raw = RawSettings::default();
    raw.api.base_url = Some("https://file.example".to_string());
    raw.logging.level = Some("info".to_string());
    raw.moderation.page_size = Some(25);

    let overrides = GlobalOverrides {
        api_url: Some("https://cli.example/".to_string()),
        log_level: Some("debug".to_string()),
        page_size: Some(5),
        ..Default::default()
    };

    raw.apply_overrides(&overrides);
    let settings = settings(raw);

    assert_eq!(
        settings.api.require_base_url().expect("base url").as_str(),
        "https://cli.example/"
    );
    assert_eq!(settings.logging.level, LevelFilter::DEBUG);
    assert_eq!(settings.moderation.page_size.get(), 5);
}

#[test]
fn cli_json_logging_enforces_format() {
    let mut raw = RawSettings::default();
    let overrides = GlobalOverrides {
        log_json: Some(true),
        ..Default::default()
    };

    raw.apply_overrides(&overrides);
    let settings = settings(raw);

    assert!(matches!(settings.logging.format, LogFormat::Json));
}

#[test]
fn zero_page_size_is_rejected() {
    let mut raw = RawSettings::default();
    raw.moderation.page_size = Some(0);

    let err = Settings::from_raw(raw, None).expect_err("page size must be positive");
    assert!(matches!(
        err,
        LoadError::Invalid {
            key: "moderation.page_size",
            ..
        }
    ));
}

#[test]
fn unknown_scope_is_rejected() {
    let mut raw = RawSettings::default();
    raw.moderation.auto_approval_scope = Some("tenant".to_string());

    let err = Settings::from_raw(raw, None).expect_err("unknown scope");
    assert!(matches!(
        err,
        LoadError::Invalid {
            key: "moderation.auto_approval_scope",
            ..
        }
    ));
}

#[test]
fn non_http_base_url_is_rejected() {
    let mut raw = RawSettings::default();
    raw.api.base_url = Some("ftp://backend.example".to_string());

    let err = Settings::from_raw(raw, None).expect_err("ftp is not supported");
    assert!(matches!(err, LoadError::Invalid { key: "api.base_url", .. }));
}

#[test]
fn prefix_is_normalised() {
    let mut raw = RawSettings::default();
    raw.api.prefix = Some("/admin/api/".to_string());

    assert_eq!(settings(raw).api.prefix, "admin/api");
}

#[test]
fn token_file_wins_over_environment() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(file, "  file-token  ").expect("write token");

    let mut raw = RawSettings::default();
    raw.api.token_file = Some(file.path().to_path_buf());

    let settings =
        Settings::from_raw(raw, Some("env-token".to_string())).expect("valid settings");
    assert_eq!(settings.api.token.as_deref(), Some("file-token"));
}

#[test]
fn environment_token_is_used_without_a_file() {
    let settings = Settings::from_raw(RawSettings::default(), Some("env-token".to_string()))
        .expect("valid settings");
    assert_eq!(settings.api.token.as_deref(), Some("env-token"));
}

#[test]
fn empty_token_file_is_rejected() {
    let file = tempfile::NamedTempFile::new().expect("temp file");
    let mut raw = RawSettings::default();
    raw.api.token_file = Some(file.path().to_path_buf());

    let err = Settings::from_raw(raw, None).expect_err("empty token file");
    assert!(matches!(
        err,
        LoadError::Invalid {
            key: "api.token_file",
            ..
        }
    ));
}

#[test]
fn token_is_redacted_from_debug_output() {
    let settings = Settings::from_raw(RawSettings::default(), Some("secret".to_string()))
        .expect("valid settings");
    let rendered = format!("{:?}", settings.api);
    assert!(!rendered.contains("secret"));
}

#[test]
fn missing_base_url_is_reported_on_demand() {
    let settings = settings(RawSettings::default());
    assert!(matches!(
        settings.api.require_base_url(),
        Err(LoadError::Missing { key: "api.base_url" })
    ));
}

#[test]
fn parse_bulk_delete_arguments() {
    let args = CliArgs::parse_from([
        "gradboard",
        "--api-url",
        "https://backend.example",
        "bulk-delete",
        "jobs",
        "--ids",
        "a-1,a-2",
        "--yes",
    ]);

    assert_eq!(
        args.overrides.api_url.as_deref(),
        Some("https://backend.example")
    );
    match args.command {
        Command::BulkDelete(bulk) => {
            assert!(bulk.yes);
            assert_eq!(bulk.bulk.kind, crate::domain::types::ContentKind::Job);
            let ids: Vec<&str> = bulk.bulk.ids.iter().map(|id| id.as_str()).collect();
            assert_eq!(ids, ["a-1", "a-2"]);
            assert!(bulk.bulk.page.is_none());
        }
        _ => panic!("wrong command parsed"),
    }
}

#[test]
fn parse_list_with_filters() {
    let args = CliArgs::parse_from([
        "gradboard",
        "list",
        "achievement",
        "--status",
        "pending",
        "--search",
        "robotics",
        "--page",
        "3",
    ]);

    match args.command {
        Command::List(list) => {
            assert_eq!(
                list.filter.status,
                Some(crate::domain::types::PublishState::Pending)
            );
            assert_eq!(list.filter.search.as_deref(), Some("robotics"));
            assert_eq!(list.page, 3);
        }
        _ => panic!("wrong command parsed"),
    }
}

#[test]
fn bulk_commands_need_ids_or_page() {
    let result = CliArgs::try_parse_from(["gradboard", "bulk-approve", "exam"]);
    assert!(result.is_err());

    let result =
        CliArgs::try_parse_from(["gradboard", "bulk-approve", "exam", "--ids", "x", "--page", "1"]);
    assert!(result.is_err());
}

#[test]
fn unknown_kind_is_rejected_by_the_parser() {
    let result = CliArgs::try_parse_from(["gradboard", "list", "scholarships"]);
    assert!(result.is_err());
}
