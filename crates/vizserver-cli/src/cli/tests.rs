use super::config_cmd::config_from_init;
use super::content_cmd::workbook_list_options;
use super::*;
use vizserver_core::config::HttpSettings;

#[test]
fn refresh_parses_wait_and_timeout() {
    let cli = Cli::try_parse_from([
        "vizserver",
        "workbooks",
        "refresh",
        "wb-1",
        "--wait",
        "--timeout-secs",
        "120",
    ])
    .unwrap();
    match cli.command {
        Commands::Workbooks(WorkbooksArgs {
            command: WorkbooksCommands::Refresh(args),
        }) => {
            assert_eq!(args.id, "wb-1");
            assert!(args.wait);
            assert_eq!(timeout_from(args.timeout_secs), Some(Duration::from_secs(120)));
        }
        _ => panic!("expected workbooks refresh"),
    }
}

#[test]
fn timeout_requires_wait() {
    let result = Cli::try_parse_from([
        "vizserver",
        "datasources",
        "refresh",
        "ds-1",
        "--timeout-secs",
        "5",
    ]);
    assert!(result.is_err());
}

#[test]
fn jobs_wait_defaults_to_no_deadline() {
    let cli = Cli::try_parse_from(["vizserver", "jobs", "wait", "job-9"]).unwrap();
    match cli.command {
        Commands::Jobs(JobsArgs {
            command: JobsCommands::Wait(args),
        }) => {
            assert_eq!(args.id, "job-9");
            assert_eq!(timeout_from(args.timeout_secs), None);
        }
        _ => panic!("expected jobs wait"),
    }
}

#[test]
fn global_flags_follow_subcommands() {
    let cli = Cli::try_parse_from([
        "vizserver",
        "users",
        "list",
        "--json",
        "--verbose",
        "--config",
        "/tmp/viz.json",
    ])
    .unwrap();
    assert!(cli.verbose);
    assert_eq!(cli.config, Some(PathBuf::from("/tmp/viz.json")));
    match cli.command {
        Commands::Users(UsersArgs {
            command: UsersCommands::List(list),
        }) => assert!(list.json),
        _ => panic!("expected users list"),
    }
}

#[test]
fn init_requires_exactly_one_identity() {
    assert!(Cli::try_parse_from(["vizserver", "config", "init", "--server-url", "https://bi"]).is_err());
    assert!(
        Cli::try_parse_from([
            "vizserver",
            "config",
            "init",
            "--server-url",
            "https://bi",
            "--token-name",
            "ci",
            "--username",
            "ana",
        ])
        .is_err()
    );
}

#[test]
fn init_keeps_existing_tuning() {
    let existing = ClientConfig {
        page_size: 25,
        http: HttpSettings {
            max_attempts: 5,
            timeout_secs: 10,
        },
        ..ClientConfig::default()
    };
    let args = InitArgs {
        server_url: "https://bi.example.com".to_string(),
        site: "marketing".to_string(),
        api_version: None,
        token_name: None,
        username: Some("ana".to_string()),
    };
    let config = config_from_init(args, existing);
    assert_eq!(config.page_size, 25);
    assert_eq!(config.http.max_attempts, 5);
    assert_eq!(
        config.auth,
        Some(AuthConfig::Password {
            username: "ana".to_string()
        })
    );
    assert!(config.validate().is_ok());
}

#[test]
fn init_writes_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.json");
    let cli = Cli::try_parse_from([
        "vizserver",
        "config",
        "init",
        "--server-url",
        "https://bi.example.com/",
        "--site",
        "ops",
        "--token-name",
        "ci",
    ])
    .unwrap();
    let Commands::Config(args) = cli.command else {
        panic!("expected config command");
    };
    handle_config(args, &path).unwrap();
    let config = load_config(&path).unwrap();
    assert_eq!(config.server_url(), "https://bi.example.com");
    assert_eq!(config.site, "ops");
    assert_eq!(config.secret_account().unwrap(), "https://bi.example.com:ops:ci");
}

#[test]
fn load_config_rejects_missing_server() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_config(&dir.path().join("absent.json")).unwrap_err();
    assert!(err.to_string().contains("config init"));
}

#[test]
fn project_option_adds_name_filter() {
    let options = workbook_list_options(RequestOptions::new(), Some("Finance"));
    let pairs = options.query_pairs();
    assert!(pairs.contains(&("filter".to_string(), "projectName:eq:Finance".to_string())));
    let plain = workbook_list_options(RequestOptions::new(), None);
    assert!(!plain.query_pairs().iter().any(|(key, _)| key == "filter"));
}

#[test]
fn format_time_handles_missing_values() {
    assert_eq!(format_time(None), "-");
    let value = OffsetDateTime::parse("2024-05-01T10:00:00Z", &Rfc3339).unwrap();
    assert_eq!(format_time(Some(value)), "2024-05-01T10:00:00Z");
}
