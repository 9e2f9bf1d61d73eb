use scenarist::config::{ConfigFlags, ExportFormat, load_config_flags, parse_flag_tokens};

#[test]
fn test_config_file_parsing_ignores_comments_and_blank_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".scenaristrc");
    let content = r"
# comment
--resolve

--format json

--capacity=48
";
    std::fs::write(&path, content).unwrap();

    let flags = load_config_flags(&path).unwrap();
    assert!(flags.resolve);
    assert_eq!(flags.format, Some(ExportFormat::Json));
    assert_eq!(flags.capacity, Some(48));
}

#[test]
fn test_cli_flags_override_file_flags() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".scenaristrc");
    let content = "--resolve\n--format text\n--capacity 30\n";
    std::fs::write(&path, content).unwrap();

    let file_flags = load_config_flags(&path).unwrap();
    let cli_args = vec![
        "scenarist".to_string(),
        "--format".to_string(),
        "html".to_string(),
        "--toc".to_string(),
    ];
    let cli_flags = parse_flag_tokens(&cli_args);
    let effective = file_flags.union(&cli_flags);

    assert!(effective.resolve);
    assert!(effective.toc);
    assert_eq!(effective.format, Some(ExportFormat::Html));
    assert_eq!(effective.capacity, Some(30));
}

#[test]
fn test_missing_config_file_gives_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".scenaristrc");
    let flags = load_config_flags(&path).unwrap();
    assert_eq!(flags, ConfigFlags::default());
}
