use docreflow_lib::config::{Config, ConfigSource, SourcedConfig, create_default_config};
use docreflow_lib::{FormatOverrides, FormatRules, Language, LanguageHint, format_text};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

#[test]
fn test_load_config_file() {
    let temp_dir = tempdir().expect("Failed to create temporary directory");
    let config_path = temp_dir.path().join("test_config.toml");
    let config_content = r#"
[format]
line-width = 40
preserve_paragraphs = false
language-hint = "en"

[quick-format]
fix-punctuation = true
trim_lines = true
line-width = 0
"#;
    fs::write(&config_path, config_content).expect("Failed to write test config file");

    let sourced = SourcedConfig::load_with_discovery(Some(&config_path), None, true, None);
    assert!(
        sourced.is_ok(),
        "SourcedConfig loading should succeed. Error: {:?}",
        sourced.err()
    );
    let config: Config = sourced.unwrap().into();

    let options = config.format_options();
    assert_eq!(options.line_width, 40);
    assert!(!options.preserve_paragraphs);
    assert!(options.smart_quotes);
    assert_eq!(options.language_hint, LanguageHint::Language(Language::English));

    let rules = config.format_rules();
    assert!(rules.fix_punctuation);
    assert!(rules.trim_lines);
    assert!(!rules.smart_quotes);
    assert_eq!(rules.line_width, 0);
}

#[test]
fn test_load_nonexistent_config() {
    let result = SourcedConfig::load_with_discovery(Some(Path::new("nonexistent_config.toml")), None, true, None);
    let err = result.expect_err("Loading nonexistent config should fail");
    assert!(
        err.to_string().contains("Failed to read config file"),
        "Error message should indicate file reading failure"
    );
}

#[test]
fn test_invalid_language_hint_in_config() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("docreflow.toml");
    fs::write(&config_path, "[format]\nlanguage-hint = \"fr\"\n").unwrap();

    let err = SourcedConfig::load_with_discovery(Some(&config_path), None, true, None).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("Failed to parse config"), "{message}");
    assert!(message.contains("Invalid language hint"), "{message}");
}

#[test]
fn test_default_config() {
    let config = Config::default();
    assert_eq!(config.format_options(), docreflow_lib::FormatOptions::default());
    assert_eq!(config.format_rules(), FormatRules::default());
}

#[test]
fn test_discovery_from_nested_directory() {
    let temp_dir = tempdir().unwrap();
    let root = temp_dir.path();
    fs::create_dir(root.join(".git")).unwrap();
    fs::write(root.join(".docreflow.toml"), "[format]\nline-width = 12\n").unwrap();
    let nested = root.join("docs/chapters");
    fs::create_dir_all(&nested).unwrap();

    let sourced = SourcedConfig::load_with_discovery(None, None, false, Some(&nested)).unwrap();
    assert_eq!(sourced.config.format.line_width, Some(12));
    assert_eq!(sourced.format_source("line-width"), ConfigSource::ProjectConfig);

    let formatted = format_text("one two three four", &sourced.config.format_options()).unwrap();
    assert_eq!(formatted, "one two\nthree four");
}

#[test]
fn test_cli_overrides_win_over_project_config() {
    let temp_dir = tempdir().unwrap();
    let root = temp_dir.path();
    fs::create_dir(root.join(".git")).unwrap();
    fs::write(root.join("docreflow.toml"), "[format]\nline-width = 12\nsmart-quotes = false\n").unwrap();

    let cli = Config {
        format: FormatOverrides {
            line_width: Some(100),
            ..Default::default()
        },
        ..Default::default()
    };
    let sourced = SourcedConfig::load_with_discovery(None, Some(&cli), false, Some(root)).unwrap();
    let options = sourced.config.format_options();

    assert_eq!(options.line_width, 100);
    assert!(!options.smart_quotes);
    assert_eq!(sourced.format_source("line-width"), ConfigSource::Cli);
    assert_eq!(sourced.format_source("smart-quotes"), ConfigSource::ProjectConfig);
}

#[test]
fn test_created_default_config_round_trips() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join(".docreflow.toml");
    create_default_config(&path).unwrap();

    let sourced = SourcedConfig::load_with_discovery(Some(&path), None, true, None).unwrap();
    assert_eq!(sourced.config.format_options(), docreflow_lib::FormatOptions::default());
    assert_eq!(sourced.loaded_files(), vec![path.as_path()]);
}
