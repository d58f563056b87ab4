//! Integration tests for loading engine configuration from files

use std::io::Write;

use clsmetrics::{
    precision_score, Average, Error, Metric, MetricsConfig, MetricsEngine, ZeroDivision,
};

fn write_config(suffix: &str, content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .prefix("clsmetrics_test_")
        .suffix(suffix)
        .tempfile()
        .unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_load_toml_file() -> Result<(), Error> {
    let file = write_config(".toml", "zero_division = \"nan\"\nlog_warnings = false\n");
    let config = MetricsConfig::from_file(file.path())?;

    assert_eq!(config.zero_division, ZeroDivision::Nan);
    assert!(!config.log_warnings);
    Ok(())
}

#[test]
fn test_load_yaml_and_json_files() -> Result<(), Error> {
    let yaml = write_config(".yml", "zero_division: one\n");
    assert_eq!(MetricsConfig::from_file(yaml.path())?.zero_division, ZeroDivision::One);

    let json = write_config(".json", r#"{"zero_division": "zero", "log_warnings": true}"#);
    assert_eq!(MetricsConfig::from_file(json.path())?, MetricsConfig::default());
    Ok(())
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let result = MetricsConfig::from_file(dir.path().join("absent.toml"));
    assert!(matches!(result, Err(Error::Io(_))));
}

#[test]
fn test_malformed_json() {
    let file = write_config(".json", "{ not json");
    assert!(matches!(MetricsConfig::from_file(file.path()), Err(Error::Json(_))));
}

#[test]
fn test_loaded_policy_drives_engine() -> Result<(), Error> {
    let file = write_config(".toml", "zero_division = \"nan\"\nlog_warnings = false\n");
    let engine = MetricsEngine::new(MetricsConfig::from_file(file.path())?);

    // class 1 is never predicted
    let observed = [0, 1, 0];
    let predicted = [0, 0, 0];
    let eval = engine.evaluate(&observed, &predicted)?;
    let per_class = eval.score(Metric::Precision, Average::None)?;
    assert!(per_class.get(&1).unwrap().is_nan());

    // default engine substitutes 0
    let default = precision_score(&observed, &predicted, Average::None)?;
    assert_eq!(default.get(&1), Some(0.0));
    Ok(())
}
