use anyhow::Result;
use shine_probe::config::Config;
use std::fs;
use std::path::Path;
use std::sync::Once;

use tempfile::tempdir;

static INIT: Once = Once::new();

// Setup logger for tests
fn setup() {
    INIT.call_once(|| {
        env_logger::builder()
            .filter_level(log::LevelFilter::Debug)
            .is_test(true)
            .init();
    });
}

#[test]
fn test_config_schema_error_creates_sample_file() -> Result<()> {
    setup();
    let temp_dir = tempdir()?;
    let config_path = temp_dir.path().join("probe.yaml");

    let invalid_yaml = r#"
bridge:
  host: 12345               # String field with number value
  read_timeout_ms: "fast"   # Integer field with string value
"#;
    fs::write(&config_path, invalid_yaml)?;

    let result = Config::from_file(&config_path);
    assert!(result.is_err(), "Config loading should have failed");

    let sample_path = config_path.with_extension("sample.yaml");
    assert!(
        Path::new(&sample_path).exists(),
        "Sample config file was not created"
    );

    // The sample file must itself be a valid configuration
    let sample_config = Config::from_file(&sample_path)?;
    assert_eq!(sample_config.bridge.host, "192.168.4.34");

    Ok(())
}

#[test]
fn test_config_out_of_range_creates_sample_file() -> Result<()> {
    setup();
    let temp_dir = tempdir()?;
    let config_path = temp_dir.path().join("probe.yaml");

    let invalid_config = r#"
scan:
  start: 1
  end: 99999       # Beyond the 16-bit register space
  target_values: [99]
"#;
    fs::write(&config_path, invalid_config)?;

    let result = Config::from_file(&config_path);
    assert!(result.is_err(), "Config loading should have failed");
    assert!(config_path.with_extension("sample.yaml").exists());

    Ok(())
}

#[test]
fn test_unknown_section_is_rejected() -> Result<()> {
    setup();
    let temp_dir = tempdir()?;
    let config_path = temp_dir.path().join("probe.yaml");
    fs::write(&config_path, "modbus:\n  port: 502\n")?;

    let result = Config::from_file(&config_path);
    assert!(result.is_err(), "Unknown sections should be rejected");

    Ok(())
}

#[test]
fn test_specific_rules_are_applied_after_schema() -> Result<()> {
    setup();
    let temp_dir = tempdir()?;
    let config_path = temp_dir.path().join("probe.yaml");

    // Valid for the schema, but the range is reversed
    let reversed_range = r#"
scan:
  start: 1200
  end: 1
  target_values: [2048, 2560]
"#;
    fs::write(&config_path, reversed_range)?;

    let result = Config::from_file(&config_path);

    match &result {
        Ok(_) => panic!("A reversed scan range should fail validation"),
        Err(e) => assert!(
            e.to_string().contains("Invalid scan range"),
            "Expected error about the scan range, got: {}",
            e
        ),
    }
    assert!(config_path.with_extension("sample.yaml").exists());

    Ok(())
}
