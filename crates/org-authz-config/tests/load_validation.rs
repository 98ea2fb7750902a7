//! Config load validation tests for org-authz-config.
// crates/org-authz-config/tests/load_validation.rs
// =============================================================================
// Module: Config Load Validation Tests
// Description: Validate config loading guards (path, size, encoding).
// Purpose: Ensure config input handling is strict and fail-closed.
// =============================================================================

use std::io::Write;
use std::path::Path;

use org_authz_config::ConfigError;
use org_authz_config::OrgAuthzConfig;
use tempfile::NamedTempFile;

type TestResult = Result<(), String>;

fn assert_invalid(result: Result<OrgAuthzConfig, ConfigError>, needle: &str) -> TestResult {
    match result {
        Err(error) => {
            let message = error.to_string();
            if message.contains(needle) {
                Ok(())
            } else {
                Err(format!("error {message} did not contain {needle}"))
            }
        }
        Ok(_) => Err("expected invalid config load".to_string()),
    }
}

#[test]
fn load_rejects_path_too_long() -> TestResult {
    let long_path = "a".repeat(5_000);
    let path = Path::new(&long_path);
    assert_invalid(OrgAuthzConfig::load(Some(path)), "config path exceeds max length")?;
    Ok(())
}

#[test]
fn load_rejects_path_component_too_long() -> TestResult {
    let long_component = "a".repeat(300);
    let path = Path::new(&long_component);
    assert_invalid(OrgAuthzConfig::load(Some(path)), "config path component too long")?;
    Ok(())
}

#[test]
fn load_rejects_oversized_file() -> TestResult {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    let payload = vec![b'a'; 1_048_577];
    file.write_all(&payload).map_err(|err| err.to_string())?;
    assert_invalid(OrgAuthzConfig::load(Some(file.path())), "config file exceeds size limit")?;
    Ok(())
}

#[test]
fn load_rejects_non_utf8_file() -> TestResult {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    file.write_all(&[0xFF, 0xFE, 0xFF]).map_err(|err| err.to_string())?;
    assert_invalid(OrgAuthzConfig::load(Some(file.path())), "config file must be utf-8")?;
    Ok(())
}

#[test]
fn load_rejects_missing_store_section() -> TestResult {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    file.write_all(b"[decision]\nmapping_type = 3\n").map_err(|err| err.to_string())?;
    assert_invalid(OrgAuthzConfig::load(Some(file.path())), "store")?;
    Ok(())
}

#[test]
fn load_applies_defaults_to_minimal_config() -> TestResult {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    file.write_all(b"[store]\npath = \"authz.db\"\n").map_err(|err| err.to_string())?;
    let config = OrgAuthzConfig::load(Some(file.path())).map_err(|err| err.to_string())?;
    if config.decision.mapping_type != 3 {
        return Err(format!("unexpected default mapping type: {}", config.decision.mapping_type));
    }
    if config.decision.path_separator != '/' {
        return Err(format!(
            "unexpected default path separator: {}",
            config.decision.path_separator
        ));
    }
    if config.store.busy_timeout_ms != 5_000 {
        return Err(format!("unexpected default busy timeout: {}", config.store.busy_timeout_ms));
    }
    Ok(())
}

#[test]
fn load_rejects_alphanumeric_separator() -> TestResult {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    file.write_all(b"[decision]\npath_separator = \"x\"\n\n[store]\npath = \"authz.db\"\n")
        .map_err(|err| err.to_string())?;
    assert_invalid(
        OrgAuthzConfig::load(Some(file.path())),
        "path separator must not be alphanumeric",
    )?;
    Ok(())
}

#[test]
fn load_rejects_out_of_range_busy_timeout() -> TestResult {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    file.write_all(b"[store]\npath = \"authz.db\"\nbusy_timeout_ms = 10\n")
        .map_err(|err| err.to_string())?;
    assert_invalid(OrgAuthzConfig::load(Some(file.path())), "store busy timeout out of range")?;
    Ok(())
}

#[test]
fn loaded_sections_convert_to_runtime_configs() -> TestResult {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    file.write_all(
        b"[decision]\nmapping_type = 7\npath_separator = \":\"\n\n\
          [store]\npath = \"authz.db\"\nbusy_timeout_ms = 250\njournal_mode = \"delete\"\n",
    )
    .map_err(|err| err.to_string())?;
    let config = OrgAuthzConfig::load(Some(file.path())).map_err(|err| err.to_string())?;

    let engine = config.decision.engine_config();
    if engine.mapping_type.get() != 7 || engine.path_separator != ':' {
        return Err(format!("unexpected engine config: {engine:?}"));
    }
    let gateway = config.store.gateway_config();
    if gateway.busy_timeout_ms != 250 {
        return Err(format!("unexpected gateway busy timeout: {}", gateway.busy_timeout_ms));
    }
    Ok(())
}
