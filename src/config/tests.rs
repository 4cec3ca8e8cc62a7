use super::validation::{sanitize_binary, validate_output_name};
use super::{AppConfig, DEFAULT_XRANDR_CMD};
use crate::confirm::TICK_INTERVAL;
use crate::display::{BackendKind, DisplayMode};
use clap::Parser;
use std::env;
use std::fs;
use std::time::{SystemTime, UNIX_EPOCH};

#[test]
fn defaults_match_the_bare_menu() {
    let cfg = AppConfig::parse_from(["test-app"]);
    assert_eq!(cfg.confirm_seconds, 10);
    assert_eq!(cfg.xrandr_cmd, DEFAULT_XRANDR_CMD);
    assert_eq!(cfg.demo_start_mode, DisplayMode::new(1920, 1080));
    assert!(cfg.output.is_none());
    assert!(!cfg.doctor);
    let countdown = cfg.countdown();
    assert_eq!(countdown.ticks, 10);
    assert_eq!(countdown.tick, TICK_INTERVAL);
}

#[test]
fn parses_backend_and_demo_mode() {
    let cfg = AppConfig::parse_from([
        "test-app",
        "--display-backend",
        "demo",
        "--demo-start-mode",
        "1366x768",
    ]);
    assert_eq!(cfg.display_backend, BackendKind::Demo);
    assert_eq!(cfg.demo_start_mode, DisplayMode::new(1366, 768));
}

#[test]
fn rejects_malformed_demo_mode_at_parse_time() {
    let result = AppConfig::try_parse_from(["test-app", "--demo-start-mode", "big"]);
    assert!(result.is_err());
}

#[test]
fn rejects_confirm_seconds_out_of_bounds() {
    let mut cfg = AppConfig::parse_from(["test-app", "--confirm-seconds", "0"]);
    assert!(cfg.validate().is_err());

    let mut cfg = AppConfig::parse_from(["test-app", "--confirm-seconds", "61"]);
    assert!(cfg.validate().is_err());
}

#[test]
fn accepts_confirm_seconds_bounds() {
    let mut cfg = AppConfig::parse_from(["test-app", "--confirm-seconds", "1"]);
    assert!(cfg.validate().is_ok());

    let mut cfg = AppConfig::parse_from(["test-app", "--confirm-seconds", "60"]);
    assert!(cfg.validate().is_ok());
}

#[test]
fn no_logs_overrides_logs() {
    let cfg = AppConfig::parse_from(["test-app", "--logs", "--no-logs"]);
    assert!(!cfg.logs_enabled());
    let cfg = AppConfig::parse_from(["test-app", "--logs"]);
    assert!(cfg.logs_enabled());
}

#[test]
fn output_name_must_be_a_single_token() {
    assert!(validate_output_name("HDMI-1").is_ok());
    assert!(validate_output_name("").is_err());
    assert!(validate_output_name("HDMI 1").is_err());
    assert!(validate_output_name(&"x".repeat(65)).is_err());

    let mut cfg = AppConfig::parse_from(["test-app", "--output", "DP 2"]);
    assert!(cfg.validate().is_err());
}

#[test]
fn sanitize_binary_accepts_bare_names() {
    assert_eq!(sanitize_binary(" xrandr ", "--xrandr-cmd").unwrap(), "xrandr");
    assert!(sanitize_binary("", "--xrandr-cmd").is_err());
    assert!(sanitize_binary("xrandr --verbose", "--xrandr-cmd").is_err());
}

#[test]
fn sanitize_binary_rejects_missing_paths() {
    let err = sanitize_binary("/definitely/not/here/xrandr", "--xrandr-cmd").unwrap_err();
    assert!(format!("{err:#}").contains("--xrandr-cmd"));
}

#[cfg(unix)]
#[test]
fn sanitize_binary_checks_executable_bit() {
    use std::os::unix::fs::PermissionsExt;

    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let path = env::temp_dir().join(format!("resman-fake-xrandr-{stamp}"));
    fs::write(&path, "#!/bin/sh\n").unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();
    let path_str = path.to_str().unwrap().to_string();
    assert!(sanitize_binary(&path_str, "--xrandr-cmd").is_err());

    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    let resolved = sanitize_binary(&path_str, "--xrandr-cmd").unwrap();
    assert!(resolved.ends_with(&format!("resman-fake-xrandr-{stamp}")));
    let _ = fs::remove_file(&path);
}
