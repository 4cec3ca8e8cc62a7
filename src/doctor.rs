use crate::{
    config::AppConfig,
    crash_log_path,
    display::{select_backend, BackendKind},
    log_file_path,
    telemetry::tracing_log_path,
};
use crossterm::terminal::size as terminal_size;
use std::{env, fmt::Display};

pub struct DoctorReport {
    lines: Vec<String>,
}

impl DoctorReport {
    pub fn new(title: &str) -> Self {
        Self {
            lines: vec![title.to_string()],
        }
    }

    pub fn section(&mut self, title: &str) {
        self.lines.push(String::new());
        self.lines.push(format!("{title}:"));
    }

    pub fn push_kv(&mut self, key: &str, value: impl Display) {
        self.lines.push(format!("  {key}: {value}"));
    }

    pub fn render(&self) -> String {
        self.lines.join("\n")
    }
}

/// Environment and config summary for `--doctor`. Never changes the display mode.
pub fn doctor_report(config: &AppConfig) -> DoctorReport {
    let mut report = DoctorReport::new("ResMan Doctor");
    report.push_kv("version", env!("CARGO_PKG_VERSION"));
    report.push_kv("os", format!("{}/{}", env::consts::OS, env::consts::ARCH));

    let mut validated = config.clone();
    let validation_result = validated.validate();
    let resolved = validation_result
        .as_ref()
        .map(|_| &validated)
        .unwrap_or(config);

    report.section("Terminal");
    match terminal_size() {
        Ok((cols, rows)) => report.push_kv("size", format!("{cols}x{rows}")),
        Err(err) => report.push_kv("size", format!("error: {err}")),
    }
    if let Ok(term) = env::var("TERM") {
        report.push_kv("term", term);
    }
    let colors = !resolved.no_color && env::var_os("NO_COLOR").is_none();
    report.push_kv("colors", if colors { "enabled" } else { "disabled" });

    report.section("Config");
    match validation_result {
        Ok(()) => report.push_kv("validation", "ok"),
        Err(err) => report.push_kv("validation", format!("error: {err}")),
    }
    report.push_kv("confirm_seconds", resolved.confirm_seconds);
    report.push_kv(
        "logs",
        if resolved.logs_enabled() {
            "enabled"
        } else {
            "disabled"
        },
    );
    report.push_kv("log_file", log_file_path().display());
    report.push_kv("crash_log", crash_log_path().display());
    report.push_kv("trace_log", tracing_log_path().display());

    report.section("Display");
    report.push_kv("requested_backend", resolved.display_backend);
    report.push_kv(
        "x_display",
        env::var("DISPLAY").unwrap_or_else(|_| "unset".to_string()),
    );
    if resolved.display_backend != BackendKind::Demo {
        report.push_kv("xrandr_cmd", &resolved.xrandr_cmd);
        report.push_kv("output", resolved.output.as_deref().unwrap_or("primary"));
    }
    let backend = select_backend(resolved);
    report.push_kv("backend", backend.name());
    match backend.current_mode() {
        Ok(mode) => report.push_kv("current_mode", mode),
        Err(err) => report.push_kv("current_mode", format!("error: {err:#}")),
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn render_joins_sections() {
        let mut report = DoctorReport::new("Title");
        report.section("Part");
        report.push_kv("key", 42);
        assert_eq!(report.render(), "Title\n\nPart:\n  key: 42");
    }

    #[test]
    fn demo_report_lists_backend_and_mode() {
        let config = AppConfig::parse_from([
            "resman",
            "--display-backend",
            "demo",
            "--demo-start-mode",
            "1366x768",
        ]);
        let rendered = doctor_report(&config).render();
        assert!(rendered.starts_with("ResMan Doctor"));
        assert!(rendered.contains("  validation: ok"));
        assert!(rendered.contains("  backend: demo"));
        assert!(rendered.contains("  current_mode: 1366x768"));
        assert!(!rendered.contains("xrandr_cmd"));
    }

    #[test]
    fn report_includes_validation_errors() {
        let config = AppConfig::parse_from([
            "resman",
            "--display-backend",
            "demo",
            "--confirm-seconds",
            "0",
        ]);
        let rendered = doctor_report(&config).render();
        assert!(rendered.contains("validation: error: --confirm-seconds"));
    }
}
