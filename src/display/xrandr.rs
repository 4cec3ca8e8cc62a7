//! X11 backend built on the `xrandr` command-line tool.

use anyhow::{anyhow, bail, Context, Result};
use regex::Regex;
use std::process::{Command, Stdio};
use std::sync::OnceLock;

use super::{DisplayBackend, DisplayMode};
use crate::log_debug;

/// Matches e.g. `HDMI-1 connected primary 2560x1080+0+0 (normal left ...)`.
/// Outputs that are connected but switched off carry no geometry and do not match.
fn output_line_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"^(?P<name>\S+) connected(?P<primary> primary)? (?P<w>\d+)x(?P<h>\d+)\+\d+\+\d+",
        )
        .expect("xrandr output regex should compile")
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ConnectedOutput {
    pub(crate) name: String,
    pub(crate) primary: bool,
    pub(crate) mode: DisplayMode,
}

/// Collect every active output listed by `xrandr --current`.
pub(crate) fn parse_connected_outputs(text: &str) -> Vec<ConnectedOutput> {
    text.lines()
        .filter_map(|line| {
            let caps = output_line_regex().captures(line)?;
            let width = caps["w"].parse().ok()?;
            let height = caps["h"].parse().ok()?;
            Some(ConnectedOutput {
                name: caps["name"].to_string(),
                primary: caps.name("primary").is_some(),
                mode: DisplayMode::new(width, height),
            })
        })
        .collect()
}

/// Requested name first, then the primary output, then whatever is connected.
pub(crate) fn pick_output<'a>(
    outputs: &'a [ConnectedOutput],
    requested: Option<&str>,
) -> Option<&'a ConnectedOutput> {
    if let Some(name) = requested {
        return outputs.iter().find(|output| output.name == name);
    }
    outputs
        .iter()
        .find(|output| output.primary)
        .or_else(|| outputs.first())
}

#[derive(Debug, Clone)]
pub struct XrandrBackend {
    program: String,
    output: Option<String>,
}

impl XrandrBackend {
    pub fn new(program: impl Into<String>, output: Option<String>) -> Self {
        Self {
            program: program.into(),
            output,
        }
    }

    /// True when the xrandr binary can be spawned and exits cleanly.
    pub fn is_available(&self) -> bool {
        Command::new(&self.program)
            .arg("--version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|status| status.success())
            .unwrap_or(false)
    }

    fn run(&self, args: &[&str]) -> Result<String> {
        let output = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .with_context(|| format!("failed to spawn {}", self.program))?;
        if !output.status.success() {
            let code = output
                .status
                .code()
                .map(|c| c.to_string())
                .unwrap_or_else(|| "unknown".to_string());
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!(
                "{} {} exited with code {code}: {}",
                self.program,
                args.join(" "),
                stderr.trim()
            );
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn active_output(&self) -> Result<ConnectedOutput> {
        let listing = self.run(&["--current"])?;
        let outputs = parse_connected_outputs(&listing);
        pick_output(&outputs, self.output.as_deref())
            .cloned()
            .ok_or_else(|| match &self.output {
                Some(name) => anyhow!("output {name} is not connected or not active"),
                None => anyhow!("xrandr reported no active outputs"),
            })
    }
}

impl DisplayBackend for XrandrBackend {
    fn name(&self) -> &'static str {
        "xrandr"
    }

    fn current_mode(&self) -> Result<DisplayMode> {
        Ok(self.active_output()?.mode)
    }

    fn set_mode(&self, mode: DisplayMode) -> Result<()> {
        let output = self.active_output()?;
        let mode_arg = mode.to_string();
        log_debug(&format!("xrandr --output {} --mode {mode_arg}", output.name));
        self.run(&["--output", &output.name, "--mode", &mode_arg])?;
        Ok(())
    }
}
