use super::{AppConfig, MAX_CONFIRM_SECONDS, MIN_CONFIRM_SECONDS};
use anyhow::{anyhow, bail, Context, Result};
use std::{fs, path::Path};

impl AppConfig {
    /// Check CLI values and normalize the xrandr path.
    pub fn validate(&mut self) -> Result<()> {
        if !(MIN_CONFIRM_SECONDS..=MAX_CONFIRM_SECONDS).contains(&self.confirm_seconds) {
            bail!(
                "--confirm-seconds must be between {MIN_CONFIRM_SECONDS} and {MAX_CONFIRM_SECONDS}, got {}",
                self.confirm_seconds
            );
        }

        if let Some(output) = self.output.as_deref() {
            validate_output_name(output)?;
        }

        self.xrandr_cmd = sanitize_binary(&self.xrandr_cmd, "--xrandr-cmd")?;
        Ok(())
    }
}

/// xrandr output names are single tokens such as `HDMI-1` or `eDP-1`.
pub(super) fn validate_output_name(name: &str) -> Result<()> {
    if name.is_empty() {
        bail!("--output cannot be empty");
    }
    if name.len() > 64 {
        bail!("--output is too long ({} bytes, max 64)", name.len());
    }
    if name
        .chars()
        .any(|ch| ch.is_whitespace() || ch.is_control())
    {
        bail!("--output must not contain whitespace or control characters");
    }
    Ok(())
}

/// Accept a bare command name (resolved via PATH at spawn time) or an
/// existing executable path.
pub(super) fn sanitize_binary(value: &str, flag: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        bail!("{flag} cannot be empty");
    }

    let path = Path::new(trimmed);
    if path.is_absolute() || trimmed.contains(std::path::MAIN_SEPARATOR) {
        let canonical = path
            .canonicalize()
            .with_context(|| format!("failed to canonicalize {flag} '{trimmed}'"))?;
        let metadata = fs::metadata(&canonical)
            .with_context(|| format!("failed to inspect {flag} '{}'", canonical.display()))?;
        if !metadata.is_file() {
            bail!("{flag} '{}' is not a file", canonical.display());
        }
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = metadata.permissions().mode();
            if mode & 0o111 == 0 {
                bail!(
                    "{flag} '{}' exists but is not executable (mode {:o})",
                    canonical.display(),
                    mode
                );
            }
        }
        return canonical
            .to_str()
            .map(|s| s.to_string())
            .ok_or_else(|| anyhow!("{flag} must be valid UTF-8"));
    }

    if trimmed
        .chars()
        .any(|ch| ch.is_whitespace() || ch.is_control())
    {
        bail!("{flag} must be a single command name, got '{trimmed}'");
    }
    Ok(trimmed.to_string())
}
