//! ANSI colors for the menu and prompts.

use std::env;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub success: &'static str,
    pub error: &'static str,
    pub warning: &'static str,
    pub reset: &'static str,
}

pub const PALETTE_ANSI: Palette = Palette {
    success: "\x1b[32m",
    error: "\x1b[31m",
    warning: "\x1b[33m",
    reset: "\x1b[0m",
};

pub const PALETTE_NONE: Palette = Palette {
    success: "",
    error: "",
    warning: "",
    reset: "",
};

impl Palette {
    /// Colors unless disabled by flag or the `NO_COLOR` convention.
    pub fn resolve(no_color_flag: bool) -> Self {
        Self::for_color(!no_color_flag && env::var_os("NO_COLOR").is_none())
    }

    pub fn for_color(enabled: bool) -> Self {
        if enabled {
            PALETTE_ANSI
        } else {
            PALETTE_NONE
        }
    }

    pub fn paint(&self, color: &str, text: &str) -> String {
        if color.is_empty() {
            text.to_string()
        } else {
            format!("{color}{text}{}", self.reset)
        }
    }
}
