//! ResMan logo shown above the menu and the confirmation prompt.

use unicode_width::UnicodeWidthStr;

use crate::theme::Palette;

const LOGO: &[&str] = &[
    r"+============================================+",
    r"|                                            |",
    r"|    ______          ___  ___                |",
    r"|    | ___ \         |  \/  |                |",
    r"|    | |_/ /___  ___ | .  . | __ _ _ __      |",
    r"|    |    // _ \/ __|| |\/| |/ _` | '_ \     |",
    r"|    | |\ \  __/\__ \| |  | | (_| | | | |    |",
    r"|    \_| \_\___||___/\_|  |_/\__,_|_| |_|    |",
    r"|                                            |",
    r"+============================================+",
];

pub(crate) fn logo_width() -> usize {
    LOGO.iter()
        .map(|line| UnicodeWidthStr::width(*line))
        .max()
        .unwrap_or(0)
}

/// Logo in the success color, centered when `terminal_width` leaves room.
pub fn format_banner(palette: &Palette, terminal_width: u16) -> String {
    let width = logo_width();
    let padding = (terminal_width as usize).saturating_sub(width) / 2;
    let pad = " ".repeat(padding);
    let mut output = String::from("\n");
    for line in LOGO {
        output.push_str(&pad);
        output.push_str(&palette.paint(palette.success, line));
        output.push('\n');
    }
    output
}
