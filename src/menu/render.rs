use super::{format_banner, MenuOption};
use crate::theme::Palette;

pub const MENU_RULE: &str = "+============================================+";

/// Full menu screen: banner, key help and options with the cursor on `selected`.
pub fn format_menu(
    options: &[MenuOption],
    selected: usize,
    palette: &Palette,
    terminal_width: u16,
) -> String {
    let rule = palette.paint(palette.success, MENU_RULE);
    let mut lines = vec![
        format_banner(palette, terminal_width),
        rule.clone(),
        " Use j/k or arrows to move".to_string(),
        " Enter or l to select".to_string(),
        rule.clone(),
    ];
    for (idx, option) in options.iter().enumerate() {
        if idx == selected {
            let marked = format!(" > {} <", option.label);
            lines.push(palette.paint(palette.success, &marked));
        } else {
            lines.push(format!("   {}", option.label));
        }
    }
    lines.push(rule);
    let mut output = lines.join("\n");
    output.push('\n');
    output
}
