//! The fixed resolution menu and its selection cursor.

mod banner;
mod render;

pub use banner::format_banner;
pub use render::{format_menu, MENU_RULE};

use crate::display::DisplayMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuEntry {
    Resolution(DisplayMode),
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuOption {
    pub label: &'static str,
    pub entry: MenuEntry,
}

/// Resolutions on offer, followed by the single exit entry.
pub const MENU_OPTIONS: &[MenuOption] = &[
    MenuOption {
        label: "2560 x 1080",
        entry: MenuEntry::Resolution(DisplayMode::new(2560, 1080)),
    },
    MenuOption {
        label: "1920 x 1080",
        entry: MenuEntry::Resolution(DisplayMode::new(1920, 1080)),
    },
    MenuOption {
        label: "1366 x 768",
        entry: MenuEntry::Resolution(DisplayMode::new(1366, 768)),
    },
    MenuOption {
        label: "Exit",
        entry: MenuEntry::Exit,
    },
];

/// Selection cursor over a non-empty option list; always in `[0, len)`.
#[derive(Debug, Clone)]
pub struct MenuState {
    pub selected: usize,
    len: usize,
}

impl MenuState {
    pub fn new(len: usize) -> Self {
        Self {
            selected: 0,
            len: len.max(1),
        }
    }

    pub fn move_up(&mut self) {
        if self.selected == 0 {
            self.selected = self.len - 1;
        } else {
            self.selected -= 1;
        }
    }

    pub fn move_down(&mut self) {
        self.selected = (self.selected + 1) % self.len;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn exit_is_the_only_sentinel_and_last() {
        let exits: Vec<usize> = MENU_OPTIONS
            .iter()
            .enumerate()
            .filter(|(_, option)| option.entry == MenuEntry::Exit)
            .map(|(idx, _)| idx)
            .collect();
        assert_eq!(exits, vec![MENU_OPTIONS.len() - 1]);
        assert_eq!(MENU_OPTIONS.len(), 4);
    }

    #[test]
    fn labels_match_modes() {
        for option in MENU_OPTIONS {
            if let MenuEntry::Resolution(mode) = option.entry {
                let label = format!("{} x {}", mode.width, mode.height);
                assert_eq!(option.label, label);
            }
        }
    }

    #[test]
    fn navigation_wraps_both_ways() {
        let mut state = MenuState::new(4);
        state.move_up();
        assert_eq!(state.selected, 3);
        assert_eq!(MENU_OPTIONS[state.selected].entry, MenuEntry::Exit);
        state.move_down();
        assert_eq!(state.selected, 0);
        state.move_down();
        state.move_down();
        assert_eq!(state.selected, 2);
        assert_eq!(MENU_OPTIONS[state.selected].label, "1366 x 768");
    }

    proptest! {
        #[test]
        fn selection_stays_in_range(len in 1usize..16, moves in proptest::collection::vec(any::<bool>(), 0..64)) {
            let mut state = MenuState::new(len);
            for up in moves {
                if up {
                    state.move_up();
                } else {
                    state.move_down();
                }
                prop_assert!(state.selected < len);
            }
        }
    }
}
