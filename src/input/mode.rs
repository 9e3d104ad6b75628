// SPDX-License-Identifier: GPL-3.0-only

//! Keyboard mode state.
//!
//! The keyboard is always in exactly one [`KeyboardMode`], and every mode
//! shows exactly one page:
//!
//! | Mode | Page |
//! |---|---|
//! | `Letters(Once)` | uppercase |
//! | `Letters(On)` | uppercase (locked) |
//! | `Letters(Off)` | lowercase |
//! | `Numbers` | numbers |
//! | `Symbols` | symbols |
//!
//! Transitions are pure functions of the current mode, the released key and
//! whether the shift double-tap window is open. The window itself is a timer
//! owned by the keyboard; a transition only says whether to arm or cancel it.
//!
//! The shift timer has two separate jobs. While it runs, a second shift tap
//! locks caps. Independently, `Letters(Once)` drops back to `Letters(Off)`
//! when the next glyph is committed, not when the timer expires.
//!
//! # Example
//!
//! ```rust,ignore
//! use tapboard::input::{KeyboardMode, KeyIdentifier, ShiftState};
//!
//! let mode = KeyboardMode::Letters(ShiftState::Off);
//! let first = mode.after_key(KeyIdentifier::Shift, false);
//! let second = first.mode.after_key(KeyIdentifier::Shift, true);
//! assert_eq!(second.mode, KeyboardMode::Letters(ShiftState::On));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::layout::PageKind;

use super::identifier::KeyIdentifier;

/// Shift state within the letters mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShiftState {
    /// Lowercase
    Off,
    /// Uppercase for the next glyph only
    Once,
    /// Caps lock
    On,
}

/// The active keyboard mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyboardMode {
    Letters(ShiftState),
    Numbers,
    Symbols,
}

impl Default for KeyboardMode {
    /// The keyboard starts capitalized.
    fn default() -> Self {
        KeyboardMode::Letters(ShiftState::Once)
    }
}

impl fmt::Display for KeyboardMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyboardMode::Letters(ShiftState::Off) => f.write_str("letters"),
            KeyboardMode::Letters(ShiftState::Once) => f.write_str("letters (shift once)"),
            KeyboardMode::Letters(ShiftState::On) => f.write_str("letters (caps lock)"),
            KeyboardMode::Numbers => f.write_str("numbers"),
            KeyboardMode::Symbols => f.write_str("symbols"),
        }
    }
}

/// What to do with the shift double-tap timer after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShiftTimerEffect {
    Keep,
    Arm,
    Cancel,
}

/// Result of a mode transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub mode: KeyboardMode,
    pub shift_timer: ShiftTimerEffect,
}

impl Transition {
    fn to(mode: KeyboardMode) -> Self {
        Self {
            mode,
            shift_timer: ShiftTimerEffect::Keep,
        }
    }

    fn with_timer(mode: KeyboardMode, shift_timer: ShiftTimerEffect) -> Self {
        Self { mode, shift_timer }
    }
}

impl KeyboardMode {
    /// The page shown in this mode.
    pub fn page_kind(self) -> PageKind {
        match self {
            KeyboardMode::Letters(ShiftState::Once) => PageKind::Uppercase,
            KeyboardMode::Letters(ShiftState::On) => PageKind::UppercaseLocked,
            KeyboardMode::Letters(ShiftState::Off) => PageKind::Lowercase,
            KeyboardMode::Numbers => PageKind::Numbers,
            KeyboardMode::Symbols => PageKind::Symbols,
        }
    }

    /// Mode after a glyph has been committed.
    pub fn after_glyph(self) -> KeyboardMode {
        match self {
            KeyboardMode::Letters(ShiftState::Once) => KeyboardMode::Letters(ShiftState::Off),
            other => other,
        }
    }

    /// Mode after a special key has been released.
    ///
    /// # Arguments
    ///
    /// * `key` - The released key
    /// * `shift_timer_active` - Whether the shift double-tap window is open
    pub fn after_key(self, key: KeyIdentifier, shift_timer_active: bool) -> Transition {
        use KeyboardMode::*;
        use ShiftState::*;

        match (key, self) {
            (KeyIdentifier::Numbers, _) => Transition::to(Numbers),
            (KeyIdentifier::Symbols, _) => Transition::to(Symbols),
            (KeyIdentifier::Letters, _) => Transition::to(Letters(Off)),

            (KeyIdentifier::Shift, Letters(Off)) if shift_timer_active => {
                Transition::with_timer(Letters(On), ShiftTimerEffect::Cancel)
            }
            (KeyIdentifier::Shift, Letters(Off)) => {
                Transition::with_timer(Letters(Once), ShiftTimerEffect::Arm)
            }
            (KeyIdentifier::Shift, Letters(Once)) if shift_timer_active => {
                Transition::with_timer(Letters(On), ShiftTimerEffect::Cancel)
            }
            (KeyIdentifier::Shift, Letters(Once)) => {
                Transition::with_timer(Letters(Off), ShiftTimerEffect::Arm)
            }
            (KeyIdentifier::Shift, Letters(On)) => Transition::to(Letters(Off)),

            // Shift outside letters and non-mode keys leave the mode alone.
            (KeyIdentifier::Shift, mode) => Transition::to(mode),
            (
                KeyIdentifier::Space
                | KeyIdentifier::Backspace
                | KeyIdentifier::Globe
                | KeyIdentifier::Return,
                mode,
            ) => Transition::to(mode),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_MODES: [KeyboardMode; 5] = [
        KeyboardMode::Letters(ShiftState::Off),
        KeyboardMode::Letters(ShiftState::Once),
        KeyboardMode::Letters(ShiftState::On),
        KeyboardMode::Numbers,
        KeyboardMode::Symbols,
    ];

    const ALL_KEYS: [KeyIdentifier; 8] = [
        KeyIdentifier::Space,
        KeyIdentifier::Backspace,
        KeyIdentifier::Globe,
        KeyIdentifier::Return,
        KeyIdentifier::Numbers,
        KeyIdentifier::Symbols,
        KeyIdentifier::Letters,
        KeyIdentifier::Shift,
    ];

    /// Every mode maps to its own page
    #[test]
    fn test_page_lookup_is_injective() {
        let pages: std::collections::HashSet<_> =
            ALL_MODES.iter().map(|mode| mode.page_kind()).collect();
        assert_eq!(pages.len(), 5);
    }

    #[test]
    fn test_default_is_capitalized() {
        assert_eq!(KeyboardMode::default(), KeyboardMode::Letters(ShiftState::Once));
    }

    /// Glyphs only affect shift-once
    #[test]
    fn test_after_glyph() {
        assert_eq!(
            KeyboardMode::Letters(ShiftState::Once).after_glyph(),
            KeyboardMode::Letters(ShiftState::Off)
        );
        for mode in [
            KeyboardMode::Letters(ShiftState::Off),
            KeyboardMode::Letters(ShiftState::On),
            KeyboardMode::Numbers,
            KeyboardMode::Symbols,
        ] {
            assert_eq!(mode.after_glyph(), mode);
            assert_eq!(mode.after_glyph().after_glyph(), mode);
        }
    }

    /// Page switch keys go to the same mode from anywhere
    #[test]
    fn test_page_switch_keys() {
        for mode in ALL_MODES {
            for timer in [false, true] {
                assert_eq!(
                    mode.after_key(KeyIdentifier::Numbers, timer).mode,
                    KeyboardMode::Numbers
                );
                assert_eq!(
                    mode.after_key(KeyIdentifier::Symbols, timer).mode,
                    KeyboardMode::Symbols
                );
                assert_eq!(
                    mode.after_key(KeyIdentifier::Letters, timer).mode,
                    KeyboardMode::Letters(ShiftState::Off)
                );
            }
        }
    }

    /// The shift rows of the transition table
    #[test]
    fn test_shift_transitions() {
        let off = KeyboardMode::Letters(ShiftState::Off);
        let once = KeyboardMode::Letters(ShiftState::Once);
        let on = KeyboardMode::Letters(ShiftState::On);

        let t = off.after_key(KeyIdentifier::Shift, false);
        assert_eq!((t.mode, t.shift_timer), (once, ShiftTimerEffect::Arm));

        let t = off.after_key(KeyIdentifier::Shift, true);
        assert_eq!((t.mode, t.shift_timer), (on, ShiftTimerEffect::Cancel));

        let t = once.after_key(KeyIdentifier::Shift, false);
        assert_eq!((t.mode, t.shift_timer), (off, ShiftTimerEffect::Arm));

        let t = once.after_key(KeyIdentifier::Shift, true);
        assert_eq!((t.mode, t.shift_timer), (on, ShiftTimerEffect::Cancel));

        let t = on.after_key(KeyIdentifier::Shift, false);
        assert_eq!((t.mode, t.shift_timer), (off, ShiftTimerEffect::Keep));
    }

    /// Double-tap from lowercase locks caps
    #[test]
    fn test_double_tap_locks() {
        let first = KeyboardMode::Letters(ShiftState::Off).after_key(KeyIdentifier::Shift, false);
        let second = first.mode.after_key(KeyIdentifier::Shift, true);
        assert_eq!(second.mode, KeyboardMode::Letters(ShiftState::On));
    }

    /// Shift is a no-op outside letters
    #[test]
    fn test_shift_outside_letters() {
        for mode in [KeyboardMode::Numbers, KeyboardMode::Symbols] {
            let t = mode.after_key(KeyIdentifier::Shift, false);
            assert_eq!(t.mode, mode);
            assert_eq!(t.shift_timer, ShiftTimerEffect::Keep);
        }
    }

    /// Every (mode, key) pair has a defined result and "unchanged" is idempotent
    #[test]
    fn test_transition_totality() {
        for mode in ALL_MODES {
            for key in ALL_KEYS {
                let once = mode.after_key(key, false);
                if once.mode == mode {
                    assert_eq!(once.mode.after_key(key, false).mode, mode);
                }
                if !key.is_mode_key() {
                    assert_eq!(once.mode, mode, "{:?} changed {}", key, mode);
                }
            }
        }
    }
}
