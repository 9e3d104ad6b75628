// SPDX-License-Identifier: GPL-3.0-only

//! Button identifier parsing.
//!
//! Buttons carry free-form string identifiers. The keyboard recognizes a
//! closed set of them as special keys; anything else is a custom button
//! reported back to the host.
//!
//! # Recognized identifiers
//!
//! | Identifier | Key |
//! |---|---|
//! | `Space` | space bar |
//! | `Backspace` | delete backward, repeats while held |
//! | `Globe` | switch to the next system keyboard |
//! | `Return` | return / enter |
//! | `Numbers` | the "123" key |
//! | `Symbols` | the "#+=" key |
//! | `Letters` | the "ABC" key |
//! | `Shift`, `ShiftOff`, `ShiftOnce`, `ShiftOn` | shift, one per page look |
//!
//! Matching is exact and case-sensitive.

use std::fmt;

/// A special key recognized by the mode state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyIdentifier {
    Space,
    Backspace,
    Globe,
    Return,
    /// The "123" key
    Numbers,
    /// The "#+=" key
    Symbols,
    /// The "ABC" key
    Letters,
    Shift,
}

impl KeyIdentifier {
    /// Parses a button identifier.
    ///
    /// # Returns
    ///
    /// * `Some(KeyIdentifier)` for a recognized special key
    /// * `None` for custom identifiers
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// assert_eq!(KeyIdentifier::parse("ShiftOnce"), Some(KeyIdentifier::Shift));
    /// assert_eq!(KeyIdentifier::parse("Emoji"), None);
    /// ```
    pub fn parse(identifier: &str) -> Option<Self> {
        match identifier {
            "Space" => Some(KeyIdentifier::Space),
            "Backspace" => Some(KeyIdentifier::Backspace),
            "Globe" => Some(KeyIdentifier::Globe),
            "Return" => Some(KeyIdentifier::Return),
            "Numbers" => Some(KeyIdentifier::Numbers),
            "Symbols" => Some(KeyIdentifier::Symbols),
            "Letters" => Some(KeyIdentifier::Letters),
            "Shift" | "ShiftOff" | "ShiftOnce" | "ShiftOn" => Some(KeyIdentifier::Shift),
            _ => None,
        }
    }

    /// Canonical identifier string.
    pub fn as_str(self) -> &'static str {
        match self {
            KeyIdentifier::Space => "Space",
            KeyIdentifier::Backspace => "Backspace",
            KeyIdentifier::Globe => "Globe",
            KeyIdentifier::Return => "Return",
            KeyIdentifier::Numbers => "Numbers",
            KeyIdentifier::Symbols => "Symbols",
            KeyIdentifier::Letters => "Letters",
            KeyIdentifier::Shift => "Shift",
        }
    }

    /// Returns `true` for keys that switch pages.
    pub fn is_mode_key(self) -> bool {
        matches!(
            self,
            KeyIdentifier::Numbers
                | KeyIdentifier::Symbols
                | KeyIdentifier::Letters
                | KeyIdentifier::Shift
        )
    }
}

impl fmt::Display for KeyIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a released button is interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyRole<'a> {
    /// A recognized special key
    Special(KeyIdentifier),
    /// Text to commit
    Glyph(&'a str),
    /// A host-defined button
    Custom(&'a str),
    /// No identifier and no glyph: nothing happens
    Inert,
}

impl<'a> KeyRole<'a> {
    /// Classifies a button from its identifier and glyph text.
    ///
    /// A recognized identifier wins over glyph text, and glyph text wins over
    /// an unrecognized identifier.
    pub fn classify(identifier: Option<&'a str>, glyph: Option<&'a str>) -> Self {
        if let Some(key) = identifier.and_then(KeyIdentifier::parse) {
            return KeyRole::Special(key);
        }
        match (glyph, identifier) {
            (Some(text), _) => KeyRole::Glyph(text),
            (None, Some(custom)) => KeyRole::Custom(custom),
            (None, None) => KeyRole::Inert,
        }
    }
}
