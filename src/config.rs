// SPDX-License-Identifier: GPL-3.0-only

//! Runtime behavior settings.
//!
//! Every field has a default from [`crate::settings`], so a partial JSON
//! document (or none at all) yields a working configuration. Styles are not
//! configured here; they travel with the [`crate::layout::KeyboardDefinition`].

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::input::{DragPolicy, KeyboardMode};
use crate::settings;

/// Timer intervals, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Window in which a second shift tap locks shift
    pub shift_toggle_interval_ms: u64,
    /// Hold time before backspace starts repeating
    pub backspace_repeat_delay_ms: u64,
    pub backspace_repeat_interval_ms: u64,
    /// Hold time before a key menu opens
    pub key_menu_open_delay_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            shift_toggle_interval_ms: settings::SHIFT_TOGGLE_INTERVAL_MS,
            backspace_repeat_delay_ms: settings::BACKSPACE_REPEAT_DELAY_MS,
            backspace_repeat_interval_ms: settings::BACKSPACE_REPEAT_INTERVAL_MS,
            key_menu_open_delay_ms: settings::KEY_MENU_OPEN_DELAY_MS,
        }
    }
}

impl TimingConfig {
    pub fn shift_toggle_interval(&self) -> Duration {
        Duration::from_millis(self.shift_toggle_interval_ms)
    }

    pub fn backspace_repeat_delay(&self) -> Duration {
        Duration::from_millis(self.backspace_repeat_delay_ms)
    }

    /// Repeat period; a zero value is raised to 1ms so the repeat timer
    /// always makes progress.
    pub fn backspace_repeat_interval(&self) -> Duration {
        Duration::from_millis(self.backspace_repeat_interval_ms.max(1))
    }

    pub fn key_menu_open_delay(&self) -> Duration {
        Duration::from_millis(self.key_menu_open_delay_ms)
    }
}

/// Behavior settings for a [`crate::keyboard::Keyboard`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyboardConfig {
    pub timing: TimingConfig,
    pub drag_policy: DragPolicy,
    /// Mode shown when the keyboard is created
    pub initial_mode: KeyboardMode,
    /// Extra hit area on the outer side of each row's edge keys
    pub edge_hit_extension: f32,
}

impl Default for KeyboardConfig {
    fn default() -> Self {
        Self {
            timing: TimingConfig::default(),
            drag_policy: DragPolicy::default(),
            initial_mode: KeyboardMode::default(),
            edge_hit_extension: settings::EDGE_HIT_EXTENSION,
        }
    }
}
