// SPDX-License-Identifier: GPL-3.0-only

//! Centralized defaults for layout spacing, timers and popups.

/// Delay between two shift taps that still counts as a double tap (locks shift).
pub const SHIFT_TOGGLE_INTERVAL_MS: u64 = 500;

/// How long backspace must be held before auto-delete starts.
pub const BACKSPACE_REPEAT_DELAY_MS: u64 = 500;

/// Interval between synthetic backspaces while auto-delete is running.
pub const BACKSPACE_REPEAT_INTERVAL_MS: u64 = 100;

/// Long press threshold before a key menu opens.
pub const KEY_MENU_OPEN_DELAY_MS: u64 = 1000;

/// Extra hit area given to the outer side of the first and last key of a row.
pub const EDGE_HIT_EXTENSION: f32 = 20.0;

/// Deepest allowed row nesting (outermost row is depth 1).
pub const MAX_NESTING_DEPTH: usize = 4;

/// Nesting depth seen in practice; deeper rows get a validation warning.
pub const TYPICAL_NESTING_DEPTH: usize = 2;

// Row spacing defaults.
pub const ROW_LEADING_PADDING: f32 = 3.0;
pub const ROW_TRAILING_PADDING: f32 = 3.0;
pub const ROW_TOP_PADDING: f32 = 6.0;
pub const ROW_BOTTOM_PADDING: f32 = 6.0;
pub const ROW_BOTTOM_PADDING_LANDSCAPE: f32 = 4.0;
pub const ROW_BUTTONS_PADDING: f32 = 6.0;
pub const ROW_BUTTONS_PADDING_LANDSCAPE: f32 = 5.0;

/// Key preview bubble size relative to the pressed key.
pub const PREVIEW_WIDTH_MULTIPLIER: f32 = 1.2;
pub const PREVIEW_HEIGHT_MULTIPLIER: f32 = 1.2;

/// Inset of the preview content from the bubble edge.
pub const PREVIEW_CONTENT_INSET: f32 = 5.0;

/// How far the preview bubble reaches down over the top of its key.
pub const PREVIEW_CONNECTOR_OVERLAP: f32 = 5.0;

/// Default size of a single key menu item.
pub const MENU_ITEM_WIDTH: f32 = 44.0;
pub const MENU_ITEM_HEIGHT: f32 = 40.0;

/// Thickness of the separator drawn between vertical menu items.
pub const MENU_SEPARATOR_THICKNESS: f32 = 1.0;

/// Gap between a key and the popup shown above it.
pub const POPUP_GAP: f32 = 4.0;
