// SPDX-License-Identifier: GPL-3.0-only

//! Input handling for the keyboard.
//!
//! This module turns raw touches into presses and presses into mode changes.
//!
//! # Features
//!
//! - **Identifiers**: Recognize the special keys among free-form button identifiers
//! - **Touch disambiguation**: Per-touch press tracking with rollover and drag handling
//! - **Mode state**: Letters/shift, numbers and symbols as a pure transition table
//! - **Timers**: Deterministic one-shot and repeating timers with cancellable handles
//!
//! # Example Usage
//!
//! ## Tracking a tap
//!
//! ```rust,ignore
//! use tapboard::input::{PressEvent, TouchId, TouchTracker, DragPolicy};
//! use tapboard::layout::ButtonPath;
//!
//! let mut tracker = TouchTracker::new(DragPolicy::Retarget);
//! let key = ButtonPath::direct(0, 3);
//!
//! tracker.retire_others(TouchId(1));
//! tracker.begin(TouchId(1), Some(key.clone()));
//! assert_eq!(
//!     tracker.ended(TouchId(1), Some(key.clone())),
//!     Some(PressEvent::PressEnd { pressed: key.clone(), end: key })
//! );
//! ```
//!
//! ## Switching modes
//!
//! ```rust,ignore
//! use tapboard::input::{KeyIdentifier, KeyboardMode};
//!
//! let mode = KeyboardMode::default();
//! let next = mode.after_key(KeyIdentifier::Numbers, false);
//! assert_eq!(next.mode, KeyboardMode::Numbers);
//! ```

// Sub-modules
pub mod identifier;
pub mod mode;
pub mod timer;
pub mod touch;

// Re-export public API
pub use identifier::{KeyIdentifier, KeyRole};
pub use mode::{KeyboardMode, ShiftState, ShiftTimerEffect, Transition};
pub use timer::{ScheduledTask, TimerKind, TimerQueue};
pub use touch::{DragPolicy, PressEvent, TouchEvent, TouchId, TouchPhase, TouchTracker};

// ============================================================================
// Module Tests
// ============================================================================
